//! Word-list spelling engine.
//!
//! Each [`DictionaryEngine`] checks one [`Dialect`]. Running two of them side
//! by side and merging with [`merge_dialects`](crate::merge_dialects) gives
//! dialect-tolerant spelling: a word accepted by either dialect is not flagged.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::tokens::{self, match_case};
use crate::{EngineError, LintCategory, LintEngine, LintIssue, OffsetEncoding, Result, Span};

const BASE_WORDS: &str = include_str!("../../dictionaries/en_base.txt");
const US_WORDS: &str = include_str!("../../dictionaries/en_us.txt");
const GB_WORDS: &str = include_str!("../../dictionaries/en_gb.txt");

/// Maximum edit distance for a dictionary word to be offered as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

const MAX_SUGGESTIONS: usize = 5;

/// Misspellings whose suggestions are remembered before the cache is reset.
const SUGGESTION_CACHE_LIMIT: usize = 2048;

/// English spelling variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
	#[serde(rename = "en-us")]
	EnUs,
	#[serde(rename = "en-gb")]
	EnGb,
}

impl Dialect {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::EnUs => "en-us",
			Self::EnGb => "en-gb",
		}
	}

	const fn variant_words(self) -> &'static str {
		match self {
			Self::EnUs => US_WORDS,
			Self::EnGb => GB_WORDS,
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Dialect {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('_', "-").as_str() {
			"en-us" => Ok(Self::EnUs),
			"en-gb" => Ok(Self::EnGb),
			_ => Err(format!("unknown dialect: {s}")),
		}
	}
}

/// Set of accepted words, stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct WordList {
	words: HashSet<String>,
}

impl WordList {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared English words plus the variant spellings of `dialect`.
	pub fn builtin(dialect: Dialect) -> Self {
		let mut list = Self::new();
		list.extend_from_str(BASE_WORDS);
		list.extend_from_str(dialect.variant_words());
		list
	}

	/// Adds one word per line. Blank lines and `#` comments are skipped.
	pub fn extend_from_str(&mut self, source: &str) {
		for line in source.lines() {
			let word = line.trim();
			if word.is_empty() || word.starts_with('#') {
				continue;
			}
			self.words.insert(word.to_lowercase());
		}
	}

	pub fn insert(&mut self, word: &str) {
		self.words.insert(word.to_lowercase());
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(&word.to_lowercase())
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}
}

/// Spelling engine backed by a [`WordList`]. Reports UTF-8 byte spans.
#[derive(Debug)]
pub struct DictionaryEngine {
	name: String,
	dialect: Dialect,
	words: WordList,
	suggestion_cache: HashMap<String, Vec<String>>,
	cache_limit: usize,
}

impl DictionaryEngine {
	/// Creates an engine over `words`.
	///
	/// Fails with [`EngineError::Empty`] when the list has no words.
	pub fn new(dialect: Dialect, words: WordList) -> Result<Self> {
		let name = format!("dictionary({dialect})");
		if words.is_empty() {
			return Err(EngineError::Empty(name));
		}
		Ok(Self {
			name,
			dialect,
			words,
			suggestion_cache: HashMap::new(),
			cache_limit: SUGGESTION_CACHE_LIMIT,
		})
	}

	/// Engine over the built-in list for `dialect`.
	pub fn builtin(dialect: Dialect) -> Self {
		Self {
			name: format!("dictionary({dialect})"),
			dialect,
			words: WordList::builtin(dialect),
			suggestion_cache: HashMap::new(),
			cache_limit: SUGGESTION_CACHE_LIMIT,
		}
	}

	pub const fn dialect(&self) -> Dialect {
		self.dialect
	}

	fn accepts(&self, word: &str) -> bool {
		if self.words.contains(word) {
			return true;
		}
		let stem = word
			.strip_suffix("'s")
			.or_else(|| word.strip_suffix("\u{2019}s"))
			.or_else(|| word.strip_suffix('\''))
			.or_else(|| word.strip_suffix('\u{2019}'));
		stem.is_some_and(|stem| self.words.contains(stem))
	}

	fn suggestions(&mut self, word: &str) -> Vec<String> {
		let lower = word.to_lowercase();
		if let Some(cached) = self.suggestion_cache.get(&lower) {
			return cached.iter().map(|s| match_case(s, word)).collect();
		}

		let len = lower.chars().count();
		let mut scored: Vec<(usize, &str)> = self
			.words
			.iter()
			.filter(|candidate| candidate.chars().count().abs_diff(len) <= MAX_SUGGESTION_DISTANCE)
			.filter_map(|candidate| {
				let distance = strsim::damerau_levenshtein(&lower, candidate);
				(distance <= MAX_SUGGESTION_DISTANCE).then_some((distance, candidate))
			})
			.collect();
		scored.sort_unstable();

		let best: Vec<String> = scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, w)| w.to_string()).collect();
		let recased = best.iter().map(|s| match_case(s, word)).collect();
		if self.suggestion_cache.len() >= self.cache_limit {
			trace!(engine = %self.name, entries = self.suggestion_cache.len(), "lint.dictionary.cache_reset");
			self.suggestion_cache.clear();
		}
		self.suggestion_cache.insert(lower, best);
		recased
	}
}

/// Tokens the spelling check never flags.
fn is_exempt(word: &str) -> bool {
	let mut letters = 0;
	let mut upper = 0;
	for c in word.chars() {
		if c.is_numeric() {
			return true;
		}
		if c.is_alphabetic() {
			letters += 1;
			if c.is_uppercase() {
				upper += 1;
			}
		}
	}
	letters <= 1 || (upper == letters && letters > 1)
}

impl LintEngine for DictionaryEngine {
	fn name(&self) -> &str {
		&self.name
	}

	fn encoding(&self) -> OffsetEncoding {
		OffsetEncoding::Utf8
	}

	fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>> {
		let mut issues = Vec::new();
		for token in tokens::words(text) {
			if is_exempt(token.text) || self.accepts(token.text) {
				continue;
			}
			let suggestions = self.suggestions(token.text);
			issues.push(
				LintIssue::new(
					LintCategory::Spelling,
					Span::new(token.byte_start, token.byte_end),
					format!("Did you mean to spell \u{201C}{}\u{201D} this way?", token.text),
				)
				.with_suggestions(suggestions),
			);
		}
		Ok(issues)
	}
}
