//! Pattern rules for grammar, capitalization, punctuation and style.
//!
//! Rules work on word tokens and the gaps between them. Spans are reported
//! in chars ([`OffsetEncoding::Utf32`]).

use super::tokens::{self, Token, capitalize, gap, is_inline_gap, match_case};
use crate::{LintCategory, LintEngine, LintIssue, OffsetEncoding, Result, Span};

/// Phrases that can be shortened, with their replacement.
const WORDY_PHRASES: &[(&str, &str)] = &[
	("in order to", "to"),
	("due to the fact that", "because"),
	("at this point in time", "now"),
	("in the event that", "if"),
	("for the purpose of", "for"),
	("a large number of", "many"),
	("in spite of the fact that", "although"),
	("has the ability to", "can"),
];

/// Adjectives that do not take an intensifier.
const ABSOLUTES: &[&str] = &["unique", "perfect", "essential", "complete", "impossible", "final", "infinite", "fatal"];

/// Words before a period that do not end a sentence.
const ABBREVIATIONS: &[&str] = &["e.g", "i.e", "etc", "vs", "mr", "mrs", "ms", "dr", "prof", "st", "cf"];

/// Vowel-initial words pronounced with a consonant sound.
const CONSONANT_SOUND_PREFIXES: &[&str] = &["uni", "use", "usu", "uti", "eu", "one", "once", "ewe"];

/// Consonant-initial words pronounced with a vowel sound.
const VOWEL_SOUND_PREFIXES: &[&str] = &["hour", "honest", "honor", "honour", "heir"];

const MODALS: &[&str] = &["could", "should", "would", "must", "might"];

/// Rule-based grammar and style engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl RuleEngine {
	pub fn new() -> Self {
		Self
	}
}

impl LintEngine for RuleEngine {
	fn name(&self) -> &str {
		"rules"
	}

	fn encoding(&self) -> OffsetEncoding {
		OffsetEncoding::Utf32
	}

	fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>> {
		let words = tokens::words(text);
		let mut issues = Vec::new();

		capitalization(text, &words, &mut issues);
		repeated_words(text, &words, &mut issues);
		articles(text, &words, &mut issues);
		phrases(text, &words, &mut issues);
		intensified_absolutes(text, &words, &mut issues);
		confusables(text, &words, &mut issues);
		spacing(text, &mut issues);

		issues.sort_by_key(|i| (i.span.start, i.span.end));
		Ok(issues)
	}
}

fn span_of(first: &Token<'_>, last: &Token<'_>) -> Span {
	Span::new(first.start, last.end)
}

/// Lowercase pronoun `i` and lowercase sentence starts.
fn capitalization(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	let mut sentence_start = true;
	let mut prev: Option<&Token<'_>> = None;

	for token in words {
		if let Some(prev) = prev {
			let between = gap(text, prev, token);
			let abbreviation = between.starts_with('.') && ABBREVIATIONS.contains(&prev.text.to_lowercase().as_str());
			if between.contains('\n') || (!abbreviation && between.contains(['.', '!', '?'])) {
				sentence_start = true;
			}
		}

		let lower = token.text.to_lowercase();
		let pronoun = token.text.starts_with('i') && matches!(lower.as_str(), "i" | "i'm" | "i've" | "i'll" | "i'd" | "i\u{2019}m");
		if pronoun {
			out.push(
				LintIssue::new(LintCategory::Capitalization, Span::new(token.start, token.end), "The pronoun \u{201C}I\u{201D} is always capitalized.")
					.with_suggestions([capitalize(token.text)]),
			);
		} else if sentence_start && token.text.chars().next().is_some_and(char::is_lowercase) {
			out.push(
				LintIssue::new(LintCategory::Capitalization, Span::new(token.start, token.end), "Sentences should start with a capital letter.")
					.with_suggestions([capitalize(token.text)]),
			);
		}

		sentence_start = false;
		prev = Some(token);
	}
}

/// `the the`
fn repeated_words(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	for pair in words.windows(2) {
		let (a, b) = (&pair[0], &pair[1]);
		if !is_inline_gap(gap(text, a, b)) || !a.text.chars().all(char::is_alphabetic) {
			continue;
		}
		if a.text.to_lowercase() == b.text.to_lowercase() {
			out.push(
				LintIssue::new(LintCategory::Grammar, span_of(a, b), format!("The word \u{201C}{}\u{201D} is repeated.", a.text))
					.with_suggestions([a.text.to_string()]),
			);
		}
	}
}

fn starts_with_vowel_sound(word: &str) -> Option<bool> {
	let lower = word.to_lowercase();
	let first = lower.chars().next()?;
	let acronym = word.chars().count() > 1 && word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
	if !first.is_alphabetic() || acronym {
		return None;
	}
	if VOWEL_SOUND_PREFIXES.iter().any(|p| lower.starts_with(p)) {
		return Some(true);
	}
	if CONSONANT_SOUND_PREFIXES.iter().any(|p| lower.starts_with(p)) {
		return Some(false);
	}
	Some(matches!(first, 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// `a apple`, `an banana`
fn articles(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	for pair in words.windows(2) {
		let (article, next) = (&pair[0], &pair[1]);
		if !is_inline_gap(gap(text, article, next)) {
			continue;
		}
		let Some(vowel) = starts_with_vowel_sound(next.text) else {
			continue;
		};
		let replacement = match (article.text.to_lowercase().as_str(), vowel) {
			("a", true) => "an",
			("an", false) => "a",
			_ => continue,
		};
		out.push(
			LintIssue::new(
				LintCategory::Grammar,
				Span::new(article.start, article.end),
				format!("Use \u{201C}{replacement}\u{201D} before \u{201C}{}\u{201D}.", next.text),
			)
			.with_suggestions([match_case(replacement, article.text)]),
		);
	}
}

/// Matches `phrase` word-by-word starting at `words[at]`, returning the last token.
fn match_phrase<'t, 'a>(text: &str, words: &'t [Token<'a>], at: usize, phrase: &str) -> Option<&'t Token<'a>> {
	let mut last: Option<&Token<'_>> = None;
	for (offset, part) in phrase.split(' ').enumerate() {
		let token = words.get(at + offset)?;
		if !token.text.eq_ignore_ascii_case(part) {
			return None;
		}
		if let Some(prev) = last
			&& !is_inline_gap(gap(text, prev, token))
		{
			return None;
		}
		last = Some(token);
	}
	last
}

/// Wordy phrases with a shorter equivalent.
fn phrases(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	for at in 0..words.len() {
		for (phrase, replacement) in WORDY_PHRASES {
			if let Some(last) = match_phrase(text, words, at, phrase) {
				out.push(
					LintIssue::new(
						LintCategory::WordChoice,
						span_of(&words[at], last),
						format!("\u{201C}{phrase}\u{201D} can usually be shortened to \u{201C}{replacement}\u{201D}."),
					)
					.with_suggestions([match_case(replacement, words[at].text)]),
				);
			}
		}
	}
}

/// `very unique`
fn intensified_absolutes(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	for pair in words.windows(2) {
		let (very, adjective) = (&pair[0], &pair[1]);
		if very.text.eq_ignore_ascii_case("very")
			&& is_inline_gap(gap(text, very, adjective))
			&& ABSOLUTES.contains(&adjective.text.to_lowercase().as_str())
		{
			out.push(
				LintIssue::new(
					LintCategory::Style,
					span_of(very, adjective),
					format!("\u{201C}{}\u{201D} does not need an intensifier.", adjective.text),
				)
				.with_suggestions([match_case(adjective.text, very.text)]),
			);
		}
	}
}

/// `alot`, `could of`
fn confusables(text: &str, words: &[Token<'_>], out: &mut Vec<LintIssue>) {
	for (idx, token) in words.iter().enumerate() {
		if token.text.eq_ignore_ascii_case("alot") {
			out.push(
				LintIssue::new(LintCategory::Typo, Span::new(token.start, token.end), "\u{201C}A lot\u{201D} is written as two words.")
					.with_suggestions([match_case("a lot", token.text)]),
			);
			continue;
		}
		let Some(next) = words.get(idx + 1) else {
			continue;
		};
		let lower = token.text.to_lowercase();
		if MODALS.contains(&lower.as_str()) && next.text.eq_ignore_ascii_case("of") && is_inline_gap(gap(text, token, next)) {
			out.push(
				LintIssue::new(
					LintCategory::Typo,
					span_of(token, next),
					format!("Did you mean \u{201C}{} have\u{201D}?", token.text),
				)
				.with_suggestions([format!("{} have", token.text)]),
			);
		}
	}
}

/// Whitespace before punctuation and runs of spaces.
fn spacing(text: &str, out: &mut Vec<LintIssue>) {
	let chars: Vec<char> = text.chars().collect();
	let mut idx = 0;
	while idx < chars.len() {
		if chars[idx] != ' ' && chars[idx] != '\t' {
			idx += 1;
			continue;
		}
		let start = idx;
		while idx < chars.len() && (chars[idx] == ' ' || chars[idx] == '\t') {
			idx += 1;
		}
		let at_line_start = start == 0 || chars[start - 1] == '\n';
		let Some(&next) = chars.get(idx) else {
			continue;
		};
		if at_line_start || next == '\n' {
			continue;
		}

		let ellipsis = next == '.' && chars.get(idx + 1) == Some(&'.');
		if matches!(next, ',' | '.' | ';' | ':' | '!' | '?') && !ellipsis {
			out.push(
				LintIssue::new(
					LintCategory::Punctuation,
					Span::new(start, idx),
					format!("Unexpected space before \u{201C}{next}\u{201D}."),
				)
				.with_suggestions([String::new()]),
			);
		} else if idx - start > 1 {
			out.push(LintIssue::new(LintCategory::Style, Span::new(start, idx), "Multiple consecutive spaces.").with_suggestions([" "]));
		}
	}
}
