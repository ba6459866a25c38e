//! Issue categories and category sets.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Classification of a lint issue, used for filtering and colour-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LintCategory {
	Spelling,
	Grammar,
	Capitalization,
	Punctuation,
	Style,
	WordChoice,
	Typo,
	Miscellaneous,
}

impl LintCategory {
	/// Every category, in declaration order.
	pub const ALL: [LintCategory; 8] = [
		Self::Spelling,
		Self::Grammar,
		Self::Capitalization,
		Self::Punctuation,
		Self::Style,
		Self::WordChoice,
		Self::Typo,
		Self::Miscellaneous,
	];

	/// Stable lowercase name, matching the serialized form.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Spelling => "spelling",
			Self::Grammar => "grammar",
			Self::Capitalization => "capitalization",
			Self::Punctuation => "punctuation",
			Self::Style => "style",
			Self::WordChoice => "word-choice",
			Self::Typo => "typo",
			Self::Miscellaneous => "miscellaneous",
		}
	}

	const fn flag(self) -> CategorySet {
		match self {
			Self::Spelling => CategorySet::SPELLING,
			Self::Grammar => CategorySet::GRAMMAR,
			Self::Capitalization => CategorySet::CAPITALIZATION,
			Self::Punctuation => CategorySet::PUNCTUATION,
			Self::Style => CategorySet::STYLE,
			Self::WordChoice => CategorySet::WORD_CHOICE,
			Self::Typo => CategorySet::TYPO,
			Self::Miscellaneous => CategorySet::MISCELLANEOUS,
		}
	}
}

impl fmt::Display for LintCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LintCategory {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|c| c.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| format!("unknown lint category: {s}"))
	}
}

bitflags! {
	/// A set of [`LintCategory`] values, used as allowlists and merge tolerances.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct CategorySet: u8 {
		const SPELLING = 1 << 0;
		const GRAMMAR = 1 << 1;
		const CAPITALIZATION = 1 << 2;
		const PUNCTUATION = 1 << 3;
		const STYLE = 1 << 4;
		const WORD_CHOICE = 1 << 5;
		const TYPO = 1 << 6;
		const MISCELLANEOUS = 1 << 7;
	}
}

impl CategorySet {
	/// Returns true if `category` is a member.
	pub const fn allows(self, category: LintCategory) -> bool {
		self.contains(category.flag())
	}

	/// Iterates members in declaration order.
	pub fn categories(self) -> impl Iterator<Item = LintCategory> {
		LintCategory::ALL.into_iter().filter(move |c| self.allows(*c))
	}
}

impl Default for CategorySet {
	fn default() -> Self {
		Self::all()
	}
}

impl From<LintCategory> for CategorySet {
	fn from(category: LintCategory) -> Self {
		category.flag()
	}
}

impl FromIterator<LintCategory> for CategorySet {
	fn from_iter<I: IntoIterator<Item = LintCategory>>(iter: I) -> Self {
		iter.into_iter().fold(Self::empty(), |set, c| set | c.flag())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_round_trips_through_iterator() {
		let set: CategorySet = [LintCategory::Grammar, LintCategory::Typo].into_iter().collect();
		assert!(set.allows(LintCategory::Grammar));
		assert!(!set.allows(LintCategory::Spelling));
		assert_eq!(set.categories().collect::<Vec<_>>(), vec![LintCategory::Grammar, LintCategory::Typo]);
	}

	#[test]
	fn parse_is_case_insensitive() {
		assert_eq!("Word-Choice".parse::<LintCategory>(), Ok(LintCategory::WordChoice));
		assert!("nonsense".parse::<LintCategory>().is_err());
	}

	#[test]
	fn serde_uses_kebab_case() {
		let json = serde_json::to_string(&LintCategory::WordChoice).unwrap();
		assert_eq!(json, "\"word-choice\"");
	}
}
