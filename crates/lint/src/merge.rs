//! Dual-dialect merge policy.
//!
//! Two variants of the same engine (for example American and British
//! dictionaries) are run over the same text. An issue both variants report
//! at the same span is kept once, with suggestions from both. An issue only
//! one variant reports is kept unless its category is tolerated, so a word
//! one dialect accepts is not flagged while grammar disagreements still are.

use crate::{CategorySet, LintCategory, LintIssue};

/// Categories for which single-variant findings are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectMergePolicy {
	tolerated: CategorySet,
}

impl Default for DialectMergePolicy {
	fn default() -> Self {
		Self {
			tolerated: LintCategory::Spelling.into(),
		}
	}
}

impl DialectMergePolicy {
	pub const fn new(tolerated: CategorySet) -> Self {
		Self { tolerated }
	}

	/// Keeps every finding from either variant.
	pub const fn union() -> Self {
		Self {
			tolerated: CategorySet::empty(),
		}
	}

	pub const fn tolerated(&self) -> CategorySet {
		self.tolerated
	}

	const fn keeps_single(&self, category: LintCategory) -> bool {
		!self.tolerated.allows(category)
	}
}

/// Merges the outputs of two dialect variants.
///
/// Output order: `primary` order, then findings only `secondary` reported.
pub fn merge_dialects(primary: Vec<LintIssue>, secondary: Vec<LintIssue>, policy: &DialectMergePolicy) -> Vec<LintIssue> {
	let mut matched = vec![false; secondary.len()];
	let mut out = Vec::with_capacity(primary.len());

	for mut issue in primary {
		let twin = secondary
			.iter()
			.enumerate()
			.position(|(idx, other)| !matched[idx] && other.span == issue.span);
		match twin {
			Some(idx) => {
				matched[idx] = true;
				for suggestion in &secondary[idx].suggestions {
					if !issue.suggestions.contains(suggestion) {
						issue.suggestions.push(suggestion.clone());
					}
				}
				out.push(issue);
			}
			None if policy.keeps_single(issue.category) => out.push(issue),
			None => {}
		}
	}

	out.extend(
		secondary
			.into_iter()
			.zip(matched)
			.filter(|(issue, was_matched)| !was_matched && policy.keeps_single(issue.category))
			.map(|(issue, _)| issue),
	);
	out
}
