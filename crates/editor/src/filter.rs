//! Category allowlist and user ignores.

use std::collections::HashSet;

use quill_lint::{CategorySet, LintIssue, Span};

/// A dismissed issue: its offsets plus the text it covered when dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IgnoredSpan {
	pub start: usize,
	pub end: usize,
	pub text: String,
}

impl IgnoredSpan {
	pub fn new(span: Span, text: impl Into<String>) -> Self {
		Self {
			start: span.start,
			end: span.end,
			text: text.into(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
	spans: Vec<IgnoredSpan>,
}

impl IgnoreList {
	pub fn insert(&mut self, ignored: IgnoredSpan) {
		if !self.spans.contains(&ignored) {
			self.spans.push(ignored);
		}
	}

	pub fn clear(&mut self) {
		self.spans.clear();
	}

	pub fn len(&self) -> usize {
		self.spans.len()
	}

	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &IgnoredSpan> {
		self.spans.iter()
	}

	/// True when an entry has the same offsets as `span` and its text equals
	/// `current_text`, the text the document shows for that span now.
	/// `current_text` only runs when the offsets match.
	pub fn suppresses(&self, span: Span, current_text: impl FnOnce() -> String) -> bool {
		let mut candidates = self.spans.iter().filter(|i| i.start == span.start && i.end == span.end).peekable();
		if candidates.peek().is_none() {
			return false;
		}
		let current = current_text();
		candidates.any(|i| i.text == current)
	}
}

/// Drops issues outside `allowed` and issues the user ignored, then keeps
/// the first survivor per span so issue keys are unique. Engine order is
/// kept. `text_at` yields the current document text for a span.
pub fn filter_issues(issues: &[LintIssue], ignored: &IgnoreList, allowed: CategorySet, mut text_at: impl FnMut(Span) -> String) -> Vec<LintIssue> {
	let mut seen = HashSet::new();
	issues
		.iter()
		.filter(|issue| allowed.allows(issue.category))
		.filter(|issue| !ignored.suppresses(issue.span, || text_at(issue.span)))
		.filter(|issue| seen.insert(issue.span))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use quill_lint::{EngineAdapter, EngineSet, EngineSlot, LintCategory, RuleEngine};

	use super::*;
	use crate::Document;
	use crate::mapper::span_text;

	fn spelling(start: usize, end: usize) -> LintIssue {
		LintIssue::new(LintCategory::Spelling, Span::new(start, end), "spelling")
	}

	#[test]
	fn categories_outside_the_allowlist_are_dropped() {
		let doc = Document::from_plain_text("in order to win");
		let issues = vec![
			LintIssue::new(LintCategory::WordChoice, Span::new(0, 11), "wordy"),
			spelling(12, 15),
		];
		let allowed = CategorySet::all() - CategorySet::WORD_CHOICE;
		assert_eq!(filter_issues(&issues, &IgnoreList::default(), allowed, |span| span_text(&doc, span)), vec![spelling(12, 15)]);
	}

	#[test]
	fn engine_order_is_preserved() {
		let doc = Document::from_plain_text("zzz yyy");
		let issues = vec![spelling(4, 7), spelling(0, 3)];
		assert_eq!(filter_issues(&issues, &IgnoreList::default(), CategorySet::all(), |span| span_text(&doc, span)), issues);
	}

	#[test]
	fn ignore_requires_matching_text() {
		let doc = Document::from_plain_text("The essay wrold ends.");
		let mut ignored = IgnoreList::default();
		ignored.insert(IgnoredSpan::new(Span::new(10, 15), "wrold"));
		assert!(filter_issues(&[spelling(10, 15)], &ignored, CategorySet::all(), |span| span_text(&doc, span)).is_empty());

		// an edit before the word moves it; the old offsets now cover other text
		let shifted = Document::from_plain_text("The long essay wrold ends.");
		let issues = vec![spelling(15, 20)];
		assert_eq!(filter_issues(&issues, &ignored, CategorySet::all(), |span| span_text(&shifted, span)), issues);
		assert!(!ignored.suppresses(Span::new(10, 15), || span_text(&shifted, Span::new(10, 15))));
	}

	#[test]
	fn shared_span_shows_the_first_allowed_category() {
		let doc = Document::from_plain_text("a apple fell.");
		let mut rules = EngineSet::new().with_slot(EngineSlot::Single(EngineAdapter::new(RuleEngine::new())));
		let issues = rules.lint("a apple fell.").unwrap();

		let all = filter_issues(&issues, &IgnoreList::default(), CategorySet::all(), |span| span_text(&doc, span));
		let first: Vec<_> = all.iter().filter(|i| i.span == Span::new(0, 1)).collect();
		assert_eq!(first.len(), 1);
		assert_eq!(first[0].category, LintCategory::Capitalization);

		let allowed = CategorySet::all() - CategorySet::CAPITALIZATION;
		let visible = filter_issues(&issues, &IgnoreList::default(), allowed, |span| span_text(&doc, span));
		let article = visible.iter().find(|i| i.span == Span::new(0, 1)).unwrap();
		assert_eq!(article.category, LintCategory::Grammar);
		assert_eq!(article.suggestions, vec!["an"]);
	}

	#[test]
	fn duplicate_ignores_are_stored_once() {
		let mut ignored = IgnoreList::default();
		ignored.insert(IgnoredSpan::new(Span::new(1, 2), "a"));
		ignored.insert(IgnoredSpan::new(Span::new(1, 2), "a"));
		assert_eq!(ignored.len(), 1);
		ignored.clear();
		assert!(ignored.is_empty());
	}
}
