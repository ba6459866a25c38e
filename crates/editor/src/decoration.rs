//! Lint decorations and the renderer that builds them.

use quill_lint::{IssueKey, LintCategory, LintIssue};
use tracing::debug;

use crate::mapper::{Bias, map_offset};
use crate::{Change, LintSurface};

/// Underline alpha for an unfocused issue.
const BASE_ALPHA: u8 = 0x59;
/// Underline alpha for the focused issue.
const FOCUSED_ALPHA: u8 = 0xD9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

impl Rgba {
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self { r, g, b, a }
	}
}

/// Underline colour for `category`.
pub const fn category_color(category: LintCategory, focused: bool) -> Rgba {
	let a = if focused { FOCUSED_ALPHA } else { BASE_ALPHA };
	match category {
		LintCategory::Spelling => Rgba::new(0xE5, 0x48, 0x4D, a),
		LintCategory::Grammar => Rgba::new(0x3E, 0x63, 0xDD, a),
		LintCategory::Capitalization => Rgba::new(0x8E, 0x4E, 0xC6, a),
		LintCategory::Punctuation => Rgba::new(0x12, 0xA5, 0x94, a),
		LintCategory::Style => Rgba::new(0xF7, 0x6B, 0x15, a),
		LintCategory::WordChoice => Rgba::new(0xD6, 0x40, 0x9F, a),
		LintCategory::Typo => Rgba::new(0xFF, 0xC5, 0x3D, a),
		LintCategory::Miscellaneous => Rgba::new(0x8B, 0x8D, 0x98, a),
	}
}

/// Annotation over document positions `from..to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
	pub from: usize,
	pub to: usize,
	pub key: IssueKey,
	pub category: LintCategory,
	pub color: Rgba,
	pub focused: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
	items: Vec<Decoration>,
}

impl DecorationSet {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
		self.items.iter()
	}

	pub fn get(&self, key: IssueKey) -> Option<&Decoration> {
		self.items.iter().find(|d| d.key == key)
	}

	/// Decorations that survive `change`, shifted to their new positions.
	#[must_use]
	pub fn map_through(&self, change: &Change) -> Self {
		let items = self
			.items
			.iter()
			.filter_map(|deco| {
				let (from, to) = change.map_range(deco.from, deco.to)?;
				Some(Decoration { from, to, ..deco.clone() })
			})
			.collect();
		Self { items }
	}

	/// Same set with only `focused` intensified.
	#[must_use]
	pub fn with_focus(&self, focused: Option<IssueKey>) -> Self {
		let items = self
			.items
			.iter()
			.map(|deco| {
				let is_focused = Some(deco.key) == focused;
				Decoration {
					focused: is_focused,
					color: category_color(deco.category, is_focused),
					..deco.clone()
				}
			})
			.collect();
		Self { items }
	}

	/// Same set restricted to `keys`.
	#[must_use]
	pub fn retain_keys(&self, keys: &[IssueKey]) -> Self {
		let items = self.items.iter().filter(|d| keys.contains(&d.key)).cloned().collect();
		Self { items }
	}
}

impl FromIterator<Decoration> for DecorationSet {
	fn from_iter<T: IntoIterator<Item = Decoration>>(iter: T) -> Self {
		Self {
			items: iter.into_iter().collect(),
		}
	}
}

/// Maps every issue onto `surface`. Issues whose mapped range is empty or
/// out of bounds are skipped.
pub fn build_decorations(surface: &impl LintSurface, issues: &[LintIssue], focused: Option<IssueKey>) -> DecorationSet {
	let (min, max) = surface.content_bounds();
	issues
		.iter()
		.filter_map(|issue| {
			let from = map_offset(surface, issue.span.start, Bias::Start);
			let to = map_offset(surface, issue.span.end, Bias::End);
			if to <= from || from < min || to > max {
				debug!(start = issue.span.start, end = issue.span.end, from, to, "lint.render.skip_degenerate");
				return None;
			}
			let key = issue.key();
			let is_focused = Some(key) == focused;
			Some(Decoration {
				from,
				to,
				key,
				category: issue.category,
				color: category_color(issue.category, is_focused),
				focused: is_focused,
			})
		})
		.collect()
}

/// Replaces the surface's decorations with the set built from `issues`.
///
/// An empty issue list clears the set explicitly. Returns the number of
/// decorations now on the surface.
pub fn render(surface: &mut impl LintSurface, issues: &[LintIssue], focused: Option<IssueKey>) -> usize {
	if issues.is_empty() {
		debug!("lint.render.clear");
		surface.clear_decorations();
		return 0;
	}
	let set = build_decorations(surface, issues, focused);
	let count = set.len();
	debug!(issues = issues.len(), rendered = count, "lint.render.replace");
	surface.set_decorations(set);
	count
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use quill_lint::Span;

	use super::*;
	use crate::Document;

	fn issue(category: LintCategory, start: usize, end: usize) -> LintIssue {
		LintIssue::new(category, Span::new(start, end), "msg")
	}

	#[test]
	fn issues_map_to_positions_with_category_colours() {
		let mut doc = Document::from_plain_text("Hello wrold");
		let issues = [issue(LintCategory::Spelling, 6, 11)];
		assert_eq!(render(&mut doc, &issues, None), 1);

		let deco = doc.decorations().get(IssueKey::new(6, 11)).unwrap();
		assert_eq!((deco.from, deco.to), (7, 12));
		assert_eq!(deco.color, category_color(LintCategory::Spelling, false));
		assert!(!deco.focused);
	}

	#[test]
	fn focused_issue_is_intensified() {
		let mut doc = Document::from_plain_text("the the cat");
		let issues = [issue(LintCategory::Grammar, 0, 7), issue(LintCategory::Spelling, 8, 11)];
		render(&mut doc, &issues, Some(IssueKey::new(0, 7)));

		let focused = doc.decorations().get(IssueKey::new(0, 7)).unwrap();
		let other = doc.decorations().get(IssueKey::new(8, 11)).unwrap();
		assert!(focused.focused);
		assert!(focused.color.a > other.color.a);
	}

	#[test]
	fn degenerate_spans_are_skipped() {
		let mut doc = Document::from_plain_text("short");
		let issues = [
			issue(LintCategory::Typo, 3, 3),
			issue(LintCategory::Typo, 40, 50),
			issue(LintCategory::Typo, 0, 5),
		];
		assert_eq!(render(&mut doc, &issues, None), 1);
		assert!(doc.decorations().get(IssueKey::new(0, 5)).is_some());
	}

	#[test]
	fn empty_results_clear_previous_decorations() {
		let mut doc = Document::from_plain_text("Hello wrold");
		render(&mut doc, &[issue(LintCategory::Spelling, 6, 11)], None);
		assert_eq!(doc.decorations().len(), 1);

		assert_eq!(render(&mut doc, &[], None), 0);
		assert!(doc.decorations().is_empty());
	}

	#[test]
	fn refresh_replaces_rather_than_merges() {
		let mut doc = Document::from_plain_text("one two three");
		render(&mut doc, &[issue(LintCategory::Style, 0, 3), issue(LintCategory::Style, 4, 7)], None);
		render(&mut doc, &[issue(LintCategory::Style, 8, 13)], None);
		let keys: Vec<_> = doc.decorations().iter().map(|d| d.key).collect();
		assert_eq!(keys, vec![IssueKey::new(8, 13)]);
	}
}
