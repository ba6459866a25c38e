//! The editing surface as seen by the lint pipeline.

use std::ops::ControlFlow;

use crate::{DecorationSet, EditError};

/// One text-bearing leaf and the document position of its first char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLeaf<'a> {
	pub text: &'a str,
	pub pos: usize,
	/// Length of `text` in chars.
	pub len: usize,
}

/// Item yielded while walking a surface in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf<'a> {
	Text(TextLeaf<'a>),
	/// Boundary between two blocks. Counts as one char (`\n`) of plain text.
	BlockBreak,
}

/// A replacement of positions `from..to` by `inserted` positions of new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
	pub from: usize,
	pub to: usize,
	pub inserted: usize,
}

impl Change {
	/// Maps a range through this change. `None` when the range overlaps the
	/// replaced content.
	pub fn map_range(&self, from: usize, to: usize) -> Option<(usize, usize)> {
		if to <= self.from {
			return Some((from, to));
		}
		if from >= self.to {
			let shift = |pos: usize| pos - self.to + self.from + self.inserted;
			return Some((shift(from), shift(to)));
		}
		None
	}
}

/// What the lint pipeline needs from a rich-text surface.
pub trait LintSurface {
	/// Flat text the engines analyse. Blocks are joined with `\n`.
	fn plain_text(&self) -> String;

	/// First and last position that can hold a cursor.
	fn content_bounds(&self) -> (usize, usize);

	/// Walks text leaves in document order until `visit` breaks.
	fn walk_leaves(&self, visit: &mut dyn FnMut(Leaf<'_>) -> ControlFlow<()>);

	fn text_between(&self, from: usize, to: usize) -> String;

	fn replace_range(&mut self, from: usize, to: usize, text: &str) -> Result<Change, EditError>;

	fn decorations(&self) -> &DecorationSet;

	/// Replaces the whole decoration set in one step.
	fn set_decorations(&mut self, decorations: DecorationSet);

	fn clear_decorations(&mut self) {
		self.set_decorations(DecorationSet::default());
	}
}
