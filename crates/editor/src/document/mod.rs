//! Rich-text document model.
//!
//! A document is a flat list of blocks, each holding styled text runs.
//! Positions follow the usual tree-document scheme: every block contributes
//! one opening token, one position per char, then one closing token. For a
//! single paragraph `"Hello"` the content spans positions `1..=6` and the
//! document size is 7.

use std::ops::ControlFlow;

use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Change, DecorationSet, EditError, Leaf, LintSurface, TextLeaf};

bitflags! {
	/// Inline styling carried by a run.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Marks: u8 {
		const BOLD = 1 << 0;
		const ITALIC = 1 << 1;
		const UNDERLINE = 1 << 2;
		const STRIKE = 1 << 3;
	}
}

/// Text with uniform marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
	text: String,
	marks: Marks,
	len: usize,
}

impl TextRun {
	pub fn new(text: impl Into<String>, marks: Marks) -> Self {
		let text = text.into();
		let len = text.chars().count();
		Self { text, marks, len }
	}

	pub fn plain(text: impl Into<String>) -> Self {
		Self::new(text, Marks::empty())
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub const fn marks(&self) -> Marks {
		self.marks
	}

	/// Length in chars.
	pub const fn char_len(&self) -> usize {
		self.len
	}

	fn split_at(self, at: usize) -> (Option<Self>, Option<Self>) {
		if at == 0 {
			return (None, Some(self));
		}
		if at >= self.len {
			return (Some(self), None);
		}
		let byte = self.text.char_indices().nth(at).map_or(self.text.len(), |(idx, _)| idx);
		let (left, right) = self.text.split_at(byte);
		(Some(Self::new(left, self.marks)), Some(Self::new(right, self.marks)))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	Paragraph,
	/// Level 1 to 6.
	Heading(u8),
	ListItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
	kind: BlockKind,
	runs: Vec<TextRun>,
}

impl Block {
	pub fn new(kind: BlockKind, runs: impl IntoIterator<Item = TextRun>) -> Self {
		let kind = match kind {
			BlockKind::Heading(level) => BlockKind::Heading(level.clamp(1, 6)),
			other => other,
		};
		let mut block = Self {
			kind,
			runs: runs.into_iter().collect(),
		};
		block.normalize();
		block
	}

	pub fn paragraph(text: impl Into<String>) -> Self {
		Self::new(BlockKind::Paragraph, [TextRun::plain(text)])
	}

	pub fn heading(level: u8, text: impl Into<String>) -> Self {
		Self::new(BlockKind::Heading(level), [TextRun::plain(text)])
	}

	pub fn list_item(text: impl Into<String>) -> Self {
		Self::new(BlockKind::ListItem, [TextRun::plain(text)])
	}

	pub const fn kind(&self) -> BlockKind {
		self.kind
	}

	pub fn runs(&self) -> &[TextRun] {
		&self.runs
	}

	pub fn char_len(&self) -> usize {
		self.runs.iter().map(TextRun::char_len).sum()
	}

	pub fn text(&self) -> String {
		self.runs.iter().map(TextRun::text).collect()
	}

	/// Drops empty runs and merges neighbours with equal marks.
	fn normalize(&mut self) {
		let mut out: Vec<TextRun> = Vec::with_capacity(self.runs.len());
		for run in self.runs.drain(..) {
			if run.len == 0 {
				continue;
			}
			match out.last_mut() {
				Some(last) if last.marks == run.marks => {
					last.text.push_str(&run.text);
					last.len += run.len;
				}
				_ => out.push(run),
			}
		}
		self.runs = out;
	}

	/// Marks new text typed at char `offset` inherits.
	fn marks_at(&self, offset: usize) -> Marks {
		let mut acc = 0;
		for run in &self.runs {
			acc += run.len;
			if offset <= acc && offset > acc - run.len {
				return run.marks;
			}
		}
		self.runs.first().map(TextRun::marks).unwrap_or_default()
	}

	fn split_runs(&self, at: usize) -> (Vec<TextRun>, Vec<TextRun>) {
		let mut left = Vec::new();
		let mut right = Vec::new();
		let mut acc = 0;
		for run in self.runs.iter().cloned() {
			let start = acc;
			acc += run.len;
			if acc <= at {
				left.push(run);
			} else if start >= at {
				right.push(run);
			} else {
				let (l, r) = run.split_at(at - start);
				left.extend(l);
				right.extend(r);
			}
		}
		(left, right)
	}
}

/// A rich-text document with its lint decorations.
///
/// Always holds at least one block. Decorations are mapped through every
/// edit; ones that overlap replaced content are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	blocks: Vec<Block>,
	decorations: DecorationSet,
}

impl Default for Document {
	fn default() -> Self {
		Self::new([])
	}
}

impl Document {
	pub fn new(blocks: impl IntoIterator<Item = Block>) -> Self {
		let mut blocks: Vec<Block> = blocks.into_iter().collect();
		if blocks.is_empty() {
			blocks.push(Block::paragraph(""));
		}
		Self {
			blocks,
			decorations: DecorationSet::default(),
		}
	}

	/// One paragraph per line.
	pub fn from_plain_text(text: &str) -> Self {
		Self::new(text.split('\n').map(Block::paragraph))
	}

	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// Total number of positions, tokens included.
	pub fn size(&self) -> usize {
		self.blocks.iter().map(|b| b.char_len() + 2).sum()
	}

	pub fn word_count(&self) -> usize {
		self.blocks.iter().map(|b| b.text().unicode_words().count()).sum()
	}

	/// Content start position of every block, with its char length.
	fn block_ranges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.blocks.iter().scan(0, |open, block| {
			let start = *open + 1;
			let len = block.char_len();
			*open += len + 2;
			Some((start, len))
		})
	}

	/// Resolves a position to `(block index, char offset in block)`.
	pub fn resolve(&self, pos: usize) -> Result<(usize, usize), EditError> {
		self.block_ranges()
			.enumerate()
			.find(|(_, (start, len))| (*start..=start + len).contains(&pos))
			.map(|(idx, (start, _))| (idx, pos - start))
			.ok_or(EditError::InvalidPosition(pos))
	}

	pub fn insert_text(&mut self, at: usize, text: &str) -> Result<Change, EditError> {
		self.replace_range(at, at, text)
	}

	pub fn delete_range(&mut self, from: usize, to: usize) -> Result<Change, EditError> {
		self.replace_range(from, to, "")
	}

	fn splice(&mut self, from: usize, to: usize, text: &str) -> Result<Change, EditError> {
		if from > to {
			return Err(EditError::InvertedRange { from, to });
		}
		let (first, first_offset) = self.resolve(from)?;
		let (last, last_offset) = self.resolve(to)?;

		let kind = self.blocks[first].kind;
		// a replacement takes the marks of the first replaced char
		let marks = self.blocks[first].marks_at(if to > from { first_offset + 1 } else { first_offset });
		let (left, _) = self.blocks[first].split_runs(first_offset);
		let (_, right) = self.blocks[last].split_runs(last_offset);

		let continuation = match kind {
			BlockKind::Heading(_) => BlockKind::Paragraph,
			other => other,
		};
		let lines: Vec<&str> = text.split('\n').collect();
		let inserted = lines.iter().map(|l| l.chars().count()).sum::<usize>() + 2 * (lines.len() - 1);

		let mut replacement = Vec::with_capacity(lines.len());
		let mut current = Block { kind, runs: left };
		for (idx, line) in lines.iter().enumerate() {
			if idx > 0 {
				let done = std::mem::replace(
					&mut current,
					Block {
						kind: continuation,
						runs: Vec::new(),
					},
				);
				replacement.push(done);
			}
			current.runs.push(TextRun::new(*line, marks));
		}
		current.runs.extend(right);
		replacement.push(current);
		for block in &mut replacement {
			block.normalize();
		}

		self.blocks.splice(first..=last, replacement);
		Ok(Change { from, to, inserted })
	}
}

impl LintSurface for Document {
	fn plain_text(&self) -> String {
		let texts: Vec<String> = self.blocks.iter().map(Block::text).collect();
		texts.join("\n")
	}

	fn content_bounds(&self) -> (usize, usize) {
		(1, self.size().saturating_sub(1).max(1))
	}

	fn walk_leaves(&self, visit: &mut dyn FnMut(Leaf<'_>) -> ControlFlow<()>) {
		for (idx, (block, (start, _))) in self.blocks.iter().zip(self.block_ranges()).enumerate() {
			if idx > 0 && visit(Leaf::BlockBreak).is_break() {
				return;
			}
			let mut pos = start;
			for run in &block.runs {
				let leaf = TextLeaf {
					text: &run.text,
					pos,
					len: run.len,
				};
				if visit(Leaf::Text(leaf)).is_break() {
					return;
				}
				pos += run.len;
			}
		}
	}

	fn text_between(&self, from: usize, to: usize) -> String {
		let mut out = String::new();
		let mut prev_end: Option<usize> = None;
		for (block, (start, len)) in self.blocks.iter().zip(self.block_ranges()) {
			let end = start + len;
			if prev_end.is_some_and(|prev| from <= prev && to >= start) {
				out.push('\n');
			}
			let lo = from.max(start);
			let hi = to.min(end);
			if lo < hi {
				out.extend(block.text().chars().skip(lo - start).take(hi - lo));
			}
			prev_end = Some(end);
		}
		out
	}

	fn replace_range(&mut self, from: usize, to: usize, text: &str) -> Result<Change, EditError> {
		let change = self.splice(from, to, text)?;
		self.decorations = self.decorations.map_through(&change);
		tracing::trace!(from, to, inserted = change.inserted, "lint.doc.replace");
		Ok(change)
	}

	fn decorations(&self) -> &DecorationSet {
		&self.decorations
	}

	fn set_decorations(&mut self, decorations: DecorationSet) {
		self.decorations = decorations;
	}
}
