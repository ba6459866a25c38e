//! Plain-text answer files.
//!
//! Blank lines separate paragraphs and the lines of one paragraph are joined
//! with a single space. A line starting with one to six `#` and a space is a
//! heading. Every block remembers where its text came from so an issue's
//! char offset in the flattened text can be reported as `line:column`.

use quill_editor::{Block, Document};

/// 1-based position in the source file, columns counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
	pub line: usize,
	pub column: usize,
}

/// Start of one source line inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineStart {
	/// Char offset inside the block text.
	offset: usize,
	line: usize,
	column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MappedBlock {
	block: Block,
	/// Char offset of the block in the flattened text.
	start: usize,
	lines: Vec<LineStart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceText {
	blocks: Vec<MappedBlock>,
}

impl SourceText {
	pub fn parse(text: &str) -> Self {
		let mut builder = Builder::default();
		for (idx, raw) in text.lines().enumerate() {
			let line = idx + 1;
			let trimmed = raw.trim();
			if trimmed.is_empty() {
				builder.end_paragraph();
				continue;
			}
			let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
			match heading(trimmed) {
				Some((level, title, skipped)) => {
					builder.end_paragraph();
					builder.push(Block::heading(level, title), vec![LineStart {
						offset: 0,
						line,
						column: indent + skipped + 1,
					}]);
				}
				None => builder.append(trimmed, line, indent + 1),
			}
		}
		builder.end_paragraph();
		Self { blocks: builder.blocks }
	}

	pub fn document(&self) -> Document {
		Document::new(self.blocks.iter().map(|b| b.block.clone()))
	}

	/// Where the char at `offset` of the flattened text sits in the file.
	pub fn locate(&self, offset: usize) -> Location {
		let Some(mapped) = self.blocks.iter().rev().find(|b| b.start <= offset) else {
			return Location { line: 1, column: 1 };
		};
		let within = offset - mapped.start;
		match mapped.lines.iter().rev().find(|l| l.offset <= within) {
			Some(start) => Location {
				line: start.line,
				column: start.column + (within - start.offset),
			},
			None => Location { line: 1, column: 1 },
		}
	}
}

#[derive(Default)]
struct Builder {
	blocks: Vec<MappedBlock>,
	/// Flattened length so far, separators included.
	len: usize,
	paragraph: Option<(String, Vec<LineStart>)>,
}

impl Builder {
	fn append(&mut self, text: &str, line: usize, column: usize) {
		let (buf, lines) = self.paragraph.get_or_insert_with(Default::default);
		if !buf.is_empty() {
			buf.push(' ');
		}
		lines.push(LineStart {
			offset: buf.chars().count(),
			line,
			column,
		});
		buf.push_str(text);
	}

	fn end_paragraph(&mut self) {
		if let Some((text, lines)) = self.paragraph.take() {
			self.push(Block::paragraph(text), lines);
		}
	}

	fn push(&mut self, block: Block, lines: Vec<LineStart>) {
		if !self.blocks.is_empty() {
			self.len += 1;
		}
		let start = self.len;
		self.len += block.char_len();
		self.blocks.push(MappedBlock { block, start, lines });
	}
}

/// Splits `# Title` into `(level, title, chars before the title)`.
fn heading(line: &str) -> Option<(u8, &str, usize)> {
	let hashes = line.chars().take_while(|c| *c == '#').count();
	if !(1..=6).contains(&hashes) {
		return None;
	}
	let rest = &line[hashes..];
	if !rest.starts_with([' ', '\t']) {
		return None;
	}
	let title = rest.trim_start();
	let skipped = line.chars().count() - title.chars().count();
	Some((u8::try_from(hashes).ok()?, title, skipped))
}

#[cfg(test)]
mod tests;
