//! Offset units and conversion to char offsets.

use serde::{Deserialize, Serialize};

/// Unit an engine uses for the offsets it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetEncoding {
	/// UTF-8 byte offsets.
	Utf8,
	/// UTF-16 code unit offsets.
	Utf16,
	/// UTF-32 / Unicode scalar value offsets.
	#[default]
	Utf32,
}

impl OffsetEncoding {
	/// Width of `ch` in this unit.
	pub const fn width(self, ch: char) -> usize {
		match self {
			Self::Utf8 => ch.len_utf8(),
			Self::Utf16 => ch.len_utf16(),
			Self::Utf32 => 1,
		}
	}

	/// Length of `text` in this unit.
	pub fn len(self, text: &str) -> usize {
		match self {
			Self::Utf8 => text.len(),
			Self::Utf16 => text.encode_utf16().count(),
			Self::Utf32 => text.chars().count(),
		}
	}
}

/// Lookup table from native offsets of one text to char offsets.
///
/// Built once per analysed text. Offsets that land inside a multi-unit
/// character round down for span starts and up for span ends; offsets past
/// the end clamp to the char length.
#[derive(Debug, Clone)]
pub struct OffsetIndex {
	encoding: OffsetEncoding,
	/// Native offset of each char start, plus the total length. Empty for UTF-32.
	boundaries: Vec<usize>,
	char_len: usize,
}

impl OffsetIndex {
	pub fn new(text: &str, encoding: OffsetEncoding) -> Self {
		let char_len = text.chars().count();
		let boundaries = match encoding {
			OffsetEncoding::Utf32 => Vec::new(),
			_ => {
				let mut acc = 0;
				let mut out = Vec::with_capacity(char_len + 1);
				for ch in text.chars() {
					out.push(acc);
					acc += encoding.width(ch);
				}
				out.push(acc);
				out
			}
		};
		Self {
			encoding,
			boundaries,
			char_len,
		}
	}

	pub const fn encoding(&self) -> OffsetEncoding {
		self.encoding
	}

	/// Length of the indexed text in chars.
	pub const fn char_len(&self) -> usize {
		self.char_len
	}

	/// Length of the indexed text in the native unit.
	pub fn native_len(&self) -> usize {
		match self.encoding {
			OffsetEncoding::Utf32 => self.char_len,
			_ => self.boundaries.last().copied().unwrap_or(0),
		}
	}

	/// Converts a native offset used as a span start.
	pub fn to_char_start(&self, native: usize) -> usize {
		match self.encoding {
			OffsetEncoding::Utf32 => native.min(self.char_len),
			_ => match self.boundaries.binary_search(&native) {
				Ok(idx) => idx.min(self.char_len),
				Err(idx) => idx.saturating_sub(1).min(self.char_len),
			},
		}
	}

	/// Converts a native offset used as a span end.
	pub fn to_char_end(&self, native: usize) -> usize {
		match self.encoding {
			OffsetEncoding::Utf32 => native.min(self.char_len),
			_ => match self.boundaries.binary_search(&native) {
				Ok(idx) => idx.min(self.char_len),
				Err(idx) => idx.min(self.char_len),
			},
		}
	}

	/// Converts a char offset back to the native unit.
	pub fn to_native(&self, char_offset: usize) -> usize {
		match self.encoding {
			OffsetEncoding::Utf32 => char_offset.min(self.char_len),
			_ => self.boundaries[char_offset.min(self.char_len)],
		}
	}
}
