//! Flat char offsets to document positions.

use std::ops::ControlFlow;

use quill_lint::Span;

use crate::{Leaf, LintSurface};

/// Which side of a leaf boundary an offset binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Span start: an offset on a boundary resolves to the following leaf.
	Start,
	/// Span end: an offset on a boundary resolves to the preceding leaf.
	End,
}

/// Maps a char offset into the plain text of `surface` to a document position.
///
/// Never returns a position outside [`LintSurface::content_bounds`]; offsets
/// that match no leaf fall back to the raw offset clamped into those bounds.
pub fn map_offset(surface: &impl LintSurface, offset: usize, bias: Bias) -> usize {
	let (min, max) = surface.content_bounds();
	if offset == 0 && bias == Bias::Start {
		return min;
	}

	let mut cursor = 0;
	let mut found = None;
	surface.walk_leaves(&mut |leaf| {
		match leaf {
			Leaf::BlockBreak => cursor += 1,
			Leaf::Text(leaf) => {
				let end = cursor + leaf.len;
				let hit = match bias {
					Bias::Start => (cursor..end).contains(&offset),
					Bias::End => offset > cursor && offset <= end,
				};
				if hit {
					found = Some(leaf.pos + (offset - cursor));
					return ControlFlow::Break(());
				}
				cursor = end;
			}
		}
		ControlFlow::Continue(())
	});

	match found {
		Some(pos) => pos.clamp(min, max),
		None => {
			tracing::debug!(offset, ?bias, "lint.map.fallback");
			offset.clamp(min, max)
		}
	}
}

/// Maps a whole span, start and end with their own bias.
pub fn map_span(surface: &impl LintSurface, span: Span) -> (usize, usize) {
	(map_offset(surface, span.start, Bias::Start), map_offset(surface, span.end, Bias::End))
}

/// Current document text under `span`.
pub fn span_text(surface: &impl LintSurface, span: Span) -> String {
	let (from, to) = map_span(surface, span);
	if to <= from {
		return String::new();
	}
	surface.text_between(from, to)
}
