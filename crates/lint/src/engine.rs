//! Engine trait and the adapter that normalizes engine output.

use tracing::{trace, warn};

use crate::{LintIssue, OffsetEncoding, OffsetIndex, Result, Span};

/// A pluggable spelling/grammar backend.
///
/// Engines are opaque: given text, return issues whose spans are expressed in
/// [`LintEngine::encoding`] units. Implementations run on a blocking worker
/// thread and may take `&mut self` to keep caches between calls.
pub trait LintEngine: Send + 'static {
	/// Short identifier used in logs and error messages.
	fn name(&self) -> &str;

	/// Unit of the spans returned by [`LintEngine::lint`].
	fn encoding(&self) -> OffsetEncoding;

	/// Analyses `text`.
	fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>>;
}

/// Wraps one engine and converts its spans to char offsets.
pub struct EngineAdapter {
	engine: Box<dyn LintEngine>,
}

impl std::fmt::Debug for EngineAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EngineAdapter")
			.field("engine", &self.engine.name())
			.field("encoding", &self.engine.encoding())
			.finish()
	}
}

impl EngineAdapter {
	pub fn new(engine: impl LintEngine) -> Self {
		Self { engine: Box::new(engine) }
	}

	pub fn from_boxed(engine: Box<dyn LintEngine>) -> Self {
		Self { engine }
	}

	pub fn name(&self) -> &str {
		self.engine.name()
	}

	/// Runs the engine and returns issues with char-offset spans.
	///
	/// Spans past the end of `text` are clamped. Inverted spans, and spans
	/// that are empty once converted, are dropped.
	pub fn lint(&mut self, text: &str) -> Result<Vec<LintIssue>> {
		let raw = self.engine.lint(text)?;
		let index = OffsetIndex::new(text, self.engine.encoding());
		let native_len = index.native_len();

		let mut out = Vec::with_capacity(raw.len());
		for mut issue in raw {
			if issue.span.start > issue.span.end {
				warn!(engine = self.engine.name(), start = issue.span.start, end = issue.span.end, "lint.engine.inverted_span");
				continue;
			}
			if issue.span.end > native_len {
				trace!(engine = self.engine.name(), end = issue.span.end, native_len, "lint.engine.clamped_span");
			}
			issue.span = Span::new(index.to_char_start(issue.span.start), index.to_char_end(issue.span.end));
			if issue.span.is_empty() {
				trace!(engine = self.engine.name(), start = issue.span.start, "lint.engine.empty_span");
				continue;
			}
			out.push(issue);
		}
		trace!(engine = self.engine.name(), count = out.len(), "lint.engine.done");
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::LintCategory;

	struct ByteEngine(Vec<Span>);

	impl LintEngine for ByteEngine {
		fn name(&self) -> &str {
			"bytes"
		}

		fn encoding(&self) -> OffsetEncoding {
			OffsetEncoding::Utf8
		}

		fn lint(&mut self, _text: &str) -> Result<Vec<LintIssue>> {
			Ok(self.0.iter().map(|s| LintIssue::new(LintCategory::Spelling, *s, "x")).collect())
		}
	}

	#[test]
	fn byte_spans_become_char_spans() {
		// "na\u{00EF}ve cafe": U+00EF occupies bytes 2..4
		let text = "na\u{00EF}ve cafe";
		let mut adapter = EngineAdapter::new(ByteEngine(vec![Span::new(0, 6), Span::new(7, 11)]));
		let issues = adapter.lint(text).unwrap();
		assert_eq!(issues[0].span, Span::new(0, 5));
		assert_eq!(issues[1].span, Span::new(6, 10));
	}

	#[test]
	fn inverted_spans_are_dropped_and_overlong_clamped() {
		let mut adapter = EngineAdapter::new(ByteEngine(vec![Span::new(3, 1), Span::new(2, 99)]));
		let issues = adapter.lint("abcd").unwrap();
		assert_eq!(issues.len(), 1);
		assert_eq!(issues[0].span, Span::new(2, 4));
	}

	#[test]
	fn empty_spans_are_dropped_after_clamping() {
		let mut adapter = EngineAdapter::new(ByteEngine(vec![Span::new(1, 1), Span::new(99, 100), Span::new(0, 1)]));
		let issues = adapter.lint("abcd").unwrap();
		assert_eq!(issues.len(), 1);
		assert_eq!(issues[0].span, Span::new(0, 1));
	}
}
