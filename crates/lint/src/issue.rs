//! The lint issue shape shared by every engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LintCategory;

/// Half-open range `[start, end)` over flat text.
///
/// Once an issue has passed through an [`EngineAdapter`](crate::EngineAdapter)
/// both ends are char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

impl Span {
	pub const fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}

	pub const fn len(&self) -> usize {
		self.end.saturating_sub(self.start)
	}

	pub const fn is_empty(&self) -> bool {
		self.end <= self.start
	}
}

/// One piece of feedback produced by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
	/// Human-readable description.
	pub message: String,
	pub span: Span,
	/// Candidate replacements, best first. May be empty.
	pub suggestions: Vec<String>,
	pub category: LintCategory,
}

impl LintIssue {
	pub fn new(category: LintCategory, span: Span, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			span,
			suggestions: Vec::new(),
			category,
		}
	}

	#[must_use]
	pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.suggestions = suggestions.into_iter().map(Into::into).collect();
		self
	}

	/// Identity of this issue within one lint cycle.
	pub const fn key(&self) -> IssueKey {
		IssueKey {
			start: self.span.start,
			end: self.span.end,
		}
	}
}

/// Transient identity of an issue, rendered as `"{start}-{end}"`.
///
/// Only meaningful for the lint cycle that produced it: any document edit
/// invalidates every key from an earlier cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueKey {
	pub start: usize,
	pub end: usize,
}

impl IssueKey {
	pub const fn new(start: usize, end: usize) -> Self {
		Self { start, end }
	}
}

impl fmt::Display for IssueKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.start, self.end)
	}
}

impl FromStr for IssueKey {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (start, end) = s.split_once('-').ok_or_else(|| format!("invalid issue key: {s}"))?;
		let start = start.parse().map_err(|_| format!("invalid issue key start: {s}"))?;
		let end = end.parse().map_err(|_| format!("invalid issue key end: {s}"))?;
		Ok(Self { start, end })
	}
}
