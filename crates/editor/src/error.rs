use quill_lint::IssueKey;
use thiserror::Error;

/// Failures applying an edit or a lint action to the document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
	#[error("position {0} is not inside a text block")]
	InvalidPosition(usize),
	#[error("range {from}..{to} is inverted")]
	InvertedRange { from: usize, to: usize },
	#[error("no visible issue {0}")]
	UnknownIssue(IssueKey),
	#[error("issue {key} has no suggestion {index}")]
	NoSuggestion { key: IssueKey, index: usize },
	#[error("issue {0} no longer maps onto the document")]
	Unmappable(IssueKey),
}

/// The session driver is gone.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("lint session closed")]
pub struct SessionClosed;
