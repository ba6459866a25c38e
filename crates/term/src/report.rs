use std::fmt;
use std::path::{Path, PathBuf};

use quill_lint::{LintCategory, LintIssue};
use serde::Serialize;

use crate::source::SourceText;

/// One issue, located in its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
	pub file: PathBuf,
	pub line: usize,
	pub column: usize,
	pub category: LintCategory,
	pub message: String,
	pub suggestions: Vec<String>,
}

impl Finding {
	pub fn locate(file: &Path, source: &SourceText, issue: &LintIssue) -> Self {
		let location = source.locate(issue.span.start);
		Self {
			file: file.to_path_buf(),
			line: location.line,
			column: location.column,
			category: issue.category,
			message: issue.message.clone(),
			suggestions: issue.suggestions.clone(),
		}
	}
}

impl fmt::Display for Finding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}:{}:{}: {}: {}",
			self.file.display(),
			self.line,
			self.column,
			self.category,
			self.message
		)?;
		if !self.suggestions.is_empty() {
			write!(f, " [{}]", self.suggestions.join(", "))?;
		}
		Ok(())
	}
}

/// Result of linting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReport {
	Linted(Vec<Finding>),
	/// The engines could not produce a result for this file.
	EngineFailed { recoverable: bool },
}
