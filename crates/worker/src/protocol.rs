//! Messages exchanged between the editor and the worker host.
//!
//! Both directions serialize as internally tagged JSON (`{"type": "lint", ...}`)
//! so the same protocol can cross a process or thread boundary unchanged.

use quill_lint::LintIssue;
use serde::{Deserialize, Serialize};

/// Editor to worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerCommand {
	/// Load engines. Idempotent.
	Init,
	/// Analyze one snapshot of the document text.
	Lint(LintRequest),
	/// Release engines. Later lint requests are ignored until the next `Init`.
	Dispose,
}

/// Worker to editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerEvent {
	/// Engines are loaded. Sent at most once per initialization.
	Ready,
	/// Findings for one request.
	Results(LintResponse),
	/// Initialization failed (`version` is `None`) or one analysis failed.
	Error { error: String, version: Option<u64> },
}

impl WorkerEvent {
	/// Version this event answers, if any.
	pub fn version(&self) -> Option<u64> {
		match self {
			Self::Ready => None,
			Self::Results(response) => Some(response.version),
			Self::Error { version, .. } => *version,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintRequest {
	pub text: String,
	pub version: u64,
}

impl LintRequest {
	pub fn new(text: impl Into<String>, version: u64) -> Self {
		Self { text: text.into(), version }
	}
}

/// Findings for the request carrying the same `version`. Offsets are chars
/// into the request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResponse {
	pub results: Vec<LintIssue>,
	pub version: u64,
}
