//! Error types for engine loading and linting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by an engine while loading or analysing text.
#[derive(Debug, Error)]
pub enum EngineError {
	/// A dictionary or rule file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// File that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// An engine was constructed without any usable words or rules.
	#[error("engine '{0}' has nothing to check against")]
	Empty(String),

	/// Any other backend failure, carried as a message.
	#[error("{engine}: {message}")]
	Backend {
		/// Engine name.
		engine: String,
		/// Failure description.
		message: String,
	},
}

impl EngineError {
	/// Convenience constructor for backend failures.
	pub fn backend(engine: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Backend {
			engine: engine.into(),
			message: message.into(),
		}
	}
}

/// Result type for engine operations.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
