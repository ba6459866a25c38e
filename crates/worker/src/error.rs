use thiserror::Error;

/// Failures talking to a worker host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerError {
	#[error("worker mailbox closed")]
	Closed,
	#[error("worker task failed: {0}")]
	Join(String),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for WorkerError {
	fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
		Self::Closed
	}
}
