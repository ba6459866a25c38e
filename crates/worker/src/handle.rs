use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{EngineLoader, TaskClass, WorkerCommand, WorkerError, WorkerEvent, WorkerHost, spawn};

const MAILBOX_CAPACITY: usize = 128;

/// Owner side of a spawned [`WorkerHost`].
///
/// Dropping the handle cancels the host without a grace period.
#[derive(Debug)]
pub struct WorkerHandle {
	commands: mpsc::Sender<WorkerCommand>,
	cancel: CancellationToken,
	task: Option<JoinHandle<()>>,
}

impl Drop for WorkerHandle {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

impl WorkerHandle {
	/// Spawns a host on the ambient runtime. Events arrive on the returned receiver.
	pub fn spawn(loader: impl EngineLoader) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
		Self::spawn_shared(Arc::new(loader))
	}

	pub fn spawn_shared(loader: Arc<dyn EngineLoader>) -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
		let (cmd_tx, cmd_rx) = mpsc::channel(MAILBOX_CAPACITY);
		let (event_tx, event_rx) = mpsc::unbounded_channel();
		let cancel = CancellationToken::new();

		let host = WorkerHost::new(loader, event_tx);
		let task = spawn(TaskClass::Interactive, host.run(cmd_rx, cancel.clone()));
		tracing::debug!("lint.worker.spawned");

		(
			Self {
				commands: cmd_tx,
				cancel,
				task: Some(task),
			},
			event_rx,
		)
	}

	/// Queues one command, waiting for mailbox space.
	pub async fn send(&self, cmd: WorkerCommand) -> Result<(), WorkerError> {
		self.commands.send(cmd).await?;
		Ok(())
	}

	/// Sends `Dispose`, waits `grace` so it can be handled, then stops the host.
	pub async fn terminate(mut self, grace: Duration) -> Result<(), WorkerError> {
		if self.commands.send(WorkerCommand::Dispose).await.is_err() {
			tracing::debug!("lint.worker.dispose_skipped");
		}
		if !grace.is_zero() {
			tokio::time::sleep(grace).await;
		}
		self.cancel.cancel();

		let Some(task) = self.task.take() else {
			return Ok(());
		};
		match task.await {
			Ok(()) => {
				tracing::debug!("lint.worker.terminated");
				Ok(())
			}
			Err(err) if err.is_cancelled() => Ok(()),
			Err(err) => {
				tracing::warn!(error = %err, "lint.worker.terminate_failed");
				Err(WorkerError::Join(err.to_string()))
			}
		}
	}
}
