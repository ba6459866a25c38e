//! The worker host: owns the engines and answers protocol commands.
//!
//! Engines are loaded on a background task so the command loop keeps
//! draining while a cold start is in flight. Analysis runs on the blocking
//! pool; a panic inside an engine is caught there and reported as an error
//! for that request only.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use quill_lint::{EngineError, EngineSet, LintIssue};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::{EngineLoader, LintRequest, LintResponse, TaskClass, WorkerCommand, WorkerEvent, spawn, spawn_blocking};

type LoadTask = JoinHandle<Result<EngineSet, EngineError>>;

/// Lifecycle of one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPhase {
	Uninitialized,
	Initializing,
	Ready,
	/// Initialization failed. Not retried.
	Failed,
	/// Engines released. A later `Init` loads them again.
	Disposed,
}

pub struct WorkerHost {
	loader: Arc<dyn EngineLoader>,
	phase: HostPhase,
	engines: Option<EngineSet>,
	loading: Option<LoadTask>,
	events: mpsc::UnboundedSender<WorkerEvent>,
}

impl WorkerHost {
	pub fn new(loader: Arc<dyn EngineLoader>, events: mpsc::UnboundedSender<WorkerEvent>) -> Self {
		Self {
			loader,
			phase: HostPhase::Uninitialized,
			engines: None,
			loading: None,
			events,
		}
	}

	pub const fn phase(&self) -> HostPhase {
		self.phase
	}

	/// Command loop. Exits when `cancel` fires or every sender is dropped.
	pub async fn run(mut self, mut commands: mpsc::Receiver<WorkerCommand>, cancel: CancellationToken) {
		loop {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					debug!("lint.worker.cancelled");
					break;
				}
				loaded = wait_for_load(&mut self.loading), if self.loading.is_some() => {
					self.loading = None;
					self.finish_init(loaded);
				}
				cmd = commands.recv() => match cmd {
					Some(cmd) => self.handle(cmd).await,
					None => break,
				},
			}
		}
		self.release();
	}

	pub async fn handle(&mut self, cmd: WorkerCommand) {
		match cmd {
			WorkerCommand::Init => self.init(),
			WorkerCommand::Lint(request) => self.lint(request).await,
			WorkerCommand::Dispose => {
				self.release();
				self.phase = HostPhase::Disposed;
				info!("lint.worker.disposed");
			}
		}
	}

	fn init(&mut self) {
		match self.phase {
			HostPhase::Uninitialized | HostPhase::Disposed => {
				info!("lint.worker.init");
				self.phase = HostPhase::Initializing;
				let loader = Arc::clone(&self.loader);
				self.loading = Some(spawn(TaskClass::Background, async move { loader.load().await }));
			}
			HostPhase::Initializing | HostPhase::Ready => debug!(phase = ?self.phase, "lint.worker.init_ignored"),
			HostPhase::Failed => warn!("lint.worker.init_after_failure"),
		}
	}

	fn finish_init(&mut self, loaded: Result<Result<EngineSet, EngineError>, JoinError>) {
		match loaded {
			Ok(Ok(engines)) => {
				info!(engines = ?engines.engine_names(), "lint.worker.ready");
				self.engines = Some(engines);
				self.phase = HostPhase::Ready;
				self.emit(WorkerEvent::Ready);
			}
			Ok(Err(err)) => self.fail_init(err.to_string()),
			Err(err) => self.fail_init(err.to_string()),
		}
	}

	fn fail_init(&mut self, message: String) {
		error!(error = %message, "lint.worker.init_failed");
		self.phase = HostPhase::Failed;
		self.emit(WorkerEvent::Error {
			error: message,
			version: None,
		});
	}

	async fn lint(&mut self, request: LintRequest) {
		let LintRequest { text, version } = request;
		let Some(mut engines) = self.engines.take() else {
			warn!(version, phase = ?self.phase, "lint.worker.not_ready");
			return;
		};

		if text.trim().is_empty() {
			trace!(version, "lint.worker.empty_text");
			self.engines = Some(engines);
			self.respond(version, Vec::new());
			return;
		}

		let task = spawn_blocking(TaskClass::CpuBlocking, move || {
			let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| engines.lint(&text)));
			(engines, outcome)
		});

		match task.await {
			Ok((engines, outcome)) => {
				self.engines = Some(engines);
				match outcome {
					Ok(Ok(results)) => self.respond(version, results),
					Ok(Err(err)) => {
						warn!(version, error = %err, "lint.worker.engine_error");
						self.emit(WorkerEvent::Error {
							error: err.to_string(),
							version: Some(version),
						});
					}
					Err(payload) => {
						let message = panic_message(payload.as_ref());
						error!(version, panic = %message, "lint.worker.engine_panic");
						self.emit(WorkerEvent::Error {
							error: format!("engine panicked: {message}"),
							version: Some(version),
						});
					}
				}
			}
			Err(err) => {
				// engines were lost with the task
				error!(version, error = %err, "lint.worker.task_failed");
				self.phase = HostPhase::Failed;
				self.emit(WorkerEvent::Error {
					error: err.to_string(),
					version: Some(version),
				});
			}
		}
	}

	fn respond(&self, version: u64, results: Vec<LintIssue>) {
		debug!(version, count = results.len(), "lint.worker.results");
		self.emit(WorkerEvent::Results(LintResponse { results, version }));
	}

	fn release(&mut self) {
		if let Some(loading) = self.loading.take() {
			loading.abort();
		}
		self.engines = None;
	}

	fn emit(&self, event: WorkerEvent) {
		if self.events.send(event).is_err() {
			trace!("lint.worker.event_dropped");
		}
	}

	#[cfg(test)]
	pub(crate) async fn settle(&mut self) {
		if self.loading.is_some() {
			let loaded = wait_for_load(&mut self.loading).await;
			self.loading = None;
			self.finish_init(loaded);
		}
	}
}

async fn wait_for_load(loading: &mut Option<LoadTask>) -> Result<Result<EngineSet, EngineError>, JoinError> {
	match loading {
		Some(task) => task.await,
		None => std::future::pending().await,
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}
