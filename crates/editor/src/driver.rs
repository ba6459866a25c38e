//! Async owner of a [`LintSession`] bound to a worker.
//!
//! The driver runs on the interactive task. It is the only place that holds
//! the session, so the document is never touched concurrently; the outside
//! world talks to it through a cloneable [`SessionClient`].

use std::time::Duration;

use quill_lint::{IssueKey, LintIssue};
use quill_worker::{EngineLoader, WorkerCommand, WorkerError, WorkerEvent, WorkerHandle};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::{DecorationSet, Document, EditError, LintSession, LintSurface, SessionClosed, SessionConfig, SessionStatus};

const INPUT_CAPACITY: usize = 64;

/// A document edit, in document positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
	Insert { at: usize, text: String },
	Delete { from: usize, to: usize },
	Replace { from: usize, to: usize, text: String },
}

impl EditOp {
	fn apply(&self, doc: &mut Document) -> Result<(), EditError> {
		match self {
			Self::Insert { at, text } => doc.insert_text(*at, text),
			Self::Delete { from, to } => doc.delete_range(*from, *to),
			Self::Replace { from, to, text } => doc.replace_range(*from, *to, text),
		}
		.map(|_| ())
	}
}

#[derive(Debug)]
pub enum SessionInput {
	Edit(EditOp),
	Accept { key: IssueKey, index: usize },
	Ignore(IssueKey),
	Focus(IssueKey),
	FocusNext,
	FocusPrev,
	Snapshot(oneshot::Sender<SessionSnapshot>),
	Shutdown,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
	pub text: String,
	pub status: SessionStatus,
	pub version: u64,
	/// Version of the last accepted lint cycle.
	pub accepted_version: Option<u64>,
	pub issues: Vec<LintIssue>,
	pub decorations: DecorationSet,
	pub focused: Option<IssueKey>,
}

#[derive(Debug, Clone)]
pub struct SessionClient {
	tx: mpsc::Sender<SessionInput>,
}

impl SessionClient {
	pub async fn send(&self, input: SessionInput) -> Result<(), SessionClosed> {
		self.tx.send(input).await.map_err(|_| SessionClosed)
	}

	pub async fn edit(&self, op: EditOp) -> Result<(), SessionClosed> {
		self.send(SessionInput::Edit(op)).await
	}

	pub async fn accept(&self, key: IssueKey, index: usize) -> Result<(), SessionClosed> {
		self.send(SessionInput::Accept { key, index }).await
	}

	pub async fn ignore(&self, key: IssueKey) -> Result<(), SessionClosed> {
		self.send(SessionInput::Ignore(key)).await
	}

	pub async fn focus(&self, key: IssueKey) -> Result<(), SessionClosed> {
		self.send(SessionInput::Focus(key)).await
	}

	pub async fn focus_next(&self) -> Result<(), SessionClosed> {
		self.send(SessionInput::FocusNext).await
	}

	pub async fn focus_prev(&self) -> Result<(), SessionClosed> {
		self.send(SessionInput::FocusPrev).await
	}

	pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionClosed> {
		let (reply, rx) = oneshot::channel();
		self.send(SessionInput::Snapshot(reply)).await?;
		rx.await.map_err(|_| SessionClosed)
	}

	/// Asks the driver to tear down. Returns once the request is queued.
	pub async fn shutdown(&self) -> Result<(), SessionClosed> {
		self.send(SessionInput::Shutdown).await
	}
}

pub struct SessionDriver {
	session: LintSession<Document>,
	worker: WorkerHandle,
	events: mpsc::UnboundedReceiver<WorkerEvent>,
	inputs: mpsc::Receiver<SessionInput>,
	grace: Duration,
}

impl SessionDriver {
	/// Spawns a worker host for `loader` and binds a session to it.
	pub fn spawn_worker(document: Document, config: SessionConfig, grace: Duration, loader: impl EngineLoader) -> (Self, SessionClient) {
		let (worker, events) = WorkerHandle::spawn(loader);
		Self::new(document, config, grace, worker, events)
	}

	pub fn new(
		document: Document,
		config: SessionConfig,
		grace: Duration,
		worker: WorkerHandle,
		events: mpsc::UnboundedReceiver<WorkerEvent>,
	) -> (Self, SessionClient) {
		let (tx, inputs) = mpsc::channel(INPUT_CAPACITY);
		let driver = Self {
			session: LintSession::new(document, config),
			worker,
			events,
			inputs,
			grace,
		};
		(driver, SessionClient { tx })
	}

	/// Runs until shutdown, then disposes the worker and returns the document.
	///
	/// Teardown order: timers are cancelled, `Dispose` reaches the worker,
	/// the grace delay elapses, then the worker task is stopped.
	pub async fn run(mut self) -> Result<Document, WorkerError> {
		self.session.mount(Instant::now());
		loop {
			let due = self.session.poll(Instant::now());
			deliver(&self.worker, due).await;
			let deadline = self.session.next_deadline();

			tokio::select! {
				event = self.events.recv() => match event {
					Some(event) => {
						let cmds = self.session.handle_event(event);
						deliver(&self.worker, cmds).await;
					}
					None => {
						warn!("lint.driver.worker_gone");
						break;
					}
				},
				input = self.inputs.recv() => match input {
					Some(SessionInput::Shutdown) | None => break,
					Some(input) => self.apply(input),
				},
				() = sleep_until(deadline) => trace!("lint.driver.deadline"),
			}
		}

		info!(version = self.session.version(), "lint.driver.teardown");
		if self.session.dispose().is_some() {
			// terminate delivers the dispose command before the grace delay
			self.worker.terminate(self.grace).await?;
		}
		Ok(self.session.into_surface())
	}

	fn apply(&mut self, input: SessionInput) {
		let now = Instant::now();
		let result = match input {
			SessionInput::Edit(op) => self.session.edit(now, |doc| op.apply(doc)),
			SessionInput::Accept { key, index } => self.session.accept_suggestion(key, index, now),
			SessionInput::Ignore(key) => self.session.ignore(key),
			SessionInput::Focus(key) => {
				if !self.session.focus(key) {
					debug!(%key, "lint.driver.focus_missing");
				}
				Ok(())
			}
			SessionInput::FocusNext => {
				self.session.focus_next();
				Ok(())
			}
			SessionInput::FocusPrev => {
				self.session.focus_prev();
				Ok(())
			}
			SessionInput::Snapshot(reply) => {
				if reply.send(self.snapshot()).is_err() {
					trace!("lint.driver.snapshot_dropped");
				}
				Ok(())
			}
			SessionInput::Shutdown => Ok(()),
		};
		if let Err(err) = result {
			warn!(error = %err, "lint.driver.input_failed");
		}
	}

	fn snapshot(&self) -> SessionSnapshot {
		let doc = self.session.surface();
		SessionSnapshot {
			text: doc.plain_text(),
			status: self.session.status(),
			version: self.session.version(),
			accepted_version: self.session.accepted_version(),
			issues: self.session.visible_issues().to_vec(),
			decorations: doc.decorations().clone(),
			focused: self.session.focused(),
		}
	}
}

async fn deliver(worker: &WorkerHandle, cmds: Vec<WorkerCommand>) {
	for cmd in cmds {
		if let Err(err) = worker.send(cmd).await {
			warn!(error = %err, "lint.driver.send_failed");
		}
	}
}

async fn sleep_until(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}
