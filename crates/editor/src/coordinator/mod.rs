//! Request coordinator: when to lint, and which answers still count.
//!
//! [`Coordinator`] is a plain state machine. Callers feed it the current
//! time, text changes and worker events; it answers with the
//! [`WorkerCommand`]s to send. Timers are deadlines queried through
//! [`Coordinator::next_deadline`], so cancelling one is just clearing it.
//!
//! # Versions
//!
//! Every text change and every post-ready lint takes a fresh version from one
//! counter. A response is applied only if its version equals the counter at
//! receipt time.

use std::time::Duration;

use quill_config::LintConfig;
use quill_lint::LintIssue;
use quill_worker::{LintRequest, WorkerCommand, WorkerEvent};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
	/// Delay between mount and the `Init` command.
	pub lazy_init_delay: Duration,
	/// Quiet period after the last change before linting.
	pub debounce: Duration,
}

impl Default for CoordinatorConfig {
	fn default() -> Self {
		Self::from(&LintConfig::default())
	}
}

impl From<&LintConfig> for CoordinatorConfig {
	fn from(config: &LintConfig) -> Self {
		Self {
			lazy_init_delay: config.lazy_init_delay(),
			debounce: config.debounce(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
	/// Mounted or not, engines not requested yet.
	Idle,
	/// `Init` sent, waiting for `Ready`.
	Initializing,
	Ready,
	/// Initialization failed. Terminal.
	Failed,
	Disposed,
}

/// A lint scheduled for `due`, tagged with the version current when scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingLint {
	due: Instant,
	version: u64,
}

/// What the caller should do with a worker event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
	/// Nothing to do: duplicate, stale, or arrived in the wrong phase.
	Ignore,
	/// Engines are up; send this first lint.
	Send(WorkerCommand),
	/// Fresh results for the current version.
	Accept(Vec<LintIssue>),
	/// The current lint cycle failed. Later cycles may succeed.
	CycleFailed(String),
	/// Engines could not be loaded.
	InitFailed(String),
}

#[derive(Debug)]
pub struct Coordinator {
	config: CoordinatorConfig,
	phase: CoordinatorPhase,
	version: u64,
	last_text: Option<String>,
	init_due: Option<Instant>,
	pending: Option<PendingLint>,
}

impl Coordinator {
	pub fn new(config: CoordinatorConfig) -> Self {
		Self {
			config,
			phase: CoordinatorPhase::Idle,
			version: 0,
			last_text: None,
			init_due: None,
			pending: None,
		}
	}

	pub const fn phase(&self) -> CoordinatorPhase {
		self.phase
	}

	/// Version the next accepted response must carry.
	pub const fn version(&self) -> u64 {
		self.version
	}

	pub fn has_pending_lint(&self) -> bool {
		self.pending.is_some()
	}

	/// Starts the lazy-init timer. Repeated mounts keep the first deadline.
	pub fn mount(&mut self, now: Instant) {
		if self.phase == CoordinatorPhase::Idle && self.init_due.is_none() {
			self.init_due = Some(now + self.config.lazy_init_delay);
			debug!(delay_ms = self.config.lazy_init_delay.as_millis() as u64, "lint.coord.mount");
		}
	}

	/// Records the document text after a transaction. Returns `true` when the
	/// text differs from the last recorded text and a new version was taken.
	pub fn text_changed(&mut self, text: &str, now: Instant) -> bool {
		if matches!(self.phase, CoordinatorPhase::Disposed | CoordinatorPhase::Failed) {
			return false;
		}
		if self.last_text.as_deref() == Some(text) {
			trace!("lint.coord.unchanged");
			return false;
		}
		self.version += 1;
		self.last_text = Some(text.to_owned());
		if self.phase == CoordinatorPhase::Ready {
			self.pending = Some(PendingLint {
				due: now + self.config.debounce,
				version: self.version,
			});
			trace!(version = self.version, "lint.coord.debounce");
		}
		true
	}

	/// Fires every deadline that has passed.
	pub fn poll(&mut self, now: Instant) -> Vec<WorkerCommand> {
		let mut out = Vec::new();
		match self.phase {
			CoordinatorPhase::Idle => {
				if self.init_due.is_some_and(|due| due <= now) {
					self.init_due = None;
					self.phase = CoordinatorPhase::Initializing;
					info!("lint.coord.init");
					out.push(WorkerCommand::Init);
				}
			}
			CoordinatorPhase::Ready => {
				if let Some(pending) = self.pending.filter(|p| p.due <= now) {
					self.pending = None;
					let text = self.last_text.clone().unwrap_or_default();
					debug!(version = pending.version, "lint.coord.request");
					out.push(WorkerCommand::Lint(LintRequest::new(text, pending.version)));
				}
			}
			CoordinatorPhase::Initializing | CoordinatorPhase::Failed | CoordinatorPhase::Disposed => {}
		}
		out
	}

	/// Earliest deadline still armed.
	pub fn next_deadline(&self) -> Option<Instant> {
		match self.phase {
			CoordinatorPhase::Idle => self.init_due,
			CoordinatorPhase::Ready => self.pending.map(|p| p.due),
			_ => None,
		}
	}

	/// Classifies a worker event. `current_text` is the document text now,
	/// used for the first lint after `Ready`.
	pub fn handle_event(&mut self, event: WorkerEvent, current_text: &str) -> Reaction {
		match event {
			WorkerEvent::Ready => {
				if self.phase != CoordinatorPhase::Initializing {
					debug!(phase = ?self.phase, "lint.coord.unexpected_ready");
					return Reaction::Ignore;
				}
				self.phase = CoordinatorPhase::Ready;
				self.pending = None;
				self.version += 1;
				self.last_text = Some(current_text.to_owned());
				info!(version = self.version, "lint.coord.ready");
				Reaction::Send(WorkerCommand::Lint(LintRequest::new(current_text, self.version)))
			}
			WorkerEvent::Results(response) => {
				if self.phase != CoordinatorPhase::Ready || response.version != self.version {
					debug!(got = response.version, current = self.version, "lint.coord.stale_response");
					return Reaction::Ignore;
				}
				debug!(version = response.version, count = response.results.len(), "lint.coord.accept");
				Reaction::Accept(response.results)
			}
			WorkerEvent::Error { error, version: None } => {
				if self.phase != CoordinatorPhase::Initializing {
					debug!(phase = ?self.phase, "lint.coord.unexpected_init_error");
					return Reaction::Ignore;
				}
				warn!(error = %error, "lint.coord.init_failed");
				self.phase = CoordinatorPhase::Failed;
				self.pending = None;
				Reaction::InitFailed(error)
			}
			WorkerEvent::Error { error, version: Some(version) } => {
				if self.phase != CoordinatorPhase::Ready || version != self.version {
					debug!(got = version, current = self.version, "lint.coord.stale_error");
					return Reaction::Ignore;
				}
				warn!(version, error = %error, "lint.coord.cycle_failed");
				Reaction::CycleFailed(error)
			}
		}
	}

	/// Cancels both timers and moves to `Disposed`. Returns the `Dispose`
	/// command unless already disposed.
	pub fn dispose(&mut self) -> Option<WorkerCommand> {
		if self.phase == CoordinatorPhase::Disposed {
			return None;
		}
		self.init_due = None;
		self.pending = None;
		self.phase = CoordinatorPhase::Disposed;
		info!(version = self.version, "lint.coord.disposed");
		Some(WorkerCommand::Dispose)
	}
}
