//! Headless lint of one file through the full session pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use quill_config::Config;
use quill_editor::{SessionClient, SessionConfig, SessionDriver, SessionSnapshot, SessionStatus};
use quill_lint::CategorySet;
use quill_worker::{EngineLoader, TaskClass, WorkerHandle};
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use crate::report::{FileReport, Finding};
use crate::source::SourceText;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const CYCLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Session settings for batch use: engines load at once, filters as configured.
pub fn session_config(config: &Config, all_categories: bool) -> SessionConfig {
	let mut session = SessionConfig::from(&config.lint);
	session.coordinator.lazy_init_delay = Duration::ZERO;
	if all_categories {
		session.categories = CategorySet::all();
	}
	session
}

pub async fn lint_file(
	path: &Path,
	config: SessionConfig,
	grace: Duration,
	loader: Arc<dyn EngineLoader>,
) -> anyhow::Result<FileReport> {
	let text = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("failed to read {}", path.display()))?;
	let source = SourceText::parse(&text);

	let (worker, events) = WorkerHandle::spawn_shared(loader);
	let (driver, client) = SessionDriver::new(source.document(), config, grace, worker, events);
	let task = quill_worker::spawn(TaskClass::Interactive, driver.run());

	let snapshot = timeout(CYCLE_TIMEOUT, first_cycle(&client)).await;
	client.shutdown().await.ok();
	task.await
		.context("lint session task failed")?
		.context("failed to stop the lint worker")?;

	let snapshot = match snapshot {
		Ok(snapshot) => snapshot?,
		Err(_) => bail!("timed out linting {}", path.display()),
	};
	let report = match snapshot.status {
		SessionStatus::Error { recoverable } => FileReport::EngineFailed { recoverable },
		_ => FileReport::Linted(snapshot.issues.iter().map(|issue| Finding::locate(path, &source, issue)).collect()),
	};
	info!(path = %path.display(), version = snapshot.version, "quill.lint.file_done");
	Ok(report)
}

/// Waits until the session accepted a cycle or gave up.
async fn first_cycle(client: &SessionClient) -> anyhow::Result<SessionSnapshot> {
	loop {
		let snapshot = client.snapshot().await.context("lint session closed early")?;
		match snapshot.status {
			SessionStatus::Error { .. } => return Ok(snapshot),
			_ if snapshot.accepted_version.is_some() => return Ok(snapshot),
			status => debug!(?status, "quill.lint.waiting"),
		}
		sleep(POLL_INTERVAL).await;
	}
}
