//! `quill`: lint answer files from the command line.

mod cli;
mod report;
mod run;
mod source;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, LintArgs};
use quill_config::Config;
use quill_worker::{ConfiguredLoader, EngineLoader};
use report::{FileReport, Finding};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match dispatch(cli).await {
		Ok(code) => code,
		Err(err) => {
			eprintln!("error: {err:#}");
			ExitCode::from(2)
		}
	}
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
	let (config, source) = load_config(cli.config.as_deref())?;
	match source {
		Some(path) => info!(path = %path.display(), "quill.config.loaded"),
		None => info!("quill.config.defaults"),
	}

	match cli.command {
		Command::Config => {
			print!("{}", config.to_toml().context("failed to render config")?);
			Ok(ExitCode::SUCCESS)
		}
		Command::Lint(args) => lint(&config, args).await,
	}
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
	match explicit {
		Some(path) => {
			let config = Config::load(path).with_context(|| format!("failed to load config {}", path.display()))?;
			Ok((config, Some(path.to_path_buf())))
		}
		None => Config::discover().context("failed to load config"),
	}
}

async fn lint(config: &Config, args: LintArgs) -> anyhow::Result<ExitCode> {
	let session = run::session_config(config, args.all_categories);
	let grace = config.lint.dispose_grace();
	let loader: Arc<dyn EngineLoader> = Arc::new(ConfiguredLoader::new(&config.engines));

	let mut findings: Vec<Finding> = Vec::new();
	let mut engine_failed = false;
	for path in &args.files {
		match run::lint_file(path, session, grace, Arc::clone(&loader)).await? {
			FileReport::Linted(found) => findings.extend(found),
			FileReport::EngineFailed { recoverable } => {
				warn!(path = %path.display(), recoverable, "quill.lint.engine_failed");
				eprintln!("{}: lint engines failed", path.display());
				engine_failed = true;
			}
		}
	}

	if args.json {
		println!("{}", serde_json::to_string_pretty(&findings).context("failed to encode findings")?);
	} else {
		for finding in &findings {
			println!("{finding}");
		}
	}

	Ok(if engine_failed {
		ExitCode::from(2)
	} else if findings.is_empty() {
		ExitCode::SUCCESS
	} else {
		ExitCode::from(1)
	})
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("quill=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		})
	};

	// QUILL_LOG_DIR sends logs to a per-process file instead of stderr
	if let Some(log_dir) = std::env::var("QUILL_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("quill.{}.log", std::process::id()));
		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);
			tracing_subscriber::registry().with(filter()).with(file_layer).init();
			info!(path = ?log_path, "quill.tracing.file");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}

#[cfg(test)]
mod tests;
