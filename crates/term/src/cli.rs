use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Spelling and grammar feedback for written answers")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to $QUILL_CONFIG, then the user config directory)
	#[arg(long, short = 'c', global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Lint text files and report every issue
	Lint(LintArgs),
	/// Print the effective configuration as TOML
	Config,
}

#[derive(Args, Debug)]
pub struct LintArgs {
	/// Files to lint. Paragraphs are separated by blank lines, `# ` starts a heading.
	#[arg(required = true, value_name = "FILE")]
	pub files: Vec<PathBuf>,

	/// Print findings as JSON
	#[arg(long)]
	pub json: bool,

	/// Report every category, ignoring the configured filter
	#[arg(long)]
	pub all_categories: bool,
}
