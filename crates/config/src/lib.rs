//! Configuration for the quill lint pipeline.
//!
//! Loaded from a TOML file with two tables:
//!
//! ```toml
//! [lint]
//! lazy-init-delay-ms = 1000
//! debounce-ms = 500
//! dispose-grace-ms = 100
//! categories = ["spelling", "grammar"]
//!
//! [engines]
//! dialects = ["en-us", "en-gb"]
//! grammar = true
//! extra-dictionaries = ["course-terms.txt"]
//! tolerate = ["spelling"]
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::{ConfigError, Result};
use quill_lint::{CategorySet, Dialect, LintCategory};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "QUILL_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
	pub lint: LintConfig,
	pub engines: EnginesConfig,
}

/// Scheduling and filtering on the editor side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct LintConfig {
	/// Wait after mount before loading engines.
	pub lazy_init_delay_ms: u64,
	/// Quiet period after the last edit before a lint request.
	pub debounce_ms: u64,
	/// Time the worker gets to handle `Dispose` before it is stopped.
	pub dispose_grace_ms: u64,
	/// Categories shown to the user.
	pub categories: Vec<LintCategory>,
}

impl Default for LintConfig {
	fn default() -> Self {
		Self {
			lazy_init_delay_ms: 1000,
			debounce_ms: 500,
			dispose_grace_ms: 100,
			categories: LintCategory::ALL.to_vec(),
		}
	}
}

impl LintConfig {
	pub const fn lazy_init_delay(&self) -> Duration {
		Duration::from_millis(self.lazy_init_delay_ms)
	}

	pub const fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	pub const fn dispose_grace(&self) -> Duration {
		Duration::from_millis(self.dispose_grace_ms)
	}

	pub fn category_set(&self) -> CategorySet {
		self.categories.iter().copied().collect()
	}
}

/// Which engines the worker loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct EnginesConfig {
	/// Spelling dialects. Two entries are merged dialect-tolerantly.
	pub dialects: Vec<Dialect>,
	/// Load the grammar and style rules.
	pub grammar: bool,
	/// Word files added to every dialect. Relative paths resolve against the
	/// config file's directory.
	pub extra_dictionaries: Vec<PathBuf>,
	/// Categories a single dialect may report without the other agreeing.
	pub tolerate: Vec<LintCategory>,
}

impl Default for EnginesConfig {
	fn default() -> Self {
		Self {
			dialects: vec![Dialect::EnUs, Dialect::EnGb],
			grammar: true,
			extra_dictionaries: Vec::new(),
			tolerate: vec![LintCategory::Spelling],
		}
	}
}

impl Config {
	/// Parses and validates TOML text.
	pub fn from_toml(source: &str) -> Result<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads `path`, resolving relative dictionary paths against its directory.
	pub fn load(path: &Path) -> Result<Self> {
		let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let mut config = Self::from_toml(&source)?;
		if let Some(base) = path.parent() {
			for dict in &mut config.engines.extra_dictionaries {
				if dict.is_relative() {
					*dict = base.join(&*dict);
				}
			}
		}
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}

	/// Finds the active config: `$QUILL_CONFIG`, then
	/// `<config dir>/quill/config.toml`, then defaults.
	///
	/// Returns the file used, if any.
	pub fn discover() -> Result<(Self, Option<PathBuf>)> {
		let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
		Self::discover_in(explicit, dirs::config_dir())
	}

	fn discover_in(explicit: Option<PathBuf>, config_dir: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
		if let Some(path) = explicit {
			return Ok((Self::load(&path)?, Some(path)));
		}
		if let Some(path) = config_dir.map(|dir| dir.join("quill").join("config.toml"))
			&& path.is_file()
		{
			return Ok((Self::load(&path)?, Some(path)));
		}
		tracing::debug!("config.defaults");
		Ok((Self::default(), None))
	}

	pub fn validate(&self) -> Result<()> {
		if self.lint.debounce_ms == 0 {
			return Err(ConfigError::Invalid("lint.debounce-ms must be greater than zero".into()));
		}
		match self.engines.dialects.as_slice() {
			[a, b] if a == b => return Err(ConfigError::Invalid(format!("engines.dialects lists {a} twice"))),
			[_, _, _, ..] => return Err(ConfigError::Invalid("engines.dialects takes at most two dialects".into())),
			[] if !self.engines.grammar => return Err(ConfigError::Invalid("no engines enabled".into())),
			_ => {}
		}
		Ok(())
	}

	pub fn to_toml(&self) -> Result<String> {
		Ok(toml::to_string(self)?)
	}
}

#[cfg(test)]
mod tests;
