//! Engine construction.
//!
//! Loading runs once per initialization, on a background task, so cold start
//! cost (reading word lists, building engines) never blocks the host's
//! command loop.

use std::path::PathBuf;

use async_trait::async_trait;
use quill_config::EnginesConfig;
use quill_lint::{
	CategorySet, Dialect, DialectMergePolicy, DictionaryEngine, EngineAdapter, EngineError, EngineSet, EngineSlot, RuleEngine, WordList,
};

/// Builds the [`EngineSet`] a worker host owns.
#[async_trait]
pub trait EngineLoader: Send + Sync + 'static {
	async fn load(&self) -> Result<EngineSet, EngineError>;
}

#[async_trait]
impl<F> EngineLoader for F
where
	F: Fn() -> Result<EngineSet, EngineError> + Send + Sync + 'static,
{
	async fn load(&self) -> Result<EngineSet, EngineError> {
		self()
	}
}

/// Loader driven by the `[engines]` config table.
#[derive(Debug, Clone)]
pub struct ConfiguredLoader {
	dialects: Vec<Dialect>,
	grammar: bool,
	extra_dictionaries: Vec<PathBuf>,
	policy: DialectMergePolicy,
}

impl ConfiguredLoader {
	pub fn new(config: &EnginesConfig) -> Self {
		let tolerated: CategorySet = config.tolerate.iter().copied().collect();
		Self {
			dialects: config.dialects.clone(),
			grammar: config.grammar,
			extra_dictionaries: config.extra_dictionaries.clone(),
			policy: DialectMergePolicy::new(tolerated),
		}
	}

	async fn extra_words(&self) -> Result<String, EngineError> {
		let mut words = String::new();
		for path in &self.extra_dictionaries {
			let source = tokio::fs::read_to_string(path).await.map_err(|error| EngineError::Io {
				path: path.clone(),
				error,
			})?;
			tracing::debug!(path = %path.display(), "lint.loader.extra_dictionary");
			words.push_str(&source);
			words.push('\n');
		}
		Ok(words)
	}

	fn dictionary(dialect: Dialect, extra: &str) -> Result<EngineAdapter, EngineError> {
		let mut words = WordList::builtin(dialect);
		words.extend_from_str(extra);
		Ok(EngineAdapter::new(DictionaryEngine::new(dialect, words)?))
	}
}

impl Default for ConfiguredLoader {
	fn default() -> Self {
		Self::new(&EnginesConfig::default())
	}
}

#[async_trait]
impl EngineLoader for ConfiguredLoader {
	async fn load(&self) -> Result<EngineSet, EngineError> {
		let extra = self.extra_words().await?;
		let mut set = EngineSet::new();

		match self.dialects.as_slice() {
			[] => {}
			[only] => set.push(EngineSlot::Single(Self::dictionary(*only, &extra)?)),
			[primary, secondary, ..] => set.push(EngineSlot::Dialects {
				primary: Self::dictionary(*primary, &extra)?,
				secondary: Self::dictionary(*secondary, &extra)?,
				policy: self.policy,
			}),
		}
		if self.grammar {
			set.push(EngineSlot::Single(EngineAdapter::new(RuleEngine::new())));
		}

		if set.is_empty() {
			return Err(EngineError::Empty("engine set".into()));
		}
		tracing::info!(engines = ?set.engine_names(), "lint.loader.loaded");
		Ok(set)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[tokio::test]
	async fn default_config_loads_both_dialects_and_rules() {
		let set = ConfiguredLoader::default().load().await.unwrap();
		assert_eq!(set.engine_names(), vec!["dictionary(en-us)", "dictionary(en-gb)", "rules"]);
	}

	#[tokio::test]
	async fn extra_dictionaries_are_read_from_disk() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "photosynthesis").unwrap();
		let config = EnginesConfig {
			dialects: vec![Dialect::EnGb],
			grammar: false,
			extra_dictionaries: vec![file.path().to_path_buf()],
			..EnginesConfig::default()
		};
		let mut set = ConfiguredLoader::new(&config).load().await.unwrap();
		assert!(set.lint("Photosynthesis is a process.").unwrap().is_empty());
	}

	#[tokio::test]
	async fn missing_dictionary_is_an_io_error() {
		let config = EnginesConfig {
			extra_dictionaries: vec![PathBuf::from("/definitely/not/here.txt")],
			..EnginesConfig::default()
		};
		let err = ConfiguredLoader::new(&config).load().await.unwrap_err();
		assert!(matches!(err, EngineError::Io { .. }));
	}

	#[tokio::test]
	async fn no_engines_is_rejected() {
		let config = EnginesConfig {
			dialects: Vec::new(),
			grammar: false,
			..EnginesConfig::default()
		};
		assert!(matches!(ConfiguredLoader::new(&config).load().await, Err(EngineError::Empty(_))));
	}
}
