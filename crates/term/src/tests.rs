use std::time::Duration;

use pretty_assertions::assert_eq;
use quill_lint::{CategorySet, EngineError, EngineSet, LintCategory};

use super::*;

const GRACE: Duration = Duration::from_millis(10);

fn write_answer(dir: &tempfile::TempDir, text: &str) -> PathBuf {
	let path = dir.path().join("answer.txt");
	std::fs::write(&path, text).unwrap();
	path
}

#[test]
fn batch_sessions_load_engines_immediately() {
	let mut config = Config::default();
	config.lint.categories = vec![LintCategory::Grammar];

	let session = run::session_config(&config, false);
	assert_eq!(session.coordinator.lazy_init_delay, Duration::ZERO);
	assert_eq!(session.coordinator.debounce, config.lint.debounce());
	assert_eq!(session.categories, CategorySet::GRAMMAR);

	assert_eq!(run::session_config(&config, true).categories, CategorySet::all());
}

#[tokio::test]
async fn lint_file_reports_source_locations() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_answer(&dir, "# Answer\n\nHello\nwrold\n");
	let config = Config::default();
	let loader: Arc<dyn EngineLoader> = Arc::new(ConfiguredLoader::new(&config.engines));

	let report = run::lint_file(&path, run::session_config(&config, true), GRACE, loader).await.unwrap();
	let FileReport::Linted(findings) = report else {
		panic!("engines failed: {report:?}");
	};
	let typo = findings.iter().find(|f| f.category == LintCategory::Spelling).unwrap();
	assert_eq!((typo.line, typo.column), (4, 1));
	assert_eq!(typo.file, path);
	assert_eq!(typo.suggestions.first().map(String::as_str), Some("world"));
}

#[tokio::test]
async fn clean_file_has_no_findings() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_answer(&dir, "Hello world.\n");
	let config = Config::default();
	let loader: Arc<dyn EngineLoader> = Arc::new(ConfiguredLoader::new(&config.engines));

	let report = run::lint_file(&path, run::session_config(&config, true), GRACE, loader).await.unwrap();
	assert_eq!(report, FileReport::Linted(Vec::new()));
}

#[tokio::test]
async fn engine_load_failure_is_reported_not_raised() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_answer(&dir, "Hello wrold\n");
	let loader: Arc<dyn EngineLoader> = Arc::new(|| -> Result<EngineSet, EngineError> { Err(EngineError::Empty("engine set".into())) });

	let report = run::lint_file(&path, run::session_config(&Config::default(), true), GRACE, loader).await.unwrap();
	assert_eq!(report, FileReport::EngineFailed { recoverable: false });
}

#[tokio::test]
async fn missing_file_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let loader: Arc<dyn EngineLoader> = Arc::new(ConfiguredLoader::default());
	let err = run::lint_file(&dir.path().join("absent.txt"), run::session_config(&Config::default(), true), GRACE, loader)
		.await
		.unwrap_err();
	assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn explicit_config_path_is_loaded() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("quill.toml");
	std::fs::write(&path, "[lint]\ndebounce-ms = 250\n").unwrap();

	let (config, source) = load_config(Some(&path)).unwrap();
	assert_eq!(config.lint.debounce_ms, 250);
	assert_eq!(source, Some(path));
}

#[test]
fn broken_config_is_reported_with_its_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("quill.toml");
	std::fs::write(&path, "[lint]\nbogus = 1\n").unwrap();

	let err = load_config(Some(&path)).unwrap_err();
	assert!(format!("{err:#}").contains("quill.toml"));
}
