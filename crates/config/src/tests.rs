use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[test]
fn empty_file_is_all_defaults() {
	assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn partial_tables_keep_other_defaults() {
	let config = Config::from_toml(
		r#"
		[lint]
		debounce-ms = 250
		categories = ["spelling", "word-choice"]

		[engines]
		dialects = ["en-gb"]
		"#,
	)
	.unwrap();

	assert_eq!(config.lint.debounce(), Duration::from_millis(250));
	assert_eq!(config.lint.lazy_init_delay(), Duration::from_secs(1));
	assert_eq!(config.lint.category_set(), CategorySet::SPELLING | CategorySet::WORD_CHOICE);
	assert_eq!(config.engines.dialects, vec![Dialect::EnGb]);
	assert!(config.engines.grammar);
}

#[test]
fn unknown_keys_are_rejected() {
	let err = Config::from_toml("[lint]\ndebounce = 10\n").unwrap_err();
	assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[rstest]
#[case::zero_debounce("[lint]\ndebounce-ms = 0")]
#[case::duplicate_dialect("[engines]\ndialects = [\"en-us\", \"en-us\"]")]
#[case::three_dialects("[engines]\ndialects = [\"en-us\", \"en-gb\", \"en-us\"]")]
#[case::nothing_enabled("[engines]\ndialects = []\ngrammar = false")]
fn invalid_values_are_rejected(#[case] source: &str) {
	assert!(matches!(Config::from_toml(source), Err(ConfigError::Invalid(_))));
}

#[test]
fn grammar_only_is_allowed() {
	let config = Config::from_toml("[engines]\ndialects = []").unwrap();
	assert!(config.engines.dialects.is_empty());
}

#[test]
fn load_resolves_dictionaries_next_to_the_file() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.toml");
	let mut file = std::fs::File::create(&path).unwrap();
	writeln!(file, "[engines]\nextra-dictionaries = [\"terms.txt\", \"/abs/words.txt\"]").unwrap();

	let config = Config::load(&path).unwrap();
	assert_eq!(
		config.engines.extra_dictionaries,
		vec![dir.path().join("terms.txt"), PathBuf::from("/abs/words.txt")]
	);
}

#[test]
fn missing_file_is_an_io_error() {
	let err = Config::load(Path::new("/no/such/quill.toml")).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn discovery_prefers_explicit_then_config_dir() {
	let dir = tempfile::tempdir().unwrap();
	let (config, used) = Config::discover_in(None, Some(dir.path().to_path_buf())).unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(used, None);

	let quill_dir = dir.path().join("quill");
	std::fs::create_dir_all(&quill_dir).unwrap();
	std::fs::write(quill_dir.join("config.toml"), "[lint]\ndebounce-ms = 50\n").unwrap();
	let (config, used) = Config::discover_in(None, Some(dir.path().to_path_buf())).unwrap();
	assert_eq!(config.lint.debounce_ms, 50);
	assert_eq!(used, Some(quill_dir.join("config.toml")));

	let explicit = dir.path().join("exam.toml");
	std::fs::write(&explicit, "[lint]\ndebounce-ms = 75\n").unwrap();
	let (config, used) = Config::discover_in(Some(explicit.clone()), Some(dir.path().to_path_buf())).unwrap();
	assert_eq!(config.lint.debounce_ms, 75);
	assert_eq!(used, Some(explicit));
}

#[test]
fn defaults_round_trip_through_toml() {
	let text = Config::default().to_toml().unwrap();
	assert!(text.contains("debounce-ms = 500"), "{text}");
	assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
}
