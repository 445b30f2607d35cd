// tests/config_loading.rs

use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use reloader::config::{
    ConfigFile, RawConfigFile, Settings, SettingsSources, load_and_validate, load_optional,
    parse_duration,
};
use reloader::errors::ReloaderError;
use reloader::watch::DEFAULT_SOURCE_EXTENSIONS;
use reloader_test_utils::source_tree::SourceTree;

type TestResult = Result<(), Box<dyn Error>>;

fn parse(toml_src: &str) -> Result<ConfigFile, ReloaderError> {
    let raw: RawConfigFile = toml::from_str(toml_src)?;
    ConfigFile::try_from(raw)
}

fn sources() -> SettingsSources {
    SettingsSources {
        cwd: PathBuf::from("/work"),
        config_dir: PathBuf::from("/work/conf"),
        ..SettingsSources::default()
    }
}

#[test]
fn empty_file_gives_defaults() -> TestResult {
    let config = parse("")?;

    assert_eq!(config.interval(), Duration::from_secs(1));
    assert!(config.search_path().is_empty());
    assert!(config.extensions().is_none());
    assert!(config.runtime_prefixes().is_empty());
    assert!(config.include_toolchain_prefixes());
    Ok(())
}

#[test]
fn full_section_is_read() -> TestResult {
    let config = parse(
        r#"
        [reloader]
        interval = "250ms"
        search_path = ["src", "/opt/shared"]
        extensions = ["py", "rs"]
        runtime_prefixes = ["/usr/lib/python3.12"]
        include_toolchain_prefixes = false
        "#,
    )?;

    assert_eq!(config.interval(), Duration::from_millis(250));
    assert_eq!(config.search_path(), ["src", "/opt/shared"]);
    assert_eq!(
        config.extensions(),
        Some(&["py".to_string(), "rs".to_string()][..])
    );
    assert_eq!(config.runtime_prefixes(), ["/usr/lib/python3.12"]);
    assert!(!config.include_toolchain_prefixes());
    Ok(())
}

#[test]
fn zero_or_malformed_interval_is_rejected() {
    for interval in ["0s", "0ms", "fast", "10", "5 weeks"] {
        let src = format!("[reloader]\ninterval = \"{interval}\"\n");
        let err = parse(&src).unwrap_err();
        assert!(
            matches!(err, ReloaderError::ConfigError(_)),
            "{interval}: unexpected {err:?}"
        );
    }
}

#[test]
fn bad_extension_lists_are_rejected() {
    for list in ["[]", "[\"\"]", "[\".py\"]"] {
        let src = format!("[reloader]\nextensions = {list}\n");
        let err = parse(&src).unwrap_err();
        assert!(
            matches!(err, ReloaderError::ConfigError(_)),
            "{list}: unexpected {err:?}"
        );
    }
}

#[test]
fn blank_search_path_entries_are_rejected() {
    let err = parse("[reloader]\nsearch_path = [\"src\", \"  \"]\n").unwrap_err();
    assert!(matches!(err, ReloaderError::ConfigError(_)));
}

#[test]
fn unparseable_toml_is_a_toml_error() {
    let err = parse("[reloader\ninterval = 1").unwrap_err();
    assert!(matches!(err, ReloaderError::TomlError(_)), "{err:?}");
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    assert_eq!(parse_duration(" 2s "), Ok(Duration::from_secs(2)));
    assert_eq!(parse_duration("3m"), Ok(Duration::from_secs(180)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("").is_err());
    assert!(parse_duration("12").is_err());
    assert!(parse_duration("1d").is_err());
}

#[test]
fn durations_too_large_for_whole_seconds_are_errors() {
    // u64::MAX / 60 + 1 minutes and u64::MAX / 3600 + 1 hours.
    for big in ["307445734561825861m", "5124095576030432h"] {
        let err = parse_duration(big).unwrap_err();
        assert!(err.contains("too large"), "{big}: {err}");
    }
    assert_eq!(
        parse_duration("307445734561825860m"),
        Ok(Duration::from_secs(307445734561825860 * 60))
    );
    assert!(parse_duration("99999999999999999999s").is_err());
}

#[test]
fn oversized_config_interval_is_a_config_error() {
    let err = parse("[reloader]\ninterval = \"5124095576030432h\"\n").unwrap_err();
    assert!(matches!(err, ReloaderError::ConfigError(_)), "{err:?}");
}

#[test]
fn loads_and_validates_from_disk() -> TestResult {
    let tree = SourceTree::new()?;
    let path = tree.path("Reloader.toml");
    std::fs::write(&path, "[reloader]\ninterval = \"2s\"\n")?;

    let config = load_and_validate(&path)?;
    assert_eq!(config.interval(), Duration::from_secs(2));
    Ok(())
}

#[test]
fn explicit_config_file_must_exist() -> TestResult {
    let tree = SourceTree::new()?;
    let missing = tree.path("nope.toml");

    let err = load_optional(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, ReloaderError::IoError(_)), "{err:?}");
    Ok(())
}

#[test]
fn explicit_config_paths_resolve_relative_to_the_file() -> TestResult {
    let tree = SourceTree::new()?;
    let path = tree.path("conf/Reloader.toml");
    tree.dir("conf")?;
    std::fs::write(&path, "[reloader]\nsearch_path = [\"src\"]\n")?;

    let (config, base) = load_optional(Some(path.as_path()))?;
    assert_eq!(base, tree.path("conf"));
    assert_eq!(config.search_path(), ["src"]);
    Ok(())
}

#[test]
fn search_path_priority_is_cli_then_env_then_config() -> TestResult {
    let config = parse(
        "[reloader]\nsearch_path = [\"lib\", \"/shared\"]\ninclude_toolchain_prefixes = false\n",
    )?;
    let env_path = std::env::join_paths(["env-a", "/shared"])?;
    let sources = SettingsSources {
        cli_paths: vec![PathBuf::from("cli"), PathBuf::from("/abs/cli")],
        env_path: Some(env_path),
        ..sources()
    };

    let settings = Settings::resolve(&config, &sources);

    assert_eq!(
        settings.search_path,
        vec![
            PathBuf::from("/work/cli"),
            PathBuf::from("/abs/cli"),
            PathBuf::from("/work/env-a"),
            PathBuf::from("/shared"),
            PathBuf::from("/work/conf/lib"),
        ]
    );
    Ok(())
}

#[test]
fn empty_search_path_falls_back_to_the_working_directory() -> TestResult {
    let config = parse("[reloader]\ninclude_toolchain_prefixes = false\n")?;
    let sources = SettingsSources {
        env_path: Some(OsString::new()),
        ..sources()
    };

    let settings = Settings::resolve(&config, &sources);

    assert_eq!(settings.search_path, vec![PathBuf::from("/work")]);
    assert!(settings.runtime_prefixes.is_empty());
    Ok(())
}

#[test]
fn cli_interval_overrides_the_config() -> TestResult {
    let config = parse("[reloader]\ninterval = \"5s\"\n")?;

    let from_config = Settings::resolve(&config, &sources());
    assert_eq!(from_config.interval, Duration::from_secs(5));

    let overridden = Settings::resolve(
        &config,
        &SettingsSources {
            cli_interval: Some(Duration::from_millis(100)),
            ..sources()
        },
    );
    assert_eq!(overridden.interval, Duration::from_millis(100));
    Ok(())
}

#[test]
fn extensions_default_and_prefixes_resolve_against_the_config_dir() -> TestResult {
    let config = parse(
        "[reloader]\nruntime_prefixes = [\"venv\", \"/usr/lib/python3\"]\ninclude_toolchain_prefixes = false\n",
    )?;

    let settings = Settings::resolve(&config, &sources());

    let defaults: Vec<String> = DEFAULT_SOURCE_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(settings.extensions, defaults);
    assert_eq!(
        settings.runtime_prefixes,
        vec![
            PathBuf::from("/work/conf/venv"),
            PathBuf::from("/usr/lib/python3"),
        ]
    );
    Ok(())
}
