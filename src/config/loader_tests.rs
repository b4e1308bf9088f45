//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Write `contents` to a fresh file under the temp dir and return its path.
fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("satcon_{}_{name}.toml", std::process::id()));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

// ===== Paths =====

#[test]
fn default_config_path_ends_with_satcon_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("satcon") && path_str.ends_with("config.toml"),
        "Path should contain 'satcon' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_satcon_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("satcon.log"),
        "Default log path should end with 'satcon.log', got: {:?}",
        path
    );
}

// ===== load_config_file =====

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = write_temp_config(
        "valid",
        r#"
store_capacity = 500
max_depth = 5
max_string_length = 200
max_array_length = 10
max_object_keys = 8
item_height = 4
buffer_size = 2
scroll_threshold = 1
search_debounce_ms = 150
log_file_path = "/tmp/satcon.log"
"#,
    );

    let config = load_config_file(&path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.store_capacity, Some(500));
    assert_eq!(config.max_depth, Some(5));
    assert_eq!(config.max_string_length, Some(200));
    assert_eq!(config.max_array_length, Some(10));
    assert_eq!(config.max_object_keys, Some(8));
    assert_eq!(config.item_height, Some(4));
    assert_eq!(config.buffer_size, Some(2));
    assert_eq!(config.scroll_threshold, Some(1));
    assert_eq!(config.search_debounce_ms, Some(150));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/satcon.log")));

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_handles_partial_config() {
    let path = write_temp_config("partial", "max_depth = 6\n# Other fields omitted\n");

    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(config.max_depth, Some(6));
    assert_eq!(config.store_capacity, None);

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = write_temp_config("invalid", "this is not valid TOML ][}{");

    match load_config_file(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let path = write_temp_config("unknown", "theme = \"dark\"\n");

    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::remove_file(path).ok();
}

// ===== Precedence =====

#[test]
#[serial]
fn explicit_path_beats_env_var() {
    let explicit = write_temp_config("explicit", "store_capacity = 1\n");
    let from_env = write_temp_config("from_env", "store_capacity = 2\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()));
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.unwrap().unwrap().store_capacity, Some(1));
    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial]
fn env_var_path_used_without_explicit_path() {
    let from_env = write_temp_config("env_only", "store_capacity = 2\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.unwrap().unwrap().store_capacity, Some(2));
    fs::remove_file(from_env).ok();
}

#[test]
#[serial]
fn env_var_pointing_at_missing_file_yields_defaults() {
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/satcon.toml");
    let config = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config, Ok(None));
}

// ===== merge_config =====

#[test]
fn merge_none_yields_defaults() {
    let resolved = merge_config(None);
    assert_eq!(resolved, ResolvedConfig::default());
    assert_eq!(resolved.store_capacity, 10_000);
    assert_eq!(resolved.max_depth, 3);
    assert_eq!(resolved.max_string_length, 1000);
    assert_eq!(resolved.max_array_length, 100);
    assert_eq!(resolved.max_object_keys, 50);
    assert_eq!(resolved.item_height, 3);
    assert_eq!(resolved.buffer_size, 5);
    assert_eq!(resolved.scroll_threshold, 2);
    assert_eq!(resolved.search_debounce_ms, 300);
}

#[test]
fn merge_uses_file_values_and_defaults_for_the_rest() {
    let file = ConfigFile {
        store_capacity: Some(42),
        log_file_path: Some(PathBuf::from("/custom/app.log")),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));
    assert_eq!(resolved.store_capacity, 42);
    assert_eq!(resolved.log_file_path, PathBuf::from("/custom/app.log"));
    assert_eq!(resolved.max_depth, 3);
}

#[test]
fn derived_configs_follow_resolved_values() {
    let resolved = ResolvedConfig {
        max_depth: 500,
        item_height: 0,
        search_debounce_ms: 50,
        ..ResolvedConfig::default()
    };

    assert_eq!(
        resolved.serialize_config().max_depth,
        crate::serializer::MAX_DEPTH_LIMIT
    );
    assert_eq!(resolved.scroller_config().item_height, 1);
    assert_eq!(resolved.search_debounce(), Duration::from_millis(50));
}

// ===== Overrides =====

#[test]
#[serial]
fn env_overrides_apply_numbers() {
    env::set_var(CAPACITY_ENV_VAR, "25");
    env::set_var(DEBOUNCE_ENV_VAR, " 10 ");

    let config = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(CAPACITY_ENV_VAR);
    env::remove_var(DEBOUNCE_ENV_VAR);

    assert_eq!(config.store_capacity, 25);
    assert_eq!(config.search_debounce_ms, 10);
}

#[test]
#[serial]
fn env_overrides_ignore_garbage() {
    env::set_var(CAPACITY_ENV_VAR, "lots");

    let config = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(CAPACITY_ENV_VAR);

    assert_eq!(config.store_capacity, DEFAULT_CAPACITY);
}

#[test]
fn cli_override_wins() {
    let base = ResolvedConfig {
        store_capacity: 25,
        ..ResolvedConfig::default()
    };
    assert_eq!(apply_cli_overrides(base.clone(), Some(7)).store_capacity, 7);
    assert_eq!(apply_cli_overrides(base, None).store_capacity, 25);
}
