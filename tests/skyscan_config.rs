use std::sync::Mutex;

use tempfile::NamedTempFile;

use skyscan::config::{SkyscanConfig, API_KEY_ENV};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "SKYSCAN_CONFIG",
        "SKYSCAN_MODEL",
        "SKYSCAN_API_BASE",
        "SKYSCAN_API_KEY",
        "SKYSCAN_OVERLAY_WINDOW_SECS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
            "model": "gemini-2.5-pro",
            "api_base": "https://example.test/v1beta",
            "overlay": { "window_secs": 4.5 }
        }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("SKYSCAN_CONFIG", file.path());
    std::env::set_var("SKYSCAN_MODEL", "gemini-2.5-flash-lite");
    std::env::set_var(API_KEY_ENV, "k-123");

    let cfg = SkyscanConfig::load().expect("load config");

    assert_eq!(cfg.model, "gemini-2.5-flash-lite");
    assert_eq!(cfg.api_base, "https://example.test/v1beta");
    assert_eq!(cfg.api_key.as_deref(), Some("k-123"));
    assert_eq!(cfg.overlay.window_secs, 4.5);

    clear_env();
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = SkyscanConfig::load().expect("load config");

    assert_eq!(cfg.model, "gemini-2.5-flash");
    assert_eq!(
        cfg.api_base,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert!(cfg.api_key.is_none());
    assert_eq!(cfg.overlay.window_secs, 3.0);

    clear_env();
}

#[test]
fn blank_env_values_do_not_override() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SKYSCAN_MODEL", "  ");
    std::env::set_var(API_KEY_ENV, "");

    let cfg = SkyscanConfig::load().expect("load config");

    assert_eq!(cfg.model, "gemini-2.5-flash");
    assert!(cfg.api_key.is_none());

    clear_env();
}

#[test]
fn credential_in_config_file_is_ignored() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{ "model": "gemini-2.5-pro", "api_key": "sneaky" }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("SKYSCAN_CONFIG", file.path());

    let cfg = SkyscanConfig::load().expect("load config");

    assert_eq!(cfg.model, "gemini-2.5-pro");
    assert!(cfg.api_key.is_none());

    clear_env();
}

#[test]
fn malformed_window_env_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SKYSCAN_OVERLAY_WINDOW_SECS", "fast");

    let err = SkyscanConfig::load().expect_err("window must be numeric");
    assert!(format!("{err:#}").contains("must be a number"));

    clear_env();
}

#[test]
fn nonpositive_window_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{ "overlay": { "window_secs": 0 } }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("SKYSCAN_CONFIG", file.path());

    let err = SkyscanConfig::load().expect_err("window must be positive");
    assert!(format!("{err:#}").contains("greater than zero"));

    clear_env();
}

#[test]
fn invalid_api_base_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SKYSCAN_API_BASE", "not a url");

    let err = SkyscanConfig::load().expect_err("api_base must parse");
    assert!(format!("{err:#}").contains("not a valid url"));

    clear_env();
}

#[test]
fn unreadable_config_file_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("SKYSCAN_CONFIG", "/nonexistent/skyscan.json");

    let err = SkyscanConfig::load().expect_err("file must be readable");
    assert!(format!("{err:#}").contains("failed to read config file"));

    clear_env();
}
