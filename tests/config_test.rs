//! Tests for server configuration loading.

use std::collections::HashMap;
use std::io::Write;

use number_duel::{DEFAULT_MAX_RETRIES, ServerConfig, StoreBackend};
use tempfile::NamedTempFile;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 3000);
    assert_eq!(*config.store(), StoreBackend::Memory);
    assert_eq!(config.db_path(), "number_duel.db");
    assert_eq!(*config.max_retries(), DEFAULT_MAX_RETRIES);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = ServerConfig::from_toml("port = 8080\nstore = \"sqlite\"\n").expect("Parse failed");
    assert_eq!(*config.port(), 8080);
    assert_eq!(*config.store(), StoreBackend::Sqlite);
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(config.db_path(), "number_duel.db");
}

#[test]
fn test_invalid_toml_is_rejected() {
    assert!(ServerConfig::from_toml("port = \"eighty\"").is_err());
    assert!(ServerConfig::from_toml("store = \"redis\"").is_err());
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "host = \"0.0.0.0\"\nmax_retries = 3").expect("Write failed");

    let config = ServerConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.max_retries(), 3);
}

#[test]
fn test_missing_file_is_an_error() {
    let err = ServerConfig::from_file("/definitely/not/here.toml").expect_err("Missing file loaded");
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_env_overrides() {
    let config = ServerConfig::default()
        .with_overrides(lookup(&[
            ("NUMBER_DUEL_HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("NUMBER_DUEL_STORE", "SQLite"),
            ("NUMBER_DUEL_DB", "/tmp/duel.db"),
        ]))
        .expect("Overrides failed");

    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.port(), 9000);
    assert_eq!(*config.store(), StoreBackend::Sqlite);
    assert_eq!(config.db_path(), "/tmp/duel.db");
}

#[test]
fn test_bad_env_override_is_rejected() {
    assert!(
        ServerConfig::default()
            .with_overrides(lookup(&[("PORT", "not-a-port")]))
            .is_err()
    );
    assert!(
        ServerConfig::default()
            .with_overrides(lookup(&[("NUMBER_DUEL_STORE", "postgres")]))
            .is_err()
    );
}

#[test]
fn test_setters_override_last() {
    let config = ServerConfig::default()
        .with_overrides(lookup(&[("PORT", "9000")]))
        .expect("Overrides failed")
        .with_port(4000)
        .with_store(StoreBackend::Memory);
    assert_eq!(*config.port(), 4000);
}

#[test]
fn test_build_sqlite_service() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let config = ServerConfig::default()
        .with_store(StoreBackend::Sqlite)
        .with_db_path(db_file.path().to_str().expect("Invalid path").to_string());

    let service = config.build_service().expect("Build failed");
    service.submit_guess(1, "1234").expect("Guess rejected");
    assert!(service.store().load().expect("Load failed").is_some());
}
