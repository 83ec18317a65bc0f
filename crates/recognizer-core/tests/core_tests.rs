use std::fs;
use tempfile::TempDir;

use recognizer_core::config::{validate_index_name, Config, Settings};
use recognizer_core::{BackendError, Category, Error, IndexedDocument, RefreshPolicy};

#[test]
fn defaults_apply_without_any_files() {
    let tmp = TempDir::new().unwrap();
    let settings = Config::load_in(tmp.path(), "dev").unwrap().settings().expect("settings");

    assert_eq!(settings.backend.index, "categories");
    assert_eq!(settings.service.port, 5030);
    assert_eq!(settings.backend.refresh, RefreshPolicy::True);
    assert_eq!(settings.vocabulary.len(), 3, "default vocabulary is seeded");
}

#[test]
fn env_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("config.toml"), "[backend]\nurl = \"http://es:9200\"\nindex = \"base\"\n").unwrap();
    fs::write(dir.join("config.test.toml"), "[backend]\nindex = \"test_categories\"\n").unwrap();

    let settings = Config::load_in(dir, "test").unwrap().settings().expect("settings");
    assert_eq!(settings.backend.url, "http://es:9200", "base value survives");
    assert_eq!(settings.backend.index, "test_categories", "env file wins");

    // the dev file is not consulted for the test env
    fs::write(dir.join("config.dev.toml"), "[backend]\nindex = \"dev_only\"\n").unwrap();
    let settings = Config::load_in(dir, "test").unwrap().settings().expect("settings");
    assert_eq!(settings.backend.index, "test_categories");
}

#[test]
fn app_env_vars_use_double_underscore_nesting() {
    std::env::set_var("APP_SERVICE__HOST", "127.0.0.9");
    let tmp = TempDir::new().unwrap();
    let settings = Config::load_in(tmp.path(), "dev").unwrap().settings();
    std::env::remove_var("APP_SERVICE__HOST");
    assert_eq!(settings.expect("settings").service.host, "127.0.0.9");
}

#[test]
fn overrides_take_precedence() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[service]\nport = 6000\n").unwrap();
    let overrides = serde_json::json!({ "service": { "port": 7000 }, "backend": { "index": "cli_index" } });

    let config = Config::load_in(tmp.path(), "dev").unwrap().with_overrides(overrides);
    let settings = config.settings().expect("settings");
    assert_eq!(settings.service.port, 7000);
    assert_eq!(settings.backend.index, "cli_index");
    assert_eq!(config.get::<u16>("service.port").unwrap(), 7000);
}

#[test]
fn vocabulary_from_file_replaces_default() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[[vocabulary]]\nid = \"fuel\"\nname = \"Топливо\"\n",
    )
    .unwrap();
    let settings = Config::load_in(tmp.path(), "dev").unwrap().settings().expect("settings");
    assert_eq!(settings.vocabulary.0, vec![Category::new("fuel", "Топливо")]);
}

#[test]
fn duplicate_vocabulary_ids_are_rejected() {
    let mut settings = Settings::default();
    settings.vocabulary.0.push(Category::new("foo", "Другое"));
    assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn prod_rejects_disabled_refresh() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.prod.toml"), "[backend]\nrefresh = \"false\"\n").unwrap();
    let config = Config::load_in(tmp.path(), "prod").unwrap();
    assert!(config.settings().is_err());
}

#[test]
fn backend_url_must_be_http() {
    let mut settings = Settings::default();
    settings.backend.url = "ftp://es:21".to_string();
    assert!(settings.validate().is_err());
    settings.backend.url = "not a url".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn index_names_follow_backend_rules() {
    assert!(validate_index_name("categories").is_ok());
    assert!(validate_index_name("categories-v2").is_ok());
    for bad in ["", "Categories", "_private", "-x", "a/b", "a b", "a*", ".."] {
        assert!(validate_index_name(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn indexed_document_has_nested_query_name() {
    let doc = IndexedDocument::from(&Category::new("baz", "Такси"));
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json, serde_json::json!({ "id": "baz", "query": { "name": "Такси" } }));
    assert_eq!(doc.name(), "Такси");
}

#[test]
fn backend_error_message_keeps_status_type_and_reason() {
    let err = Error::from(BackendError {
        status: 400,
        kind: "x".to_string(),
        reason: "y".to_string(),
        root_causes: vec![],
    });
    let msg = err.to_string();
    assert!(msg.contains("400") && msg.contains('x') && msg.contains('y'), "{msg}");
    assert!(!err.is_index_not_found());
}

#[test]
fn not_found_message_contains_query_text() {
    let msg = Error::NotFound("Таксо".to_string()).to_string();
    assert!(msg.contains("Таксо"));
}

#[test]
fn refresh_policy_accepts_bool_or_name() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[backend]\nrefresh = false\n").unwrap();
    let settings = Config::load_in(tmp.path(), "dev").unwrap().settings().expect("settings");
    assert_eq!(settings.backend.refresh, RefreshPolicy::False);

    fs::write(tmp.path().join("config.toml"), "[backend]\nrefresh = \"wait_for\"\n").unwrap();
    let settings = Config::load_in(tmp.path(), "dev").unwrap().settings().expect("settings");
    assert_eq!(settings.backend.refresh, RefreshPolicy::WaitFor);

    fs::write(tmp.path().join("config.toml"), "[backend]\nrefresh = \"sometimes\"\n").unwrap();
    assert!(Config::load_in(tmp.path(), "dev").unwrap().settings().is_err());
}
