use super::*;

use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("catalog_client_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings =
        load_settings_from(Path::new("/nonexistent/catalog.toml"), no_env).expect("settings");
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        r#"
items_url = "https://catalog.example/api/items/"
thumbnail_url = "https://catalog.example/thumbs/"
user_id = "u-42"
username = "ola"
"#,
    );

    let settings = load_settings_from(&path, no_env).expect("settings");
    assert_eq!(settings.items_url, "https://catalog.example/api/items");
    assert_eq!(settings.thumbnail_url, "https://catalog.example/thumbs/");
    assert_eq!(settings.user().id.0, "u-42");
    assert_eq!(settings.user().username.as_deref(), Some("ola"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn prefixed_env_wins_over_plain_env_and_file() {
    let path = temp_settings_file(r#"items_url = "http://file.example/items""#);
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ITEMS_URL", "http://plain.example/items"),
        ("APP__ITEMS_URL", "http://prefixed.example/items"),
        ("CATALOG_USER_ID", "env-user"),
    ]);

    let settings =
        load_settings_from(&path, |name| vars.get(name).map(|v| v.to_string())).expect("settings");
    assert_eq!(settings.items_url, "http://prefixed.example/items");
    assert_eq!(settings.user_id, "env-user");
    assert_eq!(settings.username, None);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn rejects_relative_and_non_http_items_urls() {
    assert!(matches!(
        normalize_items_url("/api/items"),
        Err(SettingsError::InvalidItemsUrl { .. })
    ));
    assert!(matches!(
        normalize_items_url("ftp://host/items"),
        Err(SettingsError::UnsupportedScheme(_))
    ));
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_settings_file("items_url = ");
    let err = load_settings_from(&path, no_env).expect_err("must fail");
    assert!(matches!(err, SettingsError::InvalidFile { .. }));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}
