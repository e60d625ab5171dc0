use std::fs;

use cgrs::config::{Config, CONFIG_FILE};
use cgrs::request::DateBasis;

#[test]
fn load_from_dir_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.data_dir, ".cgrs");
    assert_eq!(cfg.requests.id_prefix, "CGRS");
}

#[test]
fn load_from_dir_defaults_on_invalid_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "data_dir = 123").expect("write invalid config");

    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.data_dir, ".cgrs");
    assert_eq!(cfg.requests.date_basis, DateBasis::Utc);
}

#[test]
fn load_from_dir_defaults_on_invalid_week_start() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    let content = r#"
[calendar]
week_start = "someday"
"#;
    fs::write(&path, content.trim()).expect("write invalid week start");

    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.calendar.week_start, "sunday");
}

#[test]
fn load_from_dir_defaults_on_zero_photo_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[requests]\nmax_photos = 0").expect("write config");

    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.requests.max_photos, 5);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE);
    fs::write(&path, "[requests]\nid_prefix = \"MAPLE\"").expect("write config");

    let cfg = Config::load_from_dir(dir.path());
    assert_eq!(cfg.requests.id_prefix, "MAPLE");
    assert_eq!(cfg.requests.max_photo_bytes, 5 * 1024 * 1024);
    assert_eq!(cfg.data_path(dir.path()), dir.path().join(".cgrs"));
}
