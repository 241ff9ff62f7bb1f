//! Config loading, error-message and validation tests.
//! Layout under test: <home>/.dgl.json

use std::path::PathBuf;

use assert_fs::prelude::*;
use dgl_core::{Config, ConfigError, ConfigProvider};
use predicates::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = Config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains(".dgl.json"));
}

#[test]
fn load_corrupt_json_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".dgl.json")
        .write_str("{ \"dropbox_path\": ")
        .expect("write");

    let err = Config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains(".dgl.json"));
}

#[test]
fn load_valid_config_expands_home_and_fixes_gif_dir() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".dgl.json")
        .write_str(
            r#"{"dropbox_path":"~/Dropbox","dropbox_gif_dir":"gifs","dropbox_api_token":"xxx"}"#,
        )
        .expect("write");

    let config = Config::load_at(home.path()).expect("load");
    assert_eq!(config.root_path(), home.path().join("Dropbox"));
    assert_eq!(config.gifs_path(), "/gifs");
    assert_eq!(config.token(), "xxx");
    assert_eq!(config.api_host(), dgl_core::DEFAULT_API_HOST);
    assert_eq!(config.loaded_from(), Some(home.child(".dgl.json").path()));
    assert!(config.valid());

    let db_path = config.database_path();
    assert!(predicate::str::ends_with(".gifs/gifs.redb").eval(&db_path.to_string_lossy()));
}

#[test]
fn load_honours_api_host_override() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".dgl.json")
        .write_str(
            r#"{"dropbox_path":"/db","dropbox_gif_dir":"/gifs","dropbox_api_token":"t",
                "dropbox_api_host":"http://127.0.0.1:9999"}"#,
        )
        .expect("write");

    let config = Config::load_at(home.path()).expect("load");
    assert_eq!(config.api_host(), "http://127.0.0.1:9999");
}

#[test]
fn empty_object_loads_but_is_invalid() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".dgl.json").write_str("{}").expect("write");

    let config = Config::load_at(home.path()).expect("load");
    assert!(!config.valid());
}

// ---------------------------------------------------------------------------
// 2. Validation
// ---------------------------------------------------------------------------

#[rstest]
#[case("/Users/me/Dropbox", "/gifs", "token", true)]
#[case("~/Dropbox", "/gifs", "token", true)]
#[case("Dropbox", "/gifs", "token", false)]
#[case("", "/gifs", "token", false)]
#[case("/Dropbox", "", "token", false)]
#[case("/Dropbox", "/gifs", "", false)]
fn validate_cases(
    #[case] dropbox_path: &str,
    #[case] gif_dir: &str,
    #[case] token: &str,
    #[case] expected: bool,
) {
    let config = Config::new(dropbox_path, gif_dir, token);
    assert_eq!(config.valid(), expected, "{config:?}");
}

#[test]
fn gif_dir_without_slash_reports_expected_value() {
    let mut config = Config::new("/Dropbox", "/gifs/", "token");
    config.gif_dir = "gifs/".to_string();
    let err = config.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "the dropbox_gif_dir should be \"/gifs/\" instead of \"gifs/\""
    );
}

#[test]
fn full_path_joins_root_and_gif_dir() {
    let config = Config::new("/my/path/to/dropbox", "/gifs", "xxx");
    assert_eq!(config.full_path(), PathBuf::from("/my/path/to/dropbox/gifs"));
}
