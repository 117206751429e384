//! Environment-variable override for Settings.
//!
//! Kept in its own binary: the `SEGLIST_*` variables are process-wide
//! and would race with the file-based config tests.

use std::env;
use std::fs;

use tempfile::TempDir;

use seglist::{LabelNamespace, Settings};

#[test]
fn given_env_var_when_loading_then_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seglist.toml");
    fs::write(&path, "namespace = \"default\"\n").unwrap();

    env::set_var("SEGLIST_NAMESPACE", "alternate");
    let settings = Settings::load_from(Some(&path)).expect("load settings");
    env::remove_var("SEGLIST_NAMESPACE");

    assert_eq!(settings.namespace, LabelNamespace::Alternate);
}
