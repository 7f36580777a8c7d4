//! Integration tests for Settings config loading with layered precedence.
//!
//! Most tests leave environment variables out (`with_env = false`) so they do
//! not depend on the caller's shell. Only the env layer test reads `TRELLIS_*`.

use std::fs;

use tempfile::TempDir;

use trellis::config::{Settings, SettingsError};
use trellis::domain::Notation;

#[test]
fn given_no_files_when_load_then_defaults() {
    let settings = Settings::load_layers(None, None, false).expect("load settings");
    assert_eq!(settings.notation, Notation::default());
}

#[test]
fn given_explicit_file_when_load_then_overrides_only_given_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trellis.toml");
    fs::write(
        &path,
        r#"
[notation]
separator = ", "
open = "["
close = "]"
"#,
    )
    .unwrap();

    let settings = Settings::load_layers(None, Some(path.as_path()), false).expect("load settings");

    assert_eq!(settings.notation.separator, ", ");
    assert_eq!(settings.notation.open, "[");
    assert_eq!(settings.notation.close, "]");
    assert_eq!(settings.notation.leaf, "Leaf");
    assert_eq!(settings.notation.branch, "Branch");
}

#[test]
fn given_global_and_explicit_files_when_load_then_explicit_wins() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(
        &global,
        "[notation]\nleaf = \"Blatt\"\nbranch = \"Zweig\"\n",
    )
    .unwrap();
    fs::write(&explicit, "[notation]\nbranch = \"Ast\"\n").unwrap();

    let settings =
        Settings::load_layers(Some(global.as_path()), Some(explicit.as_path()), false).expect("load settings");

    assert_eq!(settings.notation.leaf, "Blatt");
    assert_eq!(settings.notation.branch, "Ast");
}

#[test]
fn given_missing_global_file_when_load_then_skipped() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("does-not-exist.toml");

    let settings = Settings::load_layers(Some(global.as_path()), None, false).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_missing_explicit_file_when_load_then_error() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("does-not-exist.toml");

    let result = Settings::load_layers(None, Some(explicit.as_path()), false);

    assert!(matches!(result, Err(SettingsError::Load(_))));
}

#[test]
fn given_ambiguous_notation_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trellis.toml");
    fs::write(&path, "[notation]\nleaf = \"Branch\"\n").unwrap();

    let result = Settings::load_layers(None, Some(path.as_path()), false);

    match result {
        Err(SettingsError::Invalid(e)) => {
            assert!(e.to_string().contains("leaf and branch labels"));
        }
        other => panic!("expected invalid notation, got {other:?}"),
    }
}

#[test]
fn given_settings_when_rendered_as_toml_then_loads_back_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trellis.toml");
    let original = Settings {
        notation: Notation {
            separator: " | ".into(),
            ..Notation::default()
        },
    };
    fs::write(&path, original.to_toml().unwrap()).unwrap();

    let loaded = Settings::load_layers(None, Some(path.as_path()), false).expect("load settings");

    assert_eq!(loaded, original);
}

#[test]
fn given_env_var_when_load_then_overrides_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trellis.toml");
    fs::write(&path, "[notation]\nseparator = \", \"\nopen = \"[\"\n").unwrap();

    std::env::set_var("TRELLIS_NOTATION__SEPARATOR", " ; ");
    let result = Settings::load_layers(None, Some(path.as_path()), true);
    std::env::remove_var("TRELLIS_NOTATION__SEPARATOR");

    let settings = result.expect("load settings");
    assert_eq!(settings.notation.separator, " ; ");
    assert_eq!(settings.notation.open, "[");
}
