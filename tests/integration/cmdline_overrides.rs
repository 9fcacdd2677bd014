//! End-to-end tests for command-line override merging against on-disk
//! settings and profile documents.

use quayside_settings::cmdline;
use quayside_settings::profiles::JsonProfileReader;
use quayside_settings::schema::SchemaNode;
use quayside_settings::settings::Settings;
use quayside_settings::store::{read_settings_file, JsonFileSink, SettingsStore};
use quayside_settings::validator::LockCheckValidator;
use quayside_settings::SettingsError;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn validator() -> LockCheckValidator {
    LockCheckValidator::new(SchemaNode::from_defaults(&Settings::default_tree()))
}

fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn empty_profiles(temp: &TempDir) -> JsonProfileReader {
    JsonProfileReader::new(temp.path().join("system"), temp.path().join("user"))
}

fn settings_path(temp: &TempDir) -> std::path::PathBuf {
    temp.path().join("settings.json")
}

#[test]
fn test_overrides_persist_to_disk() {
    let temp = TempDir::new().unwrap();
    let reader = empty_profiles(&temp);
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&[
            "--kubernetes.options.flannel",
            "--virtualMachine.memoryInGB=8",
        ]),
    )
    .unwrap();

    let on_disk = read_settings_file(&path).unwrap().unwrap();
    assert_eq!(on_disk["kubernetes"]["options"]["flannel"], true);
    assert_eq!(on_disk["virtualMachine"]["memoryInGB"], 8);
}

#[test]
fn test_persisted_settings_survive_reload_and_further_overrides() {
    let temp = TempDir::new().unwrap();
    let reader = empty_profiles(&temp);
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&["--images.namespace=custom.io"]),
    )
    .unwrap();

    // Second process lifecycle: reload from disk, apply another override.
    let persisted = read_settings_file(&path).unwrap();
    let mut store = SettingsStore::load(&reader, persisted).unwrap();
    assert!(!store.is_first_run());
    assert_eq!(store.settings()["images"]["namespace"], "custom.io");

    let mut sink = JsonFileSink::new(&path);
    cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&["--kubernetes.enabled=false"]),
    )
    .unwrap();
    let on_disk = read_settings_file(&path).unwrap().unwrap();
    assert_eq!(on_disk["images"]["namespace"], "custom.io");
    assert_eq!(on_disk["kubernetes"]["enabled"], false);
}

fn write_locked_profile(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("locked.json"),
        json!({
            "containerEngine": {
                "allowedImages": {"enabled": false, "patterns": []}
            }
        })
        .to_string(),
    )
    .unwrap();
}

#[test]
fn test_locked_field_override_rejected_without_persisting() {
    let temp = TempDir::new().unwrap();
    let system_dir = temp.path().join("system");
    write_locked_profile(&system_dir);
    let reader = JsonProfileReader::new(&system_dir, temp.path().join("user"));
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    let err = cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&["--containerEngine.allowedImages.enabled=true"]),
    )
    .unwrap_err();

    assert!(err.is_locked_field());
    assert!(!matches!(err, SettingsError::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn test_locked_profile_with_falsy_values_still_locks() {
    let temp = TempDir::new().unwrap();
    let system_dir = temp.path().join("system");
    // enabled: false and patterns: [] lock by presence, not truthiness.
    write_locked_profile(&system_dir);
    let reader = JsonProfileReader::new(&system_dir, temp.path().join("user"));

    let store = SettingsStore::load(&reader, None).unwrap();
    assert!(store
        .locked()
        .is_locked("containerEngine.allowedImages.enabled"));
    assert!(store
        .locked()
        .is_locked("containerEngine.allowedImages.patterns"));
}

#[test]
fn test_foreign_then_recognized_tokens_across_reload() {
    let temp = TempDir::new().unwrap();
    let reader = empty_profiles(&temp);
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&[
            "/opt/host/runtime",
            "--enable-gpu-rasterization",
            "--no-modal-dialogs",
            "--portForwarding.includeKubernetesServices=true",
        ]),
    )
    .unwrap();

    assert!(store.transient().no_modal_dialogs);
    let on_disk = read_settings_file(&path).unwrap().unwrap();
    assert_eq!(on_disk["portForwarding"]["includeKubernetesServices"], true);
}

#[test]
fn test_failed_merge_leaves_no_settings_file() {
    let temp = TempDir::new().unwrap();
    let reader = empty_profiles(&temp);
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    let err = cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&[
            "--kubernetes.options.flannel=true",
            "--virtualMachine.memoryInGB=abc",
        ]),
    )
    .unwrap_err();

    assert!(matches!(err, SettingsError::TypeMismatch { .. }));
    // Fatal errors abort before any partial persistence.
    assert!(!path.exists());
    assert_eq!(
        store.settings()["kubernetes"]["options"]["flannel"],
        false
    );
}

#[test]
fn test_deferred_version_persists_even_when_unknown() {
    let temp = TempDir::new().unwrap();
    let reader = empty_profiles(&temp);
    let path = settings_path(&temp);

    let mut store = SettingsStore::load(&reader, None).unwrap();
    let mut sink = JsonFileSink::new(&path);
    cmdline::apply(
        &mut store,
        &validator(),
        &mut sink,
        &tokens(&["--kubernetes.version=0.0.0-unknown"]),
    )
    .unwrap();

    let on_disk = read_settings_file(&path).unwrap().unwrap();
    assert_eq!(on_disk["kubernetes"]["version"], "0.0.0-unknown");
    assert!(!store.is_first_run());
}
