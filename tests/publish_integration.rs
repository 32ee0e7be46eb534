//! End-to-end tests for the publish pipeline against the mock registry.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use zip::write::SimpleFileOptions;

use modpub::cli::commands::publish::run_publish;
use modpub::config::PublishConfig;
use modpub::registry::mock::{FailOn, MockOperation, MockRegistry};
use modpub::ui::output::Verbosity;

const CHAT_DESCRIPTOR: &str = r#"{
    "pack": "com.example.ChatPack",
    "capability": "plugin-pack",
    "declarations": [
        {"kind": "name", "value": "Chat"},
        {"kind": "version", "value": "1.1"},
        {"kind": "author", "value": "Maxim"},
        {"kind": "description", "value": "Chat placeholders"},
        {"kind": "changelogs", "entries": [
            {"version": "1.0", "value": "a"},
            {"version": "1.1", "value": "b"}
        ]}
    ]
}"#;

/// Build a plugin archive carrying the chat pack descriptor.
fn chat_archive() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat.jar");
    let file = File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("com/example/ChatPack.class", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"\x00\x01").unwrap();
    writer
        .start_file("com/example/chat.pack.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(CHAT_DESCRIPTOR.as_bytes()).unwrap();
    writer.finish().unwrap();
    (dir, path)
}

fn base_config() -> PublishConfig {
    PublishConfig {
        access_token: Some("tok".to_string()),
        project_name: Some("Core".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn creates_module_then_uploads_when_module_absent() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");
    let (_dir, archive) = chat_archive();

    run_publish(&registry, &base_config(), &archive, Verbosity::Quiet)
        .await
        .unwrap();

    let ops = registry.operations();
    assert_eq!(
        ops,
        vec![
            MockOperation::ProjectIdByName {
                name: "Core".to_string()
            },
            MockOperation::ModuleIdByName {
                project_id: "42".to_string(),
                name: "Chat".to_string()
            },
            MockOperation::CreateModule {
                project_id: "42".to_string(),
                name: "Chat".to_string()
            },
            MockOperation::UploadArtifact {
                module_id: "m1".to_string(),
                artifact: archive.clone(),
                version: Some("1.1".to_string()),
                // Changelog entry matching the declared version
                changes: Some("b".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn existing_module_is_reused_without_create() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");
    registry.add_module("42", "Chat", "7");
    let (_dir, archive) = chat_archive();

    // Publishing twice resolves the same id both times and never creates.
    for _ in 0..2 {
        run_publish(&registry, &base_config(), &archive, Verbosity::Quiet)
            .await
            .unwrap();
    }

    let ops = registry.operations();
    assert!(ops
        .iter()
        .all(|op| !matches!(op, MockOperation::CreateModule { .. })));
    let upload_ids: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            MockOperation::UploadArtifact { module_id, .. } => Some(module_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(upload_ids, vec!["7", "7"]);
}

#[tokio::test]
async fn configured_project_id_skips_project_lookup() {
    let registry = MockRegistry::new();
    registry.add_module("42", "Chat", "7");
    let (_dir, archive) = chat_archive();

    let config = PublishConfig {
        access_token: Some("tok".to_string()),
        project_id: Some("42".to_string()),
        ..Default::default()
    };
    run_publish(&registry, &config, &archive, Verbosity::Quiet)
        .await
        .unwrap();

    assert!(registry
        .operations()
        .iter()
        .all(|op| !matches!(op, MockOperation::ProjectIdByName { .. })));
}

#[tokio::test]
async fn module_lookup_transport_failure_falls_back_to_create() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");
    registry.fail_on(FailOn::ModuleIdByName);
    let (_dir, archive) = chat_archive();

    run_publish(&registry, &base_config(), &archive, Verbosity::Quiet)
        .await
        .unwrap();

    assert!(registry
        .operations()
        .iter()
        .any(|op| matches!(op, MockOperation::CreateModule { .. })));
}

#[tokio::test]
async fn rejected_upload_is_a_failure() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");
    registry.add_module("42", "Chat", "7");
    registry.reject_uploads();
    let (_dir, archive) = chat_archive();

    let err = run_publish(&registry, &base_config(), &archive, Verbosity::Quiet)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("module upload failed"));
}

#[tokio::test]
async fn missing_project_id_aborts_before_module_calls() {
    let registry = MockRegistry::new();
    let (_dir, archive) = chat_archive();

    let config = PublishConfig {
        access_token: Some("tok".to_string()),
        ..Default::default()
    };
    let err = run_publish(&registry, &config, &archive, Verbosity::Quiet)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no project id"));
    assert!(registry.operations().is_empty());
}

#[tokio::test]
async fn unreadable_archive_aborts_before_any_registry_call() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");

    let err = run_publish(
        &registry,
        &base_config(),
        std::path::Path::new("/nonexistent/chat.jar"),
        Verbosity::Quiet,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("failed to scan plugin archive"));
    assert!(registry.operations().is_empty());
}

#[tokio::test]
async fn refused_module_creation_aborts_without_upload() {
    let registry = MockRegistry::new();
    registry.add_project("Core", "42");
    registry.fail_on(FailOn::CreateModule);
    let (_dir, archive) = chat_archive();

    let err = run_publish(&registry, &base_config(), &archive, Verbosity::Quiet)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("module creation failed"));
    assert!(registry
        .operations()
        .iter()
        .all(|op| !matches!(op, MockOperation::UploadArtifact { .. })));
}
