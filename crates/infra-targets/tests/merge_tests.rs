//! Integration tests for merging fragments into target documents.

use infra_targets::merger::default_project_record;
use infra_targets::{DocumentMerger, Error, Fragment, ServiceEntry, TargetKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROJECT: &str = "/home/x/autonomy";

fn fragment() -> Fragment {
    let mut f = Fragment::new();
    f.insert(
        ServiceEntry::new("rag-memory", "node")
            .arg("/opt/rag/dist/index.js")
            .env("DB_FILE_PATH", "/home/x/data/rag-memory.db"),
    );
    f.insert(ServiceEntry::new("gmail", "npx").arg("@gongrzhe/server-gmail-autoauth-mcp"));
    f
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_code_target_absent_creates_skeleton() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join(".claude.json");

    let outcome = DocumentMerger::claude_code(PROJECT).merge(&path, &fragment()).unwrap();
    assert!(outcome.created);
    assert!(outcome.changed);
    assert_eq!(outcome.services, vec!["rag-memory".to_string(), "gmail".to_string()]);

    let servers = fragment().to_json(&TargetKind::ClaudeCode.spec());
    let mut record = default_project_record();
    record["mcpServers"] = servers.clone();

    assert_eq!(
        read_json(&path),
        json!({
            "projects": { PROJECT: record },
            "mcpServers": servers
        })
    );
}

#[test]
fn test_desktop_target_absent_creates_skeleton() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".config/Claude/claude_desktop_config.json");

    DocumentMerger::claude_desktop().merge(&path, &fragment()).unwrap();

    assert_eq!(
        read_json(&path),
        json!({ "mcpServers": fragment().to_json(&TargetKind::ClaudeDesktop.spec()) })
    );
}

#[test]
fn test_unrelated_keys_preserved() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude.json");
    let existing = json!({
        "userNotes": "keep me",
        "numStartups": 42,
        "mcpServers": { "stale": { "command": "old" } },
        "projects": {
            "/other/project": { "history": ["a"], "mcpServers": { "mine": {} } }
        }
    });
    fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

    DocumentMerger::claude_code(PROJECT).merge(&path, &fragment()).unwrap();
    let merged = read_json(&path);

    assert_eq!(merged["userNotes"], "keep me");
    assert_eq!(merged["numStartups"], 42);
    assert_eq!(
        merged["projects"]["/other/project"],
        existing["projects"]["/other/project"]
    );
    // The generated map fully replaces the old one
    assert_eq!(merged["mcpServers"], fragment().to_json(&TargetKind::ClaudeCode.spec()));
    assert!(merged["mcpServers"].get("stale").is_none());
}

#[test]
fn test_roundtrip_other_top_level_keys_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("claude_desktop_config.json");
    let existing = json!({
        "globalShortcut": "Ctrl+Space",
        "preferences": { "theme": "dark", "nested": [1, 2, {"x": null}] },
        "mcpServers": {}
    });
    fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();

    DocumentMerger::claude_desktop().merge(&path, &fragment()).unwrap();
    let merged = read_json(&path);

    assert_eq!(merged["mcpServers"], fragment().to_json(&TargetKind::ClaudeDesktop.spec()));
    for key in ["globalShortcut", "preferences"] {
        assert_eq!(
            serde_json::to_string(&merged[key]).unwrap(),
            serde_json::to_string(&existing[key]).unwrap()
        );
    }
}

#[test]
fn test_existing_project_record_keeps_its_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude.json");
    fs::write(
        &path,
        serde_json::to_string(&json!({
            "projects": {
                PROJECT: {
                    "allowedTools": ["Bash"],
                    "hasTrustDialogAccepted": false,
                    "mcpServers": { "old": {} }
                }
            }
        }))
        .unwrap(),
    )
    .unwrap();

    DocumentMerger::claude_code(PROJECT).merge(&path, &fragment()).unwrap();
    let record = &read_json(&path)["projects"][PROJECT];

    assert_eq!(record["allowedTools"], json!(["Bash"]));
    assert_eq!(record["hasTrustDialogAccepted"], false);
    assert!(record.get("history").is_none());
    assert_eq!(record["mcpServers"], fragment().to_json(&TargetKind::ClaudeCode.spec()));
}

#[test]
fn test_missing_projects_key_is_added() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude.json");
    fs::write(&path, r#"{"theme": "light"}"#).unwrap();

    DocumentMerger::claude_code(PROJECT).merge(&path, &fragment()).unwrap();
    let merged = read_json(&path);
    assert_eq!(merged["theme"], "light");
    assert_eq!(merged["projects"][PROJECT]["hasTrustDialogAccepted"], true);
}

#[test]
fn test_invalid_json_is_format_error_and_file_untouched() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude.json");
    fs::write(&path, "{ this is not json").unwrap();

    let err = DocumentMerger::claude_code(PROJECT).merge(&path, &fragment()).unwrap_err();
    assert!(matches!(err, Error::Format { ref path, .. } if path.ends_with(".claude.json")));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");
}

#[test]
fn test_non_object_root_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("claude_desktop_config.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let err = DocumentMerger::claude_desktop().merge(&path, &fragment()).unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { .. }));
}

#[test]
fn test_second_merge_is_noop() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude.json");
    fs::write(&path, r#"{"zeta": 1, "alpha": {"b": 2, "a": 1}}"#).unwrap();

    let merger = DocumentMerger::claude_code(PROJECT);
    let first = merger.merge(&path, &fragment()).unwrap();
    let after_first = fs::read_to_string(&path).unwrap();
    let second = merger.merge(&path, &fragment()).unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn test_existing_key_order_preserved() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("claude_desktop_config.json");
    fs::write(&path, r#"{"zeta": 1, "mcpServers": {}, "alpha": 2}"#).unwrap();

    DocumentMerger::claude_desktop().merge(&path, &fragment()).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    let zeta = text.find("\"zeta\"").unwrap();
    let servers = text.find("\"mcpServers\"").unwrap();
    let alpha = text.find("\"alpha\"").unwrap();
    assert!(zeta < servers && servers < alpha);
}

#[test]
fn test_empty_fragment_clears_owned_subtree() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("claude_desktop_config.json");
    fs::write(&path, r#"{"mcpServers": {"old": {"command": "x"}}, "keep": true}"#).unwrap();

    DocumentMerger::claude_desktop().merge(&path, &Fragment::new()).unwrap();
    assert_eq!(read_json(&path), json!({"mcpServers": {}, "keep": true}));
}
