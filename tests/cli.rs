//! End-to-end tests for the `agentproto` binary.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run(root: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_agentproto"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run agentproto: {}", e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn open_items(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root.join(".agentprotocol/open"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_init_creates_tree_and_index() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let (stdout, stderr, success) = run(root, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("example work item"));

    let proto = root.join(".agentprotocol");
    assert!(proto.join("archive").is_dir());
    assert!(proto.join("TODO.md").is_file());

    let items = open_items(root);
    assert_eq!(items.len(), 1);
    assert!(items[0].ends_with("-example"));

    let readme = fs::read_to_string(proto.join("README.md")).unwrap();
    let row = format!(
        "| `open/{}/` | Example (plan:draft, build:doing) |",
        items[0]
    );
    assert!(readme.contains(&row), "README missing row:\n{}", readme);
}

#[test]
fn test_init_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    let (_, _, first) = run(root, &["init"]);
    assert!(first);
    let readme = fs::read_to_string(root.join(".agentprotocol/README.md")).unwrap();

    let (stdout, _, second) = run(root, &["init"]);
    assert!(second);
    assert!(stdout.contains("already exists"));
    assert_eq!(open_items(root).len(), 1);
    assert_eq!(
        fs::read_to_string(root.join(".agentprotocol/README.md")).unwrap(),
        readme
    );
}

#[test]
fn test_create_adds_item_and_reindexes() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);

    let (stdout, stderr, success) = run(root, &["create", "Fix", "the", "Login", "--plan"]);
    assert!(success, "create failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("-fix-the-login/"));

    let item = open_items(root)
        .into_iter()
        .find(|name| name.ends_with("-fix-the-login"))
        .unwrap();
    let dir = root.join(".agentprotocol/open").join(&item);
    assert!(dir.join("plan.md").is_file());
    let build = fs::read_to_string(dir.join("build.md")).unwrap();
    assert!(build.contains("plan_id: PLAN-"));

    let readme = fs::read_to_string(root.join(".agentprotocol/README.md")).unwrap();
    assert!(readme.contains(&format!(
        "| `open/{}/` | Fix the Login (plan:draft, build:doing) |",
        item
    )));
}

#[test]
fn test_create_with_slug_and_without_plan() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);

    let (_, _, success) = run(root, &["create", "Migrate auth", "--slug", "OIDC rollout"]);
    assert!(success);

    let item = open_items(root)
        .into_iter()
        .find(|name| name.ends_with("-oidc-rollout"))
        .unwrap();
    let dir = root.join(".agentprotocol/open").join(&item);
    assert!(!dir.join("plan.md").exists());
    let build = fs::read_to_string(dir.join("build.md")).unwrap();
    assert!(!build.contains("plan_id"));
}

#[test]
fn test_create_requires_init() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run(tmp.path(), &["create", "Orphan"]);
    assert!(!success);
    assert!(stderr.contains("agentproto init"));
}

#[test]
fn test_reindex_reports_missing_readme_but_succeeds() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join(".agentprotocol/open/01A-alpha")).unwrap();

    let (stdout, stderr, success) = run(root, &["reindex"]);
    assert!(success, "reindex should not fail: stderr={}", stderr);
    assert!(stderr.contains("[agent-protocol]"));
    assert!(stderr.contains("README.md not found"));
    assert!(stdout.contains("1 skipped"));
}

#[test]
fn test_reindex_json_reports() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);

    let (_, stderr, success) = run(root, &["--json", "reindex", "--next"]);
    assert!(success);
    let line = stderr
        .lines()
        .find(|l| l.contains("\"active_work\""))
        .expect("no active_work event");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["event"], "reindex");
    assert_eq!(event["status"], "unchanged");
    assert_eq!(event["rows"], 1);
}

#[test]
fn test_list_shows_items() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);

    let (stdout, _, success) = run(root, &["list"]);
    assert!(success);
    assert!(stdout.contains("PLAN"));
    assert!(stdout.contains("-example"));
    assert!(stdout.contains("Example"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);
    let missing = root.join("typo.toml");
    let missing = missing.to_str().unwrap();

    let (_, stderr, success) = run(root, &["--config", missing, "list"]);
    assert!(!success);
    assert!(stderr.contains("typo.toml"), "stderr={}", stderr);

    let readme = fs::read_to_string(root.join(".agentprotocol/README.md")).unwrap();
    let (stdout, stderr, success) = run(root, &["--config", missing, "reindex"]);
    assert!(success, "reindex must stay best-effort: stderr={}", stderr);
    assert!(stderr.contains("[agent-protocol] reindex skipped"));
    assert!(stderr.contains("typo.toml"));
    assert!(!stdout.contains("reindex finished"));
    assert_eq!(
        fs::read_to_string(root.join(".agentprotocol/README.md")).unwrap(),
        readme
    );
}

#[test]
fn test_invalid_config_reported_by_reindex() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);
    fs::write(
        root.join(".agentprotocol/protocol.toml"),
        "[headings]\ncontext = \"Context\"\n",
    )
    .unwrap();

    let (_, stderr, success) = run(root, &["reindex"]);
    assert!(success, "stderr={}", stderr);
    assert!(stderr.contains("[agent-protocol] reindex skipped"));
    assert!(stderr.contains("headings.context must be a Markdown heading"));

    let (_, _, success) = run(root, &["list"]);
    assert!(!success);
}

#[test]
fn test_quiet_still_reports_skips() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join(".agentprotocol/open/01A-alpha")).unwrap();

    let (stdout, stderr, success) = run(root, &["--quiet", "reindex"]);
    assert!(success);
    assert!(stderr.contains("README.md not found"), "stderr={}", stderr);
    assert!(stdout.contains("reindex finished: 1 items, 1 skipped"));
}

#[test]
fn test_quiet_hides_updates() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    run(root, &["init"]);

    let (_, stderr, success) = run(root, &["--quiet", "reindex"]);
    assert!(success);
    assert!(!stderr.contains("[agent-protocol]"), "stderr={}", stderr);
}
