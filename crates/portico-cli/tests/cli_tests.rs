//! End-to-end tests for the `portico` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `portico` invocation isolated from the caller's config and environment.
fn portico(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("portico").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PORTICO_REMOTE")
        .env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Workspace with one exposed backend and one without stubs.
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "services/billing/invoices/go.mod",
        "module example.com/platform/services/billing/invoices\n\ngo 1.22\n",
    );
    write(
        root,
        "services/billing/invoices/proto/invoices.pb.gw.go",
        "package proto\n",
    );
    write(
        root,
        "services/auth/users/go.mod",
        "module example.com/platform/services/auth/users\n\ngo 1.22\n",
    );
    temp
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("discover"));
}

#[test]
fn version_matches_package() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn name_without_letters_is_rejected() {
    let temp = workspace();
    portico(temp.path())
        .args(["create", "123", "--remote", "example.com/platform", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid gateway name"));
}

#[test]
fn missing_remote_is_a_configuration_error() {
    let temp = workspace();
    portico(temp.path())
        .args(["create", "api", "--yes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--remote"));
}

#[test]
fn json_output_format_logs_json_lines() {
    let temp = workspace();
    portico(temp.path())
        .args(["--output-format", "json", "create", "api", "--yes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("\"level\":\"ERROR\""))
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn discover_prints_exposed_services_as_json() {
    let temp = workspace();
    portico(temp.path())
        .args(["discover", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"module\": \"example.com/platform/services/billing/invoices\"",
        ))
        .stdout(predicate::str::contains("auth").not());
}

#[test]
fn discover_table_has_header() {
    let temp = workspace();
    portico(temp.path())
        .args(["--output-format", "plain", "discover", "-C"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("NAMESPACE"))
        .stdout(predicate::str::contains("invoices"));
}

#[test]
fn discover_without_services_root_fails() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .arg("discover")
        .assert()
        .failure();
}

#[test]
fn dry_run_writes_nothing() {
    let temp = workspace();
    portico(temp.path())
        .args([
            "--output-format",
            "plain",
            "create",
            "api",
            "--namespace",
            "gw",
            "--remote",
            "example.com/platform",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains(
            "example.com/platform/services/billing/invoices => ../../../services/billing/invoices",
        ))
        .stdout(predicate::str::contains(".github/workflows/gw-api.yml"));

    assert!(!temp.path().join("services/gw").exists());
    assert!(!temp.path().join(".github").exists());
    assert!(!temp.path().join("go.work").exists());
}

#[test]
fn failing_toolchain_leaves_no_gateway() {
    let temp = workspace();
    write(
        temp.path(),
        "portico.toml",
        "[project]\nremote = \"example.com/platform\"\n\n\
         [toolchain]\ngo_binary = \"/nonexistent/bin/go\"\n",
    );

    portico(temp.path())
        .args(["--config", "portico.toml", "create", "api", "-n", "gw", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Gateway generation failed"));

    let gw = temp.path().join("services/gw");
    assert!(!gw.join("api").exists());
    if gw.exists() {
        let leftovers: Vec<_> = fs::read_dir(&gw).unwrap().collect();
        assert!(leftovers.is_empty(), "staging left behind: {leftovers:?}");
    }
}

#[test]
fn config_get_reads_layout_defaults() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .args(["config", "get", "layout.proto_dir"])
        .assert()
        .success()
        .stdout(predicate::str::diff("proto\n"));
}

#[test]
fn config_get_unknown_key_fails() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .args(["config", "get", "nope.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn local_config_is_picked_up() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), ".portico.toml", "[layout]\nproto_dir = \"api\"\n");
    portico(temp.path())
        .args(["config", "get", "layout.proto_dir"])
        .assert()
        .success()
        .stdout(predicate::str::diff("api\n"));
}

#[test]
fn init_local_writes_default_config() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let text = fs::read_to_string(temp.path().join(".portico.toml")).unwrap();
    assert!(text.contains("[generation]"));
    assert!(text.contains("stub_suffix = \".gw.go\""));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    portico(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("portico"));
}
