//! Rejected invocations and the informational `--docs` mode.

mod common;

use common::Workspace;

#[test]
fn unsupported_provider_is_rejected() {
    let ws = Workspace::new();
    let result = ws.run(&["gitlab", "--workflow", "."]);
    assert!(!result.success);
    assert!(result
        .stderr
        .contains("Unsupported CI/CD provider: 'gitlab'. Only 'github' is supported."));
}

#[test]
fn lint_provider_must_be_github() {
    let ws = Workspace::new();
    ws.write("ci.yml", "on: push\n");
    let result = ws.run(&["github", "--lint-ci", "gitlab", "--workflow", "."]);
    assert!(!result.success);
    assert!(result.stderr.contains("Unsupported CI/CD provider: 'gitlab'"));
    assert_eq!(ws.read("ci.yml"), "on: push\n");
}

#[test]
fn no_inputs_is_a_configuration_error() {
    let ws = Workspace::new();
    let result = ws.run(&["github"]);
    assert!(!result.success);
    assert!(result.stderr.contains("No workflows or actions found."));
    assert!(!ws.exists("docs"));

    let result = ws.run(&["github", "--lint-ci", "github", "--workflow", "."]);
    assert!(!result.success);
    assert!(result.stderr.contains("No files found to lint."));
}

#[test]
fn docs_flag_prints_links() {
    let ws = Workspace::new();
    let result = ws.run(&["github", "--docs"]);
    assert!(result.success);
    assert!(result
        .stdout
        .contains("- Workflows: https://docs.github.com/en/actions/using-workflows"));
}

#[test]
fn missing_provider_prints_help() {
    let ws = Workspace::new();
    let result = ws.run(&[]);
    assert!(!result.success);
    assert!(result.stderr.contains("Usage: aman"));
}
