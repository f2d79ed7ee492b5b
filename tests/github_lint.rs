//! Lint mode: validate and rewrite manifests in place.

mod common;

use common::{Workspace, CI_WORKFLOW, NODE_ACTION};

#[test]
fn lint_formats_and_reports() {
    let ws = Workspace::new();
    ws.write(".github/workflows/ci.yml", CI_WORKFLOW);
    ws.write("actions/build/action.yml", NODE_ACTION);

    let result = ws.run(&[
        "github",
        "--lint-ci",
        "GitHub",
        "--workflow",
        ".github/workflows",
        "--action",
        "actions",
    ]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.starts_with("Linting 2 YAML file(s)...\n"));
    assert!(result.stdout.contains(
        "[INFO] .github/workflows/ci.yml: job 'build' step 'step-1' uses reusable action 'actions/checkout@v4'"
    ));
    assert!(result
        .stdout
        .contains("[OK] .github/workflows/ci.yml linted and formatted."));
    assert!(result
        .stdout
        .contains("[OK] actions/build/action.yml linted and formatted."));
    assert!(result.stdout.contains("Lint summary: 2 valid, 0 failed."));

    let workflow = ws.read(".github/workflows/ci.yml");
    assert!(workflow.starts_with("name: \"CI\"\non:\n  push:\n    branches:\n      - main\n"));
    assert!(workflow.contains("        description: 'Log level'\n        required: yes\n"));
    assert!(workflow.contains("        run: make ${{ matrix.target }}\n"));
    assert!(workflow.contains("    name: \"Unit \\\"tests\\\"\"\n"));
    assert!(workflow.contains("    uses: 'org/infra/.github/workflows/deploy.yml@v2'\n"));

    let action = ws.read("actions/build/action.yml");
    assert!(action.contains("    default: 'false'\n"));
    assert!(action.contains("description: 'Builds the project'\n"));
}

#[test]
fn lint_is_idempotent() {
    let ws = Workspace::new();
    ws.write("ci.yml", CI_WORKFLOW);

    let first = ws.run(&["github", "--lint-ci", "github", "--workflow", "ci.yml"]);
    assert!(first.success, "stderr: {}", first.stderr);
    let once = ws.read("ci.yml");
    let second = ws.run(&["github", "--lint-ci", "github", "--workflow", "ci.yml"]);
    assert!(second.success, "stderr: {}", second.stderr);
    assert_eq!(ws.read("ci.yml"), once);
}

#[test]
fn lint_counts_failures_and_skips_broken_files() {
    let ws = Workspace::new();
    ws.write("wf/ok.yml", "on: push\njobs:\n  a:\n    steps:\n      - run: echo hi\n");
    ws.write("wf/no-jobs.yml", "on: push\n");
    ws.write("wf/broken.yml", "jobs: [\n");

    let result = ws.run(&["github", "--lint-ci", "github", "--workflow", "wf"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("[ERROR] wf/broken.yml: invalid YAML:"));
    assert!(result
        .stdout
        .contains("[WARN] wf/no-jobs.yml: missing required key 'jobs'"));
    assert!(result.stdout.contains("Lint summary: 1 valid, 2 failed."));
    assert_eq!(ws.read("wf/broken.yml"), "jobs: [\n");
}
