//! Shared test infrastructure for integration tests.
//!
//! Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Scratch repository that `aman` runs inside.
pub struct Workspace {
    dir: TempDir,
}

/// Captured result of one `aman` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, text).expect("write fixture");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        let path = self.dir.path().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }

    /// Run `aman` with the workspace as working directory and no ambient
    /// summarizer configuration.
    pub fn run(&self, args: &[&str]) -> RunResult {
        Command::new(env!("CARGO_BIN_EXE_aman"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("AMAN_LM_COMMAND")
            .env_remove("AMAN_LOG")
            .env("OLLAMA_HOST", "http://127.0.0.1:9")
            .output()
            .expect("run aman")
            .into()
    }
}

pub const CI_WORKFLOW: &str = r#"name: CI
on:
  push:
    branches: [main]
  workflow_dispatch:
    inputs:
      level:
        description: Log level
        required: yes
        default: info
jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Compile
        run: make ${{matrix.target}}
        env:
          TOKEN: ${{ secrets.NPM_TOKEN }}
  test:
    name: Unit "tests"
    needs: build
    runs-on: ubuntu-latest
    steps:
      - run: make test
  deploy:
    needs: [test]
    uses: org/infra/.github/workflows/deploy.yml@v2
    with:
      region: ${{ vars.REGION }}
"#;

pub const NODE_ACTION: &str = r#"name: Build
description: Builds the project
author: octo
inputs:
  token:
    description: API token
    required: true
  verbose:
    required: false
    default: "false"
outputs:
  artifact:
    description: Built artifact
    value: ${{ steps.build.outputs.path }}
runs:
  using: node20
  main: dist/index.js
  post: dist/cleanup.js
branding:
  icon: package
  color: blue
"#;
