//! The `github` provider command: documentation mode and lint mode.
//!
//! Per-file work (read, parse, summarize, render or format) runs on the
//! worker pool. Report lines and file writes happen afterwards on the calling
//! thread, in input order, so output is the same for any worker count.
use crate::cli::GithubArgs;
use crate::discover::{expand_paths, find_action_files, find_workflow_files};
use crate::document::{
    render_diagram_document, render_document, render_index, summary_prompt, DocumentOptions,
    SourceInfo, INDEX_FILE_NAME,
};
use crate::error::ConfigError;
use crate::format::format_manifest;
use crate::lm::{resolve_summarizer, summarize_or_placeholder, Summarizer, DEFAULT_MODEL};
use crate::manifest::{looks_like_workflow, Manifest, ManifestBody, ManifestKind, StrictLoader};
use crate::output::{read_text, write_text};
use crate::pool::{default_workers, map_in_order};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const PROVIDER: &str = "github";

pub fn run(args: &GithubArgs) -> Result<()> {
    if args.docs {
        print_docs();
        return Ok(());
    }
    let workers = args.jobs.map(usize::from).unwrap_or_else(default_workers);
    if let Some(provider) = args.lint_ci.as_deref() {
        if !provider.eq_ignore_ascii_case(PROVIDER) {
            return Err(ConfigError::UnsupportedProvider(provider.to_string()).into());
        }
        return run_lint(args, workers);
    }
    run_docs(args, workers)
}

fn print_docs() {
    println!("GitHub Actions documentation:");
    println!("- Workflows: https://docs.github.com/en/actions/using-workflows");
    println!("- Actions:   https://docs.github.com/en/actions/creating-actions");
}

/// Expand paths and drop repeats, keeping first-seen order.
fn targets(args: &[PathBuf], find: fn(&Path) -> Result<Vec<PathBuf>>) -> Result<Vec<PathBuf>> {
    let mut seen = BTreeSet::new();
    let mut files = expand_paths(args, find)?;
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

struct DocContext<'a> {
    summarizer: Option<&'a dyn Summarizer>,
    model: &'a str,
    diagram: bool,
}

struct RenderedFile {
    file_name: String,
    text: String,
    label: &'static str,
}

enum DocOutcome {
    Rendered(Vec<RenderedFile>),
    Skipped(String),
    Failed(String),
}

fn run_docs(args: &GithubArgs, workers: usize) -> Result<()> {
    if let (Some(model), false) = (args.ai_model.as_deref(), args.ai_sum) {
        eprintln!(
            "Note: --ai-model '{model}' specified but --ai-sum not enabled. AI summaries disabled."
        );
    }

    let mut tasks: Vec<(PathBuf, ManifestKind)> = targets(&args.workflow, find_workflow_files)?
        .into_iter()
        .map(|path| (path, ManifestKind::Workflow))
        .collect();
    tasks.extend(
        targets(&args.action, find_action_files)?
            .into_iter()
            .map(|path| (path, ManifestKind::Action)),
    );
    if tasks.is_empty() {
        return Err(ConfigError::NoInputs.into());
    }

    let summarizer = args
        .ai_sum
        .then(|| resolve_summarizer(args.lm_command.as_deref()));
    let context = DocContext {
        summarizer: summarizer.as_deref(),
        model: args.ai_model.as_deref().unwrap_or(DEFAULT_MODEL),
        diagram: args.diagram,
    };
    tracing::debug!(files = tasks.len(), workers, "rendering documents");
    let outcomes = map_in_order(&tasks, workers, |task| {
        document_file(&context, &task.0, task.1)
    });

    let mut written: BTreeMap<String, PathBuf> = BTreeMap::new();
    for ((source_path, _), outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            DocOutcome::Rendered(files) => {
                for file in files {
                    if let Some(previous) = written.get(&file.file_name) {
                        eprintln!(
                            "[WARN] {}: overwrites {} from {}",
                            source_path.display(),
                            file.file_name,
                            previous.display()
                        );
                    }
                    match write_text(&args.out, &file.file_name, &file.text) {
                        Ok(path) => {
                            println!("Wrote {}: {}", file.label, path.display());
                            written.insert(file.file_name, source_path.clone());
                        }
                        Err(err) => eprintln!("[ERROR] {}: {err:#}", source_path.display()),
                    }
                }
            }
            DocOutcome::Skipped(line) | DocOutcome::Failed(line) => eprintln!("{line}"),
        }
    }

    if args.index {
        let index = render_index(written.keys().map(String::as_str));
        let path = write_text(&args.out, INDEX_FILE_NAME, &index)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn document_file(context: &DocContext<'_>, path: &Path, kind: ManifestKind) -> DocOutcome {
    let start = Instant::now();
    let text = match read_text(path) {
        Ok(text) => text,
        Err(err) => return DocOutcome::Failed(format!("[ERROR] {err:#}")),
    };
    let document = match StrictLoader.load_mapping(&text) {
        Ok(document) => document,
        Err(err) => {
            return DocOutcome::Failed(format!("[ERROR] Failed to parse {}: {err}", path.display()))
        }
    };
    if kind == ManifestKind::Workflow && !looks_like_workflow(&document) {
        tracing::warn!(path = %path.display(), "not a workflow");
        return DocOutcome::Skipped(format!(
            "[SKIP] {}: not a workflow (no 'on' or 'jobs')",
            path.display()
        ));
    }
    let manifest = Manifest::new_of_kind(document, kind);
    tracing::debug!(
        path = %path.display(),
        bytes = text.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "parsed manifest"
    );

    let source = SourceInfo::from_path(path);
    let summary = context.summarizer.map(|summarizer| {
        summarize_or_placeholder(summarizer, &summary_prompt(&manifest, &source), context.model)
    });
    let options = DocumentOptions {
        summary: summary.as_deref(),
        diagram: context.diagram,
    };
    let mut files = vec![RenderedFile {
        file_name: source.output_file_name(),
        text: render_document(&manifest, &source, &options),
        label: match kind {
            ManifestKind::Action => "action doc",
            ManifestKind::Workflow => "workflow doc",
        },
    }];
    if let (true, ManifestBody::Workflow(workflow)) = (context.diagram, &manifest.body) {
        files.push(RenderedFile {
            file_name: source.diagram_file_name(),
            text: render_diagram_document(workflow, &source),
            label: "diagram",
        });
    }
    DocOutcome::Rendered(files)
}

struct LintOutcome {
    lines: Vec<String>,
    valid: bool,
}

fn run_lint(args: &GithubArgs, workers: usize) -> Result<()> {
    let mut lint_targets = targets(&args.workflow, find_workflow_files)?;
    for path in targets(&args.action, find_action_files)? {
        if !lint_targets.contains(&path) {
            lint_targets.push(path);
        }
    }
    if lint_targets.is_empty() {
        return Err(ConfigError::NoLintTargets.into());
    }

    println!("Linting {} YAML file(s)...\n", lint_targets.len());
    let outcomes = map_in_order(&lint_targets, workers, |path| lint_file(path.as_path()));
    let (mut ok, mut failed) = (0usize, 0usize);
    for outcome in outcomes {
        for line in &outcome.lines {
            println!("{line}");
        }
        if outcome.valid {
            ok += 1;
        } else {
            failed += 1;
        }
    }
    println!("\nLint summary: {ok} valid, {failed} failed.");
    Ok(())
}

fn lint_file(path: &Path) -> LintOutcome {
    let display = path.display();
    let failed = |line: String| LintOutcome {
        lines: vec![line],
        valid: false,
    };
    let text = match read_text(path) {
        Ok(text) => text,
        Err(err) => return failed(format!("[ERROR] {display}: {err:#}")),
    };
    let outcome = match format_manifest(&text, ManifestKind::for_path(path)) {
        Ok(outcome) => outcome,
        Err(err) => return failed(format!("[ERROR] {display}: {err}")),
    };
    let mut lines: Vec<String> = outcome
        .report
        .findings
        .iter()
        .map(|finding| format!("[{}] {display}: {}", finding.level, finding.message))
        .collect();
    if outcome.text != text {
        if let Err(err) = fs::write(path, &outcome.text).with_context(|| format!("write {display}")) {
            lines.push(format!("[ERROR] {err:#}"));
            return LintOutcome { lines, valid: false };
        }
    }
    lines.push(format!("[OK] {display} linted and formatted."));
    LintOutcome {
        lines,
        valid: outcome.report.valid,
    }
}
