//! Whole-document Markdown assembly for one manifest, plus the index page.
//!
//! Assembly is pure: summaries are produced by the caller and passed in, so
//! the same manifest and options always yield the same text.
use crate::manifest::{ActionManifest, Manifest, ManifestBody, WorkflowManifest};
use crate::render::{
    render_branding, render_defaults, render_env, render_findings, render_inputs, render_jobs,
    render_mermaid, render_names, render_outputs, render_permissions, render_runs,
    render_triggers, render_workflow_inputs,
};
use crate::scan::scan_document;
use crate::validate::validate;
use std::path::Path;

pub const FOOTER: &str = "_Generated by aman_";
pub const INDEX_FILE_NAME: &str = "INDEX.md";

/// Path-derived names used for titles and output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub display: String,
    pub file_name: String,
    pub stem: String,
    pub parent_name: String,
}

impl SourceInfo {
    pub fn from_path(path: &Path) -> Self {
        let os_text = |value: Option<&std::ffi::OsStr>| {
            value
                .map(|value| value.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Self {
            display: path.display().to_string(),
            file_name: os_text(path.file_name()),
            stem: os_text(path.file_stem()),
            parent_name: os_text(path.parent().and_then(Path::file_name)),
        }
    }

    pub fn output_file_name(&self) -> String {
        format!("{}.md", self.stem)
    }

    pub fn diagram_file_name(&self) -> String {
        format!("{}_diagram.md", self.stem)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentOptions<'a> {
    /// Summary text (or failure placeholder); `None` omits the section.
    pub summary: Option<&'a str>,
    /// Embed the job dependency diagram in workflow documents.
    pub diagram: bool,
}

/// Render the full Markdown document for one manifest.
pub fn render_document(
    manifest: &Manifest,
    source: &SourceInfo,
    options: &DocumentOptions<'_>,
) -> String {
    match &manifest.body {
        ManifestBody::Action(action) => render_action(manifest, action, source, options),
        ManifestBody::Workflow(workflow) => render_workflow(manifest, workflow, source, options),
    }
}

fn render_action(
    manifest: &Manifest,
    action: &ActionManifest,
    source: &SourceInfo,
    options: &DocumentOptions<'_>,
) -> String {
    let mut out = String::new();
    let title = manifest.name.as_deref().unwrap_or(&source.parent_name);
    append_title(&mut out, title, manifest.description.as_deref());
    out.push_str(&format!("**File:** `{}`  \n", source.display));
    if let Some(author) = action.author.as_deref() {
        out.push_str(&format!("**Author:** `{author}`  \n"));
    }
    append_summary(&mut out, options.summary);
    append_section(&mut out, "Branding", &render_branding(&action.branding));
    append_section(&mut out, "Inputs", &render_inputs(&action.inputs));
    append_section(&mut out, "Outputs", &render_outputs(&action.outputs));
    append_section(&mut out, "Runs", &render_runs(action.runs.as_ref()));
    append_section(&mut out, "Permissions", &render_permissions(&action.permissions));
    append_section(&mut out, "Env", &render_env(&action.env));
    append_section(&mut out, "Defaults", &render_defaults(&action.defaults));
    append_footer(&mut out);
    out
}

fn render_workflow(
    manifest: &Manifest,
    workflow: &WorkflowManifest,
    source: &SourceInfo,
    options: &DocumentOptions<'_>,
) -> String {
    let scanned = scan_document(manifest.document(), &workflow.call_secrets);
    let report = validate(manifest);

    let mut out = String::new();
    let title = manifest.name.as_deref().unwrap_or(&source.stem);
    append_title(&mut out, title, manifest.description.as_deref());
    out.push_str(&format!("**File:** `{}`\n", source.display));
    append_summary(&mut out, options.summary);
    append_section(&mut out, "Conditions to run", &render_triggers(&workflow.triggers));
    append_section(
        &mut out,
        "Inputs",
        &render_workflow_inputs(&workflow.dispatch_inputs, &workflow.call_inputs),
    );
    append_section(&mut out, "Permissions", &render_permissions(&workflow.permissions));
    append_section(&mut out, "Env", &render_env(&workflow.env));
    append_section(&mut out, "Jobs", &render_jobs(&workflow.jobs));
    append_section(&mut out, "Secrets used", &render_names(&scanned.secret_names));
    append_section(&mut out, "Variables used", &render_names(&scanned.var_names));
    append_section(&mut out, "Contexts used", &render_names(&scanned.context_roots));
    append_section(&mut out, "Validation", &render_findings(&report));
    if options.diagram {
        append_section(
            &mut out,
            "Workflow Diagram",
            &render_mermaid(workflow, &source.file_name),
        );
    }
    append_footer(&mut out);
    out
}

/// Standalone diagram document written next to a workflow document.
pub fn render_diagram_document(workflow: &WorkflowManifest, source: &SourceInfo) -> String {
    let mut diagram = render_mermaid(workflow, &source.file_name);
    diagram.push('\n');
    diagram
}

fn append_title(out: &mut String, title: &str, description: Option<&str>) {
    out.push_str(&format!("# {title}\n\n"));
    if let Some(description) = description {
        out.push_str(&format!("{}\n\n", description.trim_end()));
    }
}

fn append_summary(out: &mut String, summary: Option<&str>) {
    let Some(summary) = summary else {
        return;
    };
    out.push_str("\n### Purpose summary\n\n");
    for line in summary.lines() {
        if line.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str(&format!("> {line}\n"));
        }
    }
}

fn append_section(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("\n## {title}\n\n{body}\n"));
}

fn append_footer(out: &mut String) {
    out.push_str(&format!("\n---\n\n{FOOTER}\n"));
}

/// Prompt sent to the summarizer for one manifest.
pub fn summary_prompt(manifest: &Manifest, source: &SourceInfo) -> String {
    let list = |items: Vec<String>| format!("[{}]", items.join(", "));
    match &manifest.body {
        ManifestBody::Action(action) => {
            let name = manifest.name.as_deref().unwrap_or(&source.parent_name);
            let inputs = action.inputs.iter().map(|input| input.name.clone()).collect();
            let outputs = action.outputs.iter().map(|output| output.name.clone()).collect();
            format!(
                "You are documenting a GitHub Action.\nName: {name}\nDescription: {}\nInputs: {}\nOutputs: {}\n\nWrite a 2-3 sentence human-friendly summary of what this Action does.",
                manifest.description.as_deref().unwrap_or(""),
                list(inputs),
                list(outputs),
            )
        }
        ManifestBody::Workflow(workflow) => {
            let name = manifest.name.as_deref().unwrap_or(&source.stem);
            let jobs = workflow.jobs.jobs().iter().map(|job| job.id.clone()).collect();
            let inputs = workflow
                .dispatch_inputs
                .iter()
                .chain(&workflow.call_inputs)
                .map(|input| input.name.clone())
                .collect();
            format!(
                "You are documenting a GitHub Actions workflow.\nName: {name}\nTriggers: {}\nJobs: {}\nInputs: {}\n\nWrite a 2-3 sentence human-friendly summary of what this workflow does.",
                list(workflow.triggers.names()),
                list(jobs),
                list(inputs),
            )
        }
    }
}

/// Link list over generated documents, sorted by file name.
///
/// `INDEX.md` itself is never listed, in any letter case.
pub fn render_index<'a>(file_names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = file_names
        .into_iter()
        .filter(|name| !name.eq_ignore_ascii_case(INDEX_FILE_NAME))
        .collect();
    names.sort_unstable();
    names.dedup();
    let mut out = String::from("# CI/CD Documentation Index\n\n");
    for name in names {
        let stem = name.strip_suffix(".md").unwrap_or(name);
        out.push_str(&format!("- [{stem}]({name})\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(path: &str) -> SourceInfo {
        SourceInfo::from_path(Path::new(path))
    }

    #[test]
    fn source_info_splits_path() {
        let info = source("actions/setup/action.yml");
        assert_eq!(info.file_name, "action.yml");
        assert_eq!(info.stem, "action");
        assert_eq!(info.parent_name, "setup");
        assert_eq!(info.output_file_name(), "action.md");
        assert_eq!(source(".github/workflows/ci.yaml").diagram_file_name(), "ci_diagram.md");
    }

    #[test]
    fn action_document_end_to_end() {
        let manifest = Manifest::parse_action(
            "name: Build\ninputs:\n  token:\n    required: true\nruns:\n  using: node20\n  main: index.js\n",
        )
        .expect("parse");
        let doc = render_document(&manifest, &source("a/action.yml"), &DocumentOptions::default());
        assert!(doc.starts_with("# Build\n"));
        assert!(doc.contains("| `token` | **required:** `true` |"));
        assert!(doc.contains("**using:** `node20`"));
        assert!(doc.contains("- **main:** `index.js`"));
        assert!(doc.contains("## Branding\n\n_None_\n"));
        assert!(doc.contains("## Outputs\n\n_None_\n"));
        assert!(!doc.contains("Purpose summary"));
        assert!(doc.ends_with("\n---\n\n_Generated by aman_\n"));
    }

    #[test]
    fn action_document_layout() {
        let manifest = Manifest::parse_action(
            "description: Sets things up\nauthor: octo\nruns:\n  using: composite\n  steps: []\n",
        )
        .expect("parse");
        let options = DocumentOptions {
            summary: Some("Sets up the toolchain.\n\nCaches it."),
            diagram: false,
        };
        let doc = render_document(&manifest, &source("actions/setup/action.yml"), &options);
        assert_eq!(
            doc,
            "# setup\n\nSets things up\n\n**File:** `actions/setup/action.yml`  \n**Author:** `octo`  \n\n### Purpose summary\n\n> Sets up the toolchain.\n>\n> Caches it.\n\n## Branding\n\n_None_\n\n## Inputs\n\n_None_\n\n## Outputs\n\n_None_\n\n## Runs\n\n**using:** `composite`\n- _No steps defined_\n\n## Permissions\n\n_None_\n\n## Env\n\n_None_\n\n## Defaults\n\n_None_\n\n---\n\n_Generated by aman_\n"
        );
    }

    #[test]
    fn workflow_document_sections() {
        let manifest = Manifest::parse_workflow(
            "on:\n  workflow_call:\n    secrets:\n      DEPLOY_KEY: {}\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: echo ${{ secrets.TOKEN }} ${{ vars.REGION }}\n  deploy:\n    needs: build\n    uses: org/repo/.github/workflows/deploy.yml@v1\n",
        )
        .expect("parse");
        let options = DocumentOptions {
            summary: None,
            diagram: true,
        };
        let doc = render_document(&manifest, &source(".github/workflows/ci.yml"), &options);
        assert!(doc.starts_with("# ci\n\n**File:** `.github/workflows/ci.yml`\n"));
        assert!(doc.contains("## Conditions to run\n\n- `workflow_call`\n"));
        assert!(doc.contains("## Secrets used\n\n- `DEPLOY_KEY`\n- `TOKEN`\n"));
        assert!(doc.contains("## Variables used\n\n- `REGION`\n"));
        assert!(doc.contains("## Contexts used\n\n- `secrets`\n- `vars`\n"));
        assert!(doc.contains(
            "## Validation\n\n- **INFO:** job 'deploy' uses reusable workflow 'org/repo/.github/workflows/deploy.yml@v1'\n"
        ));
        assert!(doc.contains("## Workflow Diagram\n\n```mermaid\nflowchart TD\n"));
        assert!(doc.contains("    build --> deploy\n"));
        assert!(doc.contains("    %% Diagram generated for workflow: ci.yml\n"));
    }

    #[test]
    fn diagram_section_is_optional() {
        let manifest = Manifest::parse_workflow("on: push\njobs: {}\n").expect("parse");
        let doc = render_document(&manifest, &source("ci.yml"), &DocumentOptions::default());
        assert!(!doc.contains("Workflow Diagram"));
        assert!(doc.contains("- **WARN:** 'jobs' must be a non-empty mapping"));
    }

    #[test]
    fn prompts_list_names() {
        let manifest = Manifest::parse_workflow(
            "name: CI\non: [push, pull_request]\njobs:\n  lint: {}\n  test: {}\n",
        )
        .expect("parse");
        let prompt = summary_prompt(&manifest, &source("ci.yml"));
        assert!(prompt.contains("Name: CI\nTriggers: [push, pull_request]\nJobs: [lint, test]\nInputs: []"));

        let manifest =
            Manifest::parse_action("inputs:\n  a: {}\n  b: {}\noutputs:\n  out: {}\n").expect("parse");
        let prompt = summary_prompt(&manifest, &source("tools/lint/action.yml"));
        assert!(prompt.contains("Name: lint\nDescription: \nInputs: [a, b]\nOutputs: [out]"));
        assert!(prompt.ends_with("what this Action does."));
    }

    #[test]
    fn index_is_sorted_and_skips_itself() {
        let index = render_index(["release.md", "INDEX.md", "ci_diagram.md", "ci.md", "ci.md"]);
        assert_eq!(
            index,
            "# CI/CD Documentation Index\n\n- [ci](ci.md)\n- [ci_diagram](ci_diagram.md)\n- [release](release.md)\n"
        );
    }
}
