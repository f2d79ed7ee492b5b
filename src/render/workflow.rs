use super::action::input_details;
use super::runs::push_step_details;
use super::table::{code_list, to_table, NONE};
use crate::manifest::{Input, JobBody, JobSet, Pairs, Triggers};
use crate::validate::ValidationReport;
use std::collections::BTreeSet;

pub fn render_triggers(triggers: &Triggers) -> String {
    match triggers {
        Triggers::Unrecognized(raw) => format!("_Unrecognized `on` value: `{raw}`_"),
        other => {
            let names = other.names();
            code_list(names.iter().map(String::as_str))
        }
    }
}

/// `workflow_dispatch` inputs followed by `workflow_call` inputs.
pub fn render_workflow_inputs(dispatch: &[Input], call: &[Input]) -> String {
    let rows: Pairs = dispatch
        .iter()
        .chain(call)
        .map(|input| (input.name.clone(), input_details(input)))
        .collect();
    to_table(&rows, ("input", "details"))
}

pub fn render_jobs(jobs: &JobSet) -> String {
    let jobs = jobs.jobs();
    if jobs.is_empty() {
        return NONE.to_string();
    }
    let mut lines = Vec::new();
    for job in jobs {
        lines.push(format!("- **Job:** `{}`", job.display_name()));
        if let Some(runs_on) = job.runs_on.as_deref() {
            lines.push(format!("  - runs-on=`{runs_on}`"));
        }
        if !job.needs.is_empty() {
            let needs: Vec<String> = job.needs.iter().map(|id| format!("`{id}`")).collect();
            lines.push(format!("  - needs={}", needs.join(", ")));
        }
        match &job.body {
            JobBody::Reusable { uses, with } => {
                lines.push(format!("  - uses=`{uses}`"));
                if let Some(with) = with.as_deref() {
                    lines.push(format!("  - with: `{with}`"));
                }
            }
            JobBody::Steps(steps) if !steps.is_empty() => {
                for (idx, step) in steps.iter().enumerate() {
                    lines.push(format!("  - **Step:** {}", step.label(idx + 1)));
                    push_step_details(&mut lines, step, "    ");
                }
            }
            JobBody::Steps(_) | JobBody::Missing => lines.push("  - _No steps_".to_string()),
        }
    }
    lines.join("\n")
}

/// Sorted names as a bulleted list.
pub fn render_names(names: &BTreeSet<String>) -> String {
    code_list(names.iter().map(String::as_str))
}

pub fn render_findings(report: &ValidationReport) -> String {
    if report.findings.is_empty() {
        return "_No findings_".to_string();
    }
    report
        .findings
        .iter()
        .map(|finding| format!("- **{}:** {}", finding.level, finding.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, ManifestBody, WorkflowManifest};
    use crate::validate::validate_workflow;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> WorkflowManifest {
        match Manifest::parse_workflow(text).expect("parse").body {
            ManifestBody::Workflow(workflow) => workflow,
            ManifestBody::Action(_) => panic!("expected workflow"),
        }
    }

    #[test]
    fn trigger_shapes_render_the_same_set() {
        let single = render_triggers(&parse("on: push\n").triggers);
        assert_eq!(single, "- `push`");
        let list = render_triggers(&parse("on: [push, pull_request]\n").triggers);
        let events = render_triggers(&parse("on:\n  push: {}\n  pull_request: {}\n").triggers);
        assert_eq!(list, "- `push`\n- `pull_request`");
        assert_eq!(list, events);
        assert_eq!(render_triggers(&parse("name: x\n").triggers), NONE);
    }

    #[test]
    fn workflow_inputs_list_dispatch_then_call() {
        let wf = parse(
            "on:\n  workflow_call:\n    inputs:\n      target:\n        required: true\n  workflow_dispatch:\n    inputs:\n      level:\n        description: Log level\n        default: info\n",
        );
        assert_eq!(
            render_workflow_inputs(&wf.dispatch_inputs, &wf.call_inputs),
            "| input | details |\n|---|---|\n\
             | `level` | Log level<br/>**required:** `false`<br/>**default:** `info` |\n\
             | `target` | **required:** `true` |"
        );
    }

    #[test]
    fn jobs_render_steps_and_reusable_calls() {
        let wf = parse(
            "on: push\njobs:\n  build:\n    name: Build it\n    runs-on: ubuntu-latest\n    steps:\n      - uses: actions/checkout@v4\n      - name: Test\n        run: make test\n  deploy:\n    needs: [build]\n    uses: org/infra/.github/workflows/deploy.yml@main\n    with:\n      env: prod\n  idle:\n    steps: []\n",
        );
        assert_eq!(
            render_jobs(&wf.jobs),
            "- **Job:** `Build it`\n  - runs-on=`ubuntu-latest`\n  - **Step:** step-1\n    - uses=`actions/checkout@v4`\n    - version=`v4`\n  - **Step:** Test\n    - run:\n\n        ```bash\n        make test\n        ```\n\
             - **Job:** `deploy`\n  - needs=`build`\n  - uses=`org/infra/.github/workflows/deploy.yml@main`\n  - with: `{\"env\":\"prod\"}`\n\
             - **Job:** `idle`\n  - _No steps_"
        );
    }

    #[test]
    fn findings_render_level_and_message() {
        let wf = parse("jobs:\n  a:\n    name: A\n");
        let report = validate_workflow(&wf);
        assert_eq!(
            render_findings(&report),
            "- **WARN:** missing required key 'on'\n- **WARN:** job 'a' missing 'steps' or 'uses'"
        );
        let wf = parse("on: push\njobs:\n  a:\n    steps: []\n");
        assert_eq!(render_findings(&validate_workflow(&wf)), "_No findings_");
    }
}
