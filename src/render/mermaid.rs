use crate::manifest::WorkflowManifest;

/// Rendered instead of a diagram when the workflow has no jobs.
pub const NO_JOBS_MARKER: &str = "_No jobs found for diagram generation_";

/// Mermaid flowchart of job dependencies.
///
/// Nodes follow job declaration order; edges follow job order and then the
/// order of each job's `needs` entries.
pub fn render_mermaid(workflow: &WorkflowManifest, workflow_name: &str) -> String {
    let jobs = workflow.jobs.jobs();
    if jobs.is_empty() {
        return NO_JOBS_MARKER.to_string();
    }
    let mut lines = vec!["```mermaid".to_string(), "flowchart TD".to_string()];
    for job in jobs {
        let label = job.display_name().replace('"', "'");
        lines.push(format!("    {}[\"{label}\"]", job.id));
    }
    for job in jobs {
        for predecessor in &job.needs {
            lines.push(format!("    {predecessor} --> {}", job.id));
        }
    }
    lines.push(String::new());
    lines.push(format!("    %% Diagram generated for workflow: {workflow_name}"));
    lines.push("```".to_string());
    lines.join("\n")
}
