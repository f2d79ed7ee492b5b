use super::table::NONE;
use crate::manifest::{Runs, Step};

/// Marker shown when a composite action declares no steps.
pub const NO_STEPS_MARKER: &str = "- _No steps defined_";

pub fn render_runs(runs: Option<&Runs>) -> String {
    let Some(runs) = runs else {
        return NONE.to_string();
    };
    let mut lines = vec![format!("**using:** `{}`", runs.using())];
    match runs {
        Runs::Composite { steps } => {
            if steps.is_empty() {
                lines.push(NO_STEPS_MARKER.to_string());
            } else {
                lines.push("### Steps".to_string());
                for (idx, step) in steps.iter().enumerate() {
                    lines.push(format!("- **{}**", step.label(idx + 1)));
                    push_step_details(&mut lines, step, "  ");
                }
            }
        }
        Runs::Node {
            main,
            pre,
            pre_if,
            post,
            post_if,
            ..
        } => {
            lines.push(format!("- **main:** `{}`", main.as_deref().unwrap_or_default()));
            push_optional(&mut lines, "pre", pre.as_deref());
            push_optional(&mut lines, "pre-if", pre_if.as_deref());
            push_optional(&mut lines, "post", post.as_deref());
            push_optional(&mut lines, "post-if", post_if.as_deref());
        }
        Runs::Docker {
            image,
            entrypoint,
            pre_entrypoint,
            post_entrypoint,
            args,
        } => {
            lines.push(format!("- **image:** `{}`", image.as_deref().unwrap_or_default()));
            push_optional(&mut lines, "entrypoint", entrypoint.as_deref());
            push_optional(&mut lines, "pre-entrypoint", pre_entrypoint.as_deref());
            push_optional(&mut lines, "post-entrypoint", post_entrypoint.as_deref());
            if !args.is_empty() {
                let args: Vec<String> = args.iter().map(|arg| format!("`{arg}`")).collect();
                lines.push(format!("- **args:** {}", args.join(" ")));
            }
        }
        Runs::Unrecognized { .. } => lines.push("_Unrecognized `using` type_".to_string()),
    }
    lines.join("\n")
}

fn push_optional(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        lines.push(format!("- **{label}:** `{value}`"));
    }
}

/// Detail bullets for one step, nested under a bullet at `indent`.
pub(crate) fn push_step_details(lines: &mut Vec<String>, step: &Step, indent: &str) {
    if let Some(id) = step.id.as_deref() {
        lines.push(format!("{indent}- id=`{id}`"));
    }
    if let Some(condition) = step.condition.as_deref() {
        lines.push(format!("{indent}- if=`{condition}`"));
    }
    if let Some(shell) = step.shell.as_deref() {
        lines.push(format!("{indent}- shell=`{shell}`"));
    }
    if let Some(uses) = step.uses.as_deref() {
        lines.push(format!("{indent}- uses=`{uses}`"));
        if let Some((_, version)) = uses.split_once('@') {
            lines.push(format!("{indent}- version=`{version}`"));
        }
    }
    if let Some(run) = step.run.as_deref() {
        let code_indent = format!("{indent}    ");
        let language = fence_language(step.shell.as_deref());
        let mut block = format!("{indent}- run:\n\n{code_indent}```{language}\n");
        for line in run.trim().lines() {
            block.push_str(&code_indent);
            block.push_str(line);
            block.push('\n');
        }
        block.push_str(&code_indent);
        block.push_str("```");
        lines.push(block);
    }
}

fn fence_language(shell: Option<&str>) -> &'static str {
    match shell {
        Some(shell) if shell.starts_with("pwsh") || shell.starts_with("powershell") => {
            "powershell"
        }
        Some(shell) if shell.starts_with("python") => "python",
        Some(shell) if shell.starts_with("cmd") => "bat",
        _ => "bash",
    }
}
