use super::table::{to_table, NONE};
use crate::manifest::{DefaultsEntry, Input, Output, Pairs, Required};

pub fn render_branding(branding: &Pairs) -> String {
    to_table(branding, ("key", "value"))
}

pub fn render_env(env: &Pairs) -> String {
    to_table(env, ("env var", "value"))
}

pub fn render_permissions(permissions: &Pairs) -> String {
    let rows: Pairs = permissions
        .iter()
        .map(|(scope, access)| (scope.clone(), access.to_lowercase()))
        .collect();
    to_table(&rows, ("permission", "access"))
}

/// Nested mappings become titled sub-tables; scalars become single bullets.
pub fn render_defaults(defaults: &[(String, DefaultsEntry)]) -> String {
    if defaults.is_empty() {
        return NONE.to_string();
    }
    let blocks: Vec<String> = defaults
        .iter()
        .map(|(key, entry)| match entry {
            DefaultsEntry::Table(rows) => {
                format!("**{key}**\n\n{}", to_table(rows, ("key", "value")))
            }
            DefaultsEntry::Scalar(value) => format!("- **{key}:** `{value}`"),
        })
        .collect();
    blocks.join("\n\n")
}

pub fn render_inputs(inputs: &[Input]) -> String {
    let rows: Pairs = inputs
        .iter()
        .map(|input| (input.name.clone(), input_details(input)))
        .collect();
    to_table(&rows, ("input", "details"))
}

pub fn render_outputs(outputs: &[Output]) -> String {
    let rows: Pairs = outputs
        .iter()
        .map(|output| {
            let mut bits = Vec::new();
            if let Some(description) = output.description.as_deref() {
                bits.push(description.to_string());
            }
            if let Some(value) = output.value.as_deref() {
                bits.push(format!("**value:** `{value}`"));
            }
            (output.name.clone(), bits.join("<br/>"))
        })
        .collect();
    to_table(&rows, ("output", "details"))
}

pub(crate) fn input_details(input: &Input) -> String {
    let mut bits = Vec::new();
    if let Some(description) = input.description.as_deref() {
        bits.push(description.to_string());
    }
    bits.push(format!("**required:** `{}`", required_text(&input.required)));
    if let Some(default) = input.default.as_deref() {
        bits.push(format!("**default:** `{default}`"));
    }
    if let Some(message) = input.deprecation_message.as_deref() {
        bits.push(format!("**deprecated:** {message}"));
    }
    bits.join("<br/>")
}

fn required_text(required: &Required) -> String {
    match required {
        Required::Flag(flag) => flag.to_string(),
        Required::Other(text) => text.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, ManifestBody};
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> crate::manifest::ActionManifest {
        match Manifest::parse_action(text).expect("parse").body {
            ManifestBody::Action(action) => action,
            ManifestBody::Workflow(_) => panic!("expected action"),
        }
    }

    #[test]
    fn empty_sections_render_none() {
        let action = parse("name: bare\ninputs: {}\noutputs:\nenv: {}\n");
        assert_eq!(render_inputs(&action.inputs), NONE);
        assert_eq!(render_outputs(&action.outputs), NONE);
        assert_eq!(render_permissions(&action.permissions), NONE);
        assert_eq!(render_env(&action.env), NONE);
        assert_eq!(render_branding(&action.branding), NONE);
        assert_eq!(render_defaults(&action.defaults), NONE);
    }

    #[test]
    fn inputs_render_every_detail_in_order() {
        let action = parse(
            "inputs:\n  token:\n    description: |\n      GitHub token\n    required: true\n  level:\n    required: Yes\n    default: info\n    deprecationMessage: use verbosity\n",
        );
        assert_eq!(
            render_inputs(&action.inputs),
            "| input | details |\n|---|---|\n\
             | `token` | GitHub token<br/>**required:** `true` |\n\
             | `level` | **required:** `yes`<br/>**default:** `info`<br/>**deprecated:** use verbosity |"
        );
    }

    #[test]
    fn outputs_skip_missing_parts() {
        let action = parse(
            "outputs:\n  digest:\n    description: Image digest\n    value: ${{ steps.push.outputs.digest }}\n  bare: {}\n",
        );
        assert_eq!(
            render_outputs(&action.outputs),
            "| output | details |\n|---|---|\n\
             | `digest` | Image digest<br/>**value:** `${{ steps.push.outputs.digest }}` |\n\
             | `bare` |  |"
        );
    }

    #[test]
    fn permissions_are_lowercased() {
        let action = parse("permissions:\n  contents: READ\n  id-token: Write\n");
        assert_eq!(
            render_permissions(&action.permissions),
            "| permission | access |\n|---|---|\n| `contents` | read |\n| `id-token` | write |"
        );
    }

    #[test]
    fn defaults_mix_tables_and_bullets() {
        let action = parse("defaults:\n  run:\n    shell: bash\n    working-directory: app\n  retries: 3\n");
        assert_eq!(
            render_defaults(&action.defaults),
            "**run**\n\n| key | value |\n|---|---|\n| `shell` | bash |\n| `working-directory` | app |\n\n- **retries:** `3`"
        );
    }
}
