//! Normalized manifest model for action and workflow files.
//!
//! Manifests are built once from a strictly-loaded YAML mapping and are
//! read-only afterwards. Every collection whose order shows up in rendered
//! output (inputs, steps, jobs, defaults) is an ordered list in source order.
mod loader;

pub use loader::StrictLoader;

use crate::error::ManifestError;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Which schema a manifest file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Action,
    Workflow,
}

impl ManifestKind {
    /// `action.yml` and `action.yaml` are actions; anything else is a workflow.
    pub fn for_path(path: &Path) -> Self {
        match path.file_name().and_then(|name| name.to_str()) {
            Some("action.yml" | "action.yaml") => Self::Action,
            _ => Self::Workflow,
        }
    }
}

/// Ordered key/value pairs, rendered in author order.
pub type Pairs = Vec<(String, String)>;

/// One parsed action or workflow file.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: ManifestBody,
    document: Mapping,
}

#[derive(Debug, Clone)]
pub enum ManifestBody {
    Action(ActionManifest),
    Workflow(WorkflowManifest),
}

#[derive(Debug, Clone)]
pub struct ActionManifest {
    pub author: Option<String>,
    pub branding: Pairs,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub runs: Option<Runs>,
    pub permissions: Pairs,
    pub env: Pairs,
    pub defaults: Vec<(String, DefaultsEntry)>,
}

#[derive(Debug, Clone)]
pub struct WorkflowManifest {
    pub triggers: Triggers,
    pub jobs: JobSet,
    pub env: Pairs,
    pub permissions: Pairs,
    pub dispatch_inputs: Vec<Input>,
    pub call_inputs: Vec<Input>,
    pub call_secrets: Vec<String>,
}

/// Input declared by an action or a `workflow_dispatch`/`workflow_call` trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub name: String,
    pub description: Option<String>,
    pub required: Required,
    pub default: Option<String>,
    pub deprecation_message: Option<String>,
}

/// The `required` flag as written; non-boolean spellings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Required {
    Flag(bool),
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub description: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultsEntry {
    Table(Pairs),
    Scalar(String),
}

/// Execution mechanism of an action, discriminated by `runs.using`.
#[derive(Debug, Clone, PartialEq)]
pub enum Runs {
    Composite {
        steps: Vec<Step>,
    },
    Node {
        using: String,
        main: Option<String>,
        pre: Option<String>,
        pre_if: Option<String>,
        post: Option<String>,
        post_if: Option<String>,
    },
    Docker {
        image: Option<String>,
        entrypoint: Option<String>,
        pre_entrypoint: Option<String>,
        post_entrypoint: Option<String>,
        args: Vec<String>,
    },
    Unrecognized {
        using: String,
    },
}

impl Runs {
    pub fn using(&self) -> &str {
        match self {
            Runs::Composite { .. } => "composite",
            Runs::Node { using, .. } | Runs::Unrecognized { using } => using.as_str(),
            Runs::Docker { .. } => "docker",
        }
    }
}

/// The polymorphic `on` field of a workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum Triggers {
    Absent,
    Single(String),
    List(Vec<String>),
    Events(Vec<String>),
    Unrecognized(String),
}

impl Triggers {
    /// Trigger names in source order; empty when absent or unrecognized.
    pub fn names(&self) -> Vec<String> {
        match self {
            Triggers::Single(name) => vec![name.clone()],
            Triggers::List(names) | Triggers::Events(names) => names.clone(),
            Triggers::Absent | Triggers::Unrecognized(_) => Vec::new(),
        }
    }
}

/// The `jobs` field of a workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSet {
    Absent,
    /// Present but not a non-empty mapping.
    Invalid,
    Jobs(Vec<Job>),
}

impl JobSet {
    pub fn jobs(&self) -> &[Job] {
        match self {
            JobSet::Jobs(jobs) => jobs,
            JobSet::Absent | JobSet::Invalid => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub name: Option<String>,
    pub runs_on: Option<String>,
    pub needs: Vec<String>,
    pub body: JobBody,
}

impl Job {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobBody {
    Reusable { uses: String, with: Option<String> },
    Steps(Vec<Step>),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub id: Option<String>,
    pub name: Option<String>,
    pub condition: Option<String>,
    pub shell: Option<String>,
    pub uses: Option<String>,
    pub run: Option<String>,
}

impl Step {
    /// Display label: name, then id, then `step-<index>` (1-based).
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| format!("step-{index}"))
    }
}

impl Manifest {
    /// Parse action manifest text.
    pub fn parse_action(text: &str) -> Result<Self, ManifestError> {
        let document = StrictLoader.load_mapping(text)?;
        Ok(Self::action(document))
    }

    /// Parse workflow manifest text.
    pub fn parse_workflow(text: &str) -> Result<Self, ManifestError> {
        let document = StrictLoader.load_mapping(text)?;
        Ok(Self::workflow(document))
    }

    pub fn parse(text: &str, kind: ManifestKind) -> Result<Self, ManifestError> {
        let document = StrictLoader.load_mapping(text)?;
        Ok(Self::new_of_kind(document, kind))
    }

    pub fn new_of_kind(document: Mapping, kind: ManifestKind) -> Self {
        match kind {
            ManifestKind::Action => Self::action(document),
            ManifestKind::Workflow => Self::workflow(document),
        }
    }

    pub fn action(document: Mapping) -> Self {
        let body = ActionManifest {
            author: text_field(&document, "author"),
            branding: pairs(document.get("branding")),
            inputs: inputs(document.get("inputs")),
            outputs: outputs(document.get("outputs")),
            runs: document.get("runs").and_then(runs),
            permissions: pairs(document.get("permissions")),
            env: pairs(document.get("env")),
            defaults: defaults(document.get("defaults")),
        };
        Self::new(document, ManifestBody::Action(body))
    }

    pub fn workflow(document: Mapping) -> Self {
        let on = document.get("on");
        let dispatch = on.and_then(|on| nested_mapping(on, "workflow_dispatch"));
        let call = on.and_then(|on| nested_mapping(on, "workflow_call"));
        let body = WorkflowManifest {
            triggers: triggers(on),
            jobs: job_set(document.get("jobs")),
            env: pairs(document.get("env")),
            permissions: pairs(document.get("permissions")),
            dispatch_inputs: inputs(dispatch.and_then(|m| m.get("inputs"))),
            call_inputs: inputs(call.and_then(|m| m.get("inputs"))),
            call_secrets: keys(call.and_then(|m| m.get("secrets"))),
        };
        Self::new(document, ManifestBody::Workflow(body))
    }

    fn new(document: Mapping, body: ManifestBody) -> Self {
        Self {
            name: text_field(&document, "name"),
            description: text_field(&document, "description"),
            body,
            document,
        }
    }

    pub fn kind(&self) -> ManifestKind {
        match self.body {
            ManifestBody::Action(_) => ManifestKind::Action,
            ManifestBody::Workflow(_) => ManifestKind::Workflow,
        }
    }

    /// The mapping this manifest was built from.
    pub fn document(&self) -> &Mapping {
        &self.document
    }
}

/// True when a document shows the structural marks of a workflow.
pub fn looks_like_workflow(document: &Mapping) -> bool {
    document.contains_key("on") || document.contains_key("jobs")
}

/// Render a scalar the way it reads in YAML; collections become inline JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Sequence(_) | Value::Mapping(_) => inline_text(value),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
    }
}

/// Compact single-line rendering of any value.
pub fn inline_text(value: &Value) -> String {
    match serde_json::to_string(value) {
        Ok(text) => text,
        Err(_) => serde_yaml::to_string(value)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Non-empty scalar text of `key`, if present.
fn text_field(mapping: &Mapping, key: &str) -> Option<String> {
    mapping.get(key).and_then(non_empty)
}

fn non_empty(value: &Value) -> Option<String> {
    let text = scalar_text(value);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn nested_mapping<'a>(value: &'a Value, key: &str) -> Option<&'a Mapping> {
    value.as_mapping()?.get(key)?.as_mapping()
}

fn pairs(value: Option<&Value>) -> Pairs {
    let Some(mapping) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .map(|(key, value)| (scalar_text(key), scalar_text(value)))
        .collect()
}

fn keys(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_mapping)
        .map(|mapping| mapping.keys().map(scalar_text).collect())
        .unwrap_or_default()
}

fn inputs(value: Option<&Value>) -> Vec<Input> {
    let Some(mapping) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .map(|(key, meta)| {
            let meta = meta.as_mapping();
            let field = |name: &str| meta.and_then(|m| text_field(m, name));
            let required = match meta.and_then(|m| m.get("required")) {
                None | Some(Value::Null) => Required::Flag(false),
                Some(Value::Bool(flag)) => Required::Flag(*flag),
                Some(other) => Required::Other(scalar_text(other)),
            };
            Input {
                name: scalar_text(key),
                description: field("description").map(|text| text.trim().to_string()),
                required,
                default: field("default"),
                deprecation_message: field("deprecationMessage"),
            }
        })
        .collect()
}

fn outputs(value: Option<&Value>) -> Vec<Output> {
    let Some(mapping) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .map(|(key, meta)| {
            let meta = meta.as_mapping();
            let field = |name: &str| meta.and_then(|m| text_field(m, name));
            Output {
                name: scalar_text(key),
                description: field("description").map(|text| text.trim().to_string()),
                value: field("value"),
            }
        })
        .collect()
}

fn defaults(value: Option<&Value>) -> Vec<(String, DefaultsEntry)> {
    let Some(mapping) = value.and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .map(|(key, value)| {
            let entry = match value {
                Value::Mapping(_) => DefaultsEntry::Table(pairs(Some(value))),
                other => DefaultsEntry::Scalar(scalar_text(other)),
            };
            (scalar_text(key), entry)
        })
        .collect()
}

fn runs(value: &Value) -> Option<Runs> {
    let mapping = value.as_mapping()?;
    if mapping.is_empty() {
        return None;
    }
    let field = |name: &str| text_field(mapping, name);
    let using = field("using").unwrap_or_default();
    let runs = if using == "composite" {
        Runs::Composite {
            steps: steps(mapping.get("steps")),
        }
    } else if using.starts_with("node") {
        Runs::Node {
            main: field("main"),
            pre: field("pre"),
            pre_if: field("pre-if"),
            post: field("post"),
            post_if: field("post-if"),
            using,
        }
    } else if using == "docker" {
        Runs::Docker {
            image: field("image"),
            entrypoint: field("entrypoint"),
            pre_entrypoint: field("pre-entrypoint"),
            post_entrypoint: field("post-entrypoint"),
            args: mapping
                .get("args")
                .and_then(Value::as_sequence)
                .map(|args| args.iter().map(scalar_text).collect())
                .unwrap_or_default(),
        }
    } else {
        Runs::Unrecognized { using }
    };
    Some(runs)
}

fn steps(value: Option<&Value>) -> Vec<Step> {
    let Some(sequence) = value.and_then(Value::as_sequence) else {
        return Vec::new();
    };
    sequence
        .iter()
        .map(|step| {
            let mapping = step.as_mapping();
            let field = |name: &str| mapping.and_then(|m| text_field(m, name));
            Step {
                id: field("id"),
                name: field("name"),
                condition: field("if"),
                shell: field("shell"),
                uses: field("uses"),
                run: field("run"),
            }
        })
        .collect()
}

fn triggers(value: Option<&Value>) -> Triggers {
    match value {
        None | Some(Value::Null) => Triggers::Absent,
        Some(Value::String(name)) => Triggers::Single(name.clone()),
        Some(Value::Sequence(items)) => Triggers::List(items.iter().map(scalar_text).collect()),
        Some(Value::Mapping(mapping)) => Triggers::Events(mapping.keys().map(scalar_text).collect()),
        Some(Value::Tagged(tagged)) => triggers(Some(&tagged.value)),
        Some(other) => Triggers::Unrecognized(scalar_text(other)),
    }
}

fn job_set(value: Option<&Value>) -> JobSet {
    let mapping = match value {
        None => return JobSet::Absent,
        Some(Value::Mapping(mapping)) if !mapping.is_empty() => mapping,
        Some(_) => return JobSet::Invalid,
    };
    JobSet::Jobs(mapping.iter().map(|(id, body)| job(scalar_text(id), body)).collect())
}

fn job(id: String, value: &Value) -> Job {
    let Some(mapping) = value.as_mapping() else {
        return Job {
            id,
            name: None,
            runs_on: None,
            needs: Vec::new(),
            body: JobBody::Missing,
        };
    };
    let needs = match mapping.get("needs") {
        Some(Value::Sequence(items)) => items.iter().filter_map(non_empty).collect(),
        Some(single) => non_empty(single).into_iter().collect(),
        None => Vec::new(),
    };
    let body = if let Some(uses) = mapping.get("uses") {
        JobBody::Reusable {
            uses: scalar_text(uses),
            with: mapping.get("with").and_then(non_empty),
        }
    } else if mapping.contains_key("steps") {
        JobBody::Steps(steps(mapping.get("steps")))
    } else {
        JobBody::Missing
    };
    Job {
        id,
        name: text_field(mapping, "name"),
        runs_on: text_field(mapping, "runs-on"),
        needs,
        body,
    }
}
