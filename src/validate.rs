//! Advisory structural checks for workflow and action manifests.
//!
//! Every rule runs; findings are collected in rule order and only `Warn`
//! findings affect validity.
use crate::manifest::{
    ActionManifest, JobBody, JobSet, Manifest, ManifestBody, Runs, Triggers, WorkflowManifest,
};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => f.write_str("INFO"),
            Level::Warn => f.write_str("WARN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    fn from_findings(findings: Vec<Finding>) -> Self {
        let valid = findings.iter().all(|finding| finding.level != Level::Warn);
        Self { valid, findings }
    }

    pub fn count(&self, level: Level) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.level == level)
            .count()
    }
}

fn reusable_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\.github/workflows/|^[\w\-/]+@[\w.\-]+$").expect("reusable reference regex")
    })
}

/// `owner/repo@ref` shaped references and paths under a workflows directory.
pub fn is_reusable_reference(uses: &str) -> bool {
    reusable_re().is_match(uses)
}

pub fn validate(manifest: &Manifest) -> ValidationReport {
    match &manifest.body {
        ManifestBody::Workflow(workflow) => validate_workflow(workflow),
        ManifestBody::Action(action) => validate_action(action),
    }
}

pub fn validate_workflow(workflow: &WorkflowManifest) -> ValidationReport {
    let mut findings = Vec::new();
    if workflow.triggers == Triggers::Absent {
        findings.push(warn("missing required key 'on'".to_string()));
    }
    match &workflow.jobs {
        JobSet::Absent => findings.push(warn("missing required key 'jobs'".to_string())),
        JobSet::Invalid => findings.push(warn("'jobs' must be a non-empty mapping".to_string())),
        JobSet::Jobs(jobs) => {
            for job in jobs {
                match &job.body {
                    JobBody::Missing => {
                        findings.push(warn(format!("job '{}' missing 'steps' or 'uses'", job.id)));
                    }
                    JobBody::Reusable { uses, .. } => {
                        if is_reusable_reference(uses) {
                            findings.push(info(format!(
                                "job '{}' uses reusable workflow '{uses}'",
                                job.id
                            )));
                        }
                    }
                    JobBody::Steps(steps) => {
                        for (idx, step) in steps.iter().enumerate() {
                            let Some(uses) = step.uses.as_deref() else {
                                continue;
                            };
                            if is_reusable_reference(uses) {
                                findings.push(info(format!(
                                    "job '{}' step '{}' uses reusable action '{uses}'",
                                    job.id,
                                    step.label(idx + 1)
                                )));
                            }
                        }
                    }
                }
            }
        }
    }
    ValidationReport::from_findings(findings)
}

pub fn validate_action(action: &ActionManifest) -> ValidationReport {
    let mut findings = Vec::new();
    match &action.runs {
        None => findings.push(warn("missing required key 'runs'".to_string())),
        Some(Runs::Unrecognized { using }) if using.is_empty() => {
            findings.push(warn("'runs' is missing 'using'".to_string()));
        }
        Some(_) => {}
    }
    ValidationReport::from_findings(findings)
}

fn warn(message: String) -> Finding {
    Finding {
        level: Level::Warn,
        message,
    }
}

fn info(message: String) -> Finding {
    Finding {
        level: Level::Info,
        message,
    }
}
