//! Markdown fragments for each manifest section.
//!
//! Every renderer is a pure function of one model section. Two-column tables
//! share the conventions in [`table`]; absent or empty sections render as
//! [`NONE`].
mod action;
mod mermaid;
mod runs;
mod table;
mod workflow;

pub use action::{
    render_branding, render_defaults, render_env, render_inputs, render_outputs,
    render_permissions,
};
pub use mermaid::{render_mermaid, NO_JOBS_MARKER};
pub use runs::{render_runs, NO_STEPS_MARKER};
pub use table::NONE;
pub use workflow::{
    render_findings, render_jobs, render_names, render_triggers, render_workflow_inputs,
};
