//! Markdown documentation and lint/format for GitHub Actions manifests.
//!
//! The pipeline is parse ([`manifest`]) then validate ([`validate`]) and scan
//! ([`scan`]), then render ([`render`], [`document`]). [`format`] is the
//! independent lint pass. The command layer lives in [`github`].
pub mod cli;
pub mod discover;
pub mod document;
pub mod error;
pub mod format;
pub mod github;
pub mod lm;
pub mod manifest;
pub mod output;
pub mod pool;
pub mod render;
pub mod scan;
pub mod validate;
