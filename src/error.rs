//! Error types shared by the manifest core and the command layer.
use thiserror::Error;

/// Failure to turn source text into a manifest document.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("top-level document is not a mapping")]
    NotAMapping,
    #[error("unsupported mapping key at {0}: only scalar keys can be formatted")]
    UnsupportedKey(String),
}

/// Failure of the optional summarization capability.
///
/// Callers downgrade these to an inline placeholder; they never abort a document.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("request to {url} failed: {detail}")]
    Request { url: String, detail: String },
    #[error("summary command failed: {0}")]
    Command(String),
    #[error("model returned an empty summary")]
    Empty,
    #[error("no summarization backend is available")]
    Unavailable,
}

/// Rejected invocation; raised before any file is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported CI/CD provider: '{0}'. Only 'github' is supported.")]
    UnsupportedProvider(String),
    #[error("No workflows or actions found. Use --workflow or --action with paths or '.'.")]
    NoInputs,
    #[error("No files found to lint. Use --workflow or --action with paths or '.'.")]
    NoLintTargets,
}
