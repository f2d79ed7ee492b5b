//! Optional natural-language summaries from a local text-generation service.
//!
//! The capability is a single operation, [`Summarizer::summarize`]. Document
//! generation never depends on it: [`summarize_or_placeholder`] turns every
//! failure into an inline marker.
//!
//! Backends are resolved in priority order:
//! 1. `--lm-command` CLI flag
//! 2. `AMAN_LM_COMMAND` environment variable
//! 3. the HTTP chat endpoint at `OLLAMA_HOST` (default `http://localhost:11434`)

use crate::error::SummaryError;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;

pub const DEFAULT_MODEL: &str = "mistral";
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

pub trait Summarizer: Send + Sync {
    fn summarize(&self, prompt: &str, model: &str) -> Result<String, SummaryError>;
}

/// Chat endpoint of a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaSummarizer {
    pub host: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

impl OllamaSummarizer {
    pub fn from_env() -> Self {
        let host = env::var("OLLAMA_HOST")
            .ok()
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_OLLAMA_HOST.to_string());
        Self { host }
    }

    fn chat_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/api/chat")
        } else {
            format!("http://{host}/api/chat")
        }
    }
}

impl Summarizer for OllamaSummarizer {
    fn summarize(&self, prompt: &str, model: &str) -> Result<String, SummaryError> {
        let url = self.chat_url();
        let request = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };
        let start = Instant::now();
        let request_error = |detail: String| SummaryError::Request {
            url: url.clone(),
            detail,
        };
        let mut response = ureq::post(&url)
            .send_json(&request)
            .map_err(|err| request_error(err.to_string()))?;
        let reply: ChatResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| request_error(err.to_string()))?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            prompt_bytes = prompt.len(),
            response_bytes = reply.message.content.len(),
            model,
            "summary request complete"
        );
        non_empty_summary(&reply.message.content)
    }
}

/// Local command that reads the prompt on stdin and prints the summary.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    pub command: String,
}

impl Summarizer for CommandSummarizer {
    fn summarize(&self, prompt: &str, model: &str) -> Result<String, SummaryError> {
        let mut args = shell_words::split(&self.command)
            .map_err(|err| SummaryError::Command(format!("parse {:?}: {err}", self.command)))?;
        if args.is_empty() {
            return Err(SummaryError::Command("command is empty".to_string()));
        }
        for arg in &mut args {
            if arg == "{model}" {
                *arg = model.to_string();
            }
        }

        let start = Instant::now();
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| SummaryError::Command(format!("spawn {}: {err}", args[0])))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .map_err(|err| SummaryError::Command(format!("write prompt: {err}")))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|err| SummaryError::Command(format!("wait for command: {err}")))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            prompt_bytes = prompt.len(),
            response_bytes = output.stdout.len(),
            "summary command complete"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SummaryError::Command(format!(
                "status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        non_empty_summary(&String::from_utf8_lossy(&output.stdout))
    }
}

fn non_empty_summary(text: &str) -> Result<String, SummaryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SummaryError::Empty);
    }
    Ok(text.to_string())
}

/// Pick the summarizer backend for a run with summaries enabled.
pub fn resolve_summarizer(lm_command: Option<&str>) -> Box<dyn Summarizer> {
    let command = lm_command
        .map(str::to_string)
        .or_else(|| env::var("AMAN_LM_COMMAND").ok())
        .filter(|command| !command.trim().is_empty());
    match command {
        Some(command) => Box::new(CommandSummarizer { command }),
        None => Box::new(OllamaSummarizer::from_env()),
    }
}

/// Single attempt, no retry; failures become a visible placeholder.
pub fn summarize_or_placeholder(summarizer: &dyn Summarizer, prompt: &str, model: &str) -> String {
    match summarizer.summarize(prompt, model) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::warn!(error = %err, "summary unavailable");
            format!("_(summary unavailable: {err})_")
        }
    }
}
