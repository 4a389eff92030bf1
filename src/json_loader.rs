//! JSON batch loader
//!
//! Reads email, task, and signal batches handed over by the sync and
//! persistence layers. Each file may hold a bare array or the wrapped form
//! the sync layer writes (`{"emails": [...]}`, `{"tasks": [...]}`).
//! Signal files may also hold a single object.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::DetectionError;
use crate::types::{CompletionSignal, Email, Task};

#[derive(Debug, serde::Deserialize)]
struct EmailsEnvelope {
    emails: Vec<Email>,
}

#[derive(Debug, serde::Deserialize)]
struct TasksEnvelope {
    tasks: Vec<Task>,
}

fn read_input(path: &Path) -> Result<String, DetectionError> {
    fs::read_to_string(path).map_err(|e| DetectionError::InputRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse straight from the text so serde_json keeps its line/column in errors.
fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, DetectionError> {
    serde_json::from_str(content).map_err(|e| DetectionError::InputParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn is_bare_array(content: &str) -> bool {
    content.trim_start().starts_with('[')
}

/// Load an email batch
pub fn load_emails_json(path: &Path) -> Result<Vec<Email>, DetectionError> {
    let content = read_input(path)?;
    let emails = if is_bare_array(&content) {
        parse_json::<Vec<Email>>(path, &content)?
    } else {
        parse_json::<EmailsEnvelope>(path, &content)?.emails
    };
    log::debug!("load_emails_json: {} emails from {}", emails.len(), path.display());
    Ok(emails)
}

/// Load a task batch
pub fn load_tasks_json(path: &Path) -> Result<Vec<Task>, DetectionError> {
    let content = read_input(path)?;
    let tasks = if is_bare_array(&content) {
        parse_json::<Vec<Task>>(path, &content)?
    } else {
        parse_json::<TasksEnvelope>(path, &content)?.tasks
    };
    log::debug!("load_tasks_json: {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// Load one or more completion signals
pub fn load_signals_json(path: &Path) -> Result<Vec<CompletionSignal>, DetectionError> {
    let content = read_input(path)?;
    if is_bare_array(&content) {
        parse_json(path, &content)
    } else {
        Ok(vec![parse_json::<CompletionSignal>(path, &content)?])
    }
}
