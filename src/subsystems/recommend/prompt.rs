//! Layered system-prompt builder for the recommendation collaborator.
//!
//! Prompts are assembled from plain-text fragments under `config/prompts/`:
//!
//! ```text
//! 0. agent_recommend.md | supplier_recommend.md  — persona + live records
//! 1. response_format.md                           — JSON reply contract
//! ```
//!
//! Each layer may carry a built-in fallback so the service still answers
//! when the prompts directory is missing. Variable substitution uses
//! `{{key}}` syntax and is applied once at [`build()`](PromptBuilder::build)
//! time, after all layers are joined.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SEPARATOR: &str = "\n\n";

pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append `filename` from the prompts directory, or `fallback` when the
    /// file cannot be read.
    pub fn layer_or(self, filename: &str, fallback: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        match fs::read_to_string(&path) {
            Ok(text) => self.append(text),
            Err(_) => {
                tracing::debug!("prompt: layer '{}' not found — using built-in", path.display());
                self.append(fallback)
            }
        }
    }

    /// Directly append a text fragment. Blank fragments are dropped.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join all layers with blank lines and apply variable substitution.
    pub fn build(self) -> String {
        let mut prompt = self.parts.join(SEPARATOR);
        for (k, v) in &self.vars {
            let placeholder = format!("{{{{{k}}}}}");
            prompt = prompt.replace(&placeholder, v);
        }
        prompt
    }
}
