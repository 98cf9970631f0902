//! User manual — module documentation served to the documentation page.
//!
//! The content lives in `config/manual.toml` so it can be edited without a
//! rebuild; it is parsed once at startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFlow {
    pub from: String,
    pub to: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDoc {
    pub id: String,
    pub title: String,
    pub path: String,
    pub description: String,
    #[serde(default, alias = "data_sources")]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, alias = "data_flow")]
    pub data_flow: Vec<DataFlow>,
    #[serde(default, alias = "ai_integration", skip_serializing_if = "Option::is_none")]
    pub ai_integration: Option<String>,
}

#[derive(Deserialize)]
struct RawManual {
    #[serde(default)]
    modules: Vec<ModuleDoc>,
}

#[derive(Debug, Clone, Default)]
pub struct Manual {
    modules: Vec<ModuleDoc>,
}

impl Manual {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Manual(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&raw).map_err(|e| AppError::Manual(format!("{}: {e}", path.display())))
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let parsed: RawManual = toml::from_str(raw).map_err(|e| format!("parse error: {e}"))?;
        for (i, m) in parsed.modules.iter().enumerate() {
            if parsed.modules[..i].iter().any(|o| o.id == m.id) {
                return Err(format!("duplicate module id '{}'", m.id));
            }
        }
        Ok(Self { modules: parsed.modules })
    }

    pub fn list(&self) -> &[ModuleDoc] {
        &self.modules
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDoc> {
        self.modules.iter().find(|m| m.id == id)
    }
}
