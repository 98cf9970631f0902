//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` (or the path given with `-f`), then applies
//! `TRAVELOPS_BIND` and `TRAVELOPS_LOG_LEVEL` env overrides. The LLM API key
//! is read from `LLM_API_KEY` only.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Axum HTTP channel configuration.
#[derive(Debug, Clone)]
pub struct AxumConfig {
    /// Whether the HTTP channel is started.
    pub enabled: bool,
    /// Socket address to bind the HTTP channel to.
    pub bind: String,
}

/// Comms subsystem configuration.
#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub axum: AxumConfig,
}

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature. Unset means the gateway default.
    pub temperature: Option<f32>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"`, `"openai"`, `"openai-compatible"`).
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Recommendation prompt settings.
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Directory holding `agent_recommend.md`, `supplier_recommend.md` and
    /// `response_format.md`.
    pub prompts_dir: PathBuf,
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    /// Agency name substituted into recommendation prompts.
    pub agency: String,
    pub log_level: String,
    pub comms: CommsConfig,
    pub llm: LlmConfig,
    /// API key from `LLM_API_KEY` env var. `None` for keyless local gateways.
    pub llm_api_key: Option<String>,
    pub recommend: RecommendConfig,
    /// Path of the module documentation file.
    pub manual_path: PathBuf,
}

impl Config {
    pub fn comms_axum_should_load(&self) -> bool {
        self.comms.axum.enabled
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    service: RawService,
    #[serde(default)]
    comms: RawComms,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    recommend: RawRecommend,
    #[serde(default)]
    manual: RawManual,
}

#[derive(Deserialize)]
struct RawService {
    name: String,
    #[serde(default = "default_agency")]
    agency: String,
    log_level: String,
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    axum: RawAxum,
}

#[derive(Deserialize)]
struct RawAxum {
    /// Defaults to `true`: the HTTP channel is the only way in.
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_bind")]
    bind: String,
}

impl Default for RawAxum {
    fn default() -> Self {
        Self { enabled: true, bind: default_bind() }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: None,
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawRecommend {
    #[serde(default = "default_prompts_dir")]
    prompts_dir: String,
}

impl Default for RawRecommend {
    fn default() -> Self {
        Self { prompts_dir: default_prompts_dir() }
    }
}

#[derive(Deserialize)]
struct RawManual {
    #[serde(default = "default_manual_path")]
    path: String,
}

impl Default for RawManual {
    fn default() -> Self {
        Self { path: default_manual_path() }
    }
}

fn default_agency() -> String { "TravelOps".to_string() }
fn default_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_llm_provider() -> String { "dummy".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o-mini".to_string() }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_prompts_dir() -> String { "config/prompts".to_string() }
fn default_manual_path() -> String { "config/manual.toml".to_string() }

fn default_true() -> bool {
    true
}

/// Load config from `path` (default `config/default.toml`), then apply
/// env-var overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let bind_override = env::var("TRAVELOPS_BIND").ok();
    let log_level_override = env::var("TRAVELOPS_LOG_LEVEL").ok();
    let mut config = load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        bind_override.as_deref(),
        log_level_override.as_deref(),
    )?;
    config.llm_api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.trim().is_empty());
    Ok(config)
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let s = parsed.service;
    let log_level = log_level_override.unwrap_or(&s.log_level).to_string();
    let bind = bind_override.unwrap_or(&parsed.comms.axum.bind).to_string();

    Ok(Config {
        service_name: s.name,
        agency: s.agency,
        log_level,
        comms: CommsConfig {
            axum: AxumConfig { enabled: parsed.comms.axum.enabled, bind },
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: None,
        recommend: RecommendConfig { prompts_dir: PathBuf::from(parsed.recommend.prompts_dir) },
        manual_path: PathBuf::from(parsed.manual.path),
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

impl Config {
    /// Safe `Config` for tests — dummy LLM, no API keys, no external calls.
    pub fn test_default() -> Self {
        Self {
            service_name: "test".into(),
            agency: "TravelOps".into(),
            log_level: "info".into(),
            comms: CommsConfig {
                axum: AxumConfig { enabled: false, bind: "127.0.0.1:0".into() },
            },
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: None,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
            recommend: RecommendConfig { prompts_dir: PathBuf::from(default_prompts_dir()) },
            manual_path: PathBuf::from(default_manual_path()),
        }
    }
}
