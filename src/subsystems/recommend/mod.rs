//! AI recommendation collaborator.
//!
//! Given a free-text tour context, asks the configured LLM to pick the best
//! agent or supplier from the live records and returns its structured reply.
//! Models do not always honour the JSON contract, so [`parse_reply`]
//! degrades to wrapping the whole text as the recommendation.

pub mod prompt;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::llm::{LlmProvider, ProviderError};

use prompt::PromptBuilder;

const AGENT_TEMPLATE: &str = "You are an AI travel operations assistant for {{agency}}. \
Recommend the best travel agent or staff for a specific tour based on their ratings, \
experience, specialization, and tour history.\n\nAgent roster:\n{{roster}}";

const SUPPLIER_TEMPLATE: &str = "You are an AI travel operations assistant for {{agency}}. \
Recommend the best supplier (hotel or vehicle provider) for a tour based on availability, \
location, and capacity.\n\nAvailable suppliers:\n{{suppliers}}";

const RESPONSE_FORMAT: &str = "Respond with a JSON object with the fields \
\"recommendation\", \"reason\", \"confidence\" (high/medium/low), \
\"alternatives\" ([{\"name\", \"reason\"}]) and \"tips\".";

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendKind {
    Agent,
    Supplier,
}

impl RecommendKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "agent" => Some(Self::Agent),
            "supplier" => Some(Self::Supplier),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Supplier => "supplier",
        }
    }

    fn template(&self) -> (&'static str, &'static str) {
        match self {
            Self::Agent => ("agent_recommend.md", AGENT_TEMPLATE),
            Self::Supplier => ("supplier_recommend.md", SUPPLIER_TEMPLATE),
        }
    }

    /// Template variable the live records are substituted into.
    fn records_var(&self) -> &'static str {
        match self {
            Self::Agent => "roster",
            Self::Supplier => "suppliers",
        }
    }
}

/// Body of `POST /api/recommend`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub context: String,
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// Confidence level; anything the model invents reads as `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl From<String> for Confidence {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "lenient")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Confidence,
    #[serde(default, deserialize_with = "lenient_list")]
    pub alternatives: Vec<Alternative>,
    #[serde(default, deserialize_with = "lenient")]
    pub tips: String,
}

/// Null or mistyped field reads as its default instead of failing the reply.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like [`lenient`], but keeps the well-formed entries of a list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect())
}

impl Recommendation {
    /// Whole model output as the recommendation, auxiliary fields empty.
    pub fn free_text(text: &str) -> Self {
        Self {
            recommendation: text.to_string(),
            ..Self::default()
        }
    }
}

/// Extract the outermost `{ … }` span and parse it; fall back to free text.
pub fn parse_reply(text: &str) -> Recommendation {
    let span = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => return Recommendation::free_text(text),
    };
    match serde_json::from_str::<Recommendation>(span) {
        Ok(rec) => rec,
        Err(e) => {
            debug!(error = %e, "model reply is not valid JSON — using free text");
            Recommendation::free_text(text)
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid type. Use 'agent' or 'supplier'.")]
    InvalidKind,
    #[error("Please describe the tour to get a recommendation.")]
    EmptyContext,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

// ── Recommender ───────────────────────────────────────────────────────────────

/// Owns the LLM provider and prompt settings. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Recommender {
    provider: LlmProvider,
    prompts_dir: PathBuf,
    agency: String,
}

impl Recommender {
    pub fn new(provider: LlmProvider, config: &Config) -> Self {
        Self {
            provider,
            prompts_dir: config.recommend.prompts_dir.clone(),
            agency: config.agency.clone(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Render the system prompt for `kind` with `records` (numbered lines).
    pub fn system_prompt(&self, kind: RecommendKind, records: &str) -> String {
        let (file, fallback) = kind.template();
        PromptBuilder::new(&self.prompts_dir)
            .layer_or(file, fallback)
            .layer_or("response_format.md", RESPONSE_FORMAT)
            .var("agency", &*self.agency)
            .var(kind.records_var(), records)
            .var("subject", kind.as_str())
            .build()
    }

    /// One model round-trip. `records` is rendered by the caller from the
    /// live stores so no lock is held across the request.
    pub async fn recommend(
        &self,
        kind: RecommendKind,
        context: &str,
        records: &str,
    ) -> Result<Recommendation, RecommendError> {
        let context = context.trim();
        if context.is_empty() {
            return Err(RecommendError::EmptyContext);
        }

        let system = self.system_prompt(kind, records);
        info!(kind = kind.as_str(), provider = self.provider.name(), "requesting recommendation");

        let reply = self
            .provider
            .complete(context, Some(&system))
            .await
            .inspect_err(|e| warn!(kind = kind.as_str(), error = %e, "recommendation failed"))?;

        if let Some(usage) = reply.usage {
            debug!(input_tokens = usage.input_tokens, output_tokens = usage.output_tokens, "recommendation usage");
        }
        Ok(parse_reply(&reply.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;

    fn recommender(prompts_dir: &str) -> Recommender {
        let mut cfg = Config::test_default();
        cfg.agency = "Island Hops".into();
        cfg.recommend.prompts_dir = prompts_dir.into();
        Recommender::new(LlmProvider::Dummy(DummyProvider), &cfg)
    }

    #[test]
    fn kind_parse_is_exact() {
        assert_eq!(RecommendKind::parse("agent"), Some(RecommendKind::Agent));
        assert_eq!(RecommendKind::parse("supplier"), Some(RecommendKind::Supplier));
        assert_eq!(RecommendKind::parse("Agent"), None);
        assert_eq!(RecommendKind::parse("hotel"), None);
    }

    #[test]
    fn parse_reply_reads_fenced_json() {
        let text = "Sure!\n```json\n{\"recommendation\":\"Juan Dela Cruz\",\"reason\":\"Most tours\",\
\"confidence\":\"high\",\"alternatives\":[{\"name\":\"Maria Santos\",\"reason\":\"Experienced\"}],\
\"tips\":\"Book early\"}\n```";
        let rec = parse_reply(text);
        assert_eq!(rec.recommendation, "Juan Dela Cruz");
        assert_eq!(rec.confidence, Confidence::High);
        assert_eq!(rec.alternatives[0].name, "Maria Santos");
        assert_eq!(rec.tips, "Book early");
    }

    #[test]
    fn parse_reply_defaults_missing_fields() {
        let rec = parse_reply(r#"{"recommendation":"Paradise Hotel Boracay","confidence":"certain"}"#);
        assert_eq!(rec.recommendation, "Paradise Hotel Boracay");
        assert_eq!(rec.confidence, Confidence::Medium);
        assert!(rec.alternatives.is_empty());
        assert_eq!(rec.reason, "");
    }

    #[test]
    fn parse_reply_tolerates_null_and_mistyped_fields() {
        let rec = parse_reply(
            r#"{"recommendation":"Juan Dela Cruz","reason":"Most tours","confidence":"high","alternatives":null,"tips":null}"#,
        );
        assert_eq!(rec.recommendation, "Juan Dela Cruz");
        assert_eq!(rec.reason, "Most tours");
        assert_eq!(rec.confidence, Confidence::High);
        assert!(rec.alternatives.is_empty());
        assert_eq!(rec.tips, "");

        let rec = parse_reply(
            r#"{"recommendation":"Island Van Rentals","reason":42,"confidence":null,
"alternatives":[{"name":"Metro Bus Lines","reason":null},"Cebu Vans",{"name":7}],"tips":["Book early"]}"#,
        );
        assert_eq!(rec.recommendation, "Island Van Rentals");
        assert_eq!(rec.reason, "");
        assert_eq!(rec.confidence, Confidence::Medium);
        assert_eq!(
            rec.alternatives,
            vec![
                Alternative { name: "Metro Bus Lines".into(), reason: String::new() },
                Alternative::default(),
            ]
        );
        assert_eq!(rec.tips, "");
    }

    #[test]
    fn parse_reply_empty_text_is_an_empty_recommendation() {
        assert_eq!(parse_reply(""), Recommendation::default());
    }

    #[test]
    fn parse_reply_falls_back_to_free_text() {
        for text in ["Go with Juan.", "} backwards {", "{ not json }"] {
            let rec = parse_reply(text);
            assert_eq!(rec.recommendation, text);
            assert_eq!(rec.confidence, Confidence::Medium);
            assert!(rec.alternatives.is_empty());
            assert_eq!(rec.tips, "");
        }
    }

    #[test]
    fn system_prompt_embeds_agency_and_records() {
        let r = recommender(concat!(env!("CARGO_MANIFEST_DIR"), "/config/prompts"));
        let prompt = r.system_prompt(RecommendKind::Supplier, "1. Paradise Hotel Boracay - Hotel");
        assert!(prompt.contains("Island Hops"));
        assert!(prompt.contains("1. Paradise Hotel Boracay - Hotel"));
        assert!(prompt.contains("\"supplier name\""));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn system_prompt_uses_built_in_templates_without_files() {
        let r = recommender("/nonexistent/prompts");
        let prompt = r.system_prompt(RecommendKind::Agent, "1. Juan Dela Cruz");
        assert!(prompt.contains("Island Hops"));
        assert!(prompt.contains("1. Juan Dela Cruz"));
        assert!(prompt.contains("\"recommendation\""));
    }

    #[tokio::test]
    async fn blank_context_is_rejected_before_the_provider() {
        let r = recommender("/nonexistent/prompts");
        let err = r.recommend(RecommendKind::Agent, "  \n", "").await.unwrap_err();
        assert!(matches!(err, RecommendError::EmptyContext));
    }

    #[tokio::test]
    async fn echo_reply_degrades_to_free_text() {
        let r = recommender("/nonexistent/prompts");
        let rec = r.recommend(RecommendKind::Agent, "Beach tour in Boracay", "").await.unwrap();
        assert_eq!(rec.recommendation, "[echo] Beach tour in Boracay");
        assert_eq!(rec.confidence, Confidence::Medium);
    }
}
