//! Dummy LLM provider — echoes input back prefixed with `[echo]`.
//! Used for running the service without a gateway or API key.

use crate::llm::{LlmResponse, ProviderError};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, content: &str, _system: Option<&str>) -> Result<LlmResponse, ProviderError> {
        Ok(LlmResponse {
            text: format!("[echo] {content}"),
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_prefixes_echo() {
        let p = DummyProvider;
        assert_eq!(p.complete("hello", None).await.unwrap().text, "[echo] hello");
    }

    #[tokio::test]
    async fn complete_ignores_system_prompt() {
        let p = DummyProvider;
        let resp = p.complete("beach tour", Some("You are an assistant")).await.unwrap();
        assert_eq!(resp.text, "[echo] beach tour");
        assert!(resp.usage.is_none());
    }
}
