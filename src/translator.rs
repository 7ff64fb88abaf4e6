//! Section title translation using OpenAI-compatible APIs.
//!
//! Titles are short, so requests are non-streaming single-shot completions
//! with retry and refusal detection. The [`TitleTranslator`] trait is the
//! seam that lets reconciliation run against a test double.

use crate::config::TranslationApiConfig;
use crate::error::TranslationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

/// Refusal phrases that indicate the model declined to translate.
static REFUSAL_PHRASES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "i'm sorry",
        "i cannot",
        "i am unable",
        "as an ai",
        "my apologies",
    ]
});

/// A message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Request body for the chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// Response from the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Translates a source-language section title into English.
#[async_trait]
pub trait TitleTranslator: Send + Sync {
    /// Translates `title`, optionally with surrounding context (for example
    /// the parent header), returning the English title.
    async fn translate_title(
        &self,
        title: &str,
        context: &str,
    ) -> Result<String, TranslationError>;
}

/// HTTP-backed [`TitleTranslator`].
pub struct Translator {
    client: Client,
    config: TranslationApiConfig,
    prompt: String,
}

impl Translator {
    /// Creates a new Translator with the given API config and system prompt.
    pub fn new(config: TranslationApiConfig, prompt: String) -> Self {
        Self {
            client: Client::new(),
            config,
            prompt,
        }
    }

    /// Builds the user message for a title, appending context when present.
    fn user_message(title: &str, context: &str) -> String {
        if context.is_empty() {
            title.to_string()
        } else {
            format!("{}\n\nContext: {}", title, context)
        }
    }

    /// Validates a raw model response: trims it, rejects empty output and
    /// refusals, and strips a matched pair of surrounding quotes.
    fn clean_response(raw: &str) -> Result<String, TranslationError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(TranslationError::Refused("Empty response".to_string()));
        }

        let lower = trimmed.to_lowercase();
        for phrase in REFUSAL_PHRASES.iter() {
            if lower.starts_with(phrase) {
                return Err(TranslationError::Refused(format!(
                    "Response starts with refusal phrase: {}",
                    phrase
                )));
            }
        }

        // Models occasionally quote short answers.
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed);

        Ok(unquoted.to_string())
    }

    /// Makes a single chat completion request.
    async fn request_translation(
        &self,
        title: &str,
        context: &str,
    ) -> Result<String, TranslationError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: Self::user_message(title, context),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::ParseError(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| TranslationError::ParseError("No choices in response".to_string()))?;

        Self::clean_response(content)
    }
}

#[async_trait]
impl TitleTranslator for Translator {
    async fn translate_title(
        &self,
        title: &str,
        context: &str,
    ) -> Result<String, TranslationError> {
        let retries = self.config.retries.max(1);

        for attempt in 1..=retries {
            match self.request_translation(title, context).await {
                Ok(translated) => return Ok(translated),
                Err(e) if attempt == retries => return Err(e),
                Err(_) => {
                    // Exponential backoff before the next attempt
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
            }
        }

        Err(TranslationError::RetriesExhausted { attempts: retries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_without_context() {
        assert_eq!(Translator::user_message("Основы", ""), "Основы");
    }

    #[test]
    fn test_user_message_with_context() {
        let msg = Translator::user_message("Обзор", "Глава: Основы");
        assert!(msg.starts_with("Обзор"));
        assert!(msg.contains("Context: Глава: Основы"));
    }

    #[test]
    fn test_clean_response_trims() {
        assert_eq!(Translator::clean_response("  Basics \n").unwrap(), "Basics");
    }

    #[test]
    fn test_clean_response_strips_quotes() {
        assert_eq!(Translator::clean_response("\"Basics\"").unwrap(), "Basics");
        // Unmatched quote stays as-is.
        assert_eq!(Translator::clean_response("\"Basics").unwrap(), "\"Basics");
    }

    #[test]
    fn test_clean_response_rejects_empty() {
        assert!(Translator::clean_response("   ").is_err());
    }

    #[test]
    fn test_clean_response_rejects_refusal() {
        assert!(Translator::clean_response("I'm sorry, but I can't translate that.").is_err());
        assert!(Translator::clean_response("As an AI, I must decline").is_err());
        assert!(Translator::clean_response("Introduction").is_ok());
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Basics"},"index":0}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Basics");
    }
}
