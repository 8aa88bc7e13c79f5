//! OpenAI-compatible provider client
//!
//! Generation goes through the chat completions endpoint; API keys are
//! verified with a cheap `GET /v1/models` before being stored.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EnhanceError;

use super::{ProviderClient, ProviderKind, ProviderTarget, PROBE_TIMEOUT, REQUEST_TIMEOUT};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

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
    content: Option<String>,
}

fn chat_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{}/v1/chat/completions", base)
}

fn models_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{}/v1/models", base)
}

pub struct OpenAiClient {
    http: Client,
}

impl OpenAiClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn check_connection(&self, target: &ProviderTarget) -> bool {
        // the models endpoint doubles as a liveness probe
        self.verify_api_key(target).await
    }

    async fn list_models(&self, _target: &ProviderTarget) -> Result<Vec<String>, EnhanceError> {
        // model choice is free-form for this kind; nothing to enumerate
        Ok(Vec::new())
    }

    async fn verify_api_key(&self, target: &ProviderTarget) -> bool {
        let key = match target.api_key.as_deref() {
            Some(k) if !k.is_empty() => k,
            _ => return false,
        };

        let url = models_url(&target.base_url);
        match self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", key))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => {
                debug!("OpenAI key verification: {}", resp.status());
                resp.status().is_success()
            }
            Err(e) => {
                debug!("OpenAI key verification failed: {}", e);
                false
            }
        }
    }

    async fn generate(
        &self,
        target: &ProviderTarget,
        system_message: &str,
        user_text: &str,
    ) -> Result<String, EnhanceError> {
        let key = target
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(EnhanceError::NotConfigured)?;

        let payload = ChatRequest {
            model: &target.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_message,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        let url = chat_url(&target.base_url);
        info!("Calling OpenAI-compatible API at {} with model {}", url, target.model);

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", key))
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(EnhanceError::from_transport)?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(EnhanceError::NotConfigured);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EnhanceError::Custom(format!(
                "OpenAI API failed: {} - {}",
                status, body
            )));
        }

        let body_text = resp
            .text()
            .await
            .map_err(EnhanceError::from_transport)?;
        let chat: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| EnhanceError::InvalidResponse(format!("{} - {}", e, body_text)))?;

        chat.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                EnhanceError::InvalidResponse("OpenAI API returned empty response".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url() {
        assert_eq!(
            chat_url("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_url("https://api.openai.com/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_models_url() {
        assert_eq!(
            models_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/models"
        );
    }
}
