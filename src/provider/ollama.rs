//! Ollama provider client - local inference over HTTP
//!
//! Liveness is `GET /`, the model list comes from `GET /api/tags`, and
//! generation uses `POST /api/generate` with `stream: false`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EnhanceError;

use super::{ProviderClient, ProviderKind, ProviderTarget, PROBE_TIMEOUT, REQUEST_TIMEOUT};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

fn base(target: &ProviderTarget) -> &str {
    target.base_url.trim_end_matches('/')
}

pub struct OllamaClient {
    http: Client,
    request_timeout: Duration,
}

impl OllamaClient {
    pub fn new(http: Client) -> Self {
        Self::with_request_timeout(http, REQUEST_TIMEOUT)
    }

    /// Override the generation timeout, e.g. to fail fast in latency-sensitive callers.
    pub fn with_request_timeout(http: Client, request_timeout: Duration) -> Self {
        Self {
            http,
            request_timeout,
        }
    }
}

#[async_trait]
impl ProviderClient for OllamaClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn check_connection(&self, target: &ProviderTarget) -> bool {
        let url = format!("{}/", base(target));
        match self.http.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(resp) => {
                let status = resp.status();
                debug!("Ollama liveness probe: {}", status);
                !status.is_client_error() && !status.is_server_error()
            }
            Err(e) => {
                debug!("Ollama liveness probe failed: {}", e);
                false
            }
        }
    }

    async fn list_models(&self, target: &ProviderTarget) -> Result<Vec<String>, EnhanceError> {
        let url = format!("{}/api/tags", base(target));
        let resp = self
            .http
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(EnhanceError::from_transport)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EnhanceError::Custom(format!(
                "Ollama model listing failed: {} - {}",
                status, body
            )));
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| EnhanceError::InvalidResponse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn verify_api_key(&self, _target: &ProviderTarget) -> bool {
        // no key to verify for local inference
        true
    }

    async fn generate(
        &self,
        target: &ProviderTarget,
        system_message: &str,
        user_text: &str,
    ) -> Result<String, EnhanceError> {
        let url = format!("{}/api/generate", base(target));
        let payload = GenerateRequest {
            model: &target.model,
            prompt: user_text,
            system: system_message,
            stream: false,
        };

        info!("Calling Ollama at {} with model {}", url, target.model);

        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    EnhanceError::Network(format!(
                        "Cannot connect to Ollama at {}. Is the server running?",
                        base(target)
                    ))
                } else {
                    EnhanceError::from_transport(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EnhanceError::Custom(format!(
                "Ollama generation failed: {} - {}",
                status, body
            )));
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| EnhanceError::InvalidResponse(e.to_string()))?;
        Ok(body.response)
    }
}
