//! Inference providers - catalog, capability trait, and session
//!
//! Orchestration code only touches [`ProviderClient`] and the catalog, so
//! adding a backend means one new client file plus a catalog registration,
//! with no change to calling code.

pub mod ollama;
pub mod openai;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EnhanceError;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use session::ProviderSession;

/// Per-request timeout for generation calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shorter timeout for liveness probes so a dead local server fails fast.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Known inference-provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local inference server speaking the Ollama API
    #[default]
    Ollama,
    /// OpenAI-compatible cloud endpoint
    OpenAi,
}

impl ProviderKind {
    /// Stable string identifier, used in settings keys and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "Ollama (local)",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    /// List all known kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[ProviderKind::Ollama, ProviderKind::OpenAi]
    }

    /// Whether this kind runs against a local inference server. Local kinds
    /// get a connectivity probe and model refresh on selection.
    pub fn is_local(&self) -> bool {
        matches!(self, ProviderKind::Ollama)
    }

    /// Static descriptor for this kind.
    pub fn descriptor(&self) -> ProviderDescriptor {
        match self {
            ProviderKind::Ollama => ProviderDescriptor {
                kind: *self,
                base_url: "http://localhost:11434",
                default_model: "llama3.2",
                requires_api_key: false,
            },
            ProviderKind::OpenAi => ProviderDescriptor {
                kind: *self,
                base_url: "https://api.openai.com",
                default_model: "gpt-4o-mini",
                requires_api_key: true,
            },
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAi),
            _ => Err(format!(
                "Unknown provider: {}. Available: ollama, openai",
                s
            )),
        }
    }
}

/// Immutable description of a provider kind.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    /// Default endpoint; persisted user configuration may override it
    pub base_url: &'static str,
    pub default_model: &'static str,
    pub requires_api_key: bool,
}

/// Frozen copy of the dispatch target taken at request time.
///
/// A settings change concluding while a request is in flight must not
/// retarget it, so everything the client needs travels in this value.
#[derive(Debug, Clone)]
pub struct ProviderTarget {
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Capability interface implemented once per provider kind.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Probe the provider's liveness endpoint. Any non-error HTTP status
    /// counts as connected.
    async fn check_connection(&self, target: &ProviderTarget) -> bool;

    /// List the models the provider exposes. Kinds that do not enumerate
    /// models for selection return an empty list.
    async fn list_models(&self, target: &ProviderTarget) -> Result<Vec<String>, EnhanceError>;

    /// Verify an API key against the provider. Kinds without keys report
    /// true unconditionally.
    async fn verify_api_key(&self, target: &ProviderTarget) -> bool;

    /// Send a (system message, user text) pair and return the raw
    /// generated text.
    async fn generate(
        &self,
        target: &ProviderTarget,
        system_message: &str,
        user_text: &str,
    ) -> Result<String, EnhanceError>;
}

/// Registry of provider clients, one per kind.
pub struct ProviderCatalog {
    clients: HashMap<ProviderKind, Arc<dyn ProviderClient>>,
}

impl ProviderCatalog {
    /// Catalog with the built-in kinds registered, sharing one HTTP client.
    pub fn with_defaults(http: reqwest::Client) -> Self {
        let mut catalog = Self {
            clients: HashMap::new(),
        };
        catalog.register(Arc::new(OllamaClient::new(http.clone())));
        catalog.register(Arc::new(OpenAiClient::new(http)));
        catalog
    }

    /// Register (or replace) the client for its kind.
    pub fn register(&mut self, client: Arc<dyn ProviderClient>) {
        self.clients.insert(client.kind(), client);
    }

    pub fn client(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderClient>> {
        self.clients.get(&kind).cloned()
    }
}
