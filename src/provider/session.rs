//! Provider session - selected provider, model map, key validity,
//! connectivity cache
//!
//! All state lives behind one mutex and is mutated only through methods
//! here. Dispatch reads take a frozen [`ProviderTarget`] snapshot so a
//! settings change concluding mid-request cannot retarget it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::{keys, SettingsStore};
use crate::error::EnhanceError;
use crate::events::{Event, EventBus};

use super::{ProviderCatalog, ProviderKind, ProviderTarget};

#[derive(Debug, Default)]
struct SessionState {
    selected: ProviderKind,
    api_key: Option<String>,
    api_key_valid: bool,
    model_by_provider: HashMap<ProviderKind, String>,
    connected: bool,
    available_models: Vec<String>,
}

/// Owner of the currently selected provider and everything needed to talk
/// to it.
pub struct ProviderSession {
    catalog: ProviderCatalog,
    settings: Arc<dyn SettingsStore>,
    events: EventBus,
    state: Mutex<SessionState>,
}

impl ProviderSession {
    /// Restore the session from the settings store.
    pub fn new(
        catalog: ProviderCatalog,
        settings: Arc<dyn SettingsStore>,
        events: EventBus,
    ) -> Self {
        let selected: ProviderKind = settings
            .get(keys::SELECTED_PROVIDER)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();

        let mut model_by_provider = HashMap::new();
        for kind in ProviderKind::all() {
            if let Some(model) = settings.get(&keys::model(kind.as_str())) {
                model_by_provider.insert(*kind, model);
            }
        }

        let api_key = settings.get(&keys::api_key(selected.as_str()));
        let api_key_valid = if selected.descriptor().requires_api_key {
            api_key.as_deref().is_some_and(|k| !k.is_empty())
        } else {
            true
        };

        Self {
            catalog,
            settings,
            events,
            state: Mutex::new(SessionState {
                selected,
                api_key,
                api_key_valid,
                model_by_provider,
                connected: false,
                available_models: Vec::new(),
            }),
        }
    }

    pub fn selected_kind(&self) -> ProviderKind {
        self.state.lock().unwrap().selected
    }

    /// Switch the active provider.
    ///
    /// Key-bearing providers pick up their previously stored key (validity
    /// follows presence). Local providers get a background connectivity
    /// probe and model refresh. Always publishes `SettingsChanged`.
    pub fn select_provider(self: &Arc<Self>, kind: ProviderKind) {
        {
            let mut state = self.state.lock().unwrap();
            state.selected = kind;
            state.connected = false;
            state.available_models.clear();

            if kind.descriptor().requires_api_key {
                let stored = self.settings.get(&keys::api_key(kind.as_str()));
                state.api_key_valid = stored.as_deref().is_some_and(|k| !k.is_empty());
                state.api_key = stored;
            } else {
                state.api_key = None;
                state.api_key_valid = true;
            }
        }
        self.settings.set(keys::SELECTED_PROVIDER, kind.as_str());

        if kind.is_local() {
            let session = Arc::clone(self);
            tokio::spawn(async move {
                session.refresh(kind).await;
            });
        }

        self.events.publish(Event::SettingsChanged);
    }

    /// Probe connectivity and refresh the model list for one kind; results
    /// are dropped if the selection moved on meanwhile.
    pub async fn refresh(&self, kind: ProviderKind) {
        let Some(client) = self.catalog.client(kind) else {
            return;
        };
        let target = self.target_for(kind);

        let (connected, models) =
            tokio::join!(client.check_connection(&target), client.list_models(&target));

        let models = match models {
            Ok(models) => models,
            Err(e) => {
                warn!("Model listing for {} failed: {}", kind, e);
                Vec::new()
            }
        };

        let mut state = self.state.lock().unwrap();
        if state.selected == kind {
            state.connected = connected;
            state.available_models = models;
        }
    }

    /// The model to dispatch with: the per-provider remembered selection
    /// when still valid, else the provider's default.
    pub fn current_model(&self) -> String {
        let state = self.state.lock().unwrap();
        Self::model_for(&state, state.selected)
    }

    fn model_for(state: &SessionState, kind: ProviderKind) -> String {
        if let Some(remembered) = state.model_by_provider.get(&kind) {
            // the refreshed listing only applies to the selected local kind
            let still_listed = if kind.is_local() && state.selected == kind {
                state.available_models.is_empty()
                    || state.available_models.iter().any(|m| m == remembered)
            } else {
                true
            };
            if still_listed && !remembered.is_empty() {
                return remembered.clone();
            }
        }
        kind.descriptor().default_model.to_string()
    }

    /// Live model list from the last refresh; empty for kinds that do not
    /// enumerate models.
    pub fn available_models(&self) -> Vec<String> {
        self.state.lock().unwrap().available_models.clone()
    }

    /// Remember a model for the current provider. Empty names are a no-op.
    pub fn select_model(&self, name: &str) {
        if name.is_empty() {
            return;
        }
        let kind = {
            let mut state = self.state.lock().unwrap();
            let kind = state.selected;
            state.model_by_provider.insert(kind, name.to_string());
            kind
        };
        self.settings.set(&keys::model(kind.as_str()), name);
        self.events.publish(Event::SettingsChanged);
    }

    /// Verify and store an API key for the current provider.
    ///
    /// Returns true on success. Providers without keys succeed trivially.
    /// A key that fails verification is not stored and leaves the session
    /// marked invalid.
    pub async fn save_api_key(&self, key: &str) -> bool {
        let kind = self.selected_kind();
        if !kind.descriptor().requires_api_key {
            return true;
        }

        let Some(client) = self.catalog.client(kind) else {
            return false;
        };

        let mut target = self.target_for(kind);
        target.api_key = Some(key.to_string());

        let valid = client.verify_api_key(&target).await;
        {
            let mut state = self.state.lock().unwrap();
            if valid {
                state.api_key = Some(key.to_string());
            }
            state.api_key_valid = valid;
        }

        if valid {
            self.settings.set(&keys::api_key(kind.as_str()), key);
            info!("API key for {} verified and stored", kind);
            self.events.publish(Event::ApiKeyChanged);
        } else {
            warn!("API key verification for {} failed", kind);
        }
        valid
    }

    /// Drop the stored key for the current provider. No-op for kinds
    /// without keys.
    pub fn clear_api_key(&self) {
        let kind = self.selected_kind();
        if !kind.descriptor().requires_api_key {
            return;
        }
        {
            let mut state = self.state.lock().unwrap();
            state.api_key = None;
            state.api_key_valid = false;
        }
        self.settings.remove(&keys::api_key(kind.as_str()));
        self.events.publish(Event::ApiKeyChanged);
    }

    /// Query the provider's liveness endpoint and update the cached flag.
    pub async fn check_connection(&self) -> bool {
        let kind = self.selected_kind();
        let Some(client) = self.catalog.client(kind) else {
            return false;
        };
        let target = self.target_for(kind);
        let connected = client.check_connection(&target).await;
        self.state.lock().unwrap().connected = connected;
        connected
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    /// Whether dispatch can proceed: either no key is required or the
    /// stored key is valid.
    pub fn is_configured(&self) -> bool {
        let state = self.state.lock().unwrap();
        !state.selected.descriptor().requires_api_key || state.api_key_valid
    }

    /// Effective base URL for a kind: persisted override or the
    /// descriptor's default.
    pub fn base_url(&self, kind: ProviderKind) -> String {
        self.settings
            .get(&keys::base_url(kind.as_str()))
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| kind.descriptor().base_url.to_string())
    }

    /// Frozen dispatch target for the current selection.
    pub fn snapshot(&self) -> ProviderTarget {
        self.target_for(self.selected_kind())
    }

    fn target_for(&self, kind: ProviderKind) -> ProviderTarget {
        let base_url = self.base_url(kind);
        let state = self.state.lock().unwrap();
        let model = Self::model_for(&state, kind);
        let api_key = if state.selected == kind {
            state.api_key.clone()
        } else {
            self.settings.get(&keys::api_key(kind.as_str()))
        };
        ProviderTarget {
            kind,
            base_url,
            model,
            api_key,
        }
    }

    /// Dispatch one generation request against the active provider.
    ///
    /// Fails with `NotConfigured` when the provider needs a key and none is
    /// valid. Never retries.
    pub async fn send(&self, user_text: &str, system_message: &str) -> Result<String, EnhanceError> {
        let target = self.snapshot();
        self.send_to(&target, user_text, system_message).await
    }

    /// Dispatch against an already-frozen target. Used by the engine so the
    /// snapshot is taken before any await point.
    pub async fn send_to(
        &self,
        target: &ProviderTarget,
        user_text: &str,
        system_message: &str,
    ) -> Result<String, EnhanceError> {
        if target.kind.descriptor().requires_api_key
            && target.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(EnhanceError::NotConfigured);
        }
        let client = self
            .catalog
            .client(target.kind)
            .ok_or_else(|| {
                EnhanceError::EnhancementFailed(format!(
                    "no client registered for provider {}",
                    target.kind
                ))
            })?;
        client.generate(target, system_message, user_text).await
    }
}
