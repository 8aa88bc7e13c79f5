//! Settings persistence - abstract key-value store and implementations
//!
//! The core never assumes a storage technology; everything that must
//! survive a restart goes through [`SettingsStore`]. Two implementations
//! ship with the crate: an in-memory map for tests and embedding, and a
//! write-through JSON file store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

/// Recognized settings keys. Per-provider keys are derived with the
/// `*_key` helpers below.
pub mod keys {
    /// Identifier of the selected provider kind
    pub const SELECTED_PROVIDER: &str = "provider.selected";
    /// Whether enhancement is enabled at all
    pub const ENHANCEMENT_ENABLED: &str = "enhancement.enabled";
    /// Whether clipboard text is appended as context
    pub const USE_CLIPBOARD_CONTEXT: &str = "enhancement.use-clipboard-context";
    /// Active prompt id (UUID string)
    pub const ACTIVE_PROMPT_ID: &str = "prompts.active-id";
    /// Serialized prompt list (JSON array)
    pub const PROMPTS: &str = "prompts.list";

    /// API key for one provider
    pub fn api_key(provider: &str) -> String {
        format!("provider.{}.api-key", provider)
    }

    /// Remembered model for one provider
    pub fn model(provider: &str) -> String {
        format!("provider.{}.model", provider)
    }

    /// Base-URL override for one provider
    pub fn base_url(provider: &str) -> String {
        format!("provider.{}.base-url", provider)
    }
}

/// Abstract key-value persistence used for all durable state.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Read a boolean flag, defaulting when absent or unparseable.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }
}

/// In-memory settings store for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// Write-through settings store backed by a single JSON object on disk.
///
/// The whole map is loaded at open and rewritten on every mutation. Write
/// failures are logged and the in-memory view stays authoritative for the
/// rest of the process lifetime.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl JsonFileSettings {
    /// Open a settings file, creating parent directories as needed.
    /// A missing file yields an empty store; a corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse settings file {}", path.display()))?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create settings directory {}", parent.display())
                })?;
            }
            HashMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(values) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize settings: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            warn!("Failed to write settings file {}: {}", self.path.display(), e);
        }
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().unwrap();
        values.remove(key);
        self.flush(&values);
    }
}
