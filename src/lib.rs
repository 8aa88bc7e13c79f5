//! vox-polish library - text-enhancement pipeline for voice transcripts

pub mod config;
pub mod context;
pub mod enhancer;
pub mod error;
pub mod events;
pub mod license;
pub mod prompts;
pub mod provider;
pub mod ratelimit;

// Re-export commonly used types
pub use config::{JsonFileSettings, MemorySettings, SettingsStore};
pub use enhancer::{filter_output, EnhancementEngine};
pub use error::EnhanceError;
pub use events::{Event, EventBus};
pub use prompts::{Prompt, PromptIcon, PromptStore};
pub use provider::{ProviderCatalog, ProviderClient, ProviderKind, ProviderSession, ProviderTarget};
pub use ratelimit::RateLimiter;
