//! Enhancement engine - the pipeline's single entry point
//!
//! `enhance` resolves the active prompt, assembles the system message with
//! optional context, waits on the rate limiter, dispatches against a frozen
//! provider snapshot, and filters the response.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{keys, SettingsStore};
use crate::context::{ClipboardSource, SelectedTextSource};
use crate::error::EnhanceError;
use crate::events::{Event, EventBus};
use crate::license::LicenseState;
use crate::prompts::{Prompt, PromptStore, ASSISTANT_PROMPT_ID, DEFAULT_PROMPT_ID};
use crate::provider::{ProviderSession, ProviderTarget};
use crate::ratelimit::RateLimiter;

use super::output_filter::filter_output;
use super::templates::{
    context_section, render_system_template, wrap_transcript, FALLBACK_INSTRUCTIONS,
};

/// One in-flight request. Built after the rate limiter admits the call and
/// discarded when it returns; the target is a frozen snapshot so concurrent
/// settings changes cannot retarget it.
struct EnhancementRequest {
    system_message: String,
    user_text: String,
    target: ProviderTarget,
    issued_at: Instant,
}

/// Orchestrator sitting between "I have plain text" and "I have enhanced
/// text".
pub struct EnhancementEngine {
    session: Arc<ProviderSession>,
    prompts: Arc<PromptStore>,
    settings: Arc<dyn SettingsStore>,
    events: EventBus,
    limiter: RateLimiter,
    license: LicenseState,
    selected_text: Arc<dyn SelectedTextSource>,
    clipboard: Arc<dyn ClipboardSource>,
}

impl EnhancementEngine {
    pub fn new(
        session: Arc<ProviderSession>,
        prompts: Arc<PromptStore>,
        settings: Arc<dyn SettingsStore>,
        events: EventBus,
        selected_text: Arc<dyn SelectedTextSource>,
        clipboard: Arc<dyn ClipboardSource>,
    ) -> Self {
        Self {
            session,
            prompts,
            settings,
            events,
            limiter: RateLimiter::default(),
            license: LicenseState::new(),
            selected_text,
            clipboard,
        }
    }

    /// Replace the default 1s request spacing.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.limiter = RateLimiter::new(interval);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.get_bool(keys::ENHANCEMENT_ENABLED, true)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.settings.set_bool(keys::ENHANCEMENT_ENABLED, enabled);
        self.events.publish(Event::EnhancementToggled);
    }

    pub fn use_clipboard_context(&self) -> bool {
        self.settings.get_bool(keys::USE_CLIPBOARD_CONTEXT, false)
    }

    pub fn set_use_clipboard_context(&self, enabled: bool) {
        self.settings.set_bool(keys::USE_CLIPBOARD_CONTEXT, enabled);
        self.events.publish(Event::SettingsChanged);
    }

    /// Enhance one piece of transcribed text.
    ///
    /// Empty input is a silent no-op returning `("", 0)`. Disabled
    /// enhancement passes the input through unchanged. All other failures
    /// surface as a classified [`EnhanceError`].
    pub async fn enhance(&self, text: &str) -> Result<(String, Duration), EnhanceError> {
        if text.is_empty() {
            return Ok((String::new(), Duration::ZERO));
        }

        if !self.is_enabled() || !self.license.is_licensed() {
            debug!("Enhancement disabled, passing text through");
            return Ok((text.to_string(), Duration::ZERO));
        }

        if !self.session.is_configured() {
            return Err(EnhanceError::NotConfigured);
        }

        // a leading trigger word reroutes this one request to its prompt
        let (prompt, effective_text) = self.resolve_prompt(text);
        let system_message = self.build_system_message(prompt.as_ref()).await?;

        self.limiter.acquire().await;

        let request = EnhancementRequest {
            user_text: wrap_transcript(&effective_text),
            system_message,
            target: self.session.snapshot(),
            issued_at: Instant::now(),
        };

        info!(
            "Dispatching enhancement to {} ({})",
            request.target.kind, request.target.model
        );

        let raw = self
            .session
            .send_to(&request.target, &request.user_text, &request.system_message)
            .await
            .map_err(|e| match e {
                // keep already-classified kinds, wrap anything generic with
                // its original description
                EnhanceError::EnhancementFailed(msg) => EnhanceError::Custom(msg),
                other => other,
            })?;

        let elapsed = request.issued_at.elapsed();
        info!("Enhancement completed in {}ms", elapsed.as_millis());
        Ok((filter_output(&raw), elapsed))
    }

    /// The prompt to use for one request: a trigger-word match wins over
    /// the stored active prompt and strips the trigger from the input.
    fn resolve_prompt(&self, text: &str) -> (Option<Prompt>, String) {
        for prompt in self.prompts.all_prompts() {
            if let Some(stripped) = prompt.match_trigger(text) {
                if !stripped.is_empty() {
                    debug!("Trigger word matched prompt '{}'", prompt.title);
                    return (Some(prompt), stripped);
                }
            }
        }
        (self.prompts.active_prompt(), text.to_string())
    }

    async fn build_system_message(&self, prompt: Option<&Prompt>) -> Result<String, EnhanceError> {
        // the assistant prompt answers the selection directly, raw
        // instructions plus context, no rewrite template and no clipboard
        if let Some(p) = prompt {
            if p.id == ASSISTANT_PROMPT_ID {
                if let Some(selection) = self
                    .selected_text
                    .selected_text()
                    .await
                    .filter(|s| !s.is_empty())
                {
                    return Ok(format!("{}{}", p.text, context_section(&selection)));
                }
            }
        }

        let instructions = match prompt {
            Some(p) => p.text.clone(),
            None => self
                .prompts
                .all_prompts()
                .into_iter()
                .find(|p| p.id == DEFAULT_PROMPT_ID)
                .map(|p| p.text)
                .unwrap_or_else(|| FALLBACK_INSTRUCTIONS.to_string()),
        };

        let mut system_message = render_system_template(&instructions)
            .map_err(|e| EnhanceError::EnhancementFailed(e.to_string()))?;

        if self.use_clipboard_context() {
            if let Some(clip) = self
                .clipboard
                .clipboard_text()
                .await
                .filter(|c| !c.is_empty())
            {
                system_message.push_str(&context_section(&clip));
            }
        }

        Ok(system_message)
    }
}
