//! Prompt store - owns the prompt list and the active selection
//!
//! All mutation goes through this type; the list and active id are guarded
//! by one mutex so concurrent writers cannot interleave. Every mutation is
//! written through to the settings store. Operations on unknown ids are
//! defined no-ops, not errors.

use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

use crate::config::{keys, SettingsStore};
use crate::events::{Event, EventBus};

use super::{Prompt, PromptIcon};

#[derive(Debug, Default)]
struct State {
    prompts: Vec<Prompt>,
    active_id: Option<Uuid>,
}

/// Owner of enhancement prompts (predefined + user-authored) and the
/// active prompt id.
pub struct PromptStore {
    settings: Arc<dyn SettingsStore>,
    events: EventBus,
    state: Mutex<State>,
}

impl PromptStore {
    /// Load prompts and the active id from the settings store.
    ///
    /// A corrupt serialized list is logged and treated as empty. The active
    /// id is kept even when it matches no stored prompt; lookups then yield
    /// None until prompts are seeded (tolerates init-order races).
    pub fn new(settings: Arc<dyn SettingsStore>, events: EventBus) -> Self {
        let prompts = settings
            .get(keys::PROMPTS)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    warn!("Failed to parse stored prompts, starting empty: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let active_id = settings
            .get(keys::ACTIVE_PROMPT_ID)
            .and_then(|raw| raw.parse().ok());

        Self {
            settings,
            events,
            state: Mutex::new(State { prompts, active_id }),
        }
    }

    /// All prompts in insertion order (predefined prompts seeded first).
    pub fn all_prompts(&self) -> Vec<Prompt> {
        self.state.lock().unwrap().prompts.clone()
    }

    /// The prompt whose id equals the stored active id, or None.
    pub fn active_prompt(&self) -> Option<Prompt> {
        let state = self.state.lock().unwrap();
        let active = state.active_id?;
        state.prompts.iter().find(|p| p.id == active).cloned()
    }

    pub fn active_prompt_id(&self) -> Option<Uuid> {
        self.state.lock().unwrap().active_id
    }

    /// Set the active prompt id. The id is recorded even when no prompt
    /// with that id exists yet; `active_prompt` then resolves to None.
    pub fn set_active(&self, prompt_id: Uuid) {
        {
            let mut state = self.state.lock().unwrap();
            state.active_id = Some(prompt_id);
            self.persist(&state);
        }
        self.events.publish(Event::PromptSelectionChanged);
    }

    /// Append a user-authored prompt. The first prompt ever created also
    /// becomes the active one.
    pub fn add_prompt(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        icon: PromptIcon,
        description: Option<String>,
        trigger_words: Vec<String>,
    ) -> Prompt {
        let prompt = Prompt {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            icon,
            description,
            is_predefined: false,
            trigger_words,
        };

        let became_active = {
            let mut state = self.state.lock().unwrap();
            let first_ever = state.prompts.is_empty();
            state.prompts.push(prompt.clone());
            if first_ever {
                state.active_id = Some(prompt.id);
            }
            self.persist(&state);
            first_ever
        };

        if became_active {
            self.events.publish(Event::PromptSelectionChanged);
        }
        prompt
    }

    /// Replace a prompt by id. Unknown ids leave the store unchanged.
    pub fn update_prompt(&self, prompt: &Prompt) {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state.prompts.iter_mut().find(|p| p.id == prompt.id) {
            *slot = prompt.clone();
            self.persist(&state);
        }
    }

    /// Remove a prompt by id. If it was active, the first remaining prompt
    /// becomes active (or none when the store empties). Unknown ids leave
    /// the store unchanged.
    pub fn delete_prompt(&self, prompt: &Prompt) {
        let active_changed = {
            let mut state = self.state.lock().unwrap();
            let before = state.prompts.len();
            state.prompts.retain(|p| p.id != prompt.id);
            if state.prompts.len() == before {
                return;
            }
            let mut changed = false;
            if state.active_id == Some(prompt.id) {
                state.active_id = state.prompts.first().map(|p| p.id);
                changed = true;
            }
            self.persist(&state);
            changed
        };

        if active_changed {
            self.events.publish(Event::PromptSelectionChanged);
        }
    }

    /// Merge predefined templates into the store. Existing prompts with a
    /// template's id get the template's title/text/description/icon but
    /// keep user-set trigger words; unseen templates are appended.
    /// Idempotent: running twice with the same templates changes nothing.
    pub fn reconcile_predefined(&self, templates: &[Prompt]) {
        let mut state = self.state.lock().unwrap();
        for template in templates {
            match state.prompts.iter_mut().find(|p| p.id == template.id) {
                Some(existing) => {
                    existing.title = template.title.clone();
                    existing.text = template.text.clone();
                    existing.description = template.description.clone();
                    existing.icon = template.icon;
                    existing.is_predefined = true;
                }
                None => state.prompts.push(template.clone()),
            }
        }
        self.persist(&state);
    }

    fn persist(&self, state: &State) {
        match serde_json::to_string(&state.prompts) {
            Ok(serialized) => self.settings.set(keys::PROMPTS, &serialized),
            Err(e) => warn!("Failed to serialize prompts: {}", e),
        }
        match state.active_id {
            Some(id) => self.settings.set(keys::ACTIVE_PROMPT_ID, &id.to_string()),
            None => self.settings.remove(keys::ACTIVE_PROMPT_ID),
        }
    }
}
