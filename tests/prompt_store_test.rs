//! Tests for the prompt store

use std::sync::Arc;

use vox_polish::config::{keys, MemorySettings, SettingsStore};
use vox_polish::events::{Event, EventBus};
use vox_polish::prompts::templates::predefined_prompts;
use vox_polish::prompts::{PromptIcon, PromptStore, ASSISTANT_PROMPT_ID, DEFAULT_PROMPT_ID};

fn new_store() -> (Arc<MemorySettings>, PromptStore) {
    let settings = Arc::new(MemorySettings::new());
    let store = PromptStore::new(settings.clone(), EventBus::new());
    (settings, store)
}

// ========================================================================
// Seeding and reconciliation
// ========================================================================

#[test]
fn test_reconcile_seeds_predefined_prompts() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());

    let prompts = store.all_prompts();
    assert_eq!(prompts.len(), predefined_prompts().len());
    assert_eq!(prompts[0].id, DEFAULT_PROMPT_ID);
    assert!(prompts.iter().all(|p| p.is_predefined));
}

#[test]
fn test_reconcile_is_idempotent() {
    let (_, store) = new_store();
    let templates = predefined_prompts();
    store.reconcile_predefined(&templates);
    let once = store.all_prompts();
    store.reconcile_predefined(&templates);
    assert_eq!(store.all_prompts(), once);
}

#[test]
fn test_reconcile_preserves_user_trigger_words_and_activation() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());
    store.set_active(ASSISTANT_PROMPT_ID);

    let mut assistant = store.active_prompt().unwrap();
    assistant.trigger_words = vec!["computer".to_string()];
    store.update_prompt(&assistant);

    // updated wording in the templates must not clobber user state
    let mut templates = predefined_prompts();
    for t in &mut templates {
        t.text = format!("v2: {}", t.text);
    }
    store.reconcile_predefined(&templates);

    let assistant = store.active_prompt().unwrap();
    assert_eq!(assistant.id, ASSISTANT_PROMPT_ID);
    assert!(assistant.text.starts_with("v2: "));
    assert_eq!(assistant.trigger_words, vec!["computer".to_string()]);
}

// ========================================================================
// Active prompt
// ========================================================================

#[test]
fn test_set_active_with_unknown_id_is_recorded() {
    let (_, store) = new_store();
    let ghost = uuid::Uuid::new_v4();
    store.set_active(ghost);

    assert_eq!(store.active_prompt_id(), Some(ghost));
    assert!(store.active_prompt().is_none());
}

#[test]
fn test_unknown_active_id_resolves_after_seeding() {
    let (_, store) = new_store();
    // init race: id set before prompts exist
    store.set_active(DEFAULT_PROMPT_ID);
    assert!(store.active_prompt().is_none());

    store.reconcile_predefined(&predefined_prompts());
    assert_eq!(store.active_prompt().unwrap().id, DEFAULT_PROMPT_ID);
}

#[test]
fn test_first_added_prompt_becomes_active() {
    let (_, store) = new_store();
    let prompt = store.add_prompt("Mine", "Do it my way", PromptIcon::Pencil, None, Vec::new());
    assert_eq!(store.active_prompt().unwrap().id, prompt.id);

    let second = store.add_prompt("Other", "Other way", PromptIcon::Code, None, Vec::new());
    assert_ne!(store.active_prompt().unwrap().id, second.id);
}

#[test]
fn test_delete_active_prompt_falls_back_to_first_remaining() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());
    store.set_active(ASSISTANT_PROMPT_ID);

    let assistant = store.active_prompt().unwrap();
    store.delete_prompt(&assistant);

    assert_eq!(store.active_prompt().unwrap().id, DEFAULT_PROMPT_ID);
}

#[test]
fn test_delete_last_prompt_clears_active() {
    let (_, store) = new_store();
    let prompt = store.add_prompt("Only", "text", PromptIcon::Sparkles, None, Vec::new());
    store.delete_prompt(&prompt);

    assert!(store.all_prompts().is_empty());
    assert!(store.active_prompt_id().is_none());
}

#[test]
fn test_delete_non_active_prompt_keeps_active() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());
    store.set_active(DEFAULT_PROMPT_ID);

    let assistant = store
        .all_prompts()
        .into_iter()
        .find(|p| p.id == ASSISTANT_PROMPT_ID)
        .unwrap();
    store.delete_prompt(&assistant);

    assert_eq!(store.active_prompt_id(), Some(DEFAULT_PROMPT_ID));
}

// ========================================================================
// Silent no-ops
// ========================================================================

#[test]
fn test_update_unknown_id_is_noop() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());
    let before = store.all_prompts();

    let mut ghost = before[0].clone();
    ghost.id = uuid::Uuid::new_v4();
    ghost.title = "Ghost".to_string();
    store.update_prompt(&ghost);

    assert_eq!(store.all_prompts(), before);
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let (_, store) = new_store();
    store.reconcile_predefined(&predefined_prompts());
    let before = store.all_prompts();

    let mut ghost = before[0].clone();
    ghost.id = uuid::Uuid::new_v4();
    store.delete_prompt(&ghost);

    assert_eq!(store.all_prompts(), before);
}

// ========================================================================
// Persistence and events
// ========================================================================

#[test]
fn test_prompts_survive_reload() {
    let settings = Arc::new(MemorySettings::new());
    {
        let store = PromptStore::new(settings.clone(), EventBus::new());
        store.reconcile_predefined(&predefined_prompts());
        store.add_prompt("Mine", "my text", PromptIcon::Mail, None, vec!["email".into()]);
        store.set_active(DEFAULT_PROMPT_ID);
    }

    let reloaded = PromptStore::new(settings, EventBus::new());
    assert_eq!(reloaded.all_prompts().len(), predefined_prompts().len() + 1);
    assert_eq!(reloaded.active_prompt().unwrap().id, DEFAULT_PROMPT_ID);
    let mine = reloaded
        .all_prompts()
        .into_iter()
        .find(|p| p.title == "Mine")
        .unwrap();
    assert_eq!(mine.trigger_words, vec!["email".to_string()]);
}

#[test]
fn test_corrupt_stored_prompts_start_empty() {
    let settings = Arc::new(MemorySettings::new());
    settings.set(keys::PROMPTS, "{not json");
    let store = PromptStore::new(settings, EventBus::new());
    assert!(store.all_prompts().is_empty());
}

#[tokio::test]
async fn test_set_active_publishes_selection_event() {
    let settings = Arc::new(MemorySettings::new());
    let events = EventBus::new();
    let store = PromptStore::new(settings, events.clone());
    let mut rx = events.subscribe();

    store.set_active(DEFAULT_PROMPT_ID);
    assert_eq!(rx.recv().await.unwrap(), Event::PromptSelectionChanged);
}
