//! Typed event bus for configuration-change notifications
//!
//! Replaces ambient notification-center broadcasts with an explicit
//! publish/subscribe channel. Observers (UI, shortcut manager) subscribe and
//! receive every event published after their subscription.

use tokio::sync::broadcast;

/// Event kinds published by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Provider, model, or base-URL selection changed
    SettingsChanged,
    /// The enhancement-enabled flag was toggled
    EnhancementToggled,
    /// The active prompt changed
    PromptSelectionChanged,
    /// An API key was stored or cleared
    ApiKeyChanged,
}

/// Broadcast bus carrying [`Event`] values to any number of subscribers.
///
/// Publishing with no live subscribers is not an error; the event is simply
/// dropped, matching fire-and-forget notification semantics.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: Event) {
        // send only fails when there are no receivers, which is fine
        let _ = self.sender.send(event);
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
