//! Context sources - selected text and clipboard accessors
//!
//! Both are platform collaborators outside the pipeline's control, so they
//! sit behind traits. The engine only cares about "give me the current text,
//! or None".

use async_trait::async_trait;

/// Accessor for the current foreground text selection.
#[async_trait]
pub trait SelectedTextSource: Send + Sync {
    /// Returns the selected text, or None when nothing is selected or the
    /// platform cannot provide it.
    async fn selected_text(&self) -> Option<String>;
}

/// Accessor for the system clipboard's text content.
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    async fn clipboard_text(&self) -> Option<String>;
}

/// Source that never has any text. Used where a platform integration is
/// absent (headless CLI, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

#[async_trait]
impl SelectedTextSource for NoContext {
    async fn selected_text(&self) -> Option<String> {
        None
    }
}

#[async_trait]
impl ClipboardSource for NoContext {
    async fn clipboard_text(&self) -> Option<String> {
        None
    }
}

/// Fixed-text source for tests and scripted invocations.
#[derive(Debug, Clone)]
pub struct StaticText(pub Option<String>);

#[async_trait]
impl SelectedTextSource for StaticText {
    async fn selected_text(&self) -> Option<String> {
        self.0.clone()
    }
}

#[async_trait]
impl ClipboardSource for StaticText {
    async fn clipboard_text(&self) -> Option<String> {
        self.0.clone()
    }
}

/// System clipboard via arboard.
///
/// arboard's handle is not Send on every platform, so a fresh handle is
/// opened per read on a blocking thread.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn clipboard_text(&self) -> Option<String> {
        let result = tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new().ok()?;
            clipboard.get_text().ok()
        })
        .await;
        result.ok().flatten().filter(|t| !t.is_empty())
    }
}
