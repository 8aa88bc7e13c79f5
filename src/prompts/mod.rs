//! Enhancement prompts - the instruction templates steering rewrites

pub mod store;
pub mod templates;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::PromptStore;
pub use templates::{
    predefined_prompts, ASSISTANT_PROMPT_ID, DEFAULT_PROMPT_ID, FIX_GRAMMAR_PROMPT_ID,
};

/// Icon shown next to a prompt in pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptIcon {
    #[default]
    Sparkles,
    Pencil,
    Chat,
    Document,
    Mail,
    Code,
}

/// A named instruction template steering how enhancement rewrites text.
///
/// Predefined prompts carry fixed well-known ids; template reconciliation at
/// startup may overwrite their title/text/description but never their id or
/// user-set trigger words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub icon: PromptIcon,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_predefined: bool,
    #[serde(default)]
    pub trigger_words: Vec<String>,
}

impl Prompt {
    /// Match a leading trigger word against the input, case-insensitively.
    /// Returns the input with the trigger word stripped when one matches.
    pub fn match_trigger(&self, input: &str) -> Option<String> {
        let trimmed = input.trim_start();
        for word in &self.trigger_words {
            let word = word.trim();
            if word.is_empty() || trimmed.len() < word.len() {
                continue;
            }
            if !trimmed.is_char_boundary(word.len())
                || !trimmed[..word.len()].eq_ignore_ascii_case(word)
            {
                continue;
            }
            let rest = &trimmed[word.len()..];
            // require a word boundary after the trigger
            if rest.is_empty() || rest.starts_with([' ', ',', '.', ':']) {
                return Some(rest.trim_start_matches([' ', ',', '.', ':']).to_string());
            }
        }
        None
    }
}
