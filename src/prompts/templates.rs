//! Predefined prompt templates
//!
//! Shipped prompts carry fixed well-known ids so reconciliation on startup
//! can update their wording in place without disturbing user state
//! (trigger words, active selection).

use uuid::Uuid;

use super::{Prompt, PromptIcon};

/// Id of the default transcript-cleanup prompt.
pub const DEFAULT_PROMPT_ID: Uuid = Uuid::from_u128(0x6f5a1e38_2b9c_4d47_8c1e_0a93b15b20a1);

/// Id of the assistant prompt. The engine treats this one specially:
/// selected-text context is answered directly instead of rewritten.
pub const ASSISTANT_PROMPT_ID: Uuid = Uuid::from_u128(0x0dc5643f_7e11_4c86_9b6a_4f2e8d7c3b02);

/// Id of the grammar-fix prompt.
pub const FIX_GRAMMAR_PROMPT_ID: Uuid = Uuid::from_u128(0xa3b84d90_55c2_4f1d_b7e9_612c0fa9de03);

const DEFAULT_PROMPT_TEXT: &str = "\
Clean up the transcript. Remove filler words (um, uh, like, you know) and \
false starts. Fix punctuation and capitalization. Break run-on sentences \
into readable ones. Preserve the speaker's wording, tone, and all technical \
terms. Output only the cleaned text.";

const ASSISTANT_PROMPT_TEXT: &str = "\
You are a helpful assistant. The transcript is a request addressed to you. \
Answer it directly and concisely. If context is provided, ground your \
answer in it. Output only the answer.";

const FIX_GRAMMAR_PROMPT_TEXT: &str = "\
Correct grammar, spelling, and punctuation mistakes in the transcript. Do \
not rephrase, summarize, or change the meaning. Keep the original wording \
wherever it is already correct. Output only the corrected text.";

/// The shipped prompt set, in seed order. Passed to
/// [`PromptStore::reconcile_predefined`](super::PromptStore::reconcile_predefined)
/// once at startup.
pub fn predefined_prompts() -> Vec<Prompt> {
    vec![
        Prompt {
            id: DEFAULT_PROMPT_ID,
            title: "Clean Transcript".to_string(),
            text: DEFAULT_PROMPT_TEXT.to_string(),
            icon: PromptIcon::Sparkles,
            description: Some("Remove filler words and fix punctuation".to_string()),
            is_predefined: true,
            trigger_words: Vec::new(),
        },
        Prompt {
            id: FIX_GRAMMAR_PROMPT_ID,
            title: "Fix Grammar".to_string(),
            text: FIX_GRAMMAR_PROMPT_TEXT.to_string(),
            icon: PromptIcon::Pencil,
            description: Some("Correct mistakes without rephrasing".to_string()),
            is_predefined: true,
            trigger_words: Vec::new(),
        },
        Prompt {
            id: ASSISTANT_PROMPT_ID,
            title: "Assistant".to_string(),
            text: ASSISTANT_PROMPT_TEXT.to_string(),
            icon: PromptIcon::Chat,
            description: Some("Answer the transcript instead of rewriting it".to_string()),
            is_predefined: true,
            trigger_words: vec!["hey assistant".to_string()],
        },
    ]
}
