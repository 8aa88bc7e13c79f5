//! Message templates for the enhancement pipeline
//!
//! The system message wraps the active prompt's instruction text; the user
//! message wraps the raw transcript in delimiter tags so providers can tell
//! instruction from payload. [`filter_output`](super::filter_output)
//! strips these tags back out of responses that echo them.

use anyhow::{anyhow, Result};

/// Generic template the active prompt's instructions are wrapped in.
/// Contains a single `{instructions}` placeholder.
pub const SYSTEM_TEMPLATE: &str = r#"You enhance text transcribed from speech.

<SYSTEM_INSTRUCTION>
{instructions}
</SYSTEM_INSTRUCTION>

The user message contains the transcript wrapped in <TRANSCRIPT> tags. Apply the instruction to that text and reply with the resulting text only, without tags or commentary."#;

/// Hard-coded instruction used when no prompt exists at all.
pub const FALLBACK_INSTRUCTIONS: &str =
    "You are a helpful writing assistant. Improve the clarity, grammar, and \
     punctuation of the text without changing its meaning.";

/// Render the system template safely without corrupting instruction text.
/// Split+concat instead of replace, so a literal placeholder inside the
/// instructions is left alone.
pub fn render_system_template(instructions: &str) -> Result<String> {
    let (before, after) = SYSTEM_TEMPLATE
        .split_once("{instructions}")
        .ok_or_else(|| anyhow!("SYSTEM_TEMPLATE missing {{instructions}}"))?;

    let mut rendered = String::with_capacity(before.len() + instructions.len() + after.len());
    rendered.push_str(before);
    rendered.push_str(instructions);
    rendered.push_str(after);
    Ok(rendered)
}

/// Delimiting section carrying auxiliary context (selected text or
/// clipboard) appended to the system message.
pub fn context_section(context: &str) -> String {
    format!(
        "\n\n<CONTEXT_INFORMATION>\n{}\n</CONTEXT_INFORMATION>",
        context
    )
}

/// Wrap the raw input text for the user message.
pub fn wrap_transcript(text: &str) -> String {
    format!("<TRANSCRIPT>\n{}\n</TRANSCRIPT>", text)
}
