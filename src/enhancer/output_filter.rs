//! Output filtering - strip protocol artifacts from provider responses
//!
//! Some models echo the delimiter tags from the request back into their
//! response. The filter removes them and is idempotent, so running it over
//! already-filtered text changes nothing.

use std::sync::LazyLock;

use regex::Regex;

static WRAPPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*<TRANSCRIPT(?:\s+[^>]*)?>\s*(.*?)\s*</TRANSCRIPT\s*>\s*$").unwrap()
});

static STRAY_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?(?:TRANSCRIPT|SYSTEM_INSTRUCTION|CONTEXT_INFORMATION)\s*>").unwrap());

/// Strip echoed wrapper tags from a raw provider response.
pub fn filter_output(raw: &str) -> String {
    // a fully wrapped response is unwrapped first so inner whitespace
    // survives intact
    let unwrapped = match WRAPPED_RE.captures(raw) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(raw).to_string(),
        None => raw.to_string(),
    };

    STRAY_TAGS_RE.replace_all(&unwrapped, "").trim().to_string()
}
