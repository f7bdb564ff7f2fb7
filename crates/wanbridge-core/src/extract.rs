//! Caller-message parsing: mode detection and parameter extraction.
//!
//! Callers speak one of two dialects. In simple mode the first user message
//! is the prompt and everything else is defaulted. In advanced mode the
//! first user message carries bracketed `[<label>=<value>` markers for the
//! prompt, negative prompt, resolution, and image count; a value runs from
//! the `=` to the next `]` or the end of the string.
//!
//! Extraction is pure and infallible: degenerate input yields an empty or
//! defaulted request rather than an error. Validation of the size format
//! and count bounds is the backend's responsibility.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{ChatMessage, DEFAULT_SIZE, GenerationRequest, Mode};

/// System-message marker that switches a request into advanced mode.
pub const ADVANCED_MODE_MARKER: &str = "通义万象高级模式";

/// Bracket labels understood in advanced mode.
const LABEL_PROMPT: &str = "提示词";
const LABEL_NEGATIVE_PROMPT: &str = "反向提示词";
const LABEL_SIZE: &str = "图像分辨率";
const LABEL_COUNT: &str = "图片数量";

static PROMPT_RE: LazyLock<Regex> = LazyLock::new(|| bracket_pattern(LABEL_PROMPT));
static NEGATIVE_PROMPT_RE: LazyLock<Regex> =
    LazyLock::new(|| bracket_pattern(LABEL_NEGATIVE_PROMPT));
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| bracket_pattern(LABEL_SIZE));
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| bracket_pattern(LABEL_COUNT));

fn bracket_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"\[{label}=([^\]]+)")).expect("bracket pattern is valid")
}

/// Determine the input dialect from the system messages.
///
/// Advanced iff any system-role message contains the marker substring,
/// regardless of message ordering. The marker in a user message has no
/// effect.
#[must_use]
pub fn detect_mode(messages: &[ChatMessage]) -> Mode {
    let advanced = messages
        .iter()
        .any(|m| m.is_system() && m.content.contains(ADVANCED_MODE_MARKER));
    if advanced { Mode::Advanced } else { Mode::Simple }
}

/// Build a [`GenerationRequest`] from the caller's messages.
#[must_use]
pub fn extract(messages: &[ChatMessage]) -> GenerationRequest {
    match detect_mode(messages) {
        Mode::Simple => GenerationRequest {
            prompt: first_user_content(messages).to_string(),
            negative_prompt: String::new(),
            size: DEFAULT_SIZE.to_string(),
            n: 1,
        },
        Mode::Advanced => {
            let content = first_user_content(messages);
            GenerationRequest {
                prompt: bracket_value(content, &PROMPT_RE).to_string(),
                negative_prompt: bracket_value(content, &NEGATIVE_PROMPT_RE).to_string(),
                size: bracket_value(content, &SIZE_RE).to_string(),
                n: parse_count(bracket_value(content, &COUNT_RE)),
            }
        }
    }
}

/// Content of the first user-role message, or empty if none.
fn first_user_content(messages: &[ChatMessage]) -> &str {
    messages
        .iter()
        .find(|m| m.is_user())
        .map_or("", |m| m.content.as_str())
}

/// First bracketed value for the given label, trimmed; empty if absent.
fn bracket_value<'a>(content: &'a str, re: &Regex) -> &'a str {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Parse the requested image count.
///
/// Unparsable or missing text yields 0, which the submission layer passes
/// through by omitting the field so the backend default applies.
fn parse_count(text: &str) -> u32 {
    text.parse().unwrap_or(0)
}
