//! Two-line meme captions: from the language model when one is configured,
//! otherwise (or when it fails) from keyword rules.

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{FALLBACK_BOTTOM_TEXT, MAX_CAPTION_CHARS};
use crate::llm::TextModel;
use crate::rules::{KeywordRule, first_match};

/// Top and bottom meme text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionResult {
    /// Text drawn at the top of the image
    pub top_text: String,
    /// Text drawn at the bottom of the image
    pub bottom_text: String,
}

impl CaptionResult {
    fn canned(top: &str, bottom: &str) -> Self {
        Self {
            top_text: top.to_string(),
            bottom_text: bottom.to_string(),
        }
    }
}

static CAPTION_RULES: [KeywordRule<(&str, &str)>; 8] = [
    KeywordRule {
        keywords: &["when", "fix", "bug", "code"],
        outcome: ("WHEN YOU FIX A BUG", "BUT CREATE THREE MORE"),
    },
    KeywordRule {
        keywords: &["monday", "morning", "work"],
        outcome: ("MONDAY MORNING", "HERE WE GO AGAIN"),
    },
    KeywordRule {
        keywords: &["test", "pass", "work"],
        outcome: ("WHEN ALL TESTS PASS", "ON THE FIRST TRY"),
    },
    KeywordRule {
        keywords: &["documentation", "doc", "readme"],
        outcome: ("DOCUMENTATION", "WE DON'T DO THAT HERE"),
    },
    KeywordRule {
        keywords: &["deploy", "production", "friday"],
        outcome: ("DEPLOYING ON FRIDAY", "WHAT COULD GO WRONG?"),
    },
    KeywordRule {
        keywords: &["coffee", "morning", "wake"],
        outcome: ("ME BEFORE COFFEE", "ME AFTER COFFEE"),
    },
    KeywordRule {
        keywords: &["meeting", "could", "email"],
        outcome: ("THIS MEETING", "COULD HAVE BEEN AN EMAIL"),
    },
    KeywordRule {
        keywords: &["internet", "down", "wifi"],
        outcome: ("WHEN THE INTERNET IS DOWN", "GUESS I'LL BE PRODUCTIVE"),
    },
];

fn shout(words: &[&str]) -> String {
    words
        .join(" ")
        .to_uppercase()
        .chars()
        .take(MAX_CAPTION_CHARS)
        .collect()
}

/// Rule-based caption. Deterministic: the same description always gives the
/// same caption.
///
/// Without a matching rule the description is split in half by word count
/// (the top half gets the odd word), each half upper-cased and cut to
/// [`MAX_CAPTION_CHARS`].
pub fn generate_fallback_caption(description: &str) -> CaptionResult {
    if let Some((top, bottom)) = first_match(&CAPTION_RULES, description) {
        return CaptionResult::canned(top, bottom);
    }

    let words: Vec<&str> = description.split_whitespace().collect();
    let (first, second) = words.split_at(words.len().div_ceil(2));
    let bottom_text = shout(second);
    CaptionResult {
        top_text: shout(first),
        bottom_text: if bottom_text.is_empty() {
            FALLBACK_BOTTOM_TEXT.to_string()
        } else {
            bottom_text
        },
    }
}

/// System instruction for the language model.
pub const CAPTION_SYSTEM_PROMPT: &str = r#"You are a meme caption generator. Given a description, create funny and relatable meme text.

Rules:
1. Generate exactly two lines: TOP TEXT and BOTTOM TEXT
2. Keep each line under 50 characters
3. Use ALL CAPS for traditional meme style
4. Make it funny, relatable, and internet-culture appropriate
5. Format your response as: "TOP: [text]|BOTTOM: [text]"

Examples:
- "TOP: WHEN YOU FIX A BUG|BOTTOM: BUT CREATE THREE MORE"
- "TOP: ME: I'LL JUST CHECK ONE THING|BOTTOM: 3 HOURS LATER..."
- "TOP: DOCUMENTATION|BOTTOM: WE DON'T DO THAT HERE""#;

/// User prompt sent alongside [`CAPTION_SYSTEM_PROMPT`].
pub fn caption_prompt(description: &str) -> String {
    format!("Create a meme caption for: \"{description}\"")
}

/// The model's reply wasn't `TOP: ...|BOTTOM: ...`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptionParseError {
    /// How many `|`-separated parts the reply had.
    pub parts: usize,
}

impl std::fmt::Display for CaptionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid caption format: expected 2 parts, got {}",
            self.parts
        )
    }
}

impl std::error::Error for CaptionParseError {}

/// Parses `TOP: <text>|BOTTOM: <text>`. Anything other than exactly two
/// `|`-separated parts is an error.
pub fn parse_caption_response(text: &str) -> Result<CaptionResult, CaptionParseError> {
    let parts: Vec<&str> = text.split('|').collect();
    let [top, bottom] = parts[..] else {
        return Err(CaptionParseError { parts: parts.len() });
    };
    let strip = |part: &str, label: &str| {
        let part = part.trim();
        part.strip_prefix(label).unwrap_or(part).trim().to_string()
    };
    Ok(CaptionResult {
        top_text: strip(top, "TOP:"),
        bottom_text: strip(bottom, "BOTTOM:"),
    })
}

/// Asks `model` for a caption, using the rule-based caption when there is no
/// model, the call fails, or the reply can't be parsed.
pub async fn generate_caption(model: Option<&dyn TextModel>, description: &str) -> CaptionResult {
    let Some(model) = model else {
        debug!("No language model configured, using rule-based caption");
        return generate_fallback_caption(description);
    };

    match model
        .generate(CAPTION_SYSTEM_PROMPT, &caption_prompt(description))
        .await
    {
        Ok(text) => match parse_caption_response(&text) {
            Ok(caption) => caption,
            Err(err) => {
                warn!("Error generating caption with AI: {}", err);
                generate_fallback_caption(description)
            }
        },
        Err(err) => {
            warn!("Error generating caption with AI: {}", err);
            generate_fallback_caption(description)
        }
    }
}
