//! Shared constants/setters for things
//!

/// Longest caption line the rule-based generator produces, in characters.
pub const MAX_CAPTION_CHARS: usize = 50;

/// Bottom text used when a caption can't be split into two halves.
pub const FALLBACK_BOTTOM_TEXT: &str = "THAT'S HOW IT IS";

/// Number of history entries kept per kind.
pub const HISTORY_LIMIT: u64 = 50;

/// Text model used when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Base URL for the OpenAI API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Error message returned when a request has no usable description.
pub const DESCRIPTION_REQUIRED: &str = "Description is required";

/// Max age (in seconds) for image cache entries.
pub const IMAGE_CACHE_MAX_AGE_SECONDS: u64 = 60 * 60;

/// Shared cache max age (in seconds) for image cache entries.
pub const IMAGE_CACHE_S_MAXAGE_SECONDS: u64 = 60 * 60 * 24;

/// Stale-while-revalidate window (in seconds) for image cache entries.
pub const IMAGE_CACHE_STALE_WHILE_REVALIDATE_SECONDS: u64 = 60 * 60 * 24;

/// Cache-Control value for image responses.
pub static IMAGE_CACHE_CONTROL: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    format!(
        "public, max-age={}, s-maxage={}, stale-while-revalidate={}",
        IMAGE_CACHE_MAX_AGE_SECONDS,
        IMAGE_CACHE_S_MAXAGE_SECONDS,
        IMAGE_CACHE_STALE_WHILE_REVALIDATE_SECONDS
    )
});
