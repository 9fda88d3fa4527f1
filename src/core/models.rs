//! Core data models for the translation gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel source-language value requesting auto-detection
pub const AUTO_SOURCE: &str = "auto";

/// Fallback source language when detection comes back unknown
pub const DEFAULT_SOURCE: &str = "en";

/// Translation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_lang: AUTO_SOURCE.to_string(),
            target_lang: target_lang.into(),
        }
    }

    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self
    }

    /// True when the caller asked for source-language auto-detection
    pub fn wants_detection(&self) -> bool {
        self.source_lang == AUTO_SOURCE
    }
}

/// Completed translation, with the source language resolved to a concrete code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub original_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub detected_lang: Option<String>,
}

/// Outcome of a language-detection call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Detected language code, e.g. "en"
    Code(String),
    /// The service could not determine a language
    Unknown,
}

impl Detection {
    /// Detected code, or the fixed default when unknown
    pub fn or_default(&self) -> &str {
        match self {
            Detection::Code(code) => code,
            Detection::Unknown => DEFAULT_SOURCE,
        }
    }
}

/// One past translation kept in the session history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-period usage counters with calendar rollover
///
/// Limits are enforced at the gate (`UsageLimiter::can_translate`), not as
/// hard invariants here: counters may legitimately sit at the limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageCounters {
    pub daily_count: u32,
    pub monthly_count: u32,
    pub daily_limit: u32,
    pub monthly_limit: u32,
    pub last_reset_day: String,
    pub last_reset_month: String,
}

impl UsageCounters {
    pub fn new(daily_limit: u32, monthly_limit: u32) -> Self {
        let now = Utc::now();
        Self {
            daily_count: 0,
            monthly_count: 0,
            daily_limit,
            monthly_limit,
            last_reset_day: day_key(now),
            last_reset_month: month_key(now),
        }
    }

    /// Reset counters whose calendar period has rolled over.
    ///
    /// The two resets are independent: a new day within the same month
    /// clears only the daily counter. Both keys are derived from the single
    /// `now` passed in, so one evaluation never observes two clocks.
    pub fn rollover(&mut self, now: DateTime<Utc>) {
        let today = day_key(now);
        if self.last_reset_day != today {
            self.daily_count = 0;
            self.last_reset_day = today;
        }

        let this_month = month_key(now);
        if self.last_reset_month != this_month {
            self.monthly_count = 0;
            self.last_reset_month = this_month;
        }
    }

    /// Charge one translation against both periods
    pub fn charge(&mut self) {
        self.daily_count += 1;
        self.monthly_count += 1;
    }
}

/// Absolute day key, e.g. "2025-03-14"
fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Absolute month key, e.g. "2025-03"
fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

/// Supported language codes and display names.
///
/// Presentation only: translate requests pass codes through to the remote
/// service without checking membership.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese (日本語)"),
    ("es", "Spanish (Español)"),
    ("fr", "French (Français)"),
    ("de", "German (Deutsch)"),
    ("it", "Italian (Italiano)"),
    ("pt", "Portuguese (Português)"),
    ("ru", "Russian (Русский)"),
    ("ko", "Korean (한국어)"),
    ("zh", "Chinese (中文)"),
    ("ar", "Arabic (العربية)"),
    ("hi", "Hindi (हिन्दी)"),
    ("th", "Thai (ไทย)"),
    ("vi", "Vietnamese (Tiếng Việt)"),
    ("nl", "Dutch (Nederlands)"),
    ("sv", "Swedish (Svenska)"),
    ("no", "Norwegian (Norsk)"),
    ("da", "Danish (Dansk)"),
    ("fi", "Finnish (Suomi)"),
    ("pl", "Polish (Polski)"),
];

/// Display name for a language code, if supported
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
