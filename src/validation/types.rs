//! Core types used throughout the validation system

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Every status code a validation pass can produce.
/// Downstream consumers match on the numeric value, so the discriminants are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Success = 200,

    // Text rules
    BannedWord = 301,
    TooFewChars = 302,
    TooManyChars = 303,
    UnsupportedLanguage = 304,

    NoInput = 400,

    // Image rules
    TooFewImages = 401,
    TooManyImages = 402,
    TotalSizeTooSmall = 403,
    TotalSizeTooLarge = 404,
    ImageTooSmall = 405,
    ImageTooLarge = 406,
    LongEdgeTooShort = 407,
    LongEdgeTooLong = 408,
    ShortEdgeTooShort = 409,
    ShortEdgeTooLong = 410,
    RatioTooLow = 411,
    RatioTooHigh = 412,
    FixedRatioMismatch = 413,
    FormatNotAllowed = 414,
    TransparencyViolation = 415,
    ImageUnreadable = 416,
    InvalidLimit = 417,
    NoValidUrl = 418,
}

impl Code {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn is_success(self) -> bool {
        self == Code::Success
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Codes travel as decimal strings ("302"), not as enum names.
impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a single rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub passed: bool,
    pub message: String,
    pub code: Code,
}

impl RuleResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
            code: Code::Success,
        }
    }

    pub fn fail(code: Code, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            code,
        }
    }
}

/// Per-input-channel outcome, independent of the aggregate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    NoInput,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
}

/// Metadata extracted from a successfully fetched and decoded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMeta {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub size_kb: f64,
    /// Lowercase format name, e.g. "jpeg", "png", "webp"
    pub format: String,
    pub has_transparency: bool,
}

impl ImageMeta {
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn short_edge(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// What the fetcher learned about one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageInfo {
    Readable(ImageMeta),
    Unreadable { url: String, error: String },
}

/// The sole externally observable result of one validation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub status_code: Code,
    pub status: Status,
    pub error_message: String,
    pub image_urls: String,
    pub prompt_text: String,
    pub prompt_status: FieldStatus,
    pub image_status: FieldStatus,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }
}
