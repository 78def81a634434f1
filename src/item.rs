//! Danmaku item value type.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of user-submitted text after trimming.
pub const MAX_USER_TEXT_CHARS: usize = 50;

/// Producer category of an item. Affects styling only, never admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "server-commentary")]
    ServerCommentary,
}

impl Origin {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "ai" => Some(Self::Ai),
            "server-commentary" => Some(Self::ServerCommentary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
            Self::ServerCommentary => "server-commentary",
        }
    }
}

/// Trim `text` and check it against the admission rules for `origin`.
/// Returns the trimmed slice. Only user-origin text is length-capped.
pub fn validate_text(text: &str, origin: Origin) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyText);
    }
    let len = trimmed.chars().count();
    if origin == Origin::User && len > MAX_USER_TEXT_CHARS {
        return Err(Error::TextTooLong {
            len,
            max: MAX_USER_TEXT_CHARS,
        });
    }
    Ok(trimmed)
}

/// A single commentary item. Immutable once admitted; "updates" are new items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DanmakuItem {
    /// Producer-assigned identifier (server ids for server/AI pushes,
    /// engine-local ids otherwise).
    pub id: String,
    pub text: String,
    pub origin: Origin,
    /// Unix milliseconds at admission.
    pub created_at: i64,
}

impl DanmakuItem {
    /// Construct a validated item. Fails on empty text, or on over-length
    /// text for user origin.
    pub fn new(
        id: impl Into<String>,
        text: &str,
        origin: Origin,
        created_at: i64,
    ) -> Result<Self> {
        let text = validate_text(text, origin)?;
        Ok(Self {
            id: id.into(),
            text: text.to_string(),
            origin,
            created_at,
        })
    }
}
