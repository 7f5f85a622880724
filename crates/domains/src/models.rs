//! # Domain Models
//!
//! These structs represent the entities the display layer works on.
//! Posts are owned by the persistence layer; here they are only rendered.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Markup language a post body is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    #[default]
    Bbcode,
    Markdown,
}

impl MarkupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkupMode::Bbcode => "bbcode",
            MarkupMode::Markdown => "markdown",
        }
    }
}

impl FromStr for MarkupMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bbcode" => Ok(MarkupMode::Bbcode),
            "markdown" => Ok(MarkupMode::Markdown),
            _ => Err(DomainError::InvalidMarkup(s.to_string())),
        }
    }
}

impl fmt::Display for MarkupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single forum post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub user_name: String,
    pub markup: MarkupMode,
    /// Raw source as typed by the user
    pub body: String,
    /// Rendered HTML, filled by the post renderer
    pub body_html: String,
    /// Rendered HTML with tags stripped, used for search and previews
    pub body_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Creates an unrendered post; `body_html` and `body_text` start empty.
    pub fn new(topic_id: Uuid, user_name: impl Into<String>, markup: MarkupMode, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic_id,
            user_name: user_name.into(),
            markup,
            body: body.into(),
            body_html: String::new(),
            body_text: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Release stage of a version tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseLevel {
    Alpha,
    Beta,
    Candidate,
    Final,
}

impl ReleaseLevel {
    /// Short tag used inside version strings (`a`, `b`, `rc`, `f`).
    pub fn tag(&self) -> &'static str {
        match self {
            ReleaseLevel::Alpha => "a",
            ReleaseLevel::Beta => "b",
            ReleaseLevel::Candidate => "rc",
            ReleaseLevel::Final => "f",
        }
    }
}

impl FromStr for ReleaseLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "alpha" => Ok(ReleaseLevel::Alpha),
            "b" | "beta" => Ok(ReleaseLevel::Beta),
            "rc" | "c" => Ok(ReleaseLevel::Candidate),
            "f" | "final" => Ok(ReleaseLevel::Final),
            other => Err(DomainError::InvalidReleaseLevel(other.to_string())),
        }
    }
}

/// `(major, minor, micro, level, serial)` version tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub level: ReleaseLevel,
    pub serial: u32,
}

impl VersionInfo {
    pub const fn new(major: u32, minor: u32, micro: u32, level: ReleaseLevel, serial: u32) -> Self {
        Self { major, minor, micro, level, serial }
    }
}

/// One row of the emoticon table: a literal token and the image it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smiley {
    pub token: String,
    /// File name relative to the emoticon directory (e.g., "smile.png")
    pub image: String,
}

impl Smiley {
    pub fn new(token: impl Into<String>, image: impl Into<String>) -> Self {
        Self { token: token.into(), image: image.into() }
    }
}
