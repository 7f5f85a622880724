//! Emoticon substitution.

use std::collections::HashMap;

use configs::ForumSettings;
use domains::{DomainError, Result, Smiley};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::html_walk::{transform_text, DEFAULT_EXCLUDED};

/// Emoticon table built from the default settings (`/static/` base URL).
static DEFAULT_SMILIES: Lazy<Smilies> = Lazy::new(|| {
    Smilies::from_settings(&ForumSettings::default()).expect("built-in emoticon table compiles")
});

/// Compiled emoticon table.
///
/// All tokens are matched by one alternation, so a single left-to-right pass
/// replaces them and the inserted `<img>` markup is never scanned again.
/// On overlapping tokens the one listed first wins.
#[derive(Debug, Clone)]
pub struct Smilies {
    pattern: Option<Regex>,
    images: HashMap<String, String>,
}

impl Smilies {
    /// `emotion_url` is the full image directory URL, ending in `/`.
    pub fn new(emotion_url: &str, table: &[Smiley]) -> Result<Self> {
        let mut images = HashMap::with_capacity(table.len());
        let mut alternatives = Vec::with_capacity(table.len());

        for smiley in table {
            if smiley.token.is_empty() {
                return Err(DomainError::EmoticonTable("empty token".into()));
            }
            if images.contains_key(&smiley.token) {
                continue;
            }
            let src = format!("{emotion_url}{}", smiley.image);
            images.insert(
                smiley.token.clone(),
                format!("<img src=\"{}\" />", html_escape::encode_double_quoted_attribute(&src)),
            );
            alternatives.push(regex::escape(&smiley.token));
        }

        let pattern = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&alternatives.join("|")).map_err(|e| DomainError::EmoticonTable(e.to_string()))?)
        };

        Ok(Self { pattern, images })
    }

    pub fn from_settings(settings: &ForumSettings) -> Result<Self> {
        Self::new(&settings.emotion_url(), &settings.smilies)
    }

    /// Replaces emoticons in the text runs of `html`, skipping links and code.
    pub fn apply(&self, html: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return html.to_string();
        };
        transform_text(html, DEFAULT_EXCLUDED, |text| {
            pattern
                .replace_all(text, |caps: &Captures<'_>| {
                    self.images.get(&caps[0]).cloned().unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned()
        })
    }
}

/// Replaces emoticons using the built-in table and the `/static/` base URL.
pub fn smiles(html: &str) -> String {
    DEFAULT_SMILIES.apply(html)
}
