//! # configs
//!
//! Forum display settings, layered as: built-in defaults, an optional
//! settings file, then `FORUM__*` environment variables.

use std::path::Path;

use config::{Config, Environment, File};
use domains::{MarkupMode, Smiley};
use serde::Deserialize;
use thiserror::Error;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "forum.toml";

/// Prefix for environment overrides (`FORUM__STATIC_URL=/assets/`).
pub const ENV_PREFIX: &str = "FORUM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForumSettings {
    /// Base URL of static assets; always ends with `/`
    pub static_url: String,
    /// Emoticon directory, relative to `static_url`
    pub emotion_path: String,
    pub smilies_support: bool,
    pub default_markup: MarkupMode,
    pub topic_page_size: u64,
    pub post_page_size: u64,
    #[serde(default = "default_smilies")]
    pub smilies: Vec<Smiley>,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            static_url: "/static/".to_string(),
            emotion_path: "djangobb_forum/img/smilies/".to_string(),
            smilies_support: true,
            default_markup: MarkupMode::Bbcode,
            topic_page_size: 25,
            post_page_size: 25,
            smilies: default_smilies(),
        }
    }
}

impl ForumSettings {
    /// Loads `.env`, then layers defaults, `path` (or `forum.toml` if it
    /// exists) and `FORUM__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with(path, ENV_PREFIX)
    }

    /// Same as [`ForumSettings::load`] without `.env` handling and with a
    /// caller-chosen env prefix.
    pub fn load_with(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let defaults = ForumSettings::default();
        let mut builder = Config::builder()
            .set_default("static_url", defaults.static_url)?
            .set_default("emotion_path", defaults.emotion_path)?
            .set_default("smilies_support", defaults.smilies_support)?
            .set_default("default_markup", defaults.default_markup.as_str())?
            .set_default("topic_page_size", defaults.topic_page_size)?
            .set_default("post_page_size", defaults.post_page_size)?;

        builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_SETTINGS_FILE).required(false)),
        };

        let settings: ForumSettings = builder
            .add_source(Environment::with_prefix(env_prefix).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::info!(
            static_url = %settings.static_url,
            default_markup = %settings.default_markup,
            smilies = settings.smilies_support,
            "forum settings loaded"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.static_url.ends_with('/') {
            return Err(ConfigError::Invalid {
                key: "static_url",
                reason: format!("`{}` must end with `/`", self.static_url),
            });
        }
        if self.topic_page_size == 0 {
            return Err(ConfigError::Invalid { key: "topic_page_size", reason: "must be greater than 0".into() });
        }
        if self.post_page_size == 0 {
            return Err(ConfigError::Invalid { key: "post_page_size", reason: "must be greater than 0".into() });
        }
        if self.smilies.iter().any(|s| s.token.is_empty()) {
            return Err(ConfigError::Invalid { key: "smilies", reason: "empty emoticon token".into() });
        }
        Ok(())
    }

    /// Full URL prefix for emoticon images (e.g., "/static/djangobb_forum/img/smilies/").
    pub fn emotion_url(&self) -> String {
        format!("{}{}", self.static_url, self.emotion_path)
    }
}

/// Built-in emoticon table. Order matters: earlier tokens win on overlap.
pub fn default_smilies() -> Vec<Smiley> {
    [
        (":)", "smile.png"),
        ("=)", "smile.png"),
        (":|", "neutral.png"),
        ("=|", "neutral.png"),
        (":(", "sad.png"),
        ("=(", "sad.png"),
        (":D", "big_smile.png"),
        ("=D", "big_smile.png"),
        (":o", "yikes.png"),
        (":O", "yikes.png"),
        (";)", "wink.png"),
        (":/", "hmm.png"),
        (":P", "tongue.png"),
        (":lol:", "lol.png"),
        (":mad:", "mad.png"),
        (":rolleyes:", "roll.png"),
        (":cool:", "cool.png"),
    ]
    .into_iter()
    .map(|(token, image)| Smiley::new(token, image))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("forum-settings-does-not-exist.toml");
        let err = ForumSettings::load_with(Some(&missing), "FORUMTEST_MISSING").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = ForumSettings::load_with(None, "FORUMTEST_NONE").unwrap();
        assert_eq!(settings, ForumSettings::default());
        assert_eq!(settings.emotion_url(), "/static/djangobb_forum/img/smilies/");
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_settings(
            "static_url = \"https://cdn.example.org/\"\n\
             default_markup = \"markdown\"\n\
             post_page_size = 10\n\
             smilies_support = false\n",
        );
        let settings = ForumSettings::load_with(Some(file.path()), "FORUMTEST_FILE").unwrap();
        assert_eq!(settings.static_url, "https://cdn.example.org/");
        assert_eq!(settings.default_markup, MarkupMode::Markdown);
        assert_eq!(settings.post_page_size, 10);
        assert_eq!(settings.topic_page_size, 25);
        assert!(!settings.smilies_support);
        assert_eq!(settings.smilies, default_smilies());
    }

    #[test]
    fn env_overrides_file() {
        let file = write_settings("post_page_size = 10\n");
        std::env::set_var("FORUMTEST_ENV__POST_PAGE_SIZE", "3");
        let settings = ForumSettings::load_with(Some(file.path()), "FORUMTEST_ENV").unwrap();
        std::env::remove_var("FORUMTEST_ENV__POST_PAGE_SIZE");
        assert_eq!(settings.post_page_size, 3);
    }

    #[test]
    fn custom_smiley_table_from_file() {
        let file = write_settings(
            "[[smilies]]\ntoken = \":wave:\"\nimage = \"wave.gif\"\n",
        );
        let settings = ForumSettings::load_with(Some(file.path()), "FORUMTEST_SMILIES").unwrap();
        assert_eq!(settings.smilies, vec![Smiley::new(":wave:", "wave.gif")]);
    }

    #[test]
    fn rejects_static_url_without_trailing_slash() {
        let file = write_settings("static_url = \"/static\"\n");
        let err = ForumSettings::load_with(Some(file.path()), "FORUMTEST_BAD").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "static_url", .. }));
    }

    #[test]
    fn rejects_zero_page_size() {
        let settings = ForumSettings { topic_page_size: 0, ..ForumSettings::default() };
        assert!(settings.validate().is_err());
    }
}
