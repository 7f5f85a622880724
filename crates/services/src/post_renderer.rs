//! # PostRenderer
//!
//! Fills the derived fields of a [`Post`] from its raw body: the display
//! HTML (markup, links, optional emoticons) and a tag-free text version.

use configs::ForumSettings;
use domains::{MarkupMode, Post, Result};

use crate::markup::{render_markup, strip_tags, Smilies};

#[derive(Debug, Clone)]
pub struct PostRenderer {
    /// `None` when emoticon support is switched off
    smilies: Option<Smilies>,
}

impl PostRenderer {
    pub fn new(smilies: Option<Smilies>) -> Self {
        Self { smilies }
    }

    pub fn from_settings(settings: &ForumSettings) -> Result<Self> {
        let smilies = if settings.smilies_support {
            Some(Smilies::from_settings(settings)?)
        } else {
            None
        };
        Ok(Self::new(smilies))
    }

    /// Display HTML for `body` written in `markup`.
    pub fn render_html(&self, body: &str, markup: MarkupMode) -> String {
        let html = render_markup(body, markup);
        match &self.smilies {
            Some(smilies) => smilies.apply(&html),
            None => html,
        }
    }

    /// Recomputes `body_html` and `body_text` from `body`.
    pub fn render(&self, post: &mut Post) {
        post.body_html = self.render_html(&post.body, post.markup);
        post.body_text = strip_tags(&post.body_html);
        tracing::debug!(post_id = %post.id, markup = %post.markup, "post rendered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn renders_html_and_text() {
        let renderer = PostRenderer::from_settings(&ForumSettings::default()).unwrap();
        let mut post = Post::new(Uuid::now_v7(), "admin", MarkupMode::Bbcode, "[b]Hi[/b] :) http://djangobb.org/");
        renderer.render(&mut post);

        assert_eq!(
            post.body_html,
            "<strong>Hi</strong> <img src=\"/static/djangobb_forum/img/smilies/smile.png\" /> \
             <a href=\"http://djangobb.org/\" rel=\"nofollow\">http://djangobb.org/</a>"
        );
        assert_eq!(post.body_text, "Hi  http://djangobb.org/");
    }

    #[test]
    fn smilies_can_be_disabled() {
        let settings = ForumSettings { smilies_support: false, ..ForumSettings::default() };
        let renderer = PostRenderer::from_settings(&settings).unwrap();
        assert_eq!(renderer.render_html("=)", MarkupMode::Bbcode), "=)");
    }

    #[test]
    fn markdown_post_keeps_code_free_of_emoticons() {
        let renderer = PostRenderer::new(Some(Smilies::from_settings(&ForumSettings::default()).unwrap()));
        let html = renderer.render_html("`:)` :)", MarkupMode::Markdown);
        assert_eq!(
            html,
            "<p><code>:)</code> <img src=\"/static/djangobb_forum/img/smilies/smile.png\" /></p>\n"
        );
    }

    #[test]
    fn text_version_decodes_entities() {
        let renderer = PostRenderer::new(None);
        let mut post = Post::new(Uuid::now_v7(), "u", MarkupMode::Bbcode, "a < b & [i]c[/i]");
        renderer.render(&mut post);
        assert_eq!(post.body_html, "a &lt; b &amp; <em>c</em>");
        assert_eq!(post.body_text, "a < b & c");
    }
}
