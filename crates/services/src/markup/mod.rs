//! # Markup
//!
//! Turns user-authored post bodies into display HTML.

pub mod bbcode;
#[cfg(feature = "highlight")]
pub mod highlight;
pub mod html_walk;
pub mod markdown;
pub mod smiles;
pub mod urlize;

use domains::{MarkupMode, Result};

pub use bbcode::render_bbcode;
pub use html_walk::strip_tags;
pub use markdown::render_markdown;
pub use smiles::{smiles, Smilies};
pub use urlize::urlize;

/// Renders `text` in the given markup and links any bare URLs left in the
/// output. Emoticons are a separate step (see [`Smilies`]).
pub fn render_markup(text: &str, mode: MarkupMode) -> String {
    tracing::debug!(markup = %mode, len = text.len(), "rendering post body");
    let html = match mode {
        MarkupMode::Bbcode => render_bbcode(text),
        MarkupMode::Markdown => render_markdown(text),
    };
    urlize(&html)
}

/// String-keyed entry point: `markup` must be `"bbcode"` or `"markdown"`.
pub fn convert_text_to_html(text: &str, markup: &str) -> Result<String> {
    let mode: MarkupMode = markup.parse()?;
    Ok(render_markup(text, mode))
}
