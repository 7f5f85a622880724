//! Syntax highlighting for fenced code blocks.

use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Class prefix for highlight spans; stylesheets target `.codehilite .hl-*`.
pub const CLASS_PREFIX: &str = "hl-";

/// Highlights `code` as `lang`, returning HTML spans with CSS classes.
///
/// Returns `None` when the language is unknown so the caller can fall back
/// to an unhighlighted block.
pub fn highlight_code(code: &str, lang: &str) -> Option<String> {
    let Some(syntax) = SYNTAXES.find_syntax_by_token(lang) else {
        tracing::warn!(lang, "no syntax definition for code block language");
        return None;
    };

    let mut generator = ClassedHTMLGenerator::new_with_class_style(
        syntax,
        &SYNTAXES,
        ClassStyle::SpacedPrefixed { prefix: CLASS_PREFIX },
    );
    for line in LinesWithEndings::from(code) {
        if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(lang, error = %err, "highlighting failed");
            return None;
        }
    }
    Some(generator.finalize())
}
