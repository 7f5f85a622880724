//! Markdown to HTML via pulldown-cmark.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[cfg(feature = "highlight")]
use super::highlight;

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH
}

/// Renders Markdown as HTML.
///
/// Raw HTML in the source is escaped rather than passed through. Fenced
/// code blocks that name a known language are syntax-highlighted when the
/// `highlight` feature is enabled.
pub fn render_markdown(text: &str) -> String {
    let events = escape_raw_html(Parser::new_ext(text, options()));
    let events = highlight_code_blocks(events);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn escape_raw_html<'a>(parser: Parser<'a>) -> impl Iterator<Item = Event<'a>> {
    parser.map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    })
}

/// Replaces each fenced block the highlighter understands with a single
/// pre-rendered HTML event. Other blocks pass through unchanged.
fn highlight_code_blocks<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut pending: Option<(String, Vec<Event<'a>>)> = None;

    for event in events {
        if let Some((_, buffered)) = pending.as_mut() {
            let block_done = matches!(event, Event::End(TagEnd::CodeBlock));
            buffered.push(event);
            if block_done {
                if let Some((lang, buffered)) = pending.take() {
                    out.extend(render_block(&lang, buffered));
                }
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info.split_whitespace().next().unwrap_or_default().to_string();
                let start = Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)));
                if lang.is_empty() {
                    out.push(start);
                } else {
                    pending = Some((lang, vec![start]));
                }
            }
            other => out.push(other),
        }
    }

    // Unterminated block: emit what was buffered as-is.
    if let Some((_, buffered)) = pending {
        out.extend(buffered);
    }
    out
}

#[cfg(feature = "highlight")]
fn render_block<'a>(lang: &str, buffered: Vec<Event<'a>>) -> Vec<Event<'a>> {
    let code: String = buffered
        .iter()
        .filter_map(|e| match e {
            Event::Text(t) => Some(&**t),
            _ => None,
        })
        .collect();

    match highlight::highlight_code(&code, lang) {
        Some(body) => {
            let html = format!("<div class=\"codehilite\"><pre><code>{body}</code></pre></div>\n");
            vec![Event::Html(html.into())]
        }
        None => buffered,
    }
}

#[cfg(not(feature = "highlight"))]
fn render_block<'a>(_lang: &str, buffered: Vec<Event<'a>>) -> Vec<Event<'a>> {
    buffered
}
