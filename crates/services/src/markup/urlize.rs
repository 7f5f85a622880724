//! Turns bare URLs and e-mail addresses in HTML text into links.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::{Captures, Regex};

use super::html_walk::{transform_text, DEFAULT_EXCLUDED};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("word pattern compiles"));

static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://\[?\w").expect("url pattern compiles"));

static BARE_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^www\.|^\w[^@]+\.(com|edu|gov|int|mil|net|org)($|/.*)$").expect("domain pattern compiles")
});

/// Characters quoted in hrefs. `%` is left alone so existing escapes survive.
const HREF_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!'];
const WRAPPING_PUNCTUATION: &[(&str, &str)] = &[("(", ")"), ("[", "]"), ("&lt;", "&gt;"), ("&quot;", "&quot;"), ("&#39;", "&#39;")];

/// Links every URL found in the text runs of `html`.
///
/// Existing `<a>`, `<code>` and `<pre>` contents are left untouched, so the
/// function is safe to run over already-rendered post HTML.
pub fn urlize(html: &str) -> String {
    transform_text(html, DEFAULT_EXCLUDED, urlize_text)
}

fn urlize_text(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures<'_>| urlize_word(&caps[0])).into_owned()
}

fn urlize_word(word: &str) -> String {
    if !word.contains(['.', '@', ':']) {
        return word.to_string();
    }

    let (lead, middle, trail) = trim_punctuation(word);
    let unescaped = html_escape::decode_html_entities(middle);

    let (href, nofollow) = if HTTP_URL.is_match(middle) {
        (quote_href(&unescaped), true)
    } else if !middle.to_ascii_lowercase().starts_with("http") && !middle.contains("://") && BARE_DOMAIN.is_match(middle) {
        (format!("http://{}", quote_href(&unescaped)), true)
    } else if !middle.contains(':') && is_email_simple(&unescaped) {
        (format!("mailto:{unescaped}"), false)
    } else {
        return word.to_string();
    };

    let rel = if nofollow { " rel=\"nofollow\"" } else { "" };
    format!(
        "{lead}<a href=\"{}\"{rel}>{middle}</a>{trail}",
        html_escape::encode_double_quoted_attribute(&href)
    )
}

/// Splits a word into `(lead, middle, trail)`, peeling wrapping and trailing
/// punctuation off `middle` until nothing changes.
fn trim_punctuation(word: &str) -> (&str, &str, &str) {
    let mut start = 0;
    let mut end = word.len();

    loop {
        let before = (start, end);
        for &(opening, closing) in WRAPPING_PUNCTUATION {
            let middle = &word[start..end];
            if middle.starts_with(opening) && middle.len() > opening.len() {
                start += opening.len();
            }
            let middle = &word[start..end];
            // Only peel a closing mark that has no partner inside the word.
            if middle.ends_with(closing)
                && middle.len() > closing.len()
                && (opening == closing || middle.matches(closing).count() > middle.matches(opening).count())
            {
                end -= closing.len();
            }
        }

        let middle = &word[start..end];
        let stripped = middle.trim_end_matches(TRAILING_PUNCTUATION);
        end = start + stripped.len();

        if before == (start, end) {
            break;
        }
    }

    (&word[..start], &word[start..end], &word[end..])
}

fn quote_href(url: &str) -> String {
    utf8_percent_encode(url, HREF_UNSAFE).to_string()
}

fn is_email_simple(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn links_plain_url() {
        let text = "Lorem ipsum dolor sit amet, consectetur http://djangobb.org/ adipiscing elit.";
        assert_eq!(
            urlize(text),
            "Lorem ipsum dolor sit amet, consectetur <a href=\"http://djangobb.org/\" rel=\"nofollow\">http://djangobb.org/</a> adipiscing elit."
        );
    }

    #[test]
    fn keeps_trailing_punctuation_outside() {
        assert_eq!(
            urlize("see https://example.com/page."),
            "see <a href=\"https://example.com/page\" rel=\"nofollow\">https://example.com/page</a>."
        );
        assert_eq!(
            urlize("(www.example.com)"),
            "(<a href=\"http://www.example.com\" rel=\"nofollow\">www.example.com</a>)"
        );
    }

    #[test]
    fn keeps_balanced_parentheses_in_url() {
        assert_eq!(
            urlize("http://en.wikipedia.org/wiki/Rust_(language)"),
            "<a href=\"http://en.wikipedia.org/wiki/Rust_(language)\" rel=\"nofollow\">http://en.wikipedia.org/wiki/Rust_(language)</a>"
        );
    }

    #[test]
    fn links_bare_domain_and_email() {
        assert_eq!(urlize("djangobb.org"), "<a href=\"http://djangobb.org\" rel=\"nofollow\">djangobb.org</a>");
        assert_eq!(urlize("mail admin@example.com"), "mail <a href=\"mailto:admin@example.com\">admin@example.com</a>");
    }

    #[test]
    fn escaped_angle_brackets_wrap_url() {
        assert_eq!(
            urlize("&lt;http://a.org/?x=1&amp;y=2&gt;"),
            "&lt;<a href=\"http://a.org/?x=1&amp;y=2\" rel=\"nofollow\">http://a.org/?x=1&amp;y=2</a>&gt;"
        );
    }

    #[test]
    fn non_ascii_text_and_urls() {
        assert_eq!(
            urlize("été http://djangobb.org/"),
            "été <a href=\"http://djangobb.org/\" rel=\"nofollow\">http://djangobb.org/</a>"
        );
        assert_eq!(
            urlize("(http://example.com/straße)"),
            "(<a href=\"http://example.com/stra%C3%9Fe\" rel=\"nofollow\">http://example.com/straße</a>)"
        );
    }

    #[test]
    fn quotes_unsafe_href_characters() {
        assert_eq!(
            urlize("http://example.com/a^b"),
            "<a href=\"http://example.com/a%5Eb\" rel=\"nofollow\">http://example.com/a^b</a>"
        );
    }

    #[test]
    fn leaves_non_urls_alone() {
        assert_eq!(urlize("time 10:30, version 1.2 and a@b"), "time 10:30, version 1.2 and a@b");
        assert_eq!(urlize("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn does_not_relink_existing_anchors_or_code() {
        let html = "<a href=\"http://a.org/\">http://a.org/</a> <code>http://b.org/</code>";
        assert_eq!(urlize(html), html);
    }
}
