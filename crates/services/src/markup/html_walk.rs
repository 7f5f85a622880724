//! Minimal HTML fragment scanner.
//!
//! Splits rendered post HTML into tags and text runs so that text-level
//! filters (links, emoticons) can run without touching markup, attribute
//! values or the contents of elements such as `<a>` and `<pre>`.

/// Elements whose contents are never rewritten by text filters.
pub const DEFAULT_EXCLUDED: &[&str] = &["a", "code", "pre"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Full source of the tag, `<` through `>`
    pub raw: &'a str,
    pub name: &'a str,
    pub closing: bool,
    pub self_closing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Tag(Tag<'a>),
    /// Comments, doctypes and processing instructions
    Other(&'a str),
}

/// Iterator over the segments of an HTML fragment. Adjacent text is always
/// yielded as a single run.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    src: &'a str,
    pos: usize,
}

pub fn segments(html: &str) -> Segments<'_> {
    Segments { src: html, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if let Some((segment, len)) = scan_markup(rest) {
            self.pos += len;
            return Some(segment);
        }

        // Text runs until the next `<` that actually opens markup.
        let mut end = rest.len();
        let mut search = rest.chars().next().map_or(rest.len(), char::len_utf8);
        while let Some(idx) = rest[search..].find('<') {
            let at = search + idx;
            if scan_markup(&rest[at..]).is_some() {
                end = at;
                break;
            }
            search = at + 1;
        }
        self.pos += end;
        Some(Segment::Text(&rest[..end]))
    }
}

fn scan_markup(s: &str) -> Option<(Segment<'_>, usize)> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }

    if let Some(body) = s.strip_prefix("<!--") {
        let end = body.find("-->")? + 4 + 3;
        return Some((Segment::Other(&s[..end]), end));
    }
    if matches!(bytes.get(1), Some(b'!') | Some(b'?')) {
        let end = s.find('>')? + 1;
        return Some((Segment::Other(&s[..end]), end));
    }

    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    let name_end = bytes[name_start..]
        .iter()
        .position(|b| !b.is_ascii_alphanumeric())
        .map_or(bytes.len(), |p| name_start + p);

    let mut quote: Option<u8> = None;
    let mut close_at = None;
    for (i, &b) in bytes.iter().enumerate().skip(name_end) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => {
                close_at = Some(i);
                break;
            }
            None => {}
        }
    }
    let close_at = close_at?;

    let raw = &s[..=close_at];
    let tag = Tag {
        raw,
        name: &s[name_start..name_end],
        closing,
        self_closing: raw[..raw.len() - 1].trim_end().ends_with('/'),
    };
    Some((Segment::Tag(tag), close_at + 1))
}

/// Applies `filter` to every text run that is not inside one of the
/// `excluded` elements. Everything else is copied through unchanged.
pub fn transform_text<F>(html: &str, excluded: &[&str], mut filter: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(html.len());
    let mut open: Vec<&str> = Vec::new();

    for segment in segments(html) {
        match segment {
            Segment::Text(text) if open.is_empty() => out.push_str(&filter(text)),
            Segment::Text(text) => out.push_str(text),
            Segment::Tag(tag) => {
                if excluded.iter().any(|e| e.eq_ignore_ascii_case(tag.name)) {
                    if tag.closing {
                        // Stray close tags are ignored.
                        if let Some(i) = open.iter().rposition(|n| n.eq_ignore_ascii_case(tag.name)) {
                            open.truncate(i);
                        }
                    } else if !tag.self_closing {
                        open.push(tag.name);
                    }
                }
                out.push_str(tag.raw);
            }
            Segment::Other(raw) => out.push_str(raw),
        }
    }
    out
}

/// Removes every tag and comment and decodes entities in what remains.
pub fn strip_tags(html: &str) -> String {
    let text: String = segments(html)
        .filter_map(|segment| match segment {
            Segment::Text(t) => Some(t),
            _ => None,
        })
        .collect();
    html_escape::decode_html_entities(&text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_tags_and_text() {
        let parts: Vec<_> = segments("a <b class=\"x>y\">bold</b> c").collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], Segment::Text("a "));
        match parts[1] {
            Segment::Tag(tag) => {
                assert_eq!(tag.name, "b");
                assert_eq!(tag.raw, "<b class=\"x>y\">");
                assert!(!tag.closing);
            }
            other => panic!("expected tag, got {other:?}"),
        }
        assert_eq!(parts[2], Segment::Text("bold"));
        assert_eq!(parts[4], Segment::Text(" c"));
    }

    #[test]
    fn bare_angle_brackets_stay_in_text() {
        let parts: Vec<_> = segments("1 < 2 and 3 <= 4 <br />").collect();
        assert_eq!(parts[0], Segment::Text("1 < 2 and 3 <= 4 "));
        assert!(matches!(parts[1], Segment::Tag(Tag { name: "br", self_closing: true, .. })));
    }

    #[test]
    fn unterminated_tag_is_text() {
        let parts: Vec<_> = segments("x <a href=").collect();
        assert_eq!(parts, vec![Segment::Text("x <a href=")]);
    }

    #[test]
    fn multibyte_text_runs() {
        let parts: Vec<_> = segments("été <strong>Привет</strong>ü").collect();
        assert_eq!(parts[0], Segment::Text("été "));
        assert_eq!(parts[2], Segment::Text("Привет"));
        assert_eq!(parts[4], Segment::Text("ü"));

        let out = transform_text("ü<b>ö</b>", DEFAULT_EXCLUDED, |t| t.to_uppercase());
        assert_eq!(out, "Ü<b>Ö</b>");
        assert_eq!(strip_tags("<p>Привет &amp; пока</p>"), "Привет & пока");
    }

    #[test]
    fn comments_are_opaque() {
        let out = transform_text("<!-- :) -->:)", DEFAULT_EXCLUDED, |t| t.replace(":)", "!"));
        assert_eq!(out, "<!-- :) -->!");
    }

    #[test]
    fn skips_excluded_elements() {
        let html = "up <a href=\"/x\">in <em>link</em></a> <PRE>pre</PRE> down";
        let out = transform_text(html, DEFAULT_EXCLUDED, |t| t.to_uppercase());
        assert_eq!(out, "UP <a href=\"/x\">in <em>link</em></a> <PRE>pre</PRE> DOWN");
    }

    #[test]
    fn stray_close_tag_does_not_break_nesting() {
        let out = transform_text("</a>x<code>y</code>z", DEFAULT_EXCLUDED, |t| t.to_uppercase());
        assert_eq!(out, "</a>X<code>y</code>Z");
    }

    #[test]
    fn strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<p>Tom &amp; Jerry</p><br /><!-- c -->&lt;3"), "Tom & Jerry<3");
    }
}
