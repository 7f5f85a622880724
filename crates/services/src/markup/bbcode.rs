//! BBCode to HTML.
//!
//! Input is parsed into a small node tree first so that unmatched or
//! misnested tags can be repaired (or emitted literally) before anything is
//! rendered. All user text is HTML-escaped on output.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[/code\]").expect("code close pattern compiles"));

/// Open elements deeper than this are emitted as literal text.
const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Quote,
    Url,
    Email,
    Img,
    Color,
    List,
    ListItem,
    Code,
    Hr,
}

impl TagKind {
    fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "b" => TagKind::Bold,
            "i" => TagKind::Italic,
            "u" => TagKind::Underline,
            "s" => TagKind::Strike,
            "quote" => TagKind::Quote,
            "url" => TagKind::Url,
            "email" => TagKind::Email,
            "img" => TagKind::Img,
            "color" => TagKind::Color,
            "list" => TagKind::List,
            "*" => TagKind::ListItem,
            "code" => TagKind::Code,
            "hr" => TagKind::Hr,
            _ => return None,
        };
        Some(kind)
    }

    fn accepts_arg(self) -> bool {
        matches!(self, TagKind::Quote | TagKind::Url | TagKind::Email | TagKind::Color | TagKind::List)
    }

    fn requires_arg(self) -> bool {
        self == TagKind::Color
    }

    /// Block-level tags swallow the newline that follows their closing tag.
    fn is_block(self) -> bool {
        matches!(self, TagKind::Quote | TagKind::List | TagKind::Hr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    LineBreak,
    Code(String),
    Hr,
    Element { kind: TagKind, arg: Option<String>, children: Vec<Node> },
}

#[derive(Debug)]
struct RawTag<'a> {
    kind: TagKind,
    closing: bool,
    arg: Option<&'a str>,
    len: usize,
}

/// Recognizes `[name]`, `[name=arg]` and `[/name]` at the start of `s`.
/// A tag never spans a newline or another `[`, so the scan stops at either.
fn scan_tag(s: &str) -> Option<RawTag<'_>> {
    let inner_end = 1 + s.bytes().skip(1).position(|b| matches!(b, b']' | b'[' | b'\n'))?;
    if s.as_bytes()[inner_end] != b']' {
        return None;
    }
    let inner = &s[1..inner_end];

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (name, arg) = match inner.split_once('=') {
        Some((name, arg)) => (name, Some(arg)),
        None => (inner, None),
    };
    let kind = TagKind::from_name(&name.to_ascii_lowercase())?;

    match arg {
        Some(_) if closing || !kind.accepts_arg() => return None,
        Some(a) if a.trim().is_empty() => return None,
        None if !closing && kind.requires_arg() => return None,
        _ => {}
    }

    Some(RawTag { kind, closing, arg, len: inner_end + 1 })
}

struct Frame {
    kind: Option<TagKind>,
    arg: Option<String>,
    children: Vec<Node>,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    text_start: usize,
    stack: Vec<Frame>,
    /// Set once a search found no `[/code]` at or after this offset
    no_code_close_from: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            text_start: 0,
            stack: vec![Frame { kind: None, arg: None, children: Vec::new() }],
            no_code_close_from: None,
        }
    }

    /// Offset of the next `[/code]` (any case) at or after `from`.
    fn find_code_close(&mut self, from: usize) -> Option<usize> {
        if self.no_code_close_from.is_some_and(|at| from >= at) {
            return None;
        }
        match CODE_CLOSE.find(&self.src[from..]) {
            Some(m) => Some(from + m.start()),
            None => {
                self.no_code_close_from = Some(from);
                None
            }
        }
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn flush_text(&mut self) {
        if self.text_start < self.pos {
            let text = self.src[self.text_start..self.pos].to_string();
            self.top().children.push(Node::Text(text));
        }
    }

    /// Moves past a consumed token; text resumes after it.
    fn advance(&mut self, len: usize) {
        self.pos += len;
        self.text_start = self.pos;
    }

    fn skip_newline(&mut self) {
        if self.src[self.pos..].starts_with('\n') {
            self.advance(1);
        }
    }

    /// Pops the innermost frame into its parent.
    fn close_top(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            if let Some(kind) = frame.kind {
                self.top().children.push(Node::Element { kind, arg: frame.arg, children: frame.children });
            }
        }
    }

    fn parse(mut self) -> Vec<Node> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let Some(offset) = rest.find(['[', '\n']) else {
                self.pos = src.len();
                break;
            };
            self.pos += offset;

            if src[self.pos..].starts_with('\n') {
                self.flush_text();
                self.top().children.push(Node::LineBreak);
                self.advance(1);
                continue;
            }

            match scan_tag(&src[self.pos..]) {
                Some(tag) if self.accept(&tag) => {}
                // Not a tag we can use here: keep the bracket as text.
                _ => self.pos += 1,
            }
        }

        self.flush_text();
        while self.stack.len() > 1 {
            self.close_top();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }

    /// Applies a recognized tag. Returns `false` when it must stay literal.
    fn accept(&mut self, tag: &RawTag<'_>) -> bool {
        let src = self.src;
        let body_start = self.pos + tag.len;

        if tag.closing {
            let Some(depth) = self.stack.iter().rposition(|f| f.kind == Some(tag.kind)) else {
                return false;
            };
            self.flush_text();
            while self.stack.len() > depth {
                self.close_top();
            }
            self.advance(tag.len);
            if tag.kind.is_block() {
                self.skip_newline();
            }
            return true;
        }

        match tag.kind {
            TagKind::Code => {
                let Some(close_at) = self.find_code_close(body_start) else {
                    return false;
                };
                self.flush_text();
                let body = &src[body_start..close_at];
                let body = body.strip_prefix('\n').unwrap_or(body);
                let body = body.strip_suffix('\n').unwrap_or(body);
                self.top().children.push(Node::Code(body.to_string()));
                self.advance(close_at + "[/code]".len() - self.pos);
                let after = &src[self.pos..];
                let trailing_ws = after.len() - after.trim_start().len();
                self.advance(trailing_ws);
            }
            TagKind::Hr => {
                self.flush_text();
                self.top().children.push(Node::Hr);
                self.advance(tag.len);
                self.skip_newline();
            }
            TagKind::ListItem => {
                let in_list = matches!(self.top().kind, Some(TagKind::List) | Some(TagKind::ListItem));
                if !in_list {
                    return false;
                }
                self.flush_text();
                if self.top().kind == Some(TagKind::ListItem) {
                    self.close_top();
                }
                self.stack.push(Frame { kind: Some(TagKind::ListItem), arg: None, children: Vec::new() });
                self.advance(tag.len);
            }
            _ if self.stack.len() > MAX_NESTING => return false,
            kind => {
                self.flush_text();
                self.stack.push(Frame { kind: Some(kind), arg: tag.arg.map(str::to_string), children: Vec::new() });
                self.advance(tag.len);
            }
        }
        true
    }
}

/// Renders BBCode source as HTML.
pub fn render_bbcode(text: &str) -> String {
    let source = text.replace("\r\n", "\n");
    let nodes = Parser::new(&source).parse();
    let mut out = String::with_capacity(source.len() + source.len() / 4);
    render_nodes(&nodes, &mut out);
    out
}

fn render_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        render_node(node, out);
    }
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        Node::LineBreak => out.push_str("<br />"),
        Node::Hr => out.push_str("<hr />"),
        Node::Code(code) => {
            out.push_str("<div class=\"code\"><pre>");
            out.push_str(&html_escape::encode_text(code));
            out.push_str("</pre></div>");
        }
        Node::Element { kind, arg, children } => render_element(*kind, arg.as_deref(), children, out),
    }
}

fn render_element(kind: TagKind, arg: Option<&str>, children: &[Node], out: &mut String) {
    let wrap = |out: &mut String, open: &str, close: &str| {
        out.push_str(open);
        render_nodes(children, out);
        out.push_str(close);
    };

    match kind {
        TagKind::Bold => wrap(out, "<strong>", "</strong>"),
        TagKind::Italic => wrap(out, "<em>", "</em>"),
        TagKind::Underline => wrap(out, "<span style=\"text-decoration: underline\">", "</span>"),
        TagKind::Strike => wrap(out, "<del>", "</del>"),
        TagKind::Quote => {
            out.push_str("<blockquote><div class=\"incqbox\">");
            let author = arg.map(|a| a.trim().trim_matches('"').trim()).filter(|a| !a.is_empty());
            if let Some(author) = author {
                out.push_str("<h4>");
                out.push_str(&html_escape::encode_text(author));
                out.push_str(" wrote:</h4>");
            }
            render_nodes(trim_line_breaks(children), out);
            out.push_str("</div></blockquote>");
        }
        TagKind::Url => {
            let target = arg.map(str::to_string).unwrap_or_else(|| plain_text(children));
            match safe_url(&target) {
                Some(href) => {
                    out.push_str("<a href=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(&href));
                    out.push_str("\" rel=\"nofollow\">");
                    if children.is_empty() {
                        out.push_str(&html_escape::encode_text(&target));
                    } else {
                        render_nodes(children, out);
                    }
                    out.push_str("</a>");
                }
                None => render_nodes(children, out),
            }
        }
        TagKind::Email => {
            let address = arg.map(str::to_string).unwrap_or_else(|| plain_text(children));
            let address = address.trim();
            if is_email(address) {
                out.push_str("<a href=\"mailto:");
                out.push_str(&html_escape::encode_double_quoted_attribute(address));
                out.push_str("\">");
                render_nodes(children, out);
                out.push_str("</a>");
            } else {
                render_nodes(children, out);
            }
        }
        TagKind::Img => {
            let src = plain_text(children);
            match safe_url(&src) {
                Some(src) => {
                    out.push_str("<img src=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(&src));
                    out.push_str("\" alt=\"\" />");
                }
                None => out.push_str(&html_escape::encode_text(&src)),
            }
        }
        TagKind::Color => match arg.map(str::trim).filter(|c| is_color(c)) {
            Some(color) => {
                out.push_str("<span style=\"color: ");
                out.push_str(color);
                out.push_str("\">");
                render_nodes(children, out);
                out.push_str("</span>");
            }
            None => render_nodes(children, out),
        },
        TagKind::List => {
            let (open, close) = match arg.map(str::trim) {
                Some("1") => ("<ol>", "</ol>"),
                Some("a") => ("<ol style=\"list-style-type: lower-alpha\">", "</ol>"),
                _ => ("<ul>", "</ul>"),
            };
            out.push_str(open);
            for child in children {
                match child {
                    Node::LineBreak => {}
                    Node::Text(t) if t.trim().is_empty() => {}
                    other => render_node(other, out),
                }
            }
            out.push_str(close);
        }
        TagKind::ListItem => {
            out.push_str("<li>");
            render_nodes(trim_line_breaks(children), out);
            out.push_str("</li>");
        }
        // Code and Hr never become elements.
        TagKind::Code | TagKind::Hr => render_nodes(children, out),
    }
}

fn trim_line_breaks(nodes: &[Node]) -> &[Node] {
    let start = nodes.iter().position(|n| *n != Node::LineBreak).unwrap_or(nodes.len());
    let end = nodes.iter().rposition(|n| *n != Node::LineBreak).map_or(start, |i| i + 1);
    &nodes[start..end]
}

fn plain_text(nodes: &[Node]) -> String {
    nodes
        .iter()
        .filter_map(|n| match n {
            Node::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Accepts http(s)/ftp URLs and `www.` hosts; everything else (including
/// `javascript:`) is refused.
fn safe_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() || url.contains(|c: char| c.is_whitespace() || c == '"' || c == '<' || c == '>') {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("ftp://") {
        Some(url.to_string())
    } else if lower.starts_with("www.") {
        Some(format!("http://{url}"))
    } else {
        None
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(|c: char| c.is_whitespace() || c == '"' || c == '<' || c == '>')
}

fn is_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    !value.is_empty() && value.len() <= 20 && value.chars().all(|c| c.is_ascii_alphabetic())
}
