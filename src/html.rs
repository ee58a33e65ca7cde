use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, List, Span};

/// Named, decimal and hex character references. These are already escaped and
/// pass through untouched so escaping is never applied twice.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});")
        .expect("entity pattern is valid")
});

/// Convert blocks to an HTML fragment
pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        emit_block(block, &mut out);
    }
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 3);
            out.push_str(&format!("<h{level}>"));
            spans_to_html(content, out);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Paragraph { content } => {
            out.push_str("<p>");
            spans_to_html(content, out);
            out.push_str("</p>");
        }
        Block::List(list) => list_to_html(list, out),
    }
}

fn list_to_html(list: &List, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for item in &list.items {
        out.push_str("<li>");
        spans_to_html(&item.content, out);
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_html(span, out);
    }
}

fn span_to_html(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) => push_escaped(text, Position::Text, out),
        Span::Bold(inner) => {
            out.push_str("<strong>");
            spans_to_html(inner, out);
            out.push_str("</strong>");
        }
        Span::Italic(inner) => {
            out.push_str("<em>");
            spans_to_html(inner, out);
            out.push_str("</em>");
        }
        Span::Link { url, label } => {
            out.push_str("<a href=\"");
            push_escaped(url, Position::Attribute, out);
            out.push_str("\">");
            push_escaped(label, Position::Text, out);
            out.push_str("</a>");
        }
    }
}

#[derive(Clone, Copy)]
enum Position {
    Text,
    Attribute,
}

/// Escape `text` for `position`, leaving existing character references intact.
fn push_escaped(text: &str, position: Position, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        encode(&rest[..amp], position, out);
        let tail = &rest[amp..];
        match ENTITY.find(tail) {
            Some(entity) => {
                out.push_str(entity.as_str());
                rest = &tail[entity.end()..];
            }
            None => {
                out.push_str("&amp;");
                rest = &tail[1..];
            }
        }
    }
    encode(rest, position, out);
}

fn encode(text: &str, position: Position, out: &mut String) {
    match position {
        Position::Text => {
            html_escape::encode_text_to_string(text, out);
        }
        Position::Attribute => {
            html_escape::encode_double_quoted_attribute_to_string(text, out);
        }
    }
}

/// Escape plain text for an HTML text position.
pub fn escape_text(text: &str) -> String {
    let mut out = String::new();
    push_escaped(text, Position::Text, &mut out);
    out
}
