use crate::article::{Article, Attribution};
use crate::block::{Block, List, Span};
use crate::config::Config;
use crate::parser;

/// Lists up to this size are kept on one page.
const UNBREAKABLE_LIST_ITEMS: usize = 5;

/// Document-wide settings emitted before any content.
pub fn preamble(config: &Config) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str("#show link: set text(fill: rgb(\"");
    push_string_literal(&config.links.color, &mut out);
    out.push_str("\"))\n");
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');

    out
}

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block], config: &Config) -> String {
    let mut out = preamble(config);

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with following content
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                if let Some(next) = blocks.get(i + 1) {
                    i += 1;
                    emit_block(next, &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => emit_block(block, &mut out),
        }

        i += 1;
    }

    out
}

/// Typst markup for a whole article: title heading, body, attribution footer.
pub fn article_to_typst(article: &Article, attribution: Option<&Attribution>, config: &Config) -> String {
    let mut blocks = vec![Block::Heading {
        level: 1,
        content: vec![Span::Text(article.title.clone())],
    }];
    blocks.extend(parser::parse(&article.content));

    let mut out = blocks_to_typst(&blocks, config);
    if let Some(attribution) = attribution {
        out.push_str("#line(length: 100%)\n#text(size: 9pt, fill: luma(40%))[");
        push_text(&attribution.footer(&config.document.app_name), &mut out);
        out.push_str("]\n");
    }
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content } => {
            for _ in 0..(*level).clamp(1, 3) {
                out.push('=');
            }
            out.push(' ');
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::Paragraph { content } => {
            spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::List(list) => {
            // Small lists stay together, large ones may break
            if list.items.len() <= UNBREAKABLE_LIST_ITEMS {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(list, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(list, out);
                out.push('\n');
            }
        }
    }
}

fn list_to_typst(list: &List, out: &mut String) {
    let marker = if list.ordered { "+ " } else { "- " };
    for item in &list.items {
        out.push_str(marker);
        spans_to_typst(&item.content, out);
        out.push('\n');
    }
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    let mut after_call = false;
    for span in spans {
        // `#strong[a](b)` or `#emph[a].b` would extend the call
        if let Span::Text(text) = span {
            if after_call && text.starts_with(['(', '.']) {
                out.push('\\');
            }
        }
        span_to_typst(span, out);
        after_call = !matches!(span, Span::Text(_));
    }
}

fn span_to_typst(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) => push_text(text, out),
        // Function syntax rather than `*`/`_`, which Typst ignores inside words
        Span::Bold(inner) => {
            out.push_str("#strong[");
            spans_to_typst(inner, out);
            out.push(']');
        }
        Span::Italic(inner) => {
            out.push_str("#emph[");
            spans_to_typst(inner, out);
            out.push(']');
        }
        Span::Link { url, label } => {
            out.push_str("#link(\"");
            push_string_literal(&html_escape::decode_html_entities(url), out);
            out.push_str("\")[");
            push_text(label, out);
            out.push(']');
        }
    }
}

/// Escape text for Typst markup. Character references are decoded first so the
/// PDF shows the character, and line breaks fold into spaces so no line can
/// start with a heading or list marker.
fn push_text(text: &str, out: &mut String) {
    for ch in html_escape::decode_html_entities(text).chars() {
        match ch {
            '\n' | '\r' => out.push(' '),
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' | '=' | '-'
            | '+' | '"' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn push_string_literal(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' | '\r' => {}
            _ => out.push(ch),
        }
    }
}
