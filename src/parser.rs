use crate::block::{Block, InlineRun, List, ListItem, Span};

/// Emphasis deeper than this is left as literal asterisks.
const MAX_NESTING: usize = 2;

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut state = ParseState::default();

    for line in markdown.lines() {
        process_line(classify(line), &mut state);
    }
    state.close_block();

    state.blocks
}

/// One source line, classified by its leading marker.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    Item { ordered: bool, text: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if let Some((level, text)) = heading(line) {
        return Line::Heading { level, text };
    }
    if let Some(text) = unordered_item(line) {
        return Line::Item {
            ordered: false,
            text,
        };
    }
    if let Some(text) = ordered_item(line) {
        return Line::Item {
            ordered: true,
            text,
        };
    }
    Line::Text(line)
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    let text = after_marker(&line[level..])?;
    Some((level as u8, text))
}

fn unordered_item(line: &str) -> Option<&str> {
    after_marker(line.strip_prefix(['-', '*'])?)
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    after_marker(line[digits..].strip_prefix('.')?)
}

/// A marker only counts when whitespace separates it from non-empty text.
fn after_marker(rest: &str) -> Option<&str> {
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim_start();
    (!text.is_empty()).then_some(text)
}

#[derive(Default)]
enum OpenBlock<'a> {
    #[default]
    Outside,
    Paragraph(Vec<&'a str>),
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
}

#[derive(Default)]
struct ParseState<'a> {
    open: OpenBlock<'a>,
    blocks: Vec<Block>,
}

impl ParseState<'_> {
    fn close_block(&mut self) {
        match std::mem::take(&mut self.open) {
            OpenBlock::Outside => {}
            OpenBlock::Paragraph(lines) => {
                let content = parse_inline(&lines.join("\n"));
                self.blocks.push(Block::Paragraph { content });
            }
            OpenBlock::List { ordered, items } => {
                self.blocks.push(Block::List(List { ordered, items }));
            }
        }
    }
}

fn process_line<'a>(line: Line<'a>, state: &mut ParseState<'a>) {
    match line {
        Line::Blank => state.close_block(),

        // Headings are single-line blocks
        Line::Heading { level, text } => {
            state.close_block();
            let content = parse_inline(text);
            state.blocks.push(Block::Heading { level, content });
        }

        Line::Item { ordered, text } => {
            let item = ListItem {
                content: parse_inline(text),
            };
            // Same-kind items extend the open list
            if let OpenBlock::List {
                ordered: open_ordered,
                items,
            } = &mut state.open
            {
                if *open_ordered == ordered {
                    items.push(item);
                    return;
                }
            }
            state.close_block();
            state.open = OpenBlock::List {
                ordered,
                items: vec![item],
            };
        }

        Line::Text(text) => {
            if let OpenBlock::Paragraph(lines) = &mut state.open {
                lines.push(text);
                return;
            }
            state.close_block();
            state.open = OpenBlock::Paragraph(vec![text]);
        }
    }
}

/// Parse the inline markup of a single block.
pub fn parse_inline(text: &str) -> InlineRun {
    parse_spans(text, 0)
}

fn parse_spans(text: &str, depth: usize) -> Vec<Span> {
    let closers = Closers::new(text);
    let mut spans = Vec::new();
    let mut literal = String::new();
    let emphasis = depth < MAX_NESTING;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if emphasis && rest.starts_with("**") {
            if let Some(close) = closers.bold_close(i + 2) {
                flush_text(&mut literal, &mut spans);
                spans.push(Span::Bold(parse_spans(&text[i + 2..close], depth + 1)));
                i = close + 2;
            } else {
                literal.push_str("**");
                i += 2;
            }
            continue;
        }

        if emphasis && rest.starts_with('*') {
            if let Some(close) = closers.italic_close(i + 1) {
                flush_text(&mut literal, &mut spans);
                spans.push(Span::Italic(parse_spans(&text[i + 1..close], depth + 1)));
                i = close + 1;
            } else {
                literal.push('*');
                i += 1;
            }
            continue;
        }

        if let Some(link) = closers.link_at(i) {
            flush_text(&mut literal, &mut spans);
            spans.push(Span::Link {
                url: link.url.to_string(),
                label: link.label.to_string(),
            });
            i += link.len;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        literal.push(ch);
        i += ch.len_utf8();
    }

    flush_text(&mut literal, &mut spans);
    spans
}

fn flush_text(literal: &mut String, spans: &mut Vec<Span>) {
    if !literal.is_empty() {
        spans.push(Span::Text(std::mem::take(literal)));
    }
}

struct LinkMatch<'a> {
    label: &'a str,
    url: &'a str,
    /// Bytes consumed, brackets and parentheses included.
    len: usize,
}

/// Closer positions for one run of inline text, indexed by byte offset and
/// filled in a single backward pass. Every lookup is O(1), so an opener that
/// never closes costs nothing beyond its own character.
struct Closers<'a> {
    text: &'a str,
    /// Next `**` at or after the offset whose preceding char is not whitespace.
    bold: Vec<Option<usize>>,
    /// Where an italic scan starting at the offset stops, indexed by whether
    /// the char before the offset is whitespace.
    italic: Vec<[Option<usize>; 2]>,
    bracket: Vec<Option<usize>>,
    paren: Vec<Option<usize>>,
    newline: Vec<Option<usize>>,
}

impl<'a> Closers<'a> {
    fn new(text: &'a str) -> Self {
        let len = text.len();
        let mut closers = Self {
            text,
            bold: vec![None; len + 1],
            italic: vec![[None; 2]; len + 1],
            bracket: vec![None; len + 1],
            paren: vec![None; len + 1],
            newline: vec![None; len + 1],
        };

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        for k in (0..chars.len()).rev() {
            let (at, ch) = chars[k];
            let next = at + ch.len_utf8();

            closers.bracket[at] = if ch == ']' { Some(at) } else { closers.bracket[next] };
            closers.paren[at] = if ch == ')' { Some(at) } else { closers.paren[next] };
            closers.newline[at] = if ch == '\n' { Some(at) } else { closers.newline[next] };

            let pair = ch == '*' && text[next..].starts_with('*');
            let after_text = k > 0 && !chars[k - 1].1.is_whitespace();
            closers.bold[at] = if pair && after_text {
                Some(at)
            } else {
                closers.bold[next]
            };

            closers.italic[at] = [
                closers.italic_step(at, ch, pair, false),
                closers.italic_step(at, ch, pair, true),
            ];
        }

        closers
    }

    /// One step of the italic scan at `at`; everything after `at` is already
    /// resolved. Complete bold pairs and links are stepped over so their
    /// asterisks never close the italic.
    fn italic_step(&self, at: usize, ch: char, pair: bool, after_space: bool) -> Option<usize> {
        let next = at + ch.len_utf8();
        if pair {
            let resume = self.bold_close(at + 2).map_or(at + 2, |close| close + 2);
            return self.italic[resume][0];
        }
        if ch == '*' {
            return if after_space {
                self.italic[next][0]
            } else {
                Some(at)
            };
        }
        if let Some(link) = self.link_at(at) {
            return self.italic[at + link.len][0];
        }
        self.italic[next][usize::from(ch.is_whitespace())]
    }

    /// Closing `**` for bold content starting at `from`. The content must be
    /// non-empty and must neither start nor end with whitespace.
    fn bold_close(&self, from: usize) -> Option<usize> {
        let first = self.text[from..].chars().next()?;
        if first.is_whitespace() {
            return None;
        }
        let mut close = self.bold[from + first.len_utf8()]?;
        // `***x***`: bold wraps italic, so the closer is the last two stars
        if first == '*' && self.text[close + 2..].starts_with('*') {
            close += 1;
        }
        Some(close)
    }

    /// Closing `*` for italic content starting at `from`.
    fn italic_close(&self, from: usize) -> Option<usize> {
        let first = self.text[from..].chars().next()?;
        if first.is_whitespace() || first == '*' {
            return None;
        }
        self.italic[from + first.len_utf8()][0]
    }

    /// Match `[label](url)` at `at`. Label and url are non-empty and
    /// single-line; the label ends at the first `]`, the url at the first `)`.
    fn link_at(&self, at: usize) -> Option<LinkMatch<'a>> {
        let text = self.text;
        if !text[at..].starts_with('[') {
            return None;
        }
        let label_end = self.bracket[at + 1]?;
        if !text[label_end + 1..].starts_with('(') {
            return None;
        }
        let url_end = self.paren[label_end + 2]?;

        let label = &text[at + 1..label_end];
        let url = &text[label_end + 2..url_end];
        let multiline = self.newline[at + 1].is_some_and(|newline| newline < url_end);
        if label.is_empty() || url.is_empty() || multiline {
            return None;
        }

        Some(LinkMatch {
            label,
            url,
            len: url_end + 1 - at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    #[rstest]
    #[case("", Line::Blank)]
    #[case("   \t", Line::Blank)]
    #[case("# Title", Line::Heading { level: 1, text: "Title" })]
    #[case("### Deep", Line::Heading { level: 3, text: "Deep" })]
    #[case("#### Too deep", Line::Text("#### Too deep"))]
    #[case("#hashtag", Line::Text("#hashtag"))]
    #[case("#", Line::Text("#"))]
    #[case("- item", Line::Item { ordered: false, text: "item" })]
    #[case("  * item", Line::Item { ordered: false, text: "item" })]
    #[case("12. item", Line::Item { ordered: true, text: "item" })]
    #[case("12.5 percent", Line::Text("12.5 percent"))]
    #[case("-", Line::Text("-"))]
    #[case("**bold** start", Line::Text("**bold** start"))]
    fn classifies_lines(#[case] input: &str, #[case] expected: Line<'static>) {
        assert_eq!(classify(input), expected);
    }

    #[test]
    fn paragraph_lines_join_until_blank() {
        let blocks = parse("one\ntwo\n\nthree");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![text("one\ntwo")]
                },
                Block::Paragraph {
                    content: vec![text("three")]
                },
            ]
        );
    }

    #[test]
    fn heading_interrupts_paragraph() {
        let blocks = parse("intro\n## Next\nbody");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![text("intro")]
                },
                Block::Heading {
                    level: 2,
                    content: vec![text("Next")]
                },
                Block::Paragraph {
                    content: vec![text("body")]
                },
            ]
        );
    }

    #[test]
    fn list_kind_change_starts_new_list() {
        let blocks = parse("- a\n- b\n1. c\n2. d\ntail");
        let kinds: Vec<_> = blocks
            .iter()
            .map(|b| match b {
                Block::List(l) => (Some(l.ordered), l.items.len()),
                _ => (None, 0),
            })
            .collect();
        assert_eq!(kinds, vec![(Some(false), 2), (Some(true), 2), (None, 0)]);
    }

    #[test]
    fn blank_line_closes_list() {
        let blocks = parse("- a\n\n- b");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            parse_inline("**bold** and *italic*"),
            vec![
                Span::Bold(vec![text("bold")]),
                text(" and "),
                Span::Italic(vec![text("italic")]),
            ]
        );
    }

    #[test]
    fn bold_wrapping_italic() {
        assert_eq!(
            parse_inline("***both***"),
            vec![Span::Bold(vec![Span::Italic(vec![text("both")])])]
        );
        assert_eq!(
            parse_inline("**a *b* c**"),
            vec![Span::Bold(vec![
                text("a "),
                Span::Italic(vec![text("b")]),
                text(" c")
            ])]
        );
    }

    #[test]
    fn italic_wrapping_bold() {
        assert_eq!(
            parse_inline("*a **b** c*"),
            vec![Span::Italic(vec![
                text("a "),
                Span::Bold(vec![text("b")]),
                text(" c")
            ])]
        );
    }

    #[test]
    fn third_level_emphasis_is_literal() {
        assert_eq!(
            parse_inline("*a **b *c* d** e*"),
            vec![Span::Italic(vec![
                text("a "),
                Span::Bold(vec![text("b *c* d")]),
                text(" e")
            ])]
        );
    }

    #[rstest]
    #[case("2 * 3 = 6")]
    #[case("2 * 3 * 4")]
    #[case("**unclosed")]
    #[case("*unclosed")]
    #[case("****")]
    #[case("a ** b")]
    #[case("[label](")]
    #[case("[label] (url)")]
    #[case("[](url)")]
    #[case("[label]()")]
    fn unmatched_markers_stay_literal(#[case] input: &str) {
        assert_eq!(parse_inline(input), vec![text(input)]);
    }

    #[test]
    fn link() {
        assert_eq!(
            parse_inline("see [docs](https://example.com) now"),
            vec![
                text("see "),
                Span::Link {
                    url: "https://example.com".to_string(),
                    label: "docs".to_string()
                },
                text(" now"),
            ]
        );
    }

    #[test]
    fn link_label_is_literal() {
        assert_eq!(
            parse_inline("[**x**](u)"),
            vec![Span::Link {
                url: "u".to_string(),
                label: "**x**".to_string()
            }]
        );
    }

    #[test]
    fn asterisk_in_link_does_not_close_italic() {
        assert_eq!(
            parse_inline("*see [a](x*y) here*"),
            vec![Span::Italic(vec![
                text("see "),
                Span::Link {
                    url: "x*y".to_string(),
                    label: "a".to_string()
                },
                text(" here"),
            ])]
        );
    }

    #[test]
    fn emphasis_does_not_cross_blocks() {
        let blocks = parse("*open\n\nclose*");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![text("*open")]
                },
                Block::Paragraph {
                    content: vec![text("close*")]
                },
            ]
        );
    }

    #[test]
    fn long_unclosed_runs_stay_literal() {
        let input = "*a **b ".repeat(5_000);
        assert_eq!(parse_inline(&input), vec![text(&input)]);

        let input = "[x](".repeat(5_000);
        assert_eq!(parse_inline(&input), vec![text(&input)]);
    }

    #[test]
    fn closer_found_far_ahead() {
        let filler = "word ".repeat(2_000);
        let input = format!("*{filler}end* **{filler}end**");
        assert_eq!(
            parse_inline(&input),
            vec![
                Span::Italic(vec![text(&format!("{filler}end"))]),
                text(" "),
                Span::Bold(vec![text(&format!("{filler}end"))]),
            ]
        );
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(parse_inline("*é*"), vec![Span::Italic(vec![text("é")])]);
        assert_eq!(parse_inline("**é"), vec![text("**é")]);
    }
}
