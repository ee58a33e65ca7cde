/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(Vec<Span>),
    Italic(Vec<Span>),
    /// Label is kept as literal text; `url` is the captured destination, unvalidated.
    Link { url: String, label: String },
}

/// Ordered spans making up the text of one block or list item.
pub type InlineRun = Vec<Span>;

/// A single list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: InlineRun,
}

/// A list (ordered or unordered)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `level` is always within 1..=3.
    Heading {
        level: u8,
        content: InlineRun,
    },
    Paragraph {
        content: InlineRun,
    },
    List(List),
}
