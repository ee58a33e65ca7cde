//! Render generated articles written in a small Markdown subset.
//!
//! [`render`] is the single entry point for HTML: the on-screen preview and
//! the exported document both go through it. It never fails; markup that
//! does not fully match is emitted as escaped literal text.
//!
//! Link targets are copied verbatim (escaped for the attribute) and their
//! scheme is not checked. Callers displaying untrusted output should sandbox
//! links themselves.

mod article;
mod block;
mod config;
mod document;
mod error;
mod html;
mod parser;
mod typst;

pub use article::{Article, Attribution, UNTITLED, split_title};
pub use block::{Block, InlineRun, List, ListItem, Span};
pub use config::{Config, ConfigError, DocumentConfig, LinksConfig, PageConfig};
pub use document::html_document;
pub use error::ExportError;

use tracing::debug;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Render markdown to an HTML fragment safe for direct injection.
pub fn render(markdown: &str) -> String {
    let blocks = parse(markdown);
    let html = html::blocks_to_html(&blocks);
    debug!(blocks = blocks.len(), html_len = html.len(), "rendered markdown");
    html
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    typst::blocks_to_typst(&blocks, config)
}

/// Typst markup for an article with its title and optional footer.
pub fn article_to_typst(article: &Article, attribution: Option<&Attribution>, config: &Config) -> String {
    typst::article_to_typst(article, attribution, config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, ExportError> {
    markdown_to_pdf_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>, ExportError> {
    compile_pdf(markdown_to_typst_with_config(markdown, config))
}

/// Export an article (title, body, footer) as PDF bytes.
pub fn article_to_pdf(
    article: &Article,
    attribution: Option<&Attribution>,
    config: &Config,
) -> Result<Vec<u8>, ExportError> {
    compile_pdf(article_to_typst(article, attribution, config))
}

fn compile_pdf(typst_content: String) -> Result<Vec<u8>, ExportError> {
    use typst_library::layout::PagedDocument;

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| ExportError::Compile(format!("{e:?}")))?;
    debug!(pages = doc.pages.len(), "compiled typst document");

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| ExportError::Pdf(format!("{e:?}")))
}
