//! Standalone HTML export: the rendered article body wrapped in a document
//! with a title, an inline stylesheet and an optional attribution footer.

use tracing::debug;

use crate::article::{Article, Attribution};
use crate::config::Config;
use crate::html::escape_text;

/// Build a complete HTML document for `article`.
///
/// The body is exactly [`crate::render`] of the article content, so the
/// exported file and the on-screen preview never disagree.
pub fn html_document(article: &Article, attribution: Option<&Attribution>, config: &Config) -> String {
    let title = escape_text(&article.title);
    let body = crate::render(&article.content);
    let footer = attribution
        .map(|attribution| {
            format!(
                "\n    <div class=\"footer\">{}</div>",
                escape_text(&attribution.footer(&config.document.app_name))
            )
        })
        .unwrap_or_default();

    debug!(title = %article.title, body_len = body.len(), "assembled html document");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{styles}    </style>
</head>
<body>
    <h1>{title}</h1>
    <div class="article-content">{body}</div>{footer}
</body>
</html>
"#,
        styles = stylesheet(config),
    )
}

fn stylesheet(config: &Config) -> String {
    let doc = &config.document;
    let decoration = if config.links.underline {
        "underline"
    } else {
        "none"
    };

    format!(
        "        body {{ font-family: {font}; line-height: 1.6; color: {text}; max-width: {width}; margin: 0 auto; padding: 20px; }}
        h1 {{ font-size: 28px; margin-bottom: 20px; color: {heading}; }}
        h2 {{ font-size: 22px; margin-top: 30px; margin-bottom: 15px; color: {text}; }}
        h3 {{ font-size: 18px; margin-top: 24px; margin-bottom: 12px; color: {text}; }}
        p {{ margin-bottom: 16px; }}
        a {{ color: {link}; text-decoration: {decoration}; }}
        .footer {{ margin-top: 40px; font-size: 12px; color: #666; border-top: 1px solid #ddd; padding-top: 10px; }}
",
        font = css_value(&doc.font_family),
        text = css_value(&doc.text_color),
        width = css_value(&doc.max_width),
        heading = css_value(&doc.heading_color),
        link = css_value(&config.links.color),
    )
}

/// Config values are spliced into CSS; drop anything that could end the rule
/// or the style element.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}
