use std::sync::LazyLock;

use regex::Regex;

/// Title used when generated text carries no `# Title` line.
pub const UNTITLED: &str = "Untitled Article";

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*)$").expect("title pattern is valid"));

/// Generated text split into its title and the markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// Who produced an article and when, for the export footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub model_name: String,
    pub generated_on: String,
}

impl Attribution {
    pub fn footer(&self, app_name: &str) -> String {
        format!(
            "Generated by {app_name} using {} on {}",
            self.model_name, self.generated_on
        )
    }
}

/// Pull the first `# Title` line out of generated text. The line may appear
/// anywhere; it is removed and the remaining text trimmed.
pub fn split_title(text: &str) -> Article {
    let title_line = TITLE_LINE
        .captures(text)
        .and_then(|captures| Some((captures.get(0)?, captures.get(1)?)));
    let Some((line, title)) = title_line else {
        return Article {
            title: UNTITLED.to_string(),
            content: text.to_string(),
        };
    };

    let mut content = String::with_capacity(text.len());
    content.push_str(&text[..line.start()]);
    content.push_str(&text[line.end()..]);

    Article {
        title: title.as_str().trim().to_string(),
        content: content.trim().to_string(),
    }
}

impl Article {
    /// Filename stem for downloads: ASCII alphanumerics kept and lowercased,
    /// everything else replaced with `_`.
    pub fn file_stem(&self) -> String {
        self.title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn leading_title_is_stripped() {
        let article = split_title("# The Sea\n\nWaves *crash*.\n");
        assert_eq!(article.title, "The Sea");
        assert_eq!(article.content, "Waves *crash*.");
    }

    #[test]
    fn title_found_after_preamble() {
        let article = split_title("Sure! Here it is:\n# Rust\nBody");
        assert_eq!(article.title, "Rust");
        assert_eq!(article.content, "Sure! Here it is:\n\nBody");
    }

    #[test]
    fn only_first_title_is_taken() {
        let article = split_title("# One\n# Two");
        assert_eq!(article.title, "One");
        assert_eq!(article.content, "# Two");
    }

    #[rstest]
    #[case("no heading here")]
    #[case("## Section only\ntext")]
    #[case("#tag line")]
    #[case("#   \nbody")]
    #[case("#\t \r\nbody")]
    fn untitled(#[case] text: &str) {
        let article = split_title(text);
        assert_eq!(article.title, UNTITLED);
        assert_eq!(article.content, text);
    }

    #[test]
    fn blank_title_line_is_skipped() {
        let article = split_title("#  \n# Real\ntext");
        assert_eq!(article.title, "Real");
        assert_eq!(article.content, "#  \n\ntext");
        assert_eq!(article.file_stem(), "real");
    }

    #[test]
    fn crlf_title() {
        let article = split_title("# Windows\r\nbody");
        assert_eq!(article.title, "Windows");
        assert_eq!(article.content, "body");
    }

    #[rstest]
    #[case("The Sea", "the_sea")]
    #[case("Rust: 2024 Edition!", "rust__2024_edition_")]
    #[case("Café", "caf_")]
    fn file_stem(#[case] title: &str, #[case] expected: &str) {
        let article = Article {
            title: title.to_string(),
            content: String::new(),
        };
        assert_eq!(article.file_stem(), expected);
    }

    #[test]
    fn footer() {
        let attribution = Attribution {
            model_name: "Mistral 7B".to_string(),
            generated_on: "2024-05-01".to_string(),
        };
        assert_eq!(
            attribution.footer("ArticleHero"),
            "Generated by ArticleHero using Mistral 7B on 2024-05-01"
        );
    }
}
