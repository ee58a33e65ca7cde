use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use markup::{Article, Attribution, Config};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "markup")]
#[command(about = "Render generated article Markdown to safe HTML or PDF")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Output file (defaults next to the input, or stdout for stdin input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to produce
    #[arg(short, long, value_enum, default_value_t = Format::Document)]
    format: Format,

    /// TOML config for exported documents
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model named in the attribution footer
    #[arg(long, requires = "date")]
    model: Option<String>,

    /// Generation date shown in the attribution footer
    #[arg(long, requires = "model")]
    date: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// HTML fragment of the whole input
    Fragment,
    /// Standalone HTML document with title and footer
    Document,
    /// Typst markup of the article
    Typst,
    /// PDF of the article
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Fragment | Format::Document => "html",
            Format::Typst => "typ",
            Format::Pdf => "pdf",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = cli.input.as_deref().filter(|path| *path != Path::new("-"));
    let markdown = read_input(input)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    let attribution = cli
        .model
        .zip(cli.date)
        .map(|(model_name, generated_on)| Attribution {
            model_name,
            generated_on,
        });

    let article = markup::split_title(&markdown);
    debug!(title = %article.title, format = ?cli.format, "converting");

    // PDF from stdin without --output fails here, before compiling
    let output = destination(cli.output, input, cli.format, &article)?;

    let bytes = match cli.format {
        Format::Fragment => markup::render(&markdown).into_bytes(),
        Format::Document => markup::html_document(&article, attribution.as_ref(), &config).into_bytes(),
        Format::Typst => markup::article_to_typst(&article, attribution.as_ref(), &config).into_bytes(),
        Format::Pdf => markup::article_to_pdf(&article, attribution.as_ref(), &config)?,
    };

    let Some(output) = output else {
        io::stdout()
            .write_all(&bytes)
            .context("Error writing to stdout")?;
        return Ok(());
    };

    fs::write(&output, bytes).with_context(|| format!("Error writing {}", output.display()))?;

    info!(path = %output.display(), "wrote output");
    eprintln!("Created {}", output.display());
    Ok(())
}

/// Output file for this run, or `None` for stdout.
fn destination(
    output: Option<PathBuf>,
    input: Option<&Path>,
    format: Format,
    article: &Article,
) -> anyhow::Result<Option<PathBuf>> {
    match (output, input) {
        (Some(output), _) => Ok(Some(output)),
        (None, Some(input)) => Ok(Some(match format {
            Format::Document => input.with_file_name(format!("{}.html", article.file_stem())),
            format => input.with_extension(format.extension()),
        })),
        (None, None) if matches!(format, Format::Pdf) => {
            bail!("PDF output requires --output when reading from stdin")
        }
        (None, None) => Ok(None),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))
        }
        None => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("Error reading stdin")?;
            Ok(markdown)
        }
    }
}
