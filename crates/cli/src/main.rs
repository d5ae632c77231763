mod echo;

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use glossa_core::{
    ArticleStructurer, ExtractConfig, FetchConfig, ParsedArticle, SentenceAddress, fetch_file, fetch_stdin, fetch_url,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source URL assumed for file and stdin input.
const DEFAULT_SOURCE_URL: &str = "http://localhost/";

/// Output format for the structured article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
    Tree,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            "tree" => Ok(Self::Tree),
            _ => Err(format!("Invalid format: {}. Valid options: json, text, tree", s)),
        }
    }
}

/// Split a news article into addressable paragraphs, sentences and words
#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(author = "Glossa Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Split news articles into paragraphs, sentences and words", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Source URL of file or stdin input (default: the input URL, else http://localhost/)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, text, tree)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Minimum score the main content block must reach
    #[arg(long, default_value = "10", value_name = "SCORE")]
    min_score: f64,

    /// Fail instead of falling back when no block reaches --min-score
    #[arg(long)]
    strict: bool,

    /// Character threshold for content candidates
    #[arg(long, default_value = "500", value_name = "NUM")]
    char_threshold: usize,

    /// Enable debug logging (honours RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// `Some(url)` when the input is an http(s) URL.
fn remote_url(input: &str) -> Option<Url> {
    Url::parse(input).ok().filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glossa_core=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).init();
}

fn render(article: &ParsedArticle, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    let mut output = match format {
        OutputFormat::Json if pretty => article.to_json_pretty().context("Failed to serialize article")?,
        OutputFormat::Json => article.to_json().context("Failed to serialize article")?,
        OutputFormat::Text => article.to_text(),
        OutputFormat::Tree => render_tree(article),
    };
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

/// Indented listing with every sentence's address and its words.
fn render_tree(article: &ParsedArticle) -> String {
    let mut out = String::new();
    let title = if article.title().is_empty() { "(untitled)" } else { article.title() };
    let _ = writeln!(out, "{} ({})", title, article.source());

    for (p, paragraph) in article.paragraphs().iter().enumerate() {
        let _ = writeln!(out, "├─ ¶{}", p);
        for (s, sentence) in paragraph.sentences().iter().enumerate() {
            let address = SentenceAddress { paragraph: p, sentence: s };
            let words: Vec<&str> = sentence.words().iter().map(|w| w.as_str()).collect();
            let _ = writeln!(out, "│  ├─ [{}] {}", address, sentence.text());
            let _ = writeln!(out, "│  │    {}", words.join(" · "));
        }
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let started = Instant::now();
    let mut timings = Vec::new();

    if args.verbose {
        init_tracing();
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let read_started = Instant::now();
    let remote = remote_url(&args.input);
    let html = if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if let Some(url) = &remote {
        if args.verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", url.as_str().bright_white().underline()));
        }
        let mut config = FetchConfig::default().with_timeout(args.timeout);
        if let Some(user_agent) = &args.user_agent {
            config = config.with_user_agent(user_agent.as_str());
        }
        fetch_url(url.as_str(), &config).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    timings.push(("Read", read_started.elapsed()));

    if args.verbose {
        echo::print_detail("Size", &echo::format_size(html.len()));
        eprintln!();
    }

    let source_url = match (&args.url, &remote) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url.to_string(),
        (None, None) => DEFAULT_SOURCE_URL.to_string(),
    };
    tracing::debug!(source_url = %source_url, bytes = html.len(), "input read");

    if args.verbose {
        echo::print_step(2, 4, "Extracting and segmenting article");
    }

    let structure_started = Instant::now();
    let extract_config = ExtractConfig::builder()
        .min_score(args.min_score)
        .strict(args.strict)
        .char_threshold(args.char_threshold)
        .build();
    let article = ArticleStructurer::new()
        .with_extract_config(extract_config)
        .structure(&html, &source_url)
        .context("Failed to extract article")?;
    timings.push(("Structure", structure_started.elapsed()));

    if args.verbose {
        echo::print_article_details(&article);
        echo::print_step(3, 4, "Rendering output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    let render_started = Instant::now();
    let output = render(&article, args.format, args.pretty)?;
    timings.push(("Render", render_started.elapsed()));

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
