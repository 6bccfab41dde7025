mod echo;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use referent_core::{
    ArticleRecord, ErrorPresentation, GeneratedImage, OperationKind, Referent, ReferentConfig, ReferentError, Severity,
    fetch_file, fetch_stdin,
};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Turn articles into translations, summaries, theses, Telegram posts and illustrations
#[derive(Parser, Debug)]
#[command(name = "referent")]
#[command(author = "Referent Contributors")]
#[command(version)]
#[command(about = "Turn web articles into translations, summaries, posts and illustrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// HTTP timeout in seconds for page fetches
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for page fetches
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where the article comes from
#[derive(Args, Debug)]
struct Source {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Treat a file or stdin input as plain article text instead of HTML
    #[arg(long)]
    text: bool,

    /// Title to use instead of the extracted one
    #[arg(long)]
    title: Option<String>,

    /// Publication date to use instead of the extracted one
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract title, date and content as JSON
    Parse {
        /// URL to fetch, local HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },
    /// Translate the article into Russian
    Translate(Source),
    /// Summarize the article in two or three paragraphs
    Summary(Source),
    /// List the key theses of the article
    Theses(Source),
    /// Write a Telegram post about the article
    Post(Source),
    /// Write an English prompt for an image model
    ImagePrompt(Source),
    /// Write an image prompt and render it
    Illustrate(Source),
    /// Render an image from a prompt
    Image {
        /// Prompt for the image model
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
}

/// A failure whose presentation has already been printed.
#[derive(Debug)]
struct Reported(ReferentError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Print the localized presentation of `err` and hand it back to anyhow.
fn report(err: ReferentError, operation: OperationKind) -> anyhow::Error {
    let shown = ErrorPresentation::from_error(&err, operation);
    match shown.severity {
        Severity::Info => echo::print_info(&shown.message),
        Severity::Warning => echo::print_warning(&shown.message),
        Severity::Destructive => echo::print_error(&shown.message),
    }
    anyhow::Error::new(Reported(err))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "referent_core=debug,referent=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_local(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        fetch_stdin().context("Failed to read from stdin")
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn is_url(input: &str) -> bool {
    input.contains("://")
}

/// Load an article from a URL, a local HTML file or stdin.
async fn load_article(referent: &Referent, input: &str, plain_text: bool, verbose: bool) -> anyhow::Result<ArticleRecord> {
    if is_url(input) {
        if verbose {
            echo::print_step(1, 2, &format!("Fetching {}", input.bright_white().underline()));
        }
        return referent.parse(input).await.map_err(|e| report(e, OperationKind::Parse));
    }

    let raw = read_local(input)?;
    if verbose {
        echo::print_step(1, 2, &format!("Read {} from {}", echo::format_size(raw.len()), input));
    }

    if plain_text {
        Ok(ArticleRecord { content: Some(raw), ..Default::default() })
    } else {
        Ok(referent.parse_html(&raw))
    }
}

fn write_text(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn write_image(output: Option<&Path>, image: &GeneratedImage) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, &image.bytes).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!(
                "Image ({}, {}) written to {}",
                image.mime_type,
                echo::format_size(image.bytes.len()),
                path.display().bright_white()
            ));
        }
        None => println!("{}", image.to_data_url()),
    }
    Ok(())
}

/// Commands that work on one article
#[derive(Debug, Clone, Copy)]
enum ArticleTask {
    Translate,
    Summary,
    Theses,
    Post,
    ImagePrompt,
    Illustrate,
}

impl ArticleTask {
    fn operation(self) -> OperationKind {
        match self {
            ArticleTask::Translate => OperationKind::Translate,
            ArticleTask::Summary => OperationKind::Summarize,
            ArticleTask::Theses => OperationKind::Theses,
            ArticleTask::Post => OperationKind::Post,
            ArticleTask::ImagePrompt => OperationKind::ImagePrompt,
            ArticleTask::Illustrate => OperationKind::Illustration,
        }
    }
}

async fn run_article_task(referent: &Referent, cli: &Cli, source: &Source, task: ArticleTask) -> anyhow::Result<()> {
    let operation = task.operation();
    let record = load_article(referent, &source.input, source.text, cli.verbose).await?;
    if cli.verbose {
        echo::print_article_details(&record);
        echo::print_step(2, 2, &format!("Running {}", operation.as_str()));
    }

    let content = record.content.as_deref().unwrap_or_default();
    let title = source.title.as_deref().or(record.title.as_deref());
    let date = source.date.as_deref().or(record.published_date.as_deref());
    let output = cli.output.as_deref();

    let text = match task {
        ArticleTask::Translate => referent.translate(content).await,
        ArticleTask::Summary => referent.summarize(content).await,
        ArticleTask::Theses => referent.extract_theses(content).await,
        ArticleTask::Post => referent.generate_post(content, title, date).await,
        ArticleTask::ImagePrompt => referent.generate_image_prompt(content, title).await,
        ArticleTask::Illustrate => {
            let illustration =
                referent.generate_illustration(content, title).await.map_err(|e| report(e, operation))?;
            println!("{}", illustration.prompt);
            return write_image(output, &illustration.image);
        }
    }
    .map_err(|e| report(e, operation))?;

    write_text(output, &text)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ReferentConfig::from_env();
    config.fetch.timeout = cli.timeout;
    if let Some(agent) = &cli.user_agent {
        config.fetch.user_agent = agent.clone();
    }

    let referent = Referent::new(config).context("Failed to initialize HTTP client")?;

    let task = match &cli.command {
        Command::Parse { input } => {
            let record = load_article(&referent, input, false, cli.verbose).await?;
            if record.is_empty() {
                echo::print_warning("No title, date or content found");
            }
            let json = record.to_json().context("Failed to serialize article")?;
            return write_text(cli.output.as_deref(), &format!("{:#}", json));
        }
        Command::Image { prompt } => {
            let image =
                referent.generate_image(prompt).await.map_err(|e| report(e, OperationKind::ImageGeneration))?;
            return write_image(cli.output.as_deref(), &image);
        }
        Command::Translate(source) => (source, ArticleTask::Translate),
        Command::Summary(source) => (source, ArticleTask::Summary),
        Command::Theses(source) => (source, ArticleTask::Theses),
        Command::Post(source) => (source, ArticleTask::Post),
        Command::ImagePrompt(source) => (source, ArticleTask::ImagePrompt),
        Command::Illustrate(source) => (source, ArticleTask::Illustrate),
    };

    run_article_task(&referent, &cli, task.0, task.1).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<Reported>().is_none() {
                echo::print_error(&format!("{:#}", err));
            }
            ExitCode::FAILURE
        }
    }
}
