//! # docparse CLI
//!
//! Command-line interface for docparse.
//!
//! docparse takes a document by URL or from a local file, works out its
//! format from the file name, extracts its text and prints it.
//!
//! ## Commands
//!
//! - `docparse url <URL>` - Download and parse a remote document
//! - `docparse file <PATH>` - Parse a local file as an upload
//! - `docparse formats` - List supported extensions
//! - `docparse config show|init|path` - Inspect configuration
//!
//! ## Examples
//!
//! ```bash
//! # Parse a remote PDF
//! docparse url https://example.com/files/report%20final.pdf
//!
//! # Parse a local file under a different name
//! docparse file ./export --name export.csv
//!
//! # Get JSON output
//! docparse --format json file notes.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docparse_core::{FormatRegistry, ParseError, ParsedDocument};
use docparse_pipeline::DocumentPipeline;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docparse")]
#[command(about = "Extract text from documents by URL or file")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docparse/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and parse a remote document
    Url {
        /// Document location; the last path segment names the file
        url: String,
    },

    /// Parse a local file
    File {
        /// File to read
        path: PathBuf,

        /// File name to classify by (defaults to the path's file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List supported formats
    Formats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for a parsed document.
#[derive(Serialize)]
struct ParseOutput {
    success: bool,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_url: Option<String>,
    file_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_size: Option<u64>,
    content_length: usize,
    content: String,
}

impl ParseOutput {
    fn new(doc: &ParsedDocument, preview_chars: usize) -> Self {
        Self {
            success: true,
            filename: doc.filename.clone(),
            original_url: None,
            file_type: doc.format.extension(),
            file_size: None,
            content_length: doc.content_length(),
            content: doc.preview(preview_chars).to_string(),
        }
    }
}

/// Output structure for a failed parse.
#[derive(Serialize)]
struct FailureOutput {
    success: bool,
    reason: &'static str,
    error: String,
}

/// Output structure for one supported format.
#[derive(Serialize)]
struct FormatOutput {
    extension: &'static str,
    label: &'static str,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(Some(path.clone()))
            .context(format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Url { url } => {
            let pipeline = DocumentPipeline::with_config(&config.acquire_config())
                .context("Failed to create pipeline")?;

            match pipeline.parse_remote(&url).await {
                Ok(doc) => {
                    let output = ParseOutput {
                        original_url: Some(url),
                        ..ParseOutput::new(&doc, config.output.preview_chars)
                    };
                    print_document(cli.format, &output)?;
                }
                Err(e) => return report_failure(cli.format, &e),
            }
        }

        Commands::File { path, name } => {
            let name = name.or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            });

            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let file_size = file.metadata().await.ok().map(|m| m.len());
            debug!("Opened {} ({:?} bytes)", path.display(), file_size);

            let pipeline = DocumentPipeline::with_config(&config.acquire_config())
                .context("Failed to create pipeline")?;

            match pipeline.parse_upload(name.as_deref(), file).await {
                Ok(doc) => {
                    let output = ParseOutput {
                        file_size,
                        ..ParseOutput::new(&doc, config.output.preview_chars)
                    };
                    print_document(cli.format, &output)?;
                }
                Err(e) => return report_failure(cli.format, &e),
            }
        }

        Commands::Formats => {
            let formats: Vec<FormatOutput> = FormatRegistry::supported()
                .iter()
                .map(|f| FormatOutput {
                    extension: f.extension,
                    label: f.label,
                })
                .collect();

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&formats)?);
                }
                OutputFormat::Text => {
                    println!("Supported formats:\n");
                    for f in &formats {
                        println!("  {:<7} {}", f.extension, f.label);
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn print_document(format: OutputFormat, output: &ParseOutput) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
        OutputFormat::Text => {
            println!("File:   {}", output.filename);
            if let Some(ref url) = output.original_url {
                println!("Source: {url}");
            }
            println!("Type:   {}", output.file_type);
            if let Some(size) = output.file_size {
                println!("Size:   {size} bytes");
            }
            if output.content.chars().count() < output.content_length {
                println!(
                    "Length: {} characters (showing first {})",
                    output.content_length,
                    output.content.chars().count()
                );
            } else {
                println!("Length: {} characters", output.content_length);
            }
            println!();
            println!("{}", output.content);
        }
    }
    Ok(())
}

/// Report a parse failure; the process exits non-zero.
fn report_failure(format: OutputFormat, error: &ParseError) -> Result<ExitCode> {
    match format {
        OutputFormat::Json => {
            let output = FailureOutput {
                success: false,
                reason: error.reason(),
                error: error.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            eprintln!("Error ({}): {}", error.reason(), error);
        }
    }
    Ok(ExitCode::FAILURE)
}
