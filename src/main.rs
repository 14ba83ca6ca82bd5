//! RichEdit - headless export tools
//!
//! Normalizes editor HTML for email and exports plain text documents through
//! the reference engine. The editor window lives in `richedit-launcher`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use richedit::config::Config;
use richedit::engine::MemoryDocument;
use richedit::export::{self, ExportFormat, ExportOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Normalize an HTML fragment for email clients
    Normalize {
        /// HTML file to read
        file: PathBuf,

        /// Option preset
        #[arg(long, value_enum, default_value_t = Preset::Email)]
        preset: Preset,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a plain text file (one paragraph per line) and export it
    Export {
        /// Text file to read
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Html)]
        format: ExportFormat,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Email,
    Minimal,
}

impl Preset {
    fn options(self) -> ExportOptions {
        match self {
            Preset::Email => ExportOptions::email(),
            Preset::Minimal => ExportOptions::minimal(),
        }
    }
}

fn emit(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("💾 Wrote {} ({} bytes)", path.display(), contents.len());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Config::load()
            .map(|config| config.tracing_level())
            .unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🖋️ RichEdit v{} starting...", env!("CARGO_PKG_VERSION"));

    match args.command {
        Cmd::Normalize {
            file,
            preset,
            output,
        } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let html = export::normalize_html(&raw, &preset.options());
            emit(&html, output.as_deref())?;
        }
        Cmd::Export {
            file,
            format,
            output,
        } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let doc = MemoryDocument::from_text(&text);
            let rendered = export::render(&doc, format)?;
            emit(&rendered, output.as_deref())?;
        }
    }

    Ok(())
}
