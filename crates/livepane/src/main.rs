//! livepane CLI - paste a front-end snippet, get a standalone live preview.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use livepane_adapters::FrameworkKind;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "livepane")]
#[command(about = "Paste a front-end snippet, get a standalone live preview")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to livepane.toml config file
    #[arg(short, long, default_value = "livepane.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create livepane.toml and example snippets
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the framework a snippet is written in
    Detect {
        /// Snippet file (reads stdin when omitted or "-")
        file: Option<PathBuf>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        /// Also list lower-priority frameworks whose signals matched
        #[arg(long)]
        all: bool,
    },

    /// Render a snippet into a standalone HTML document
    Render {
        /// Snippet file (reads stdin when omitted or "-")
        file: Option<PathBuf>,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip detection and render as this framework
        #[arg(short, long)]
        kind: Option<FrameworkKind>,
    },

    /// Preview a snippet, re-rendering on every save
    Dev {
        /// Snippet file (defaults to config or "snippets/index.html")
        entry: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Render every snippet in a directory into shareable pages
    Publish {
        /// Snippet directory (defaults to config or "snippets")
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve published previews
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the publish output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries rendered documents and verdicts
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Detect { file, json, all } => {
            commands::detect::run(file, json, all)?;
        }
        Commands::Render { file, output, kind } => {
            commands::render::run(file, output, kind)?;
        }
        Commands::Dev {
            entry,
            port,
            no_open,
        } => {
            let open = if no_open { Some(false) } else { None };
            commands::dev::run(&cli.config, entry, port, open).await?;
        }
        Commands::Publish {
            source,
            output,
            no_minify,
        } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::publish::run(&cli.config, source, output, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
