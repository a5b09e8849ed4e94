//! `coursepeek` CLI - preview course-portal documents in the browser

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coursepeek::{DocumentKind, Theme};

mod cmd;

#[derive(Parser)]
#[command(name = "coursepeek")]
#[command(about = "Inline previews for course-portal document links")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration directory (default: $COURSEPEEK_CONFIG_DIR, then the
    /// platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, fetch and render one link as a viewer page
    Preview {
        /// Link reference as it appears in the page (may be relative)
        href: String,

        /// URL of the page the link was found on
        #[arg(long)]
        page: String,

        /// Portal profile to use instead of matching the page host
        #[arg(long)]
        profile: Option<String>,

        /// Write the viewer page to this file instead of a temp file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },

    /// List the previewable links on a page
    Scan {
        /// Page URL; also the base for relative links
        page: String,

        /// Portal profile to use instead of matching the page host
        #[arg(long)]
        profile: Option<String>,

        /// Read the page from a saved HTML file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Show or change the viewer theme for a document kind
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// List portal profiles
    Profiles,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the stored theme (docx, pptx or xlsx)
    Get { kind: DocumentKind },
    /// Store a theme (light, dark or sepia)
    Set { kind: DocumentKind, theme: Theme },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config_dir = coursepeek::config::config_dir(cli.config_dir.as_deref());

    match cli.command {
        Commands::Preview {
            href,
            page,
            profile,
            output,
            no_open,
        } => {
            cmd::cmd_preview(
                &href,
                &page,
                profile.as_deref(),
                output.as_deref(),
                no_open,
                &config_dir,
            )
            .await?;
        }
        Commands::Scan {
            page,
            profile,
            html,
        } => {
            cmd::cmd_scan(&page, profile.as_deref(), html.as_deref(), &config_dir).await?;
        }
        Commands::Theme { action } => match action {
            ThemeAction::Get { kind } => cmd::cmd_theme_get(kind, &config_dir)?,
            ThemeAction::Set { kind, theme } => cmd::cmd_theme_set(kind, theme, &config_dir)?,
        },
        Commands::Profiles => {
            cmd::cmd_profiles(&config_dir)?;
        }
    }

    Ok(())
}
