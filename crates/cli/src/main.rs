//! Pixel Exchange CLI - Catalog building and validation tools.
//!
//! # Usage
//!
//! ```bash
//! # Build data/items.json from the Rolimon's item API
//! px-cli catalog build --out-dir crates/storefront/data
//!
//! # Build without downloading images (reference the Roblox CDN directly)
//! px-cli catalog build --out-dir crates/storefront/data --no-download --limit 50
//!
//! # Validate an existing catalog file
//! px-cli catalog validate crates/storefront/data/items.json
//! ```
//!
//! # Commands
//!
//! - `catalog build` - Fetch Rolimon's limiteds and write an items.json
//! - `catalog validate` - Load and validate an existing catalog file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "px-cli")]
#[command(author, version, about = "Pixel Exchange CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Fetch the Rolimon's item list and write an items.json
    Build {
        /// Directory receiving items.json (and downloaded images)
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Default value for the `by` field
        #[arg(long, default_value = "ROBLOX")]
        by_default: String,

        /// Keep only the first N items (omit for everything)
        #[arg(long)]
        limit: Option<usize>,

        /// Reference the Roblox CDN directly instead of downloading images
        #[arg(long)]
        no_download: bool,
    },
    /// Load and validate an existing catalog file
    Validate {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Build {
                out_dir,
                by_default,
                limit,
                no_download,
            } => {
                commands::catalog::build(&out_dir, &by_default, limit, no_download).await?;
            }
            CatalogAction::Validate { path } => {
                commands::catalog::validate(&path).await?;
            }
        },
    }
    Ok(())
}
