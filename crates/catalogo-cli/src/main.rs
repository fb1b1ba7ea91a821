mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalogo")]
#[command(about = "Build and inspect the product catalog")]
struct Cli {
    /// Project root; overrides `CATALOGO_ROOT`.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Merge every data source into the published catalog.
    Build {
        /// Report what would be written without touching the output file.
        #[arg(long)]
        dry_run: bool,
    },
    /// Turn the tab-separated price list into a JSON source.
    Convert {
        /// Defaults to `<data dir>/catalogo_confezioni_2025.tsv`.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Defaults to `<data dir>/prodotti.json`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Filter the published catalog the way the catalog page does.
    Query {
        #[arg(long)]
        variante: Option<String>,
        #[arg(long)]
        colore: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// Print the dropdown option lists instead of products.
        #[arg(long)]
        options: bool,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.root.as_deref())?;
    init_tracing(&config.log_level)?;
    tracing::debug!(env = %config.env, root = %config.root.display(), "configuration loaded");

    match cli.command {
        Commands::Build { dry_run } => commands::run_build(&config, dry_run)?,
        Commands::Convert { input, output } => {
            commands::run_convert(&config, input.as_deref(), output.as_deref())?;
        }
        Commands::Query {
            variante,
            colore,
            search,
            options,
        } => {
            let filter = catalogo_core::CatalogFilter {
                variante,
                colore,
                search,
            };
            commands::run_query(&config, &filter, options)?;
        }
    }

    Ok(())
}
