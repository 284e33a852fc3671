use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use catalog_core::{EntryForm, EntryId, Filters, Status, ViewState};
use catalog_sync::{Catalog, CatalogConfig, Confirm, CreateError, RemoveOutcome};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catalog", about = "Browse and edit the movie catalog")]
struct Cli {
    /// TOML config file; `CATALOG_*` environment variables override it.
    #[arg(long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List entries, optionally filtered.
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        genre: String,
    },
    /// Add an entry.
    Add(AddArgs),
    /// Delete an entry by id.
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    year: String,
    /// Comma separated.
    #[arg(long, default_value = "")]
    genres: String,
    #[arg(long, default_value = "")]
    rating: String,
    #[arg(long, default_value = "")]
    poster_url: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    director: String,
    /// Comma separated.
    #[arg(long, default_value = "")]
    cast: String,
}

impl From<AddArgs> for EntryForm {
    fn from(args: AddArgs) -> Self {
        Self {
            title: args.title,
            year: args.year,
            genres: args.genres,
            rating: args.rating,
            poster_url: args.poster_url,
            description: args.description,
            director: args.director,
            cast: args.cast,
        }
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct Prompt;

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the final view state is free of errors.
async fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => CatalogConfig::from_env().context("Failed to read configuration")?,
    };

    let catalog = Catalog::from_config(&config).context("Failed to build HTTP client")?;
    catalog.join_pending().await;

    match cli.command {
        Command::List { query, genre } => {
            let filters = Filters::new(query, genre);
            if !filters.is_empty() {
                catalog.search(filters).await;
            }
        }
        Command::Add(args) => {
            let mut form = EntryForm::from(args);
            if let Err(CreateError::Invalid(e)) = catalog.create(&mut form).await {
                eprintln!("{e}");
                return Ok(false);
            }
        }
        Command::Remove { id, yes } => {
            let id = EntryId::new(id);
            let outcome = if yes {
                catalog.remove(&id, &|_: &str| true).await
            } else {
                catalog.remove(&id, &Prompt).await
            };
            // Failures are already reflected in the view state.
            if let Ok(RemoveOutcome::Cancelled) = outcome {
                println!("Cancelled.");
            }
        }
    }

    let state = catalog.state();
    render(&state);
    Ok(!matches!(state.status(), Status::Error { .. }))
}

fn render(state: &ViewState) {
    if let Some(message) = state.error_message() {
        eprintln!("error: {message}");
    }
    if state.entries().is_empty() {
        println!("No movies yet.");
        return;
    }
    for entry in state.entries() {
        let year = entry.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
        let rating = entry.rating.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {} ({})  [{}]  {}",
            entry.id,
            entry.title,
            year,
            rating,
            entry.genres.join(", ")
        );
    }
}
