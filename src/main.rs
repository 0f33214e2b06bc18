//! pagemark CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use pagemark::{
    commands::{
        cmd_capture, cmd_init, cmd_list, cmd_remove, cmd_status, cmd_sync, cmd_update,
        print_capture, print_init, print_readings, print_remove, print_status, print_sync,
        print_update, CaptureOptions,
    },
    config::Config,
    error::Result,
    manager::ReadingManager,
    models::ReadingPatch,
    store::{GitHubStore, LocalStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pagemark")]
#[command(version, about = "Save web pages to a reading list synced to GitHub", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize pagemark configuration and the readings file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,

        /// Skip the GitHub setup prompts
        #[arg(long)]
        local_only: bool,
    },

    /// Capture a page into the reading list
    Capture {
        /// URL of the page to save
        url: String,

        /// Title (defaults to the page's <title>)
        #[arg(short, long)]
        title: Option<String>,

        /// Summary (defaults to the page's meta description)
        #[arg(short, long)]
        summary: Option<String>,

        /// Personal notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Highlight or quote; repeat for several
        #[arg(long = "highlight")]
        highlights: Vec<String>,

        /// Tag; repeat for several (defaults to domain-based suggestions)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Skip fetching the page
        #[arg(long)]
        offline: bool,
    },

    /// Show the reading list
    List {
        /// Only readings carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Maximum number of readings to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove a reading
    ///
    /// Use 'pagemark list' to find reading IDs
    Remove {
        /// Reading ID to remove
        id: String,
    },

    /// Update fields of an existing reading
    Update {
        /// Reading ID to update
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New summary
        #[arg(short, long)]
        summary: Option<String>,

        /// New notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Replacement highlight; repeat for several
        #[arg(long = "highlight")]
        highlights: Vec<String>,

        /// Replacement tag; repeat for several
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Reconcile the local reading list with GitHub
    Sync,

    /// Show system status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle init command specially (doesn't need existing config)
    if let Commands::Init { force, local_only } = cli.command {
        let base_dir = cli.config.as_deref().and_then(|p| {
            if p.extension().map_or(false, |e| e == "toml") {
                p.parent().map(PathBuf::from)
            } else {
                Some(p.to_path_buf())
            }
        });
        let config = cmd_init(base_dir, force, local_only).await?;
        print_init(&config);
        return Ok(());
    }

    // Handle completions command (doesn't need config)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "pagemark", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Build the manager: local store always, remote store when configured
    let local = LocalStore::new(config.paths.readings_file.clone());
    let manager = if config.github.is_configured() {
        match GitHubStore::new(&config.github) {
            Ok(remote) => ReadingManager::with_remote(local, Arc::new(remote)),
            Err(e) => {
                warn!("GitHub store unavailable, using local only: {}", e);
                ReadingManager::new(local)
            }
        }
    } else {
        ReadingManager::new(local)
    };

    // Handle commands
    match cli.command {
        Commands::Init { .. } | Commands::Completions { .. } => unreachable!(),

        Commands::Capture {
            url,
            title,
            summary,
            notes,
            highlights,
            tags,
            offline,
        } => {
            let options = CaptureOptions {
                title,
                summary,
                notes,
                highlights,
                tags,
                offline,
            };

            let outcome = cmd_capture(&config, &manager, &url, options).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_capture(&outcome);
            }
        }

        Commands::List { tag, limit } => {
            let readings = cmd_list(&manager, tag, limit).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&readings)?);
            } else {
                print_readings(&readings);
            }
        }

        Commands::Remove { id } => {
            let outcome = cmd_remove(&manager, &id).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_remove(&outcome);
            }
        }

        Commands::Update {
            id,
            title,
            summary,
            notes,
            highlights,
            tags,
        } => {
            let patch = ReadingPatch {
                title,
                summary,
                notes,
                highlights: (!highlights.is_empty()).then_some(highlights),
                tags: (!tags.is_empty()).then_some(tags),
            };

            let updated = cmd_update(&manager, &id, patch).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&updated)?);
            } else {
                print_update(&updated);
            }
        }

        Commands::Sync => {
            let outcome = cmd_sync(&manager).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_sync(&outcome);
            }
        }

        Commands::Status => {
            let status = cmd_status(&config, &manager).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_config_path);

    if !config_path.exists() {
        eprintln!(
            "Config file not found: {}\nRun 'pagemark init' first.",
            config_path.display()
        );
        std::process::exit(1);
    }

    Config::load(&config_path)
}
