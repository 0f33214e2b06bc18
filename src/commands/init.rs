//! Init command implementation

use crate::config::{Config, GitHubConfig};
use crate::error::{Error, Result};
use crate::store::{GitHubStore, LocalStore, ReadingStore};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Initialize pagemark configuration and the readings file.
///
/// Unless `local_only` is set, the GitHub coordinates and access token are
/// collected interactively and cached in the config file; leaving the
/// owner empty keeps pagemark in local-only mode.
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool, local_only: bool) -> Result<Config> {
    let mut config = Config::default();
    config.init_paths(base_dir);

    if config.paths.config_file.exists() && !force {
        return Err(Error::AlreadyInitialized(
            config.paths.base_dir.display().to_string(),
        ));
    }

    std::fs::create_dir_all(&config.paths.base_dir)?;

    if !local_only {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        config.github = prompt_github_config(&mut input, &mut output, &config.github)?;
    }

    config.validate()?;
    config.save()?;
    info!("Created config at {:?}", config.paths.config_file);

    // Seed the local readings file
    let local = LocalStore::new(config.paths.readings_file.clone());
    if !config.paths.readings_file.exists() {
        local.save_readings(&[], "Create readings file").await?;
        info!("Created readings file at {:?}", config.paths.readings_file);
    }

    // Ensure the remote readings file exists when GitHub is configured
    if config.github.is_configured() {
        match GitHubStore::new(&config.github) {
            Ok(store) => match store.init().await {
                Ok(()) => info!(
                    "Remote readings file ready at {}/{}:{}",
                    config.github.owner, config.github.repo, config.github.file_path
                ),
                Err(e) => warn!(
                    "Could not initialize the remote readings file: {}. You can run 'pagemark sync' later.",
                    e
                ),
            },
            Err(e) => warn!("Could not build the GitHub client: {}", e),
        }
    }

    Ok(config)
}

/// Collect GitHub settings from the terminal, keeping the passed defaults
/// for empty answers.
pub fn prompt_github_config(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    defaults: &GitHubConfig,
) -> Result<GitHubConfig> {
    writeln!(
        output,
        "GitHub sync (leave owner empty for local-only mode):"
    )?;

    let mut github = defaults.clone();
    github.owner = prompt(input, output, "Repository owner", &defaults.owner)?;
    if github.owner.is_empty() {
        return Ok(github);
    }

    github.repo = prompt(input, output, "Repository name", &defaults.repo)?;
    github.branch = prompt(input, output, "Branch", &defaults.branch)?;
    github.file_path = prompt(input, output, "Readings file path", &defaults.file_path)?;

    let token = prompt(input, output, "Personal access token", "")?;
    if token.is_empty() {
        writeln!(
            output,
            "No token entered; pagemark will read ${} instead.",
            github.token_env
        )?;
        github.token = None;
    } else {
        github.token = Some(token);
    }

    Ok(github)
}

fn prompt(
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    label: &str,
    default: &str,
) -> Result<String> {
    if default.is_empty() {
        write!(output, "  {}: ", label)?;
    } else {
        write!(output, "  {} [{}]: ", label, default)?;
    }
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Print the post-init summary and next steps.
pub fn print_init(config: &Config) {
    println!("✓ pagemark initialized");
    println!("  Config: {}", config.paths.config_file.display());
    println!("  Readings: {}", config.paths.readings_file.display());
    if config.github.is_configured() {
        println!(
            "  Remote: {}/{} ({}:{})",
            config.github.owner,
            config.github.repo,
            config.github.branch,
            config.github.file_path
        );
    } else {
        println!("  Remote: not configured (local-only)");
    }
    println!("\nNext steps:");
    println!("  pagemark capture https://example.com/article   # Save a page");
    println!("  pagemark list                                  # Show the reading list");
    println!("  pagemark sync                                  # Reconcile with GitHub");
}
