//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::manager::ReadingManager;
use crate::store::{GitHubStore, ReadingStore};
use serde::Serialize;
use tracing::debug;

/// Remote store status
#[derive(Debug, Clone, Serialize)]
pub struct RemoteStatus {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub file_path: String,
    pub reachable: bool,
    pub reading_count: usize,
}

/// Status information
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub readings_path: String,
    pub reading_count: usize,
    pub remote: Option<RemoteStatus>,
}

/// Get system status.
pub async fn cmd_status(config: &Config, manager: &ReadingManager) -> Result<StatusInfo> {
    let local = manager.list().await?;

    let remote = if config.github.is_configured() {
        let (reachable, reading_count) = match GitHubStore::new(&config.github) {
            Ok(store) => match store.list_readings().await {
                Ok(readings) => (true, readings.len()),
                Err(e) => {
                    debug!("Remote store unreachable: {:?}", e);
                    (false, 0)
                }
            },
            Err(e) => {
                debug!("Could not build GitHub client: {:?}", e);
                (false, 0)
            }
        };
        Some(RemoteStatus {
            owner: config.github.owner.clone(),
            repo: config.github.repo.clone(),
            branch: config.github.branch.clone(),
            file_path: config.github.file_path.clone(),
            reachable,
            reading_count,
        })
    } else {
        None
    };

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        readings_path: config.paths.readings_file.display().to_string(),
        reading_count: local.len(),
        remote,
    })
}

/// Print status to console.
pub fn print_status(status: &StatusInfo) {
    println!("\n📊 pagemark Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Readings file: {}", status.readings_path);
    println!("Local readings: {}", status.reading_count);

    match &status.remote {
        Some(remote) => {
            println!("\nGitHub:");
            println!(
                "  Repository: {}/{} ({})",
                remote.owner, remote.repo, remote.branch
            );
            println!("  File: {}", remote.file_path);
            if remote.reachable {
                println!("  Status: ✓ Connected");
                println!("  Remote readings: {}", remote.reading_count);
            } else {
                println!("  Status: ✗ Not reachable (falling back to local-only)");
            }
        }
        None => {
            println!("\nGitHub: not configured (local-only)");
        }
    }
}
