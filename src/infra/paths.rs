// src/infra/paths.rs — Path management
//
// All paths respect the VONK_HOME environment variable for isolation.
// When VONK_HOME is set, config and data live under that directory.
// When unset, config uses ~/.vonk/ and data uses XDG_DATA_HOME/vonk.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "vonk").expect("Could not determine home directory")
    })
}

/// Returns the VONK_HOME override, if set.
fn vonk_home() -> Option<PathBuf> {
    std::env::var_os("VONK_HOME").map(PathBuf::from)
}

/// Configuration directory: $VONK_HOME/ or ~/.vonk/
pub fn config_dir() -> PathBuf {
    if let Some(home) = vonk_home() {
        return home;
    }
    dirs_home().join(".vonk")
}

/// Data directory: $VONK_HOME/data/ or XDG_DATA_HOME/vonk
pub fn data_dir() -> PathBuf {
    if let Some(home) = vonk_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Database path (user contexts + durable usage-event mirror)
pub fn db_path() -> PathBuf {
    data_dir().join("vonk.db")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure all required directories exist
pub async fn ensure_dirs() -> anyhow::Result<()> {
    for dir in [config_dir(), data_dir()] {
        tokio::fs::create_dir_all(dir).await?;
    }
    Ok(())
}
