// src/infra/paths.rs — Config and data locations
//
// All paths respect the PERSONA_DISPATCH_HOME environment variable for isolation.
// When set, config and data live under that directory. When unset, config
// uses ~/.persona-dispatch/ and data uses XDG_DATA_HOME/persona-dispatch.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const APP_NAME: &str = "persona-dispatch";

/// Returns the PERSONA_DISPATCH_HOME override, if set.
fn home_override() -> Option<PathBuf> {
    std::env::var_os("PERSONA_DISPATCH_HOME").map(PathBuf::from)
}

/// Home directory (falls back to the working directory when unknown)
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $PERSONA_DISPATCH_HOME/ or ~/.persona-dispatch/
pub fn config_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home;
    }
    dirs_home().join(format!(".{APP_NAME}"))
}

/// Data directory: $PERSONA_DISPATCH_HOME/data/ or ~/.local/share/persona-dispatch/
pub fn data_dir() -> PathBuf {
    if let Some(home) = home_override() {
        return home.join("data");
    }
    ProjectDirs::from("", "", APP_NAME)
        .map(|d| d.data_local_dir().to_path_buf())
        .unwrap_or_else(|| config_dir().join("data"))
}

/// Default persona catalog directory
pub fn personas_dir() -> PathBuf {
    data_dir().join("personas")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
