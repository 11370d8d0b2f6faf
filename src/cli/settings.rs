// src/cli/settings.rs — Auto-generation settings
//
// Settings live in the dispatcher for the lifetime of a process; the CLI
// also writes them to the config file so the next invocation keeps them.

use std::path::Path;

use super::{print_json, App, AutoAction};
use crate::infra::config::{Config, DispatcherConfig};

pub fn run_auto(app: &mut App, action: AutoAction) -> anyhow::Result<()> {
    match action {
        AutoAction::Enable | AutoAction::Disable => {
            let enabled = matches!(action, AutoAction::Enable);
            app.dispatcher.enable_auto_generation(enabled);
            app.config.dispatcher.auto_generation = enabled;
            persist(&app.config_path, |d| d.auto_generation = enabled)?;
        }
        AutoAction::Threshold { value } => {
            app.dispatcher.set_confidence_threshold(value)?;
            app.config.dispatcher.confidence_threshold = value;
            persist(&app.config_path, |d| d.confidence_threshold = value)?;
        }
        AutoAction::Status => {}
    }

    let status = app.dispatcher.get_auto_generation_status()?;
    if app.json {
        return print_json(&status);
    }
    println!(
        "  Auto-generation: {}",
        if status.enabled { "enabled" } else { "disabled" }
    );
    println!("  Threshold:       {:.2}", status.confidence_threshold);
    println!("  Generated:       {}", status.total_generated);
    Ok(())
}

/// Apply `change` to the config as stored on disk and write it back.
///
/// Starts from the file, not the running config, so command-line flags and
/// environment overrides are never written out.
fn persist(path: &Path, change: impl FnOnce(&mut DispatcherConfig)) -> anyhow::Result<()> {
    let mut stored = if path.exists() {
        Config::load_from(path)?
    } else {
        Config::default()
    };
    change(&mut stored.dispatcher);
    stored.save_to(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_changes_only_one_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[dispatcher]\nauto_generation = true\nconfidence_threshold = 0.3\n\n[context]\nproject = \"alpha\"\n",
        )
        .unwrap();

        persist(&path, |d| d.confidence_threshold = 0.5).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert!(saved.dispatcher.auto_generation);
        assert!((saved.dispatcher.confidence_threshold - 0.5).abs() < 1e-9);
        assert_eq!(saved.context.project, "alpha");
    }

    #[test]
    fn test_persist_ignores_running_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dispatcher]\nauto_generation = true\n").unwrap();

        // Running config as built with --no-auto-generate and an env override
        let mut running = Config::load_from(&path).unwrap();
        running.dispatcher.auto_generation = false;
        running.context.url = "http://from-env:9000".into();

        persist(&path, |d| d.confidence_threshold = 0.5).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert!(saved.dispatcher.auto_generation);
        assert_eq!(saved.context.url, "http://localhost:8000");
        assert!(!running.dispatcher.auto_generation);
    }

    #[test]
    fn test_persist_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        persist(&path, |d| d.auto_generation = false).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert!(!saved.dispatcher.auto_generation);
        assert!((saved.dispatcher.confidence_threshold - 0.3).abs() < 1e-9);
    }
}
