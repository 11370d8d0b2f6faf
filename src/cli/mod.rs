// src/cli/mod.rs — CLI definition (clap derive) and command wiring

pub mod context;
pub mod personas;
pub mod select;
pub mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::ContextIntegrator;
use crate::core::Dispatcher;
use crate::core::TaskCategory;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::persona::{JsonFileStore, PersonaManager, PersonaStore};

#[derive(Parser)]
#[command(
    name = "persona-dispatch",
    about = "Pick the best persona for a task",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Confidence threshold for persona generation (0.0-1.0)
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Never synthesize new personas during selection
    #[arg(long, global = true)]
    pub no_auto_generate: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the best persona for a task
    Select {
        /// Task description
        #[arg(required = true, trailing_var_arg = true)]
        task: Vec<String>,
        /// Additional free-form context
        #[arg(short, long, default_value = "")]
        context: String,
        /// Project whose context biases the choice
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Show how a task is analyzed and classified
    Analyze {
        #[arg(required = true, trailing_var_arg = true)]
        task: Vec<String>,
        #[arg(short, long, default_value = "")]
        context: String,
    },
    /// List every persona in the catalog
    List,
    /// Show one persona
    Get { id: String },
    /// Search personas by name, description or expertise
    Search { query: String },
    /// Add a persona to the catalog
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Comma-separated expertise areas
        #[arg(long, value_delimiter = ',', required = true)]
        expertise: Vec<String>,
        #[arg(long, default_value = "Professional")]
        style: String,
        #[arg(long, default_value = "")]
        context: String,
        /// Comma-separated personality traits
        #[arg(long, value_delimiter = ',')]
        traits: Vec<String>,
        /// Task category (inferred from the name when omitted)
        #[arg(long)]
        category: Option<TaskCategory>,
    },
    /// Remove a persona from the catalog
    Delete { id: String },
    /// Catalog statistics
    Stats,
    /// Suggest catalog improvements for a task
    Improve {
        #[arg(required = true, trailing_var_arg = true)]
        task: Vec<String>,
    },
    /// List automatically generated personas
    Generated,
    /// Write the catalog to a JSON bundle
    Export { path: PathBuf },
    /// Load personas from a JSON bundle
    Import { path: PathBuf },
    /// Persona auto-generation settings
    Auto {
        #[command(subcommand)]
        action: AutoAction,
    },
    /// Project context summary and suggested priorities
    Context {
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Report a finished task back to the project context
    Complete {
        task: String,
        #[arg(long)]
        result: String,
        #[arg(long)]
        persona: String,
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Clone)]
pub enum AutoAction {
    /// Turn persona generation on
    Enable,
    /// Turn persona generation off
    Disable,
    /// Show generation settings and generated count
    Status,
    /// Set the confidence threshold below which a persona is generated
    Threshold { value: f64 },
}

/// Everything a command needs, built once from config and flags.
pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub manager: PersonaManager,
    pub dispatcher: Arc<Dispatcher>,
    pub json: bool,
}

impl App {
    pub fn build(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = cli
            .config
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(paths::config_file_path);
        let mut config = if cli.config.is_some() {
            let mut c = Config::load_from(&config_path)?;
            c.apply_env();
            c
        } else {
            Config::load()?
        };

        if let Some(threshold) = cli.threshold {
            config.dispatcher.confidence_threshold = threshold;
        }
        if cli.no_auto_generate {
            config.dispatcher.auto_generation = false;
        }
        config.validate()?;

        let store: Arc<dyn PersonaStore> =
            Arc::new(JsonFileStore::open(config.storage.resolved_dir())?);
        let manager = PersonaManager::new(Arc::clone(&store));
        if config.storage.seed_defaults {
            let seeded = manager.seed_defaults()?;
            if seeded > 0 {
                tracing::info!("Seeded {} default personas", seeded);
            }
        }

        let context = ContextIntegrator::from_config(&config.context)?;
        let dispatcher = Dispatcher::new(store, context, &config.dispatcher)?;

        Ok(Self {
            config,
            config_path,
            manager,
            dispatcher: Arc::new(dispatcher),
            json: cli.json,
        })
    }
}

/// Run one parsed command to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut app = App::build(&cli)?;

    match cli.command {
        Commands::Select {
            task,
            context,
            project,
        } => select::run_select(&app, &task.join(" "), &context, project.as_deref()).await,
        Commands::Analyze { task, context } => select::run_analyze(&app, &task.join(" "), &context),
        Commands::Improve { task } => select::run_improve(&app, &task.join(" ")),
        Commands::List => personas::run_list(&app),
        Commands::Get { id } => personas::run_get(&app, &id),
        Commands::Search { query } => personas::run_search(&app, &query),
        Commands::Create {
            name,
            description,
            expertise,
            style,
            context,
            traits,
            category,
        } => {
            let mut persona = crate::persona::Persona::new("", name, description)
                .with_expertise(expertise)
                .with_style(style)
                .with_context(context)
                .with_traits(traits);
            persona.category = category;
            personas::run_create(&app, persona)
        }
        Commands::Delete { id } => personas::run_delete(&app, &id),
        Commands::Stats => personas::run_stats(&app),
        Commands::Generated => personas::run_generated(&app),
        Commands::Export { path } => personas::run_export(&app, &path),
        Commands::Import { path } => personas::run_import(&app, &path),
        Commands::Auto { action } => settings::run_auto(&mut app, action),
        Commands::Context { project } => context::run_context(&app, project.as_deref()).await,
        Commands::Complete {
            task,
            result,
            persona,
            project,
        } => context::run_complete(&app, &task, &result, &persona, project.as_deref()).await,
        Commands::Serve { port } => {
            let mut api = app.config.api.clone();
            if let Some(port) = port {
                api.port = port;
            }
            crate::api::start_server(&api, Arc::clone(&app.dispatcher)).await
        }
    }
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_select_with_globals() {
        let cli = Cli::try_parse_from([
            "persona-dispatch",
            "--json",
            "--threshold",
            "0.5",
            "select",
            "debug",
            "my",
            "code",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.threshold, Some(0.5));
        match cli.command {
            Commands::Select { task, .. } => assert_eq!(task.join(" "), "debug my code"),
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn test_parse_create_lists() {
        let cli = Cli::try_parse_from([
            "persona-dispatch",
            "create",
            "--name",
            "Data Scientist",
            "--description",
            "Finds signal",
            "--expertise",
            "Statistics,Python",
            "--category",
            "scientific",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                expertise,
                category,
                ..
            } => {
                assert_eq!(expertise, vec!["Statistics", "Python"]);
                assert_eq!(category, Some(TaskCategory::Scientific));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_auto_threshold() {
        let cli =
            Cli::try_parse_from(["persona-dispatch", "auto", "threshold", "0.4"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Auto {
                action: AutoAction::Threshold { value }
            } if (value - 0.4).abs() < 1e-9
        ));
    }
}
