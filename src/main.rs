use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use rcmet_wizard::config::{Config, SessionBackend};
use rcmet_wizard::evaluation::EvaluationTask;
use rcmet_wizard::logging;
use rcmet_wizard::rest;
use rcmet_wizard::session::{FileSessionStore, TaskSessions};

#[derive(Parser)]
#[command(name = "rcmet-wizard")]
#[command(about = "Session-backed step wizard for RCMET model evaluations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the wizard HTTP server
    Serve {
        /// Port to listen on (default: 7010)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the configured wizard steps
    Steps,

    /// Inspect or reset a stored wizard session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination (default: ./rcmet-wizard.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the current step and answers of a session
    Show {
        /// Session id
        id: String,
    },
    /// Discard the task stored for a session
    Reset {
        /// Session id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Serve { port } => cmd_serve(&config, port).await?,
        Commands::Steps => cmd_steps(&config),
        Commands::Session { action } => cmd_session(&config, action).await?,
        Commands::Openapi { yaml } => cmd_openapi(yaml)?,
        Commands::InitConfig { path } => cmd_init_config(&config, path)?,
    }

    Ok(())
}

async fn cmd_serve(config: &Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);

    println!("Starting wizard server...");
    println!("  Port: {}", port);
    println!("  Endpoints:");
    println!("    GET    /api/v1/health                     Health check");
    println!("    GET    /api/v1/steps                      Configured steps");
    println!("    POST   /wizard                            Start a new task");
    println!("    GET    /wizard/:session                   Current view");
    println!("    GET    /wizard/:session/step/:step        Show a step");
    println!("    POST   /wizard/:session/step/:step        Submit a step");
    println!("    POST   /wizard/:session/back              Previous step");
    println!("    DELETE /wizard/:session                   Discard task");
    println!();

    let state = rest::ApiState::new(config)?;
    rest::serve(state, port, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

fn cmd_steps(config: &Config) {
    if config.wizard.steps.is_empty() {
        println!("No wizard steps configured");
        return;
    }

    println!("Wizard Steps ({})", config.wizard.steps.len());
    println!("{}", "─".repeat(60));

    for (i, step) in config.wizard.steps.iter().enumerate() {
        println!("{:>2}. {:<26} {}", i + 1, step.id, step.label);
    }
}

async fn cmd_session(config: &Config, action: SessionAction) -> Result<()> {
    if config.session.backend == SessionBackend::Memory {
        tracing::warn!("Session backend is 'memory'; reading the file store instead");
    }
    let store = FileSessionStore::new(config.sessions_path());
    let sessions = TaskSessions::new(Arc::new(store), config.session.slot.clone());

    match action {
        SessionAction::Show { id } => {
            let task: Option<EvaluationTask> = sessions
                .load_task(&id)
                .await
                .with_context(|| format!("Failed to load session '{}'", id))?;

            let Some(task) = task else {
                println!("No wizard task for session {}", id);
                return Ok(());
            };

            let seq = task.sequence();
            println!("Session {}", id);
            println!("{}", "─".repeat(60));
            for (i, step) in seq.steps().iter().enumerate() {
                let marker = if seq.position() == Some(i) { "▶" } else { " " };
                println!("{} {:<26} {}", marker, step.id, step.label);
            }
            if seq.position().is_none() && !seq.current_step().is_empty() {
                println!("  (current step '{}' is not in the sequence)", seq.current_step());
            }
            println!();
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        SessionAction::Reset { id } => {
            sessions
                .discard(&id)
                .await
                .with_context(|| format!("Failed to reset session '{}'", id))?;
            println!("Session {} reset", id);
        }
    }

    Ok(())
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let spec = if yaml {
        rest::ApiDoc::yaml()?
    } else {
        rest::ApiDoc::json()?
    };
    println!("{}", spec);
    Ok(())
}

fn cmd_init_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(Config::local_config_path);
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }

    config.save(&path)?;
    println!("Wrote config: {}", path.display());
    Ok(())
}
