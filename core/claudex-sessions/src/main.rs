//! claudex-sessions: command-line front end for claudex session storage.
//!
//! Every invocation first brings the project onto the `.claudex/` layout,
//! then runs one subcommand against it.
//!
//! ## Subcommands
//!
//! - `migrate`: Normalize the layout and report what moved
//! - `list`: Sessions, most recently used first
//! - `new` / `resume` / `fork` / `fresh`: Session lifecycle transitions
//! - `locate`: Print the directory of a session id
//! - `counter`: Inspect or update a session's doc-update counter
//! - `merge-settings`: Merge generated hooks into `.claude/settings.local.json`
//! - `setup`: Install hook scripts, agent profiles and settings into `.claude/`
//! - `pre-tool-use`: `PreToolUse` hook handler (JSON on stdin and stdout)
//! - `config`: Print the effective configuration

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use claudex_core::env::LOG_FILE_VAR;
use claudex_core::{ClaudexEngine, Environment, OsEnvironment, StorageConfig};
use commands::CounterAction;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "claudex-sessions")]
#[command(about = "Manage claudex work sessions")]
#[command(version)]
struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a legacy project layout into .claudex/
    Migrate,

    /// List sessions, most recently used first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a new session
    New {
        /// What the session is about
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Mark a session as used now
    Resume {
        /// Session directory name
        name: String,
    },

    /// Copy a session under a new id
    Fork {
        /// Session directory name
        name: String,

        /// Describe the fork; its slug is derived from this text
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Continue a session under a new id with progress reset, removing the original
    Fresh {
        /// Session directory name
        name: String,
    },

    /// Print the directory of a session id
    Locate {
        /// Session id (UUID)
        id: String,
    },

    /// Inspect or update a session's doc-update counter
    Counter {
        #[command(subcommand)]
        action: CounterCommand,
    },

    /// Merge generated hooks into the project's settings file
    MergeSettings {
        /// Template to merge (defaults to the installed template)
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,
    },

    /// Install hook scripts, agent profiles and settings into .claude/
    Setup {
        /// Remember that hook setup was declined instead of installing
        #[arg(long)]
        decline: bool,
    },

    /// Handle a PreToolUse hook event read from stdin
    PreToolUse,

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum CounterCommand {
    /// Show the counter and last processed line
    Show { id: String },
    /// Add one to the counter
    Increment { id: String },
    /// Set the counter to zero
    Reset { id: String },
}

fn main() {
    let cli = Cli::parse();

    let storage = match cli.project {
        Some(ref dir) => StorageConfig::for_project(dir.clone()),
        None => match StorageConfig::current() {
            Ok(storage) => storage,
            Err(e) => {
                eprintln!("claudex-sessions: cannot determine current directory: {}", e);
                std::process::exit(1);
            }
        },
    };

    let logging_guard = logging::init(&storage);
    let log_file = logging_guard.log_file().cloned();

    let code = match run(cli.command, storage, log_file) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "claudex-sessions failed");
            1
        }
    };

    // Flush the file writer before exiting.
    drop(logging_guard);
    std::process::exit(code);
}

fn run(command: Commands, storage: StorageConfig, log_file: Option<PathBuf>) -> Result<(), String> {
    let env: Arc<dyn Environment> = Arc::new(OsEnvironment);
    if let Some(log) = &log_file {
        env.set_var(LOG_FILE_VAR, &log.to_string_lossy());
    }

    let engine = ClaudexEngine::open(storage, env)?;
    let log = log_file.as_deref();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Migrate => commands::migrate(engine.migration(), &mut out)?,
        Commands::List { json } => commands::list(&engine, json, &mut out)?,
        Commands::New { description } => {
            commands::new(&engine, &description.join(" "), log, &mut out)?
        }
        Commands::Resume { name } => commands::resume(&engine, &name, log, &mut out)?,
        Commands::Fork { name, description } => {
            commands::fork(&engine, &name, description.as_deref(), log, &mut out)?
        }
        Commands::Fresh { name } => commands::fresh(&engine, &name, log, &mut out)?,
        Commands::Locate { id } => commands::locate(&engine, &id, &mut out)?,
        Commands::Counter { action } => {
            let (id, action) = match action {
                CounterCommand::Show { id } => (id, CounterAction::Show),
                CounterCommand::Increment { id } => (id, CounterAction::Increment),
                CounterCommand::Reset { id } => (id, CounterAction::Reset),
            };
            commands::counter(&engine, &id, action, &mut out)?
        }
        Commands::MergeSettings { template } => {
            commands::merge_settings(&engine, template, &mut out)?
        }
        Commands::Setup { decline } => commands::setup(&engine, decline, &mut out)?,
        Commands::PreToolUse => {
            let stdin = std::io::stdin();
            commands::pre_tool_use(&engine, &mut stdin.lock(), &mut out)?
        }
        Commands::Config => commands::config(&engine, &mut out)?,
    }

    out.flush().map_err(|e| format!("Failed to flush output: {}", e))
}
