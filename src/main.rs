use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use pagefields::config::{ConfigError, EditorConfig};
use pagefields::doc::Document;
use pagefields::engine::{Action, EngineCore, Event};
use pagefields::keymap::KeymapError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Keymap(#[from] KeymapError),
}

#[derive(Parser, Debug)]
#[command(name = "pagefields", about = "Form-field layout engine: replay editing sessions")]
struct Cli {
    /// Editor settings (JSON). Environment overrides apply on top.
    #[arg(long, global = true, env = "PAGEFIELDS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an event script against a document and print the result.
    Replay {
        /// Starting document (JSON).
        #[arg(long, env = "PAGEFIELDS_DOCUMENT")]
        document: PathBuf,
        /// Event script: a JSON array of events.
        #[arg(long, env = "PAGEFIELDS_EVENTS")]
        events: PathBuf,
        /// Write the final document here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective keyboard shortcuts.
    Keymap,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay { document, events, output } => replay(&config, &document, &events, output.as_deref()),
        Command::Keymap => print_keymap(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    let config = match path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.to_path_buf(), source })
}

fn replay(config: &EditorConfig, document: &Path, events: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let doc: Document = read_json(document)?;
    let script: Vec<Event> = read_json(events)?;
    info!(fields = doc.len(), events = script.len(), "replay start");

    let mut core = EngineCore::with_config(doc, config)?;
    let mut commits = 0usize;
    for (step, event) in script.into_iter().enumerate() {
        let actions = core.handle(event);
        let committed = actions.iter().filter(|a| matches!(a, Action::Committed(_))).count();
        debug!(step, actions = actions.len(), committed, "event");
        commits += committed;
    }
    info!(
        commits,
        fields = core.document().len(),
        history = core.history().len(),
        undo = core.can_undo(),
        "replay done"
    );

    let json = serde_json::to_string_pretty(core.document())?;
    match output {
        Some(path) => {
            fs::write(path, json).map_err(|source| CliError::Write { path: path.to_path_buf(), source })?;
            info!(path = %path.display(), "wrote document");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_keymap(config: &EditorConfig) -> Result<(), CliError> {
    let keymap = config.shortcut_map()?;
    for (action, combo) in keymap.iter() {
        let name = action.name();
        println!("{name:<18} {combo}");
    }
    Ok(())
}
