use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use undograph::{HistoryConfig, VersionedDocument};

use crate::error::{DemoError, Result};
use crate::logging::init_tracing;
use crate::script::Session;

#[derive(Debug, Parser)]
#[command(
    name = "undograph-demo",
    about = "Line-oriented text editor with snapshot undo/redo",
    version
)]
pub struct Cli {
    /// Script of editor commands. Reads stdin when omitted.
    pub script: Option<PathBuf>,

    /// History configuration file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the undo depth from the configuration.
    #[arg(long)]
    pub max_undo: Option<usize>,

    /// Override the redo depth from the configuration.
    #[arg(long)]
    pub max_redo: Option<usize>,

    /// Start from the contents of this file instead of an empty document.
    #[arg(long)]
    pub open: Option<PathBuf>,

    /// Default log filter when neither `UNDOGRAPH_LOG` nor `RUST_LOG` is set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// History configuration from `--config` with the depth overrides applied.
    pub fn history_config(&self) -> Result<HistoryConfig> {
        let mut config = match &self.config {
            Some(path) => HistoryConfig::from_file(path)?,
            None => HistoryConfig::default(),
        };
        if let Some(max_undo) = self.max_undo {
            config = config.with_max_undo(max_undo);
        }
        if let Some(max_redo) = self.max_redo {
            config = config.with_max_redo(max_redo);
        }
        Ok(config.into_validated()?)
    }

    /// Initial document, loaded from `--open` if given.
    pub fn initial_document(&self, config: HistoryConfig) -> Result<VersionedDocument<String>> {
        let Some(path) = &self.open else {
            return Ok(VersionedDocument::with_config(String::new(), config));
        };
        let text = std::fs::read_to_string(path).map_err(|source| DemoError::Script {
            path: path.clone(),
            source,
        })?;
        Ok(VersionedDocument::open_with_config(text, path, config)?)
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.history_config()?;
    info!(
        max_undo = config.max_undo,
        max_redo = config.max_redo,
        "history configured"
    );
    let mut session = Session::new(cli.initial_document(config)?);
    let mut out = io::stdout().lock();

    match &cli.script {
        Some(path) => {
            let file = File::open(path).map_err(|source| DemoError::Script {
                path: path.clone(),
                source,
            })?;
            session.run_script(BufReader::new(file), &mut out)
        }
        None => session.run_script(io::stdin().lock(), &mut out),
    }
}
