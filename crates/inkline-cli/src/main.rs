//! Inkline geometry inspector
//!
//! Loads a board document and prints anchors, routed connectors, or drag snaps
//! as JSON. Set `RUST_LOG=debug` to see why connectors fail to route.

mod commands;
mod settings;

use clap::{Parser, Subcommand};
use commands::CommandError;
use inkline_core::{Board, BoardError, ShapeId, config::DEFAULT_SNAP_THRESHOLD};
use serde::Serialize;
use settings::SettingsError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "inkline")]
#[command(about = "Inspect connector routing and snapping on an Inkline board")]
struct Cli {
    /// Geometry settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the stage-space anchors of a shape
    Anchors {
        board: PathBuf,
        shape: ShapeId,
    },
    /// Route one connector, or all of them
    Route {
        board: PathBuf,
        #[arg(long)]
        connector: Option<ShapeId>,
    },
    /// Snap a selection against the rest of the board
    Snap {
        board: PathBuf,
        /// Ids of the shapes being dragged
        #[arg(long, required = true, num_args = 1..)]
        moving: Vec<ShapeId>,
        #[arg(long, default_value_t = DEFAULT_SNAP_THRESHOLD)]
        threshold: f64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read board '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

fn load_board(path: &Path) -> Result<Board, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let board = Board::from_json(&json)?;
    log::debug!(
        "Loaded board {} with {} shapes and {} connectors",
        board.id,
        board.shapes.len(),
        board.connectors.len()
    );
    Ok(board)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = settings::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Anchors { board, shape } => {
            let board = load_board(&board)?;
            print_json(&commands::anchors(&board, shape)?)
        }
        Command::Route { board, connector } => {
            let board = load_board(&board)?;
            let report = commands::route(&board, connector, &config)?;
            for id in &report.dangling {
                eprintln!("warning: connector {} cannot be routed", id);
            }
            print_json(&report)
        }
        Command::Snap {
            board,
            moving,
            threshold,
        } => {
            let board = load_board(&board)?;
            print_json(&commands::snap(&board, &moving, threshold, &config)?)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_snap_args() {
        let id = uuid::Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "inkline",
            "snap",
            "board.json",
            "--moving",
            &id.to_string(),
        ])
        .unwrap();
        match cli.command {
            Command::Snap { moving, threshold, .. } => {
                assert_eq!(moving, vec![id]);
                assert_eq!(threshold, DEFAULT_SNAP_THRESHOLD);
            }
            _ => panic!("expected snap"),
        }
    }

    #[test]
    fn test_missing_board_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_board(&dir.path().join("none.json"));
        assert!(matches!(result, Err(CliError::Read { .. })));
    }

    #[test]
    fn test_load_board_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, Board::new("t").to_json().unwrap()).unwrap();
        assert_eq!(load_board(&path).unwrap().title, "t");
    }
}
