mod renderer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use arrowboard_core::config::CONFIG_FILE_NAME;
use arrowboard_core::model::{Board, GridConfig};
use arrowboard_core::store::{RawRow, board_from_raw_rows};
use arrowboard_core::{BoardConfig, BoardState};
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser, Debug)]
#[command(name = "arrowboard")]
#[command(about = "Show an hourly condition board in the terminal")]
struct Args {
    /// Saved board (JSON), or raw rows with `--raw`
    path: PathBuf,

    /// Input is a list of `{ "name", "cells" }` rows to merge
    #[arg(long)]
    raw: bool,

    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Append logs here; without it logs are discarded
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(log_writer(args.log_file.as_deref())?)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arrowboard=info".parse()?)
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = BoardConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let board = load_board(&args.path, args.raw, &config.grid)?;
    info!(subjects = board.len(), path = %args.path.display(), "board loaded");

    renderer::render_tui(board, config)
}

/// Logs go to `path`, or nowhere. Never to the terminal the board is drawn on.
fn log_writer(path: Option<&Path>) -> Result<BoxMakeWriter> {
    let Some(path) = path else {
        return Ok(BoxMakeWriter::new(std::io::sink));
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

fn load_board(path: &Path, raw: bool, grid: &GridConfig) -> Result<Board> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_board(&data, raw, grid)
}

fn parse_board(data: &str, raw: bool, grid: &GridConfig) -> Result<Board> {
    if raw {
        let rows: Vec<RawRow> = serde_json::from_str(data).context("parsing raw rows")?;
        Ok(board_from_raw_rows(&rows, grid))
    } else {
        Ok(BoardState::from_json(data)?.into_board(grid)?)
    }
}
