mod render;
mod sim;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kinesis_layout::{keycode, schema_to_string, BoardConfig};

#[derive(Parser)]
#[command(name = "kinesis-cli")]
#[command(about = "Kinesis matrix board configuration and simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a board configuration file
    Check {
        /// Path to the board JSON file
        config: PathBuf,
    },
    /// Print the Rust module generated for a board
    Generate {
        config: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render every layer of a board as HTML/SVG
    Render {
        config: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of board configuration files
    Schema,
    /// Run the scanner of a built-in board against a scripted key sequence
    Simulate {
        /// Board name, e.g. btkinesis
        #[arg(short, long)]
        board: String,
        /// Path to the JSON script of frames
        script: PathBuf,
        /// Override the board's debounce threshold
        #[arg(long)]
        debounce: Option<u8>,
        /// Override the board's debounce policy
        #[arg(long, value_enum)]
        policy: Option<sim::PolicyArg>,
    },
}

fn load(config: &Path) -> Result<(BoardConfig, kinesis_layout::Board)> {
    let parsed = BoardConfig::from_file(config)?;
    let board = parsed
        .validate()
        .with_context(|| format!("validating {}", config.display()))?;
    Ok((parsed, board))
}

fn emit(output: Option<PathBuf>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{contents}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = lovely_env_logger::try_init_default();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { config } => {
            let (_, board) = load(&config)?;
            println!(
                "{}: {}x{} matrix, {} rows, {:?}, ghost detection {}",
                board.name,
                board.rows,
                board.cols,
                board.word(),
                board.debounce,
                if board.ghost_detection { "on" } else { "off" },
            );
            for (i, layer) in board.layers.iter().enumerate() {
                let mapped = layer.keys.iter().flatten().filter(|&&code| code != 0).count();
                println!("  layer {i} {:?}: {mapped} keys", layer.name);
            }
            for i in 0..kinesis_layout::FN_KEYS {
                let tap = board.fn_keycode[i];
                if board.fn_layer[i] != 0 || tap != 0 {
                    println!(
                        "  FN{i}: layer {}, tap {}",
                        board.fn_layer[i],
                        keycode::name(tap).unwrap_or("?"),
                    );
                }
            }
        }
        Command::Generate { config, output } => {
            let (_, board) = load(&config)?;
            emit(output, &board.to_string_pretty()?)?;
        }
        Command::Render { config, output } => {
            let (parsed, board) = load(&config)?;
            emit(output, &render::generate_html(&parsed, &board))?;
        }
        Command::Schema => {
            println!("{}", schema_to_string()?);
        }
        Command::Simulate {
            board,
            script,
            debounce,
            policy,
        } => {
            let frames = sim::load_script(&script)?;
            let stdout = io::stdout();
            sim::simulate(&board, &frames, policy, debounce, &mut stdout.lock())?;
        }
    }

    Ok(())
}
