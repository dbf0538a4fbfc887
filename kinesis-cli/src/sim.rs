//! Run the real scanner against the simulated bench.
//!
//! A script is a JSON list of frames. Each frame holds a set of pressed
//! matrix cells for a number of scans:
//!
//! ```json
//! [
//!   { "scans": 3, "pressed": [[3, 1]] },
//!   { "scans": 6, "pressed": [] }
//! ]
//! ```

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use clap::ValueEnum;
use kinesis_matrix::bench::Bench;
use kinesis_matrix::{boards, Debounce, Policy, RowWord, ShadowCommit, SwapBuffer};
use serde::Deserialize;

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Frame {
    #[serde(default = "one")]
    pub scans: usize,
    #[serde(default)]
    pub pressed: Vec<(usize, usize)>,
}

fn one() -> usize {
    1
}

pub fn load_script(path: &Path) -> Result<Vec<Frame>> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    let frames = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("While reading {}", path.display()))?;
    Ok(frames)
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
    SwapBuffer,
    ShadowCommit,
}

impl From<PolicyArg> for Policy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::SwapBuffer => Policy::SwapBuffer,
            PolicyArg::ShadowCommit => Policy::ShadowCommit,
        }
    }
}

/// Debounce and ghost settings of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub policy: Policy,
    pub threshold: u8,
    pub pause_ms: u32,
    pub ghost_detection: bool,
}

impl Settings {
    /// Apply command line overrides to the board defaults.
    pub fn with_overrides(mut self, policy: Option<PolicyArg>, threshold: Option<u8>) -> Self {
        if let Some(policy) = policy {
            self.policy = policy.into();
        }
        if let Some(threshold) = threshold {
            self.threshold = threshold;
        }
        if self.policy == Policy::ShadowCommit && self.pause_ms == 0 {
            self.pause_ms = 1;
        }
        self
    }
}

macro_rules! dispatch {
    ($name:expr, $frames:expr, $overrides:expr, $out:expr; $($board:ident),* $(,)?) => {
        match $name {
            $(
                stringify!($board) => {
                    use boards::$board as board;
                    let (policy, threshold) = $overrides;
                    let settings = Settings {
                        policy: board::POLICY,
                        threshold: board::DEBOUNCE,
                        pause_ms: board::PAUSE_MS,
                        ghost_detection: board::GHOST_DETECTION,
                    }
                    .with_overrides(policy, threshold);
                    run_board::<board::Word, { board::ROWS }, { board::COLS }>($frames, settings, $out)
                }
            )*
            other => bail!(
                "unknown board {:?}, expected one of: {}",
                other,
                boards::BOARDS.join(", ")
            ),
        }
    };
}

/// Simulate `frames` on the named board, writing one report per scan.
pub fn simulate(
    board: &str,
    frames: &[Frame],
    policy: Option<PolicyArg>,
    threshold: Option<u8>,
    out: &mut dyn Write,
) -> Result<()> {
    dispatch!(board, frames, (policy, threshold), out; btkinesis, uberkinesis)
}

fn run_board<W: RowWord, const ROWS: usize, const COLS: usize>(
    frames: &[Frame],
    settings: Settings,
    out: &mut dyn Write,
) -> Result<()> {
    log::info!("simulating {ROWS}x{COLS} matrix with {settings:?}");
    match settings.policy {
        Policy::SwapBuffer => run::<W, _, ROWS, COLS>(
            frames,
            SwapBuffer::new(settings.threshold),
            settings.ghost_detection,
            out,
        ),
        Policy::ShadowCommit => run::<W, _, ROWS, COLS>(
            frames,
            ShadowCommit::new(settings.threshold, settings.pause_ms),
            settings.ghost_detection,
            out,
        ),
    }
}

fn run<W, D, const ROWS: usize, const COLS: usize>(
    frames: &[Frame],
    debounce: D,
    ghost_detection: bool,
    out: &mut dyn Write,
) -> Result<()>
where
    W: RowWord,
    D: Debounce<W, ROWS>,
{
    let bench = Bench::<ROWS>::new();
    let mut matrix = bench
        .matrix::<W, D, COLS>(debounce)
        .with_ghost_detection(ghost_detection);

    let mut scan = 0;
    for (i, frame) in frames.iter().enumerate() {
        bench.clear();
        for &(row, col) in &frame.pressed {
            ensure!(
                row < ROWS && col < COLS,
                "frame {i}: cell [{row}, {col}] is outside the {ROWS}x{COLS} matrix"
            );
            bench.press(row, col);
        }

        for _ in 0..frame.scans {
            scan += 1;
            matrix.scan();

            let mut dump = String::new();
            matrix.print_debug(&mut dump)?;
            writeln!(
                out,
                "scan {scan}: modified={} keys={} ghost={}{}",
                matrix.is_modified(),
                matrix.key_count(),
                matrix.has_ghost(),
                dump.trim_end(),
            )?;
        }
    }

    if bench.overlaps() != 0 {
        bail!("{} column reads saw more than one row driven", bench.overlaps());
    }
    writeln!(out, "{scan} scans, {} ms paused", bench.delayed_ms())?;
    Ok(())
}
