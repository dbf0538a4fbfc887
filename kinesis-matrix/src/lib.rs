//! Matrix scanning, debouncing and keymap lookup for Kinesis-style keyboards.
//!
//! This crate is `no_std` so it can be used by both the AVR firmware and the
//! native host tools. The scanner only talks to hardware through the
//! [`pin::Pin`], [`pin::InputPort`] and `embedded_hal` delay capabilities.

#![cfg_attr(not(test), no_std)]

pub mod boards;
pub mod debounce;
pub mod debug;
pub mod ghost;
pub mod keymap;
pub mod matrix;
pub mod pin;
pub mod word;

#[cfg(any(test, feature = "bench"))]
pub mod bench;

pub use debounce::{Debounce, Policy, ShadowCommit, SwapBuffer};
pub use keymap::Keymap;
pub use matrix::{Matrix, ScanStatus};
pub use word::RowWord;

/// Largest supported number of rows (row index fits in a byte).
pub const MAX_ROWS: usize = 255;
/// Largest supported number of columns (row state fits in a 16-bit word).
pub const MAX_COLS: usize = 16;
