//! Debounce policies.
//!
//! Both policies keep one global counter rather than one per key: any
//! change anywhere in the matrix restarts the settling window. They differ
//! in when a fresh reading becomes visible.
//!
//! * [`SwapBuffer`] writes a changed row immediately and flips between two
//!   buffers once the matrix is quiet, so `is_modified` compares the two.
//! * [`ShadowCommit`] collects readings in a shadow buffer and publishes the
//!   whole table at once after the counter has run down.

use log::{debug, trace};

use crate::word::RowWord;

/// What the scanner should do once a scan pass is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Done,
    /// Still counting down; wait before the next scan.
    Pause { ms: u32 },
}

/// Which debounce policy a board uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    SwapBuffer,
    ShadowCommit,
}

pub trait Debounce<W: RowWord, const ROWS: usize> {
    /// Clear every buffer and restart the counter at the threshold.
    fn reset(&mut self);

    fn begin_scan(&mut self) {}

    /// Feed the fresh, already inverted and masked, word of one row.
    fn observe(&mut self, row: usize, word: W);

    fn end_scan(&mut self) -> Settle;

    /// Committed state visible to callers.
    fn rows(&self) -> &[W; ROWS];

    fn is_modified(&self) -> bool;

    fn threshold(&self) -> u8;

    /// Scans left before the matrix is considered settled.
    fn counter(&self) -> u8;
}

/// Two buffers whose roles alternate, rows written as soon as they change.
pub struct SwapBuffer<W, const ROWS: usize> {
    buffers: [[W; ROWS]; 2],
    current: usize,
    threshold: u8,
    counter: u8,
}

impl<W: RowWord, const ROWS: usize> SwapBuffer<W, ROWS> {
    pub fn new(threshold: u8) -> Self {
        Self {
            buffers: [[W::ZERO; ROWS]; 2],
            current: 0,
            threshold,
            counter: threshold,
        }
    }

    fn previous(&self) -> &[W; ROWS] {
        &self.buffers[self.current ^ 1]
    }
}

impl<W: RowWord, const ROWS: usize> Debounce<W, ROWS> for SwapBuffer<W, ROWS> {
    fn reset(&mut self) {
        self.buffers = [[W::ZERO; ROWS]; 2];
        self.current = 0;
        self.counter = self.threshold;
    }

    fn begin_scan(&mut self) {
        if self.counter == 0 {
            self.current ^= 1;
        }
    }

    fn observe(&mut self, row: usize, word: W) {
        let slot = &mut self.buffers[self.current][row];
        if *slot != word {
            *slot = word;
            if self.counter != 0 {
                debug!("bounce!: {:02x}", self.counter);
            }
            self.counter = self.threshold;
        }
    }

    fn end_scan(&mut self) -> Settle {
        self.counter = self.counter.saturating_sub(1);
        Settle::Done
    }

    fn rows(&self) -> &[W; ROWS] {
        &self.buffers[self.current]
    }

    fn is_modified(&self) -> bool {
        self.counter == 0 && self.rows() != self.previous()
    }

    fn threshold(&self) -> u8 {
        self.threshold
    }

    fn counter(&self) -> u8 {
        self.counter
    }
}

/// Readings collected in a shadow buffer, published all at once.
pub struct ShadowCommit<W, const ROWS: usize> {
    published: [W; ROWS],
    shadow: [W; ROWS],
    threshold: u8,
    counter: u8,
    pause_ms: u32,
}

impl<W: RowWord, const ROWS: usize> ShadowCommit<W, ROWS> {
    pub fn new(threshold: u8, pause_ms: u32) -> Self {
        Self {
            published: [W::ZERO; ROWS],
            shadow: [W::ZERO; ROWS],
            threshold,
            counter: threshold,
            pause_ms,
        }
    }

    pub fn pause_ms(&self) -> u32 {
        self.pause_ms
    }

    /// Readings not yet published.
    pub fn shadow(&self) -> &[W; ROWS] {
        &self.shadow
    }

    fn commit(&mut self) {
        trace!("commit");
        self.published = self.shadow;
    }
}

impl<W: RowWord, const ROWS: usize> Debounce<W, ROWS> for ShadowCommit<W, ROWS> {
    fn reset(&mut self) {
        self.published = [W::ZERO; ROWS];
        self.shadow = [W::ZERO; ROWS];
        self.counter = self.threshold;
    }

    fn observe(&mut self, row: usize, word: W) {
        if self.shadow[row] != word {
            self.shadow[row] = word;
            if self.counter != 0 {
                debug!("bounce!: {:02x}", self.counter);
            }
            self.counter = self.threshold;
        }
    }

    fn end_scan(&mut self) -> Settle {
        if self.counter != 0 {
            self.counter -= 1;
            if self.counter != 0 {
                return Settle::Pause { ms: self.pause_ms };
            }
            self.commit();
        } else if self.threshold == 0 {
            self.commit();
        }
        Settle::Done
    }

    fn rows(&self) -> &[W; ROWS] {
        &self.published
    }

    fn is_modified(&self) -> bool {
        self.counter == 0
    }

    fn threshold(&self) -> u8 {
        self.threshold
    }

    fn counter(&self) -> u8 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan<D: Debounce<u8, 2>>(debounce: &mut D, rows: [u8; 2]) -> Settle {
        debounce.begin_scan();
        for (row, word) in rows.into_iter().enumerate() {
            debounce.observe(row, word);
        }
        debounce.end_scan()
    }

    #[test]
    fn test_swap_buffer_threshold_zero() {
        let mut debounce = SwapBuffer::<u8, 2>::new(0);
        assert_eq!(scan(&mut debounce, [0, 0]), Settle::Done);
        assert!(!debounce.is_modified());

        scan(&mut debounce, [0b10, 0]);
        assert!(debounce.is_modified());
        assert_eq!(debounce.rows(), &[0b10, 0]);

        // The stale buffer catches up without reporting a second change.
        scan(&mut debounce, [0b10, 0]);
        assert!(!debounce.is_modified());
        assert_eq!(debounce.rows(), &[0b10, 0]);
    }

    #[test]
    fn test_swap_buffer_writes_before_settling() {
        let mut debounce = SwapBuffer::<u8, 2>::new(2);
        assert_eq!(debounce.counter(), 2);

        scan(&mut debounce, [0, 1]);
        assert_eq!(debounce.rows(), &[0, 1]);
        assert_eq!(debounce.counter(), 1);
        assert!(!debounce.is_modified());

        scan(&mut debounce, [0, 1]);
        assert_eq!(debounce.counter(), 0);
        assert!(debounce.is_modified());
    }

    #[test]
    fn test_swap_buffer_reset() {
        let mut debounce = SwapBuffer::<u8, 2>::new(3);
        scan(&mut debounce, [0xFF, 0xFF]);
        debounce.reset();
        assert_eq!(debounce.rows(), &[0, 0]);
        assert_eq!(debounce.counter(), 3);
    }

    #[test]
    fn test_shadow_commit_pauses_until_settled() {
        let mut debounce = ShadowCommit::<u8, 2>::new(3, 1);

        assert_eq!(scan(&mut debounce, [1, 0]), Settle::Pause { ms: 1 });
        assert_eq!(debounce.shadow(), &[1, 0]);
        assert_eq!(debounce.rows(), &[0, 0]);
        assert!(!debounce.is_modified());

        assert_eq!(scan(&mut debounce, [1, 0]), Settle::Pause { ms: 1 });
        assert_eq!(scan(&mut debounce, [1, 0]), Settle::Done);
        assert_eq!(debounce.rows(), &[1, 0]);
        assert!(debounce.is_modified());

        // Quiet scans stay "modified".
        assert_eq!(scan(&mut debounce, [1, 0]), Settle::Done);
        assert!(debounce.is_modified());
    }

    #[test]
    fn test_shadow_commit_threshold_zero_commits_every_scan() {
        let mut debounce = ShadowCommit::<u8, 2>::new(0, 1);
        assert_eq!(scan(&mut debounce, [0, 4]), Settle::Done);
        assert_eq!(debounce.rows(), &[0, 4]);
        assert_eq!(scan(&mut debounce, [2, 0]), Settle::Done);
        assert_eq!(debounce.rows(), &[2, 0]);
    }

    #[test]
    fn test_shadow_commit_change_restarts_window() {
        let mut debounce = ShadowCommit::<u8, 2>::new(2, 5);
        scan(&mut debounce, [1, 0]);
        assert_eq!(debounce.counter(), 1);
        assert_eq!(scan(&mut debounce, [0, 0]), Settle::Pause { ms: 5 });
        assert_eq!(debounce.counter(), 1);
        assert_eq!(scan(&mut debounce, [0, 0]), Settle::Done);
        assert_eq!(debounce.rows(), &[0, 0]);
    }
}
