//! Row-by-row matrix scanner.
//!
//! Rows are selected by driving them low one at a time; every other row is
//! left floating. Columns have pull-ups, so a closed switch on the selected
//! row reads as 0. The scanner inverts and masks the column word and hands
//! it to the debounce policy, which decides what callers get to see.

use embedded_hal::delay::DelayNs;

use crate::debounce::{Debounce, Settle};
use crate::pin::{ColumnReader, Direction, Level, Pin};
use crate::word::RowWord;
use crate::{debug, ghost, MAX_COLS, MAX_ROWS};

/// Time for the column lines to settle after a row is selected.
pub const SETTLE_US: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanStatus {
    Ok,
}

pub struct Matrix<P, C, D, T, const ROWS: usize> {
    rows: [P; ROWS],
    cols: C,
    debounce: D,
    delay: T,
    ghost_detection: bool,
}

impl<P, C, D, T, const ROWS: usize> Matrix<P, C, D, T, ROWS>
where
    P: Pin,
    C: ColumnReader,
    D: Debounce<C::Word, ROWS>,
    T: DelayNs,
{
    const FITS: () = assert!(
        ROWS >= 1 && ROWS <= MAX_ROWS && C::COLS >= 1 && C::COLS <= MAX_COLS,
        "matrix dimensions out of range"
    );

    pub fn new(rows: [P; ROWS], cols: C, debounce: D, delay: T) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        Self {
            rows,
            cols,
            debounce,
            delay,
            ghost_detection: false,
        }
    }

    pub fn with_ghost_detection(mut self, enabled: bool) -> Self {
        self.ghost_detection = enabled;
        self
    }

    /// Float every row, enable column pull-ups and clear all state.
    pub fn init(&mut self) {
        self.unselect_rows();
        self.cols.init();
        self.debounce.reset();
    }

    /// Sample every row once and let the debounce policy settle.
    pub fn scan(&mut self) -> ScanStatus {
        let mask = <C::Word as RowWord>::mask(C::COLS);

        self.debounce.begin_scan();
        for row in 0..ROWS {
            self.unselect_rows();
            self.select_row(row);
            self.delay.delay_us(SETTLE_US);
            let word = !self.cols.read() & mask;
            self.debounce.observe(row, word);
        }
        self.unselect_rows();

        if let Settle::Pause { ms } = self.debounce.end_scan() {
            self.delay.delay_ms(ms);
        }

        ScanStatus::Ok
    }

    pub fn is_modified(&self) -> bool {
        self.debounce.is_modified()
    }

    pub fn is_on(&self, row: usize, col: usize) -> bool {
        self.get_row(row).is_set(col)
    }

    pub fn get_row(&self, row: usize) -> C::Word {
        self.rows()[row]
    }

    /// Committed state, one word per row.
    pub fn rows(&self) -> &[C::Word; ROWS] {
        self.debounce.rows()
    }

    pub fn key_count(&self) -> u16 {
        self.rows()
            .iter()
            .map(|&word| u16::from(word.count_ones()))
            .sum()
    }

    /// Whether the committed state is ambiguous. Always false when ghost
    /// detection is off for this board.
    pub fn has_ghost(&self) -> bool {
        self.ghost_detection && ghost::has_ghost(self.rows())
    }

    pub fn print_debug<W: ufmt::uWrite + ?Sized>(&self, out: &mut W) -> Result<(), W::Error> {
        let rows = self.rows();
        debug::print_matrix(out, rows, C::COLS, |row| {
            self.ghost_detection && ghost::row_has_ghost(rows, row)
        })
    }

    pub fn row_count(&self) -> usize {
        ROWS
    }

    pub fn col_count(&self) -> usize {
        C::COLS
    }

    pub fn ghost_detection(&self) -> bool {
        self.ghost_detection
    }

    pub fn debouncer(&self) -> &D {
        &self.debounce
    }

    fn unselect_rows(&mut self) {
        for pin in &mut self.rows {
            pin.set_direction(Direction::Input);
            pin.write(Level::Low);
        }
    }

    fn select_row(&mut self, row: usize) {
        let pin = &mut self.rows[row];
        pin.set_direction(Direction::Output);
        pin.write(Level::Low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Bench;
    use crate::debounce::{ShadowCommit, SwapBuffer};
    use crate::pin::PortColumns;

    const ROWS: usize = 6;

    /// Run `n` scans and return the 1-based scans that reported a change.
    fn scan_n<P, C, D, T>(matrix: &mut Matrix<P, C, D, T, ROWS>, n: usize) -> Vec<usize>
    where
        P: Pin,
        C: ColumnReader,
        D: Debounce<C::Word, ROWS>,
        T: DelayNs,
    {
        (1..=n)
            .filter(|_| {
                matrix.scan();
                matrix.is_modified()
            })
            .collect()
    }

    #[test]
    fn test_idle_scans_swap_buffer() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(0));
        bench.press(1, 2);
        scan_n(&mut matrix, 10);

        let settled = *matrix.rows();
        for _ in 0..10 {
            matrix.scan();
            assert!(!matrix.is_modified());
            assert_eq!(matrix.rows(), &settled);
        }
        assert!(matrix.is_on(1, 2));
    }

    #[test]
    fn test_idle_scans_shadow_commit() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(ShadowCommit::new(5, 1));
        bench.press(1, 2);
        scan_n(&mut matrix, 10);

        let settled = *matrix.rows();
        for _ in 0..10 {
            matrix.scan();
            // Quiet scans keep reporting the settled state as fresh.
            assert!(matrix.is_modified());
            assert_eq!(matrix.rows(), &settled);
        }
        assert!(matrix.is_on(1, 2));
    }

    #[test]
    fn test_bounce_suppressed_swap_buffer() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(4));

        for i in 0..10 {
            if i % 2 == 0 {
                bench.press(0, 0);
            } else {
                bench.release(0, 0);
            }
            matrix.scan();
            assert!(!matrix.is_modified(), "scan {i}");
        }

        assert!(scan_n(&mut matrix, 10).is_empty());
        assert!(!matrix.is_on(0, 0));
    }

    #[test]
    fn test_bounce_suppressed_shadow_commit() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(ShadowCommit::new(4, 1));

        for i in 0..10 {
            if i % 2 == 0 {
                bench.press(0, 0);
            } else {
                bench.release(0, 0);
            }
            matrix.scan();
            assert!(!matrix.is_modified(), "scan {i}");
            assert!(!matrix.is_on(0, 0), "scan {i}");
        }

        for _ in 0..10 {
            matrix.scan();
            assert!(!matrix.is_on(0, 0));
        }
    }

    #[test]
    fn test_settling_commit_swap_buffer() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(5));
        bench.press(2, 3);

        assert_eq!(scan_n(&mut matrix, 15), vec![5]);
        assert!(matrix.is_on(2, 3));
        assert_eq!(bench.delayed_ms(), 0);
    }

    #[test]
    fn test_settling_commit_shadow_commit() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(ShadowCommit::new(5, 1));
        bench.press(2, 3);

        for scan in 1..5 {
            matrix.scan();
            assert!(!matrix.is_on(2, 3), "scan {scan}");
        }
        matrix.scan();
        assert!(matrix.is_on(2, 3));
        assert!(matrix.is_modified());
        assert_eq!(bench.delayed_ms(), 4);

        scan_n(&mut matrix, 10);
        assert_eq!(bench.delayed_ms(), 4);
    }

    #[test]
    fn test_commit_granularity() {
        fn run<D: Debounce<u8, ROWS>>(debounce: D) -> bool {
            let bench = Bench::<ROWS>::new();
            let mut matrix = bench.matrix::<u8, _, 8>(debounce);
            bench.press(5, 0);
            scan_n(&mut matrix, 2);
            bench.press(0, 0);
            matrix.scan();
            matrix.is_on(5, 0)
        }

        let swap = run(SwapBuffer::new(3));
        let shadow = run(ShadowCommit::new(3, 1));
        // Row writes show up at once, the shadow table only as a whole.
        assert!(swap);
        assert!(!shadow);
        assert_ne!(swap, shadow);
    }

    #[test]
    fn test_ghost_detection() {
        let bench = Bench::<ROWS>::new();
        for (row, col) in [(0, 1), (0, 2), (3, 1), (3, 2)] {
            bench.press(row, col);
        }

        let mut matrix = bench
            .matrix::<u8, _, 8>(SwapBuffer::new(0))
            .with_ghost_detection(true);
        matrix.scan();
        assert!(matrix.has_ghost());

        let mut out = String::new();
        matrix.print_debug(&mut out).unwrap();
        assert!(out.contains("00: 01100000 <ghost\n"));
        assert!(out.contains("01: 00000000\n"));

        let mut matrix = matrix.with_ghost_detection(false);
        matrix.scan();
        assert!(!matrix.has_ghost());
    }

    #[test]
    fn test_ghost_for_two_identical_rows() {
        let bench = Bench::<ROWS>::new();
        bench.set_row(1, 0b11);
        bench.set_row(2, 0b11);

        let mut matrix = bench
            .matrix::<u8, _, 8>(SwapBuffer::new(0))
            .with_ghost_detection(true);
        matrix.scan();
        assert_eq!(matrix.get_row(1), 0b11);
        assert_eq!(matrix.get_row(2), 0b11);
        assert!(matrix.has_ghost());
        assert_eq!(matrix.key_count(), 4);

        // {0} does not cover {0, 1}: nothing is ambiguous
        bench.set_row(2, 0b01);
        matrix.scan();
        assert!(!matrix.has_ghost());
    }

    #[test]
    fn test_no_ghost_for_single_keys() {
        let bench = Bench::<ROWS>::new();
        bench.press(0, 1);
        bench.press(3, 1);
        bench.press(4, 6);

        let mut matrix = bench
            .matrix::<u8, _, 8>(SwapBuffer::new(0))
            .with_ghost_detection(true);
        matrix.scan();
        assert!(!matrix.has_ghost());
    }

    #[test]
    fn test_key_count() {
        let bench = Bench::<ROWS>::new();
        bench.press(0, 0);
        bench.press(0, 3);
        bench.press(2, 7);

        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(0));
        matrix.scan();
        assert_eq!(matrix.key_count(), 3);
        assert_eq!(matrix.get_row(0), 0b0000_1001);
        assert_eq!(matrix.get_row(2), 0b1000_0000);
    }

    #[test]
    fn test_one_row_driven_in_order() {
        let bench = Bench::<ROWS>::new();
        bench.set_row(1, 0xFF);
        bench.set_row(4, 0xFF);

        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(0));
        scan_n(&mut matrix, 3);

        assert_eq!(bench.selections(), 3 * ROWS as u32);
        assert_eq!(bench.order_violations(), 0);
        assert!(bench.reads() > 0);
        assert_eq!(bench.overlaps(), 0);
        assert_eq!(bench.driven_rows(), 0);
        assert_eq!(matrix.rows(), &[0, 0xFF, 0, 0, 0xFF, 0]);
    }

    #[test]
    fn test_settle_delay_per_row() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = bench.matrix::<u8, _, 8>(SwapBuffer::new(0));
        matrix.scan();
        assert_eq!(bench.delayed_us(), SETTLE_US * ROWS as u32);
        assert_eq!(bench.delayed_ms(), 0);
    }

    #[test]
    fn test_unused_columns_masked() {
        let bench = Bench::<ROWS>::new();
        bench.press(2, 4);
        // Switch on a line the scanner does not read.
        bench.press(2, 6);

        let mut matrix = bench.matrix::<u8, _, 5>(SwapBuffer::new(0));
        matrix.scan();
        assert_eq!(matrix.get_row(0), 0);
        assert_eq!(matrix.get_row(2), 0b1_0000);
        assert_eq!(matrix.col_count(), 5);
        assert_eq!(matrix.row_count(), ROWS);
    }

    #[test]
    fn test_wide_rows() {
        let bench = Bench::<ROWS>::new();
        bench.press(3, 15);
        bench.press(3, 0);

        let mut matrix = bench.matrix::<u16, _, 16>(SwapBuffer::new(0));
        matrix.scan();
        assert_eq!(matrix.get_row(3), 0x8001);
        assert!(matrix.is_on(3, 15));
    }

    #[test]
    fn test_port_columns() {
        let bench = Bench::<ROWS>::new();
        let mut matrix = Matrix::new(
            bench.row_pins(),
            PortColumns::new(bench.port()),
            SwapBuffer::<u8, ROWS>::new(0),
            bench.delay(),
        );
        matrix.init();
        assert!(bench.port_configured());

        bench.press(3, 7);
        matrix.scan();
        assert!(matrix.is_on(3, 7));
        assert_eq!(matrix.get_row(3), 0x80);
        assert_eq!(matrix.key_count(), 1);
    }

    #[test]
    fn test_init_clears_state() {
        let bench = Bench::<ROWS>::new();
        bench.press(0, 0);
        let mut matrix = bench.matrix::<u8, _, 8>(ShadowCommit::new(0, 1));
        matrix.scan();
        assert_eq!(matrix.key_count(), 1);

        matrix.init();
        assert_eq!(matrix.key_count(), 0);
        assert_eq!(matrix.debouncer().counter(), 0);
    }
}
