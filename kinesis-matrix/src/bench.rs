//! Simulated matrix hardware.
//!
//! A [`Bench`] holds the switches of a diode-less matrix and hands out row
//! pins, column pins, an 8-bit column port and a delay that all refer back
//! to it. A column reads low when a closed switch connects it to a row that
//! is currently driven low. The bench also keeps score of how the scanner
//! behaves: how many rows were driven at each read, whether rows were
//! selected in order, and how long it waited.

use core::array;
use core::cell::Cell;

use embedded_hal::delay::DelayNs;

use crate::debounce::Debounce;
use crate::matrix::Matrix;
use crate::pin::{Direction, InputPort, Level, Pin, PinColumns};
use crate::word::RowWord;

pub struct Bench<const ROWS: usize> {
    keys: [Cell<u16>; ROWS],
    direction: [Cell<Direction>; ROWS],
    level: [Cell<Level>; ROWS],
    last_selected: Cell<Option<usize>>,
    selections: Cell<u32>,
    order_violations: Cell<u32>,
    reads: Cell<u32>,
    overlaps: Cell<u32>,
    port_configured: Cell<bool>,
    delayed_us: Cell<u32>,
    delayed_ms: Cell<u32>,
}

pub type BenchMatrix<'a, W, D, const ROWS: usize, const COLS: usize> = Matrix<
    BenchRowPin<'a, ROWS>,
    PinColumns<BenchColumnPin<'a, ROWS>, W, COLS>,
    D,
    BenchDelay<'a, ROWS>,
    ROWS,
>;

impl<const ROWS: usize> Default for Bench<ROWS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize> Bench<ROWS> {
    pub fn new() -> Self {
        Self {
            keys: array::from_fn(|_| Cell::new(0)),
            direction: array::from_fn(|_| Cell::new(Direction::Input)),
            level: array::from_fn(|_| Cell::new(Level::Low)),
            last_selected: Cell::new(None),
            selections: Cell::new(0),
            order_violations: Cell::new(0),
            reads: Cell::new(0),
            overlaps: Cell::new(0),
            port_configured: Cell::new(false),
            delayed_us: Cell::new(0),
            delayed_ms: Cell::new(0),
        }
    }

    pub fn press(&self, row: usize, col: usize) {
        let keys = &self.keys[row];
        keys.set(keys.get() | 1 << col);
    }

    pub fn release(&self, row: usize, col: usize) {
        let keys = &self.keys[row];
        keys.set(keys.get() & !(1 << col));
    }

    /// Replace the switches of one row, bit `i` = column `i` closed.
    pub fn set_row(&self, row: usize, keys: u16) {
        self.keys[row].set(keys);
    }

    /// Open every switch.
    pub fn clear(&self) {
        for keys in &self.keys {
            keys.set(0);
        }
    }

    pub fn row_pins(&self) -> [BenchRowPin<'_, ROWS>; ROWS] {
        array::from_fn(|row| BenchRowPin { bench: self, row })
    }

    pub fn column_pins<const N: usize>(&self) -> [BenchColumnPin<'_, ROWS>; N] {
        array::from_fn(|col| BenchColumnPin { bench: self, col })
    }

    /// Columns 0..8 as one input register.
    pub fn port(&self) -> BenchPort<'_, ROWS> {
        BenchPort { bench: self }
    }

    pub fn delay(&self) -> BenchDelay<'_, ROWS> {
        BenchDelay { bench: self }
    }

    /// Scanner with one bench pin per column, already initialised.
    pub fn matrix<W, D, const COLS: usize>(&self, debounce: D) -> BenchMatrix<'_, W, D, ROWS, COLS>
    where
        W: RowWord,
        D: Debounce<W, ROWS>,
    {
        let mut matrix = Matrix::new(
            self.row_pins(),
            PinColumns::new(self.column_pins()),
            debounce,
            self.delay(),
        );
        matrix.init();
        matrix
    }

    /// Number of rows currently driven low.
    pub fn driven_rows(&self) -> usize {
        (0..ROWS).filter(|&row| self.is_driven(row)).count()
    }

    /// Rows selected since the bench was built.
    pub fn selections(&self) -> u32 {
        self.selections.get()
    }

    /// Selections that were neither the next row nor a wrap back to row 0.
    pub fn order_violations(&self) -> u32 {
        self.order_violations.get()
    }

    /// Column samples taken.
    pub fn reads(&self) -> u32 {
        self.reads.get()
    }

    /// Column samples taken while more than one row was driven.
    pub fn overlaps(&self) -> u32 {
        self.overlaps.get()
    }

    pub fn port_configured(&self) -> bool {
        self.port_configured.get()
    }

    pub fn delayed_us(&self) -> u32 {
        self.delayed_us.get()
    }

    pub fn delayed_ms(&self) -> u32 {
        self.delayed_ms.get()
    }

    fn is_driven(&self, row: usize) -> bool {
        self.direction[row].get() == Direction::Output && self.level[row].get() == Level::Low
    }

    fn update_row(&self, row: usize, was_driven: bool) {
        if was_driven || !self.is_driven(row) {
            return;
        }

        let expected = match self.last_selected.get() {
            Some(last) => (last + 1) % ROWS,
            None => 0,
        };
        if row != expected && row != 0 {
            self.order_violations.set(self.order_violations.get() + 1);
        }
        self.last_selected.set(Some(row));
        self.selections.set(self.selections.get() + 1);
    }

    /// Column lines that are pulled low, bit `i` = column `i`.
    fn sense(&self) -> u16 {
        self.reads.set(self.reads.get() + 1);
        if self.driven_rows() > 1 {
            self.overlaps.set(self.overlaps.get() + 1);
        }

        (0..ROWS)
            .filter(|&row| self.is_driven(row))
            .fold(0, |sensed, row| sensed | self.keys[row].get())
    }
}

pub struct BenchRowPin<'a, const ROWS: usize> {
    bench: &'a Bench<ROWS>,
    row: usize,
}

impl<const ROWS: usize> Pin for BenchRowPin<'_, ROWS> {
    fn set_direction(&mut self, direction: Direction) {
        let was_driven = self.bench.is_driven(self.row);
        self.bench.direction[self.row].set(direction);
        self.bench.update_row(self.row, was_driven);
    }

    fn write(&mut self, level: Level) {
        let was_driven = self.bench.is_driven(self.row);
        self.bench.level[self.row].set(level);
        self.bench.update_row(self.row, was_driven);
    }

    fn read(&self) -> Level {
        self.bench.level[self.row].get()
    }
}

pub struct BenchColumnPin<'a, const ROWS: usize> {
    bench: &'a Bench<ROWS>,
    col: usize,
}

impl<const ROWS: usize> Pin for BenchColumnPin<'_, ROWS> {
    fn set_direction(&mut self, _direction: Direction) {}

    fn write(&mut self, _level: Level) {}

    fn read(&self) -> Level {
        if self.bench.sense() & 1 << self.col != 0 {
            Level::Low
        } else {
            Level::High
        }
    }
}

pub struct BenchPort<'a, const ROWS: usize> {
    bench: &'a Bench<ROWS>,
}

impl<const ROWS: usize> InputPort for BenchPort<'_, ROWS> {
    fn configure_inputs(&mut self) {
        self.bench.port_configured.set(true);
    }

    fn read(&self) -> u8 {
        !(self.bench.sense() as u8)
    }
}

pub struct BenchDelay<'a, const ROWS: usize> {
    bench: &'a Bench<ROWS>,
}

impl<const ROWS: usize> DelayNs for BenchDelay<'_, ROWS> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        let total = &self.bench.delayed_us;
        total.set(total.get() + us);
    }

    fn delay_ms(&mut self, ms: u32) {
        let total = &self.bench.delayed_ms;
        total.set(total.get() + ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_totals() {
        let bench = Bench::<1>::new();
        let mut delay = bench.delay();
        delay.delay_us(30);
        delay.delay_ns(1_500);
        delay.delay_ms(2);
        // Nanosecond waits round up to whole microseconds
        assert_eq!(bench.delayed_us(), 32);
        assert_eq!(bench.delayed_ms(), 2);
    }
}
