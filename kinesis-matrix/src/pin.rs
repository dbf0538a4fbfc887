//! Hardware capability the scanner is written against.
//!
//! Rows are driven through [`Pin`]s. Columns are read either as a set of
//! [`Pin`]s gathered into one word ([`PinColumns`]) or straight from one
//! 8-bit input register ([`PortColumns`]).

use core::marker::PhantomData;

use crate::word::RowWord;
use crate::MAX_COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// One logical I/O line: a direction bit, an output bit and an input bit.
///
/// On AVR, `Input` + `Low` is high impedance, `Input` + `High` enables the
/// pull-up and `Output` + `Low` sinks current.
pub trait Pin {
    fn set_direction(&mut self, direction: Direction);
    fn write(&mut self, level: Level);
    fn read(&self) -> Level;
}

/// An 8-bit input register sampled in one access.
pub trait InputPort {
    /// Make all eight lines inputs with pull-ups.
    fn configure_inputs(&mut self);
    fn read(&self) -> u8;
}

/// Source of the raw column word while a row is selected.
///
/// The word is returned as sampled on the lines: a closed switch on the
/// selected row reads as 0.
pub trait ColumnReader {
    type Word: RowWord;
    /// Number of column lines.
    const COLS: usize;

    fn init(&mut self);
    fn read(&mut self) -> Self::Word;
}

/// Column lines wired to individual pins, column `i` in bit `i`.
pub struct PinColumns<P, W, const N: usize> {
    pins: [P; N],
    _word: PhantomData<W>,
}

impl<P: Pin, W: RowWord, const N: usize> PinColumns<P, W, N> {
    const FITS: () = assert!(
        N <= W::BITS && N <= MAX_COLS,
        "column count does not fit the row word"
    );

    pub fn new(pins: [P; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        Self {
            pins,
            _word: PhantomData,
        }
    }
}

impl<P: Pin, W: RowWord, const N: usize> ColumnReader for PinColumns<P, W, N> {
    type Word = W;
    const COLS: usize = N;

    fn init(&mut self) {
        for pin in &mut self.pins {
            pin.set_direction(Direction::Input);
            pin.write(Level::High);
        }
    }

    fn read(&mut self) -> W {
        self.pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.read() == Level::High)
            .fold(W::ZERO, |word, (col, _)| word | W::bit(col))
    }
}

/// All columns on one 8-bit port, read as a single register access.
pub struct PortColumns<B> {
    port: B,
}

impl<B: InputPort> PortColumns<B> {
    pub const fn new(port: B) -> Self {
        Self { port }
    }
}

impl<B: InputPort> ColumnReader for PortColumns<B> {
    type Word = u8;
    const COLS: usize = 8;

    fn init(&mut self) {
        self.port.configure_inputs();
    }

    fn read(&mut self) -> u8 {
        self.port.read()
    }
}

/// I/O port letter of an AVR pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortId {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Build-time pin descriptor, e.g. `F4` is `PinId::new(PortId::F, 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinId {
    pub port: PortId,
    pub bit: u8,
}

impl PinId {
    pub const fn new(port: PortId, bit: u8) -> Self {
        Self { port, bit }
    }

    pub const fn mask(self) -> u8 {
        1 << self.bit
    }
}

/// How the column lines of a board are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWiring<const N: usize> {
    /// Every column on one port, read in a single access.
    Port(PortId),
    /// One pin per column.
    Pins([PinId; N]),
}
