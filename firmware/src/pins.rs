//! Register-backed row pins and column ports.
//!
//! Every AVR port is a PINx/DDRx/PORTx triple. A [`PinId`] names the port
//! and bit; the registers are looked up on each access so pins stay plain
//! `Copy` data.

use avr_device::atmega32u4::{PORTB, PORTC, PORTD, PORTE, PORTF};
use kinesis_matrix::pin::{
    ColumnReader, ColumnWiring, Direction, InputPort, Level, Pin, PinColumns, PinId, PortColumns,
    PortId,
};
use kinesis_matrix::RowWord;

use crate::board::layout;

/// Bind `$pin`, `$ddr` and `$out` to the registers of `$port` and run `$body`.
macro_rules! with_port {
    ($port:expr, |$pin:ident, $ddr:ident, $out:ident| $body:expr) => {
        match $port {
            PortId::B => {
                let regs = unsafe { &*PORTB::ptr() };
                let ($pin, $ddr, $out) = (&regs.pinb, &regs.ddrb, &regs.portb);
                $body
            }
            PortId::C => {
                let regs = unsafe { &*PORTC::ptr() };
                let ($pin, $ddr, $out) = (&regs.pinc, &regs.ddrc, &regs.portc);
                $body
            }
            PortId::D => {
                let regs = unsafe { &*PORTD::ptr() };
                let ($pin, $ddr, $out) = (&regs.pind, &regs.ddrd, &regs.portd);
                $body
            }
            PortId::E => {
                let regs = unsafe { &*PORTE::ptr() };
                let ($pin, $ddr, $out) = (&regs.pine, &regs.ddre, &regs.porte);
                $body
            }
            PortId::F => {
                let regs = unsafe { &*PORTF::ptr() };
                let ($pin, $ddr, $out) = (&regs.pinf, &regs.ddrf, &regs.portf);
                $body
            }
            // Rejected at compile time by `board::WIRING_ON_CHIP`.
            PortId::A => unreachable!("the atmega32u4 has no port A"),
        }
    };
}

#[derive(Clone, Copy)]
pub struct AvrPin {
    id: PinId,
}

impl AvrPin {
    pub const fn new(id: PinId) -> Self {
        Self { id }
    }
}

impl Pin for AvrPin {
    fn set_direction(&mut self, direction: Direction) {
        let mask = self.id.mask();
        with_port!(self.id.port, |_pin, ddr, _out| match direction {
            Direction::Output => ddr.modify(|r, w| unsafe { w.bits(r.bits() | mask) }),
            Direction::Input => ddr.modify(|r, w| unsafe { w.bits(r.bits() & !mask) }),
        })
    }

    fn write(&mut self, level: Level) {
        let mask = self.id.mask();
        with_port!(self.id.port, |_pin, _ddr, out| match level {
            Level::High => out.modify(|r, w| unsafe { w.bits(r.bits() | mask) }),
            Level::Low => out.modify(|r, w| unsafe { w.bits(r.bits() & !mask) }),
        })
    }

    fn read(&self) -> Level {
        let bits = with_port!(self.id.port, |pin, _ddr, _out| pin.read().bits());
        if bits & self.id.mask() != 0 {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A whole port used as eight column inputs.
#[derive(Clone, Copy)]
pub struct AvrPort {
    port: PortId,
}

impl AvrPort {
    pub const fn new(port: PortId) -> Self {
        Self { port }
    }
}

impl InputPort for AvrPort {
    fn configure_inputs(&mut self) {
        with_port!(self.port, |_pin, ddr, out| {
            ddr.write(|w| unsafe { w.bits(0x00) });
            out.write(|w| unsafe { w.bits(0xFF) });
        })
    }

    fn read(&self) -> u8 {
        with_port!(self.port, |pin, _ddr, _out| pin.read().bits())
    }
}

/// Column reader for the selected board's wiring.
pub enum AvrColumns {
    Port(PortColumns<AvrPort>),
    Pins(PinColumns<AvrPin, layout::Word, { layout::COLS }>),
}

impl AvrColumns {
    pub fn new(wiring: ColumnWiring<{ layout::COLS }>) -> Self {
        match wiring {
            ColumnWiring::Port(port) => Self::Port(PortColumns::new(AvrPort::new(port))),
            ColumnWiring::Pins(pins) => Self::Pins(PinColumns::new(pins.map(AvrPin::new))),
        }
    }
}

impl ColumnReader for AvrColumns {
    type Word = layout::Word;
    const COLS: usize = layout::COLS;

    fn init(&mut self) {
        match self {
            Self::Port(columns) => columns.init(),
            Self::Pins(columns) => columns.init(),
        }
    }

    fn read(&mut self) -> layout::Word {
        match self {
            Self::Port(columns) => layout::Word::from_u8(columns.read()),
            Self::Pins(columns) => columns.read(),
        }
    }
}
