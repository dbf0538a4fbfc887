//! USART1 transmitter (115200 8N1) used for key reports and log output.

use core::convert::Infallible;

use avr_device::atmega32u4::USART1;
use log::{LevelFilter, Metadata, Record};

// UCSR1A
const U2X1: u8 = 1 << 1;
const UDRE1: u8 = 1 << 5;
// UCSR1B
const TXEN1: u8 = 1 << 3;
// UCSR1C: 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0b0000_0110;
/// 16 MHz / (8 * (16 + 1)) = 117647 baud, 2.1% off 115200.
const UBRR: u16 = 16;

/// Handle to the configured transmitter.
#[derive(Clone, Copy)]
pub struct Serial {
    _private: (),
}

impl Serial {
    /// Configure USART1 for transmit only. Consumes the peripheral so only
    /// one configuration ever happens.
    pub fn new(usart: USART1) -> Self {
        usart.ucsr1a.write(|w| unsafe { w.bits(U2X1) });
        usart.ubrr1.write(|w| unsafe { w.bits(UBRR) });
        usart.ucsr1c.write(|w| unsafe { w.bits(UCSZ_8N1) });
        usart.ucsr1b.write(|w| unsafe { w.bits(TXEN1) });
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        let usart = unsafe { &*USART1::ptr() };
        while usart.ucsr1a.read().bits() & UDRE1 == 0 {}
        usart.udr1.write(|w| unsafe { w.bits(byte) });
    }

    fn write_bytes(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }
}

impl ufmt::uWrite for Serial {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.write_bytes(s);
        Ok(())
    }
}

impl core::fmt::Write for Serial {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s);
        Ok(())
    }
}

struct SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut serial = Serial { _private: () };
        let _ = core::fmt::write(
            &mut serial,
            format_args!("{} {}: {}\r\n", record.level(), record.target(), record.args()),
        );
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Route `log` records to the serial line. Takes the configured [`Serial`]
/// as proof that the transmitter is up.
///
/// Must be called before anything logs; there are no interrupts to race with.
pub fn init_logger(_serial: &Serial, level: LevelFilter) {
    unsafe {
        let _ = log::set_logger_racy(&LOGGER);
        log::set_max_level_racy(level);
    }
}
