//! Kinesis keyboard firmware for ATmega32U4.
//!
//! Scans the key matrix of the board selected at build time, debounces it
//! and reports the committed keys, looked up in the board's keymap, over
//! USART1:
//! - `btkinesis`: 12x8 matrix, swap-buffer debounce, ghost detection
//! - `uberkinesis`: 12x8 matrix, shadow-commit debounce with a 1ms pause

#![no_std]
#![no_main]
#![feature(asm_experimental_arch)]

mod board;
mod delay;
mod pins;
mod serial;

use avr_device::atmega32u4::Peripherals;
use kinesis_matrix::keymap::fn_index;
use kinesis_matrix::{Matrix, RowWord};
use log::LevelFilter;
use ufmt::{uwrite, uwriteln};

use board::{layout, Scanner};
use delay::Cycles;
use pins::{AvrColumns, AvrPin};
use serial::Serial;

const LOG_LEVEL: LevelFilter = if cfg!(feature = "debug") {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

/// Panic handler — on AVR we just loop forever.
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Main entry point.
#[no_mangle]
pub extern "C" fn main() -> ! {
    let dp = unsafe { Peripherals::steal() };

    // Disable clock prescaler (CLKPR), 16MHz from the crystal
    dp.CPU.clkpr.write(|w| w.clkpce().set_bit());
    dp.CPU.clkpr.write(|w| unsafe { w.bits(0) });

    let mut serial = Serial::new(dp.USART1);
    serial::init_logger(&serial, LOG_LEVEL);

    let mut matrix: Scanner = Matrix::new(
        layout::ROW_PINS.map(AvrPin::new),
        AvrColumns::new(layout::COLUMNS),
        layout::debouncer(),
        Cycles,
    )
    .with_ghost_detection(layout::GHOST_DETECTION);
    matrix.init();

    log::info!(
        "{}: {}x{} matrix, {:?} debounce {}",
        layout::NAME,
        layout::ROWS,
        layout::COLS,
        layout::POLICY,
        layout::DEBOUNCE
    );

    // Last state reported, so an unchanged commit is not reported again
    let mut reported = [<layout::Word as RowWord>::ZERO; layout::ROWS];

    loop {
        matrix.scan();

        if !matrix.is_modified() || matrix.rows() == &reported {
            continue;
        }
        reported = *matrix.rows();

        if matrix.has_ghost() {
            log::warn!("ghost in matrix, {} keys down", matrix.key_count());
        }
        report(&mut serial, &matrix);

        #[cfg(feature = "debug")]
        let _ = matrix.print_debug(&mut serial);
    }
}

/// Write the layer 0 key code of every pressed key.
fn report(serial: &mut Serial, matrix: &Scanner) {
    let _ = uwriteln!(serial, "keys: {}", matrix.key_count());
    for row in 0..layout::ROWS {
        for col in 0..layout::COLS {
            if !matrix.is_on(row, col) {
                continue;
            }
            let code = layout::KEYMAP.lookup(0, row, col);
            let _ = uwrite!(serial, "  {},{} code {}", row, col, code);
            if let Some(index) = fn_index(code) {
                let _ = uwrite!(
                    serial,
                    " fn{} layer {} code {}",
                    index,
                    layout::KEYMAP.fn_layer(index),
                    layout::KEYMAP.fn_keycode(index)
                );
            }
            serial.write_byte(b'\n');
        }
    }
}
