//! Board selection by cargo feature.

use kinesis_matrix::pin::{ColumnWiring, PinId, PortId};
use kinesis_matrix::Matrix;
use static_assertions as sa;

use crate::delay::Cycles;
use crate::pins::{AvrColumns, AvrPin};

#[cfg(all(feature = "btkinesis", feature = "uberkinesis"))]
compile_error!("select exactly one of the `btkinesis` and `uberkinesis` features");

#[cfg(not(any(feature = "btkinesis", feature = "uberkinesis")))]
compile_error!("select a board: `btkinesis` or `uberkinesis`");

#[cfg(feature = "btkinesis")]
pub use kinesis_matrix::boards::btkinesis as layout;
#[cfg(feature = "uberkinesis")]
pub use kinesis_matrix::boards::uberkinesis as layout;

pub type Scanner = Matrix<AvrPin, AvrColumns, layout::Debouncer, Cycles, { layout::ROWS }>;

const fn on_chip(port: PortId) -> bool {
    !matches!(port, PortId::A)
}

const fn pins_on_chip(pins: &[PinId]) -> bool {
    let mut i = 0;
    while i < pins.len() {
        if !on_chip(pins[i].port) {
            return false;
        }
        i += 1;
    }
    true
}

/// Every row and column line exists on the atmega32u4.
pub const WIRING_ON_CHIP: bool = pins_on_chip(&layout::ROW_PINS)
    && match layout::COLUMNS {
        ColumnWiring::Port(port) => on_chip(port),
        ColumnWiring::Pins(pins) => pins_on_chip(&pins),
    };

sa::const_assert!(WIRING_ON_CHIP);
sa::const_assert!(layout::LAYERS > 0);
sa::const_assert!(layout::COLS <= 8 * core::mem::size_of::<layout::Word>());
