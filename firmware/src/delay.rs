//! Busy-wait delays at 16 MHz.

use embedded_hal::delay::DelayNs;

const CYCLES_PER_US: u32 = 16;
/// Approximate cost of one iteration of the NOP loop.
const CYCLES_PER_LOOP: u32 = 4;

pub struct Cycles;

#[inline(always)]
fn spin(loops: u32) {
    for _ in 0..loops {
        unsafe { core::arch::asm!("nop") };
    }
}

impl DelayNs for Cycles {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns / 1000) * CYCLES_PER_US + (ns % 1000) * CYCLES_PER_US / 1000;
        spin(cycles / CYCLES_PER_LOOP);
    }

    fn delay_us(&mut self, us: u32) {
        for _ in 0..us {
            spin(CYCLES_PER_US / CYCLES_PER_LOOP);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            spin(1000 * CYCLES_PER_US / CYCLES_PER_LOOP);
        }
    }
}
