use crate::{hw::Mutex, mutex::CriticalSection};
use core::cell::Cell;

/// Live value slots of the debug stream.
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Debug {
    Setpoint,
    Measured,
    PidY,
    AppliedY,
    State,
}
const NRVALUES: usize = 5;

const INDEXSHIFT: usize = 2;
const INDEXMASK: u8 = (1 << INDEXSHIFT) - 1;

static VALUES: Mutex<[Cell<u16>; NRVALUES]> = Mutex::new([
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
    Cell::new(0),
]);
static INDEX: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

impl Debug {
    pub fn log_u16(&self, cs: CriticalSection<'_>, value: u16) {
        VALUES.borrow(cs)[*self as usize].set(value);
    }

    pub fn log_u8(&self, cs: CriticalSection<'_>, value: u8) {
        self.log_u16(cs, value.into());
    }

    /// Percentages go out as Q8.8.
    pub fn log_pct(&self, cs: CriticalSection<'_>, value: f32) {
        self.log_u16(cs, (value.clamp(0.0, 100.0) * 256.0 + 0.5) as u16);
    }
}

/// Get the next byte of the round-robin value stream.
///
/// Each value goes out as a 3 byte frame: id, low byte, high byte.
pub fn next_tx_byte(cs: CriticalSection<'_>) -> u8 {
    let index = INDEX.borrow(cs).get();
    let id = index >> INDEXSHIFT;
    let txindex = index & INDEXMASK;

    let value = VALUES.borrow(cs)[id as usize].get();

    match txindex {
        0 => {
            INDEX.borrow(cs).set(index + 1);
            id
        }
        1 => {
            INDEX.borrow(cs).set(index + 1);
            value as u8
        }
        _ => {
            let next_id = if id as usize + 1 >= NRVALUES { 0 } else { id + 1 };
            INDEX.borrow(cs).set(next_id << INDEXSHIFT);
            (value >> 8) as u8
        }
    }
}

// vim: ts=4 sw=4 expandtab
