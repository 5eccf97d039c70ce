//! GPIO pin assignments for the relay selector board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relay outputs (active HIGH, one ULN2003 channel per relay coil)
// ---------------------------------------------------------------------------

/// Number of relay channels on the board.
pub const RELAY_COUNT: usize = 5;

/// `RelayIndex → GPIO` table, in board schematic order:
///
/// | relay | GPIO | index |
/// |-------|------|-------|
/// | R1    | IO23 | 0     |
/// | R2    | IO22 | 1     |
/// | R3    | IO21 | 2     |
/// | R4    | IO19 | 3     |
/// | R5    | IO18 | 4     |
pub const RELAY_GPIOS: [i32; RELAY_COUNT] = [23, 22, 21, 19, 18];

/// Bit mask covering every relay pin, for one-shot `gpio_config`.
pub const RELAY_PIN_MASK: u64 = (1 << RELAY_GPIOS[0] as u64)
    | (1 << RELAY_GPIOS[1] as u64)
    | (1 << RELAY_GPIOS[2] as u64)
    | (1 << RELAY_GPIOS[3] as u64)
    | (1 << RELAY_GPIOS[4] as u64);
