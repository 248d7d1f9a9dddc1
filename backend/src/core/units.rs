//! Data size and rate units
//!
//! Message sizes are counted in bits, bandwidth in bits per second.

/// One bit (the base unit)
pub const BIT: i64 = 1;

/// One byte in bits
pub const BYTE: i64 = 8 * BIT;

/// One kilobit in bits
pub const KILOBIT: i64 = 1_000 * BIT;

/// One megabit in bits
pub const MEGABIT: i64 = 1_000 * KILOBIT;

/// One gigabit in bits
pub const GIGABIT: i64 = 1_000 * MEGABIT;
