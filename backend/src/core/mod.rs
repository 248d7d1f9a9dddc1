//! Time and data units shared across the core

pub mod time;
pub mod units;
