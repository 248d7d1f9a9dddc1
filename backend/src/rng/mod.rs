//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, reproducible sampling.
//! CRITICAL: All randomness in the cell core MUST go through this module.

mod xorshift;

pub use xorshift::RngManager;
