//! Packet loss and retransmission
//!
//! Every attempt is lost independently with `loss_probability`. The sender
//! keeps retrying up to `max_retries` times; the transmission succeeds as
//! soon as one attempt gets through.

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};

/// Loss/retransmission settings of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionConfig {
    /// Probability that a single attempt is lost, in [0, 1]
    #[serde(default)]
    pub loss_probability: f64,

    /// Additional attempts after the first one
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            loss_probability: 0.0,
            max_retries: 0,
        }
    }
}

/// Result of the loss model for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionOutcome {
    /// Whether some attempt got through
    pub success: bool,

    /// Attempts used (always ≥ 1)
    pub attempts: u32,
}

impl TransmissionOutcome {
    /// First attempt succeeded
    pub fn delivered() -> Self {
        Self {
            success: true,
            attempts: 1,
        }
    }
}

/// Roll the attempts of one transmission
///
/// # Example
/// ```
/// use cell_simulator_core_rs::transmission::simulate_transmission;
/// use cell_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(7);
///
/// let lossless = simulate_transmission(&mut rng, 0.0, 3);
/// assert!(lossless.success);
/// assert_eq!(lossless.attempts, 1);
///
/// let hopeless = simulate_transmission(&mut rng, 1.0, 3);
/// assert!(!hopeless.success);
/// assert_eq!(hopeless.attempts, 4);
/// ```
pub fn simulate_transmission(
    rng: &mut RngManager,
    loss_probability: f64,
    max_retries: u32,
) -> TransmissionOutcome {
    let max_attempts = max_retries.saturating_add(1);
    for attempt in 1..=max_attempts {
        if !rng.chance(loss_probability) {
            return TransmissionOutcome {
                success: true,
                attempts: attempt,
            };
        }
    }
    TransmissionOutcome {
        success: false,
        attempts: max_attempts,
    }
}
