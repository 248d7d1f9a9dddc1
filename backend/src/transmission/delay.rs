//! Core delay distributions
//!
//! A delay model yields the one-attempt transmission latency of a channel.
//! All values are integer nanoseconds; sampling goes through [`RngManager`]
//! so replays with the same seed produce the same delays.

use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gamma shape used by [`DelayModel::GammaRandom`]
const GAMMA_SHAPE: f64 = 2.0;

/// Errors found while validating a configured delay
#[derive(Debug, Error, PartialEq)]
pub enum DelayError {
    #[error("delay must be positive, got {0} ns")]
    NonPositive(i64),

    #[error("delay bounds are inverted: min {min} ns > max {max} ns")]
    InvertedBounds { min: i64, max: i64 },

    #[error("simple random delay needs at least one step")]
    NoSteps,
}

/// Delay distribution for one channel of a region
///
/// # Example
/// ```
/// use cell_simulator_core_rs::transmission::DelayModel;
/// use cell_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(1);
/// let delay = DelayModel::Constant { delay: 50_000_000 };
/// assert_eq!(delay.sample(&mut rng), 50_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayModel {
    /// Always the same delay
    Constant { delay: i64 },

    /// One of `steps` evenly spaced values in `[min_delay, max_delay]`,
    /// picked uniformly
    SimpleRandom {
        steps: u32,
        min_delay: i64,
        max_delay: i64,
    },

    /// `min_delay` plus a Gamma(2, θ) tail with mean `exp_delay`
    GammaRandom { min_delay: i64, exp_delay: i64 },
}

impl DelayModel {
    /// Sample one core delay in nanoseconds
    pub fn sample(&self, rng: &mut RngManager) -> i64 {
        match *self {
            DelayModel::Constant { delay } => delay,
            DelayModel::SimpleRandom {
                steps,
                min_delay,
                max_delay,
            } => {
                if steps <= 1 || min_delay == max_delay {
                    return min_delay;
                }
                let step = rng.range(0, steps as i64);
                min_delay + step * (max_delay - min_delay) / (steps as i64 - 1)
            }
            DelayModel::GammaRandom {
                min_delay,
                exp_delay,
            } => {
                if exp_delay <= min_delay {
                    return min_delay;
                }
                let scale = (exp_delay - min_delay) as f64 / GAMMA_SHAPE;
                min_delay + rng.gamma(GAMMA_SHAPE, scale) as i64
            }
        }
    }

    /// Check the parameters describe a usable, strictly positive delay
    pub fn validate(&self) -> Result<(), DelayError> {
        match *self {
            DelayModel::Constant { delay } => {
                if delay <= 0 {
                    return Err(DelayError::NonPositive(delay));
                }
            }
            DelayModel::SimpleRandom {
                steps,
                min_delay,
                max_delay,
            } => {
                if steps == 0 {
                    return Err(DelayError::NoSteps);
                }
                if min_delay <= 0 {
                    return Err(DelayError::NonPositive(min_delay));
                }
                if min_delay > max_delay {
                    return Err(DelayError::InvertedBounds {
                        min: min_delay,
                        max: max_delay,
                    });
                }
            }
            DelayModel::GammaRandom {
                min_delay,
                exp_delay,
            } => {
                if min_delay <= 0 {
                    return Err(DelayError::NonPositive(min_delay));
                }
                if min_delay > exp_delay {
                    return Err(DelayError::InvertedBounds {
                        min: min_delay,
                        max: exp_delay,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_random_stays_on_grid() {
        let mut rng = RngManager::new(3);
        let model = DelayModel::SimpleRandom {
            steps: 5,
            min_delay: 100,
            max_delay: 500,
        };
        for _ in 0..500 {
            let delay = model.sample(&mut rng);
            assert!((100..=500).contains(&delay));
            assert_eq!(delay % 100, 0, "delay {} is off the step grid", delay);
        }
    }

    #[test]
    fn test_simple_random_single_step_is_min() {
        let mut rng = RngManager::new(3);
        let model = DelayModel::SimpleRandom {
            steps: 1,
            min_delay: 250,
            max_delay: 900,
        };
        assert_eq!(model.sample(&mut rng), 250);
    }

    #[test]
    fn test_gamma_degenerate_is_min() {
        let mut rng = RngManager::new(3);
        let model = DelayModel::GammaRandom {
            min_delay: 42,
            exp_delay: 42,
        };
        assert_eq!(model.sample(&mut rng), 42);
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            DelayModel::Constant { delay: 0 }.validate(),
            Err(DelayError::NonPositive(0))
        );
        assert_eq!(
            DelayModel::SimpleRandom {
                steps: 0,
                min_delay: 1,
                max_delay: 2
            }
            .validate(),
            Err(DelayError::NoSteps)
        );
        assert_eq!(
            DelayModel::GammaRandom {
                min_delay: 10,
                exp_delay: 5
            }
            .validate(),
            Err(DelayError::InvertedBounds { min: 10, max: 5 })
        );
        assert!(DelayModel::Constant { delay: 1 }.validate().is_ok());
    }

    #[test]
    fn test_serde_tagged_form() {
        let json = r#"{"type":"gamma_random","min_delay":10,"exp_delay":30}"#;
        let model: DelayModel = serde_json::from_str(json).unwrap();
        assert_eq!(
            model,
            DelayModel::GammaRandom {
                min_delay: 10,
                exp_delay: 30
            }
        );
    }
}
