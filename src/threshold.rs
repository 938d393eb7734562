//! Resolves a [`ThresholdConfig`] against channel-local statistics into the
//! concrete numeric thresholds the assembler evaluates.
//!
//! Absolute microvolt criteria alone bias detection toward high-amplitude
//! channels, so when an adaptive scale is configured the amplitude floors
//! are raised to a multiple of the conditioned channel's standard
//! deviation. Disabled criteria are omitted from the resolved set entirely
//! rather than defaulted to zero, so the assembler never evaluates them.

use crate::types::ThresholdConfig;
use crate::utils;

/// Concrete thresholds for one channel. `None` means the criterion is
/// disabled and must not be evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedThresholds {
    /// Inclusive `[min, max]` event duration in seconds.
    pub duration: Option<(f64, f64)>,
    /// Minimum negative-peak magnitude in microvolts.
    pub amp_neg: Option<f64>,
    /// Minimum positive-peak value in microvolts.
    pub amp_pos: Option<f64>,
    /// Minimum peak-to-peak amplitude in microvolts.
    pub amp_ptp: Option<f64>,
    /// Minimum rate of change in microvolts per second.
    pub slope: Option<f64>,
}

pub struct ThresholdEngine;

impl ThresholdEngine {
    /// Computes the resolved threshold set for one conditioned channel.
    ///
    /// The config is assumed validated (see
    /// [`ThresholdConfig::validate`]); resolution itself cannot fail.
    pub fn resolve(config: &ThresholdConfig, conditioned: &[f64]) -> ResolvedThresholds {
        let floor = config.adaptive_scale.map(|k| k * utils::stddev(conditioned));
        let lift = |abs: Option<f64>, floor: Option<f64>| {
            abs.map(|v| floor.map_or(v, |f| v.max(f)))
        };
        ResolvedThresholds {
            duration: config.duration,
            amp_neg: lift(config.amp_neg, floor),
            amp_pos: lift(config.amp_pos, floor),
            // a symmetric wave at the floor amplitude swings twice as far
            // peak to peak
            amp_ptp: lift(config.amp_ptp, floor.map(|f| 2.0 * f)),
            slope: config.slope,
        }
    }
}
