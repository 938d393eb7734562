//! # Slow-wave event detection for Rust
//!
//! A pure Rust library that detects discrete oscillatory events
//! (slow-wave-like half-cycle pairs) in multi-channel, continuously
//! sampled physiological recordings, and reconstructs a sample-aligned
//! boolean occupancy mask from the detected events.
//!
//! The pipeline per channel: zero-phase conditioning (baseline drift
//! removal and band-limiting), threshold
//! resolution against channel-local statistics, zero-crossing
//! segmentation, and criterion filtering with morphology metrics. Channels
//! are processed independently and in parallel; the merged table is
//! grouped by channel in channel-list order.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::Array2;
//! use swdetect::{detect, occupancy_mask, MaskShape, Recording, ThresholdConfig, Result};
//!
//! fn main() -> Result<()> {
//!     // 10 s, 100 Hz, one channel with a single slow wave at t = 2.0 s:
//!     // a negative half-cycle followed by a positive one, 0.7 s total.
//!     let sf = 100.0;
//!     let n = 1000;
//!     let mut data = Array2::zeros((1, n));
//!     for i in 0..n {
//!         let t = i as f64 / sf;
//!         if (2.0..2.7).contains(&t) {
//!             let phase = 2.0 * std::f64::consts::PI * (t - 2.0) / 0.7;
//!             data[(0, i)] = -60.0 * phase.sin();
//!         }
//!     }
//!     let rec = Recording::new(data, sf, vec!["Cz".to_string()])?;
//!
//!     let table = detect(&rec, ThresholdConfig::default())?;
//!     assert_eq!(table.len(), 1);
//!
//!     let event = &table.events()[0];
//!     assert_eq!(event.channel, "Cz");
//!     assert!(event.val_neg_peak < 0.0 && event.val_pos_peak > 0.0);
//!     assert!(event.start > 1.7 && event.start < 2.3);
//!
//!     // Boolean overlay with the same shape as the recording
//!     let mask = occupancy_mask(&table, MaskShape::from(&rec))?;
//!     assert_eq!(mask.dim(), (1, 1000));
//!     assert!(mask.iter().filter(|&&b| b).count() > 0);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuring detection
//!
//! Detection criteria are independently toggleable: duration range,
//! amplitude minimums (negative peak, positive peak, peak-to-peak) and a
//! slope minimum. Disable a criterion by setting its field to `None`; at
//! least one must stay enabled.
//!
//! ```rust
//! use swdetect::{Detector, FailurePolicy, MaskPolicy, ThresholdConfig};
//!
//! let mut config = ThresholdConfig::default();
//! config.slope = None;                 // drop the slope criterion
//! config.amp_ptp = Some(100.0);        // stricter peak-to-peak floor
//! config.adaptive_scale = Some(2.0);   // lift floors on noisy channels
//!
//! let detector = Detector::new(config)
//!     .unwrap()
//!     .with_mask_policy(MaskPolicy::NegPeak)
//!     .with_failure_policy(FailurePolicy::Lenient);
//! # let _ = detector;
//! ```
//!
//! ## Inclusion masks
//!
//! A boolean per-sample mask (for example derived from sleep stages)
//! restricts detection to selected regions. Events outside included
//! regions are dropped silently; an empty table is a normal result, not
//! an error. Which part of an event is tested is a [`MaskPolicy`].
//!
//! ## Scope
//!
//! This is a batch, in-memory core: no file-format support, no streaming
//! detection (the zero-phase filter needs the whole channel buffer), no
//! plotting, no statistics beyond the event table itself. Adapters that
//! load recordings (converting to microvolts) or build stage masks live
//! outside this crate.

pub mod assembler;
pub mod conditioner;
pub mod detector;
pub mod error;
pub mod mask;
pub mod segmenter;
pub mod threshold;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use detector::{detect, ChannelFailure, Detection, Detector};
pub use error::{DetectError, Result};
pub use mask::{occupancy_mask, MaskShape};
pub use threshold::{ResolvedThresholds, ThresholdEngine};
pub use types::{
    BandConfig, Event, EventTable, FailurePolicy, MaskPolicy, Recording, ThresholdConfig,
};

/// Library version
///
/// ```rust
/// let version = swdetect::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
