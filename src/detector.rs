//! Multi-channel coordination: fans the per-channel pipeline out across
//! channels, applies the optional inclusion mask, and merges the results
//! into the final [`EventTable`].
//!
//! Channels are fully independent (no threshold or event computed for one
//! channel depends on another), so the fan-out runs on the rayon thread
//! pool. The order-preserving collect is the only synchronization point,
//! which keeps the merged table deterministic regardless of task
//! completion order.

use log::debug;
use rayon::prelude::*;

use crate::assembler;
use crate::conditioner::SignalConditioner;
use crate::error::{DetectError, Result};
use crate::segmenter::{self, CandidateEvent};
use crate::threshold::ThresholdEngine;
use crate::types::{
    BandConfig, Event, EventTable, FailurePolicy, MaskPolicy, Recording, ThresholdConfig,
};

/// A per-channel failure reported under [`FailurePolicy::Lenient`].
#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: String,
    pub idx_channel: usize,
    pub error: DetectError,
}

/// Result of one detection run: the merged table plus any per-channel
/// failures (always empty under [`FailurePolicy::Strict`]).
#[derive(Debug)]
pub struct Detection {
    pub table: EventTable,
    pub failures: Vec<ChannelFailure>,
}

/// Configured detection pipeline.
///
/// ```rust
/// use ndarray::Array2;
/// use swdetect::{Detector, Recording, ThresholdConfig};
///
/// let rec = Recording::new(Array2::zeros((1, 500)), 100.0, vec!["Cz".into()]).unwrap();
/// let detector = Detector::new(ThresholdConfig::default()).unwrap();
/// let detection = detector.detect(&rec, None).unwrap();
/// assert!(detection.table.is_empty()); // flat signal, zero events
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    config: ThresholdConfig,
    band: BandConfig,
    mask_policy: MaskPolicy,
    failure_policy: FailurePolicy,
}

impl Detector {
    /// Validates the threshold config; fails if every criterion is
    /// disabled or any value is out of range.
    pub fn new(config: ThresholdConfig) -> Result<Self> {
        config.validate()?;
        Ok(Detector {
            config,
            band: BandConfig::default(),
            mask_policy: MaskPolicy::default(),
            failure_policy: FailurePolicy::default(),
        })
    }

    /// Replaces the conditioning band. Cutoffs are checked here; the
    /// Nyquist bound is checked against the recording at detection time.
    pub fn with_band(mut self, band: BandConfig) -> Result<Self> {
        band.validate()?;
        self.band = band;
        Ok(self)
    }

    /// Selects which part of an event the inclusion mask is tested
    /// against. Default: [`MaskPolicy::Start`].
    pub fn with_mask_policy(mut self, policy: MaskPolicy) -> Self {
        self.mask_policy = policy;
        self
    }

    /// Selects how per-channel failures are surfaced. Default:
    /// [`FailurePolicy::Strict`].
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Runs detection over every channel of the recording.
    ///
    /// `inclusion` restricts detection to selected time regions (for
    /// example a sleep-stage mask); it must have one entry per sample.
    /// Events outside included regions are dropped silently. Channels are
    /// processed independently and in parallel; the returned table is
    /// grouped by channel in channel-list order with ascending start times
    /// inside each group.
    pub fn detect(&self, recording: &Recording, inclusion: Option<&[bool]>) -> Result<Detection> {
        if let Some(mask) = inclusion {
            if mask.len() != recording.sample_count() {
                return Err(DetectError::MaskLengthMismatch {
                    expected: recording.sample_count(),
                    got: mask.len(),
                });
            }
        }
        // validates the band against Nyquist once, before the fan-out
        let conditioner = SignalConditioner::new(self.band, recording.sf())?;

        let results: Vec<(usize, Result<Vec<Event>>)> = (0..recording.channel_count())
            .into_par_iter()
            .map(|ci| (ci, self.detect_channel(&conditioner, recording, ci, inclusion)))
            .collect();

        let mut events = Vec::new();
        let mut failures = Vec::new();
        for (ci, result) in results {
            let name = &recording.channel_names()[ci];
            match result {
                Ok(mut channel_events) => {
                    debug!("channel '{}': {} events", name, channel_events.len());
                    events.append(&mut channel_events);
                }
                Err(error) => match self.failure_policy {
                    FailurePolicy::Strict => return Err(error),
                    FailurePolicy::Lenient => {
                        debug!("channel '{}' failed: {}", name, error);
                        failures.push(ChannelFailure {
                            channel: name.clone(),
                            idx_channel: ci,
                            error,
                        });
                    }
                },
            }
        }

        Ok(Detection {
            table: EventTable::new(events),
            failures,
        })
    }

    fn detect_channel(
        &self,
        conditioner: &SignalConditioner,
        recording: &Recording,
        idx_channel: usize,
        inclusion: Option<&[bool]>,
    ) -> Result<Vec<Event>> {
        let name = &recording.channel_names()[idx_channel];
        let samples = recording.channel(idx_channel).to_vec();

        let conditioned = conditioner.condition(name, &samples)?;
        let thresholds = ThresholdEngine::resolve(&self.config, &conditioned);
        let mut candidates = segmenter::segment(&conditioned);
        if let Some(mask) = inclusion {
            candidates.retain(|c| passes_mask(c, mask, self.mask_policy));
        }
        Ok(assembler::assemble(
            &candidates,
            &conditioned,
            &thresholds,
            recording.sf(),
            name,
            idx_channel,
        ))
    }
}

fn passes_mask(c: &CandidateEvent, mask: &[bool], policy: MaskPolicy) -> bool {
    match policy {
        MaskPolicy::Start => mask[c.start],
        MaskPolicy::NegPeak => mask[c.neg_peak],
        MaskPolicy::FullSpan => mask[c.start..c.end].iter().all(|&b| b),
    }
}

/// Convenience entry point: strict policy, default band, no inclusion
/// mask.
pub fn detect(recording: &Recording, config: ThresholdConfig) -> Result<EventTable> {
    Ok(Detector::new(config)?.detect(recording, None)?.table)
}
