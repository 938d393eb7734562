//! Zero-crossing segmentation of one conditioned channel.
//!
//! A single linear scan drives a small state machine over the sign trace:
//!
//! ```text
//! SeekNegativeOnset -> InNegativeHalf -> InPositiveHalf -> (closed)
//! ```
//!
//! Transitions happen strictly at sign changes. A sample with value exactly
//! zero counts as non-negative, so a falling crossing is
//! non-negative -> negative and a rising crossing is the reverse. The
//! closing falling crossing of one candidate is simultaneously the opening
//! crossing of the next, which is what keeps per-channel events
//! non-overlapping.
//!
//! Candidates land in a flat append-only buffer; there is no look-ahead
//! beyond the next zero-crossing and no back-references between candidates.

/// Sample indices of one negative-then-positive half-cycle pair. Transient:
/// candidates only live between segmentation and assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateEvent {
    /// Falling zero-crossing (first negative sample).
    pub start: usize,
    /// Minimum of the negative half; ties keep the first occurrence.
    pub neg_peak: usize,
    /// Rising zero-crossing (first non-negative sample).
    pub mid_crossing: usize,
    /// Maximum of the positive half; ties keep the first occurrence.
    pub pos_peak: usize,
    /// Next falling zero-crossing, or the last sample of the channel.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekNegativeOnset,
    InNegativeHalf,
    InPositiveHalf,
}

/// Walks one conditioned channel and emits every complete half-cycle pair.
///
/// A wave still in its negative half when the buffer ends never became a
/// pair and is discarded; one in its positive half closes at the last
/// sample.
pub fn segment(samples: &[f64]) -> Vec<CandidateEvent> {
    let mut candidates = Vec::new();
    if samples.len() < 2 {
        return candidates;
    }

    let mut state = State::SeekNegativeOnset;
    let mut start = 0usize;
    let mut neg_peak = 0usize;
    let mut mid_crossing = 0usize;
    let mut pos_peak = 0usize;

    for i in 1..samples.len() {
        let prev_neg = samples[i - 1] < 0.0;
        let cur_neg = samples[i] < 0.0;

        match state {
            State::SeekNegativeOnset => {
                if !prev_neg && cur_neg {
                    state = State::InNegativeHalf;
                    start = i;
                    neg_peak = i;
                }
            }
            State::InNegativeHalf => {
                if cur_neg {
                    if samples[i] < samples[neg_peak] {
                        neg_peak = i;
                    }
                } else {
                    state = State::InPositiveHalf;
                    mid_crossing = i;
                    pos_peak = i;
                }
            }
            State::InPositiveHalf => {
                if cur_neg {
                    // closing crossing doubles as the next wave's onset
                    candidates.push(CandidateEvent {
                        start,
                        neg_peak,
                        mid_crossing,
                        pos_peak,
                        end: i,
                    });
                    state = State::InNegativeHalf;
                    start = i;
                    neg_peak = i;
                } else if samples[i] > samples[pos_peak] {
                    pos_peak = i;
                }
            }
        }
    }

    if state == State::InPositiveHalf {
        candidates.push(CandidateEvent {
            start,
            neg_peak,
            mid_crossing,
            pos_peak,
            end: samples.len() - 1,
        });
    }

    candidates
}
