//! Turns surviving candidates into final [`Event`] rows.
//!
//! A pure filter + map over the candidate stream: each candidate is tested
//! against the criteria enabled in the resolved threshold set and rejected
//! if any enabled one fails; survivors get their morphology metrics
//! computed. No cross-event state.

use crate::segmenter::CandidateEvent;
use crate::threshold::ResolvedThresholds;
use crate::types::Event;

/// Filters candidates and computes event morphology for one channel.
///
/// `idx_channel` is a placeholder here; the coordinator finalizes it when
/// merging channels.
pub fn assemble(
    candidates: &[CandidateEvent],
    conditioned: &[f64],
    thresholds: &ResolvedThresholds,
    sf: f64,
    channel: &str,
    idx_channel: usize,
) -> Vec<Event> {
    candidates
        .iter()
        .filter_map(|c| build_event(c, conditioned, thresholds, sf, channel, idx_channel))
        .collect()
}

fn build_event(
    c: &CandidateEvent,
    conditioned: &[f64],
    thresholds: &ResolvedThresholds,
    sf: f64,
    channel: &str,
    idx_channel: usize,
) -> Option<Event> {
    let val_neg_peak = conditioned[c.neg_peak];
    let val_pos_peak = conditioned[c.pos_peak];
    // a positive half that never rises above the baseline has no usable
    // positive peak
    if val_pos_peak <= 0.0 {
        return None;
    }

    let start = c.start as f64 / sf;
    let neg_peak = c.neg_peak as f64 / sf;
    let mid_crossing = c.mid_crossing as f64 / sf;
    let pos_peak = c.pos_peak as f64 / sf;
    let end = c.end as f64 / sf;

    let duration = end - start;
    let ptp = val_pos_peak - val_neg_peak;
    let half_period = pos_peak - neg_peak;
    let slope = ptp / half_period;
    let frequency = 1.0 / (2.0 * half_period);

    if let Some((min_dur, max_dur)) = thresholds.duration {
        if duration < min_dur || duration > max_dur {
            return None;
        }
    }
    if let Some(min) = thresholds.amp_neg {
        if -val_neg_peak < min {
            return None;
        }
    }
    if let Some(min) = thresholds.amp_pos {
        if val_pos_peak < min {
            return None;
        }
    }
    if let Some(min) = thresholds.amp_ptp {
        if ptp < min {
            return None;
        }
    }
    if let Some(min) = thresholds.slope {
        if slope < min {
            return None;
        }
    }

    Some(Event {
        start,
        neg_peak,
        mid_crossing,
        pos_peak,
        end,
        duration,
        val_neg_peak,
        val_pos_peak,
        ptp,
        slope,
        frequency,
        channel: channel.to_string(),
        idx_channel,
    })
}
