//! Occupancy-mask reconstruction: an [`EventTable`] plus a recording shape
//! back to a boolean sample-aligned matrix.

use ndarray::Array2;

use crate::error::{DetectError, Result};
use crate::types::{EventTable, Recording};

/// Shape of the matrix the mask is built for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskShape {
    pub channels: usize,
    pub samples: usize,
    pub sf: f64,
}

impl MaskShape {
    pub fn new(channels: usize, samples: usize, sf: f64) -> Self {
        MaskShape { channels, samples, sf }
    }
}

impl From<&Recording> for MaskShape {
    fn from(recording: &Recording) -> Self {
        MaskShape {
            channels: recording.channel_count(),
            samples: recording.sample_count(),
            sf: recording.sf(),
        }
    }
}

/// Tolerates one-ulp drift from the index -> seconds -> index round trip.
const IDX_EPS: f64 = 1e-9;

/// Builds the boolean occupancy matrix: `true` at `(channel, sample)` iff
/// some event on that channel spans that sample. Every event marks
/// `[floor(start * sf), ceil(end * sf))` on its `idx_channel` row; spans
/// are clamped to the matrix width.
///
/// Fails with [`DetectError::ChannelIndexOutOfRange`] if any event's
/// channel index does not fit the given channel count. The mask is a fresh
/// allocation, independent of the recording buffer.
pub fn occupancy_mask(table: &EventTable, shape: MaskShape) -> Result<Array2<bool>> {
    let mut mask = Array2::from_elem((shape.channels, shape.samples), false);
    for event in table {
        if event.idx_channel >= shape.channels {
            return Err(DetectError::ChannelIndexOutOfRange {
                index: event.idx_channel,
                channels: shape.channels,
            });
        }
        let first = (event.start * shape.sf + IDX_EPS).floor().max(0.0) as usize;
        let last = (event.end * shape.sf - IDX_EPS).ceil().max(0.0) as usize;
        let first = first.min(shape.samples);
        let last = last.min(shape.samples);
        for sample in first..last {
            mask[(event.idx_channel, sample)] = true;
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Event;

    fn event(idx_channel: usize, start: f64, end: f64) -> Event {
        Event {
            start,
            neg_peak: start,
            mid_crossing: (start + end) / 2.0,
            pos_peak: end,
            end,
            duration: end - start,
            val_neg_peak: -50.0,
            val_pos_peak: 30.0,
            ptp: 80.0,
            slope: 100.0,
            frequency: 1.0,
            channel: "C".to_string(),
            idx_channel,
        }
    }

    #[test]
    fn test_empty_table_all_false() {
        let mask = occupancy_mask(&EventTable::default(), MaskShape::new(2, 10, 10.0)).unwrap();
        assert!(mask.iter().all(|&b| !b));
    }

    #[test]
    fn test_floor_ceil_span() {
        let table = EventTable::new(vec![event(0, 0.5, 1.25)]);
        let mask = occupancy_mask(&table, MaskShape::new(1, 16, 8.0)).unwrap();
        // [floor(0.5 * 8), ceil(1.25 * 8)) == [4, 10)
        for i in 0..16 {
            assert_eq!(mask[(0, i)], (4..10).contains(&i), "sample {i}");
        }
    }

    #[test]
    fn test_span_clamped_to_width() {
        let table = EventTable::new(vec![event(0, 0.9, 2.0)]);
        let mask = occupancy_mask(&table, MaskShape::new(1, 10, 10.0)).unwrap();
        assert_eq!(mask.iter().filter(|&&b| b).count(), 1);
        assert!(mask[(0, 9)]);
    }

    #[test]
    fn test_channel_index_out_of_range() {
        let table = EventTable::new(vec![event(3, 0.0, 0.5)]);
        let err = occupancy_mask(&table, MaskShape::new(2, 10, 10.0)).unwrap_err();
        assert!(matches!(
            err,
            DetectError::ChannelIndexOutOfRange { index: 3, channels: 2 }
        ));
    }
}
