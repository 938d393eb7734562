use ndarray::{Array2, ArrayView1};

use crate::error::{DetectError, Result};

/// Canonical in-memory recording: channel-major amplitude matrix in
/// microvolts plus the shared sampling rate and channel names.
///
/// The matrix has one row per channel and one column per sample. All
/// channels share the same sampling rate and sample count.
///
/// ```rust
/// use ndarray::Array2;
/// use swdetect::Recording;
///
/// let data = Array2::zeros((2, 1000));
/// let rec = Recording::new(data, 100.0, vec!["Cz".into(), "Fz".into()]).unwrap();
/// assert_eq!(rec.channel_count(), 2);
/// assert_eq!(rec.sample_count(), 1000);
/// assert!((rec.duration() - 10.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Recording {
    data: Array2<f64>,
    sf: f64,
    channels: Vec<String>,
}

impl Recording {
    /// Builds a recording from a `(C, N)` matrix, a sampling rate in Hz and
    /// `C` unique channel names.
    pub fn new(data: Array2<f64>, sf: f64, channels: Vec<String>) -> Result<Self> {
        if !(sf.is_finite() && sf > 0.0) {
            return Err(DetectError::InvalidSamplingRate(sf));
        }
        if data.nrows() != channels.len() {
            return Err(DetectError::ChannelCountMismatch {
                names: channels.len(),
                rows: data.nrows(),
            });
        }
        for (i, name) in channels.iter().enumerate() {
            if channels[..i].contains(name) {
                return Err(DetectError::DuplicateChannelName(name.clone()));
            }
        }
        Ok(Recording { data, sf, channels })
    }

    pub fn channel_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn sample_count(&self) -> usize {
        self.data.ncols()
    }

    pub fn sf(&self) -> f64 {
        self.sf
    }

    /// Recording length in seconds.
    pub fn duration(&self) -> f64 {
        self.sample_count() as f64 / self.sf
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channels
    }

    /// Read-only view of one channel's samples.
    pub fn channel(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
}

/// Conditioning band cutoffs, in Hz. The lower cutoff sets the baseline
/// tracking window, the upper cutoff the low-pass corner.
///
/// The default band (0.3 - 3.5 Hz) targets the slow-wave range; widen or
/// shift it for spindle-like events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    pub low_hz: f64,
    pub high_hz: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        BandConfig { low_hz: 0.3, high_hz: 3.5 }
    }
}

impl BandConfig {
    /// Cutoffs must be positive and ordered. The upper cutoff is checked
    /// against the Nyquist frequency once the sampling rate is known.
    pub fn validate(&self) -> Result<()> {
        if !(self.low_hz.is_finite() && self.high_hz.is_finite())
            || self.low_hz <= 0.0
            || self.high_hz <= self.low_hz
        {
            return Err(DetectError::InvalidBand {
                low: self.low_hz,
                high: self.high_hz,
            });
        }
        Ok(())
    }
}

/// Detection criteria. Each criterion is independently toggleable by
/// setting its field to `None`; at least one must stay enabled.
///
/// Amplitude values are minimum magnitudes in microvolts, `slope` is a
/// minimum in microvolts per second, `duration` is an inclusive range in
/// seconds covering the whole event (start to end zero-crossing).
///
/// When `adaptive_scale` is set, every enabled amplitude floor is raised to
/// at least `scale * stddev` of the conditioned channel (twice that for the
/// peak-to-peak criterion), so channels with different noise floors are
/// thresholded independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdConfig {
    pub duration: Option<(f64, f64)>,
    pub amp_neg: Option<f64>,
    pub amp_pos: Option<f64>,
    pub amp_ptp: Option<f64>,
    pub slope: Option<f64>,
    pub adaptive_scale: Option<f64>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            duration: Some((0.3, 1.5)),
            amp_neg: Some(40.0),
            amp_pos: Some(10.0),
            amp_ptp: Some(75.0),
            slope: Some(90.0),
            adaptive_scale: None,
        }
    }
}

impl ThresholdConfig {
    /// A config with every criterion disabled, as a starting point for
    /// enabling a single one. Does not validate; `validate()` rejects it
    /// as-is.
    pub fn none() -> Self {
        ThresholdConfig {
            duration: None,
            amp_neg: None,
            amp_pos: None,
            amp_ptp: None,
            slope: None,
            adaptive_scale: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let amplitude_on =
            self.amp_neg.is_some() || self.amp_pos.is_some() || self.amp_ptp.is_some();
        if self.duration.is_none() && !amplitude_on && self.slope.is_none() {
            return Err(DetectError::NoActiveCriterion);
        }
        if let Some((min, max)) = self.duration {
            if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < min {
                return Err(DetectError::InvalidDurationRange { min, max });
            }
        }
        for (criterion, value) in [
            ("amp_neg", self.amp_neg),
            ("amp_pos", self.amp_pos),
            ("amp_ptp", self.amp_ptp),
            ("slope", self.slope),
            ("adaptive_scale", self.adaptive_scale),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(DetectError::InvalidThreshold { criterion, value: v });
                }
            }
        }
        Ok(())
    }
}

/// Which part of an event the inclusion mask is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// The start zero-crossing must fall inside an included region.
    #[default]
    Start,
    /// The negative peak must fall inside an included region.
    NegPeak,
    /// Every sample of the event span must be included.
    FullSpan,
}

/// How per-channel failures are surfaced during multi-channel detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first per-channel error aborts the whole call.
    #[default]
    Strict,
    /// Failed channels are omitted from the table and reported alongside it.
    Lenient,
}

/// One detected half-cycle pair. All times are seconds from recording
/// start, all amplitudes microvolts.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Falling zero-crossing opening the negative half.
    pub start: f64,
    /// Time of the minimum value inside the negative half.
    pub neg_peak: f64,
    /// Rising zero-crossing opening the positive half.
    pub mid_crossing: f64,
    /// Time of the maximum value inside the positive half.
    pub pos_peak: f64,
    /// Falling zero-crossing closing the event (or end of channel).
    pub end: f64,
    /// `end - start` in seconds.
    pub duration: f64,
    /// Value at the negative peak, always < 0.
    pub val_neg_peak: f64,
    /// Value at the positive peak, always > 0.
    pub val_pos_peak: f64,
    /// Peak-to-peak amplitude, `val_pos_peak - val_neg_peak`.
    pub ptp: f64,
    /// `ptp / (pos_peak - neg_peak)` in microvolts per second.
    pub slope: f64,
    /// The neg-to-pos peak interval is half a period, so
    /// `frequency = 1 / (2 * (pos_peak - neg_peak))`.
    pub frequency: f64,
    /// Channel name this event was detected on.
    pub channel: String,
    /// Zero-based position of the channel in the recording's name list.
    pub idx_channel: usize,
}

/// Ordered, immutable sequence of detected events, grouped by channel in
/// channel-list order with ascending start times inside each group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    pub fn new(events: Vec<Event>) -> Self {
        EventTable { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Events detected on the channel at `idx_channel`, in chronological
    /// order.
    pub fn channel_events(&self, idx_channel: usize) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.idx_channel == idx_channel)
    }

    /// Consumes the table, e.g. to hand the rows to an external
    /// post-filtering collaborator.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl<'a> IntoIterator for &'a EventTable {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
