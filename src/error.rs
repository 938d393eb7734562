use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Channel name count {names} does not match matrix row count {rows}")]
    ChannelCountMismatch { names: usize, rows: usize },

    #[error("Inclusion mask length {got} does not match sample count {expected}")]
    MaskLengthMismatch { expected: usize, got: usize },

    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    #[error("Non-finite sample at index {index} in channel '{channel}'")]
    NonFiniteSample { channel: String, index: usize },

    #[error("Duplicate channel name: '{0}'")]
    DuplicateChannelName(String),

    #[error("No active threshold criterion: enable at least one of duration, amplitude, slope")]
    NoActiveCriterion,

    #[error("Invalid filter band: {low} - {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    #[error("Invalid duration range: {min} - {max} s")]
    InvalidDurationRange { min: f64, max: f64 },

    #[error("Invalid threshold value for {criterion}: {value}")]
    InvalidThreshold { criterion: &'static str, value: f64 },

    #[error("Channel index {index} out of range for {channels} channels")]
    ChannelIndexOutOfRange { index: usize, channels: usize },
}

pub type Result<T> = std::result::Result<T, DetectError>;
