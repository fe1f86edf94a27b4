use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::config::MAX_FPS;

/// Errors raised while validating a plot configuration or loading its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotError {
    /// A checkpoint sample file referenced by an update count does not exist.
    MissingCheckpoint { update_count: u64, path: PathBuf },
    /// A row in an input file could not be parsed.
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Sample columns handed to a constructor differ in length.
    ColumnLengthMismatch { expected: usize, found: usize },
    /// An input file holds no data rows.
    EmptyFile(PathBuf),
    /// Axis bounds with `min >= max` or non-finite values.
    InvalidBounds { axis: char, min: f64, max: f64 },
    /// Sweep with a zero step or an end before its start.
    InvalidSweep { start: u64, end: u64, step: u64 },
    /// Rearrangement cadence with a zero period.
    InvalidCadence { start: u64, period: u64 },
    /// Reference mixture that is not a probability density.
    InvalidMixture(String),
    /// Experiment name that cannot be used as a file name stem.
    InvalidExperimentName(String),
    /// Animation frame rate of zero, or too fast for GIF's centisecond delays.
    InvalidFrameRate(u32),
    /// Configuration that is otherwise inconsistent.
    InvalidConfig(String),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlotError::MissingCheckpoint { update_count, path } => write!(
                f,
                "Missing checkpoint file for update count {}: {}",
                update_count,
                path.display()
            ),
            PlotError::MalformedRow { path, line, reason } => {
                write!(f, "Malformed row at {}:{}: {}", path.display(), line, reason)
            }
            PlotError::ColumnLengthMismatch { expected, found } => write!(
                f,
                "Sample columns differ in length: expected {} values, found {}",
                expected, found
            ),
            PlotError::EmptyFile(path) => write!(f, "No data rows in {}", path.display()),
            PlotError::InvalidBounds { axis, min, max } => write!(
                f,
                "Invalid {}-axis bounds: min ({}) must be finite and less than max ({})",
                axis, min, max
            ),
            PlotError::InvalidSweep { start, end, step } => write!(
                f,
                "Invalid sweep: start={}, end={}, step={} (step must be positive and end >= start)",
                start, end, step
            ),
            PlotError::InvalidCadence { start, period } => write!(
                f,
                "Invalid rearrangement cadence: start={}, period={} (period must be positive)",
                start, period
            ),
            PlotError::InvalidMixture(reason) => write!(f, "Invalid reference mixture: {}", reason),
            PlotError::InvalidExperimentName(name) => {
                write!(f, "Invalid experiment name '{}': must be a non-empty file name stem", name)
            }
            PlotError::InvalidFrameRate(fps) => {
                write!(f, "Invalid frame rate {}: fps must be between 1 and {}", fps, MAX_FPS)
            }
            PlotError::InvalidConfig(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl Error for PlotError {}
