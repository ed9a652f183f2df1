use thiserror::Error;

/// Typed failures surfaced by the library. Transport and I/O errors travel as
/// `anyhow::Error` with context instead.
#[derive(Debug, Error)]
pub enum FloodvizError {
    #[error("chart {dimension} of {value}px leaves no room inside {margins}px of margins")]
    TooSmall {
        dimension: &'static str,
        value: u32,
        margins: u32,
    },
    #[error("sample #{index} has an empty series key")]
    EmptySeriesKey { index: usize },
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}
