use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("series is empty; nothing to analyze")]
    EmptySeries,

    #[error("cumulative volume is zero through bar {index}; VWAP is undefined")]
    ZeroVolume { index: usize },
}
