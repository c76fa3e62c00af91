use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single one-minute OHLCV bar.
///
/// Prices are positive finite floats; volume is non-negative. A lookup's
/// series is a `Vec<Bar>` sorted by timestamp with unique timestamps,
/// covering one trading session including extended hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
