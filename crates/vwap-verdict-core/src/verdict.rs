use serde::{Deserialize, Serialize};

/// Largest tolerated extension above VWAP, in percent, before a lookup is
/// flagged as chasing.
pub const MAX_EXTENSION_PCT: f64 = 5.0;

/// Three-way call on the latest price relative to the session VWAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Price below VWAP: sellers control the tape.
    NoTouch,
    /// Price extended more than [`MAX_EXTENSION_PCT`] above VWAP.
    DontChase,
    /// Price at or above VWAP within acceptable extension.
    Buy,
}

impl Verdict {
    /// Banner label.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::NoTouch => "NO TOUCH",
            Verdict::DontChase => "DON'T CHASE",
            Verdict::Buy => "BUY",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Verdict::NoTouch => Severity::Danger,
            Verdict::DontChase => Severity::Caution,
            Verdict::Buy => Severity::Safe,
        }
    }
}

/// Presentation color axis for a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Caution,
    Safe,
}

/// A verdict plus the context the dashboard shows next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub verdict: Verdict,
    pub severity: Severity,
    pub reason: String,
}

/// Signed percent deviation of `price` from `vwap`.
pub fn deviation_pct(price: f64, vwap: f64) -> f64 {
    (price - vwap) / vwap * 100.0
}

/// Classify the latest bar's position against the session VWAP.
///
/// Pure in `(price, vwap)`; nothing else about the series participates.
/// The below-VWAP check takes absolute priority over the extension check,
/// and both comparisons are strict: `price == vwap` and a deviation of
/// exactly [`MAX_EXTENSION_PCT`] both classify as [`Verdict::Buy`].
pub fn classify(price: f64, vwap: f64) -> Assessment {
    let deviation = deviation_pct(price, vwap);

    let (verdict, reason) = if price < vwap {
        (
            Verdict::NoTouch,
            "price is under water, below the institutional cost line; sellers are in control"
                .to_string(),
        )
    } else if deviation > MAX_EXTENSION_PCT {
        (
            Verdict::DontChase,
            format!("price is stretched {deviation:.2}% above VWAP; wait for a pullback"),
        )
    } else {
        (
            Verdict::Buy,
            "price is holding the cost line with acceptable extension; buyers are in control"
                .to_string(),
        )
    };

    Assessment {
        verdict,
        severity: verdict.severity(),
        reason,
    }
}
