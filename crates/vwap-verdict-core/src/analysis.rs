use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bar::Bar;
use crate::error::AnalysisError;
use crate::session::SessionKind;
use crate::verdict::{self, Assessment};
use crate::vwap::cumulative_vwap;

/// The stop-loss floor sits this fraction below the latest VWAP unless the
/// day low is higher.
pub const STOP_LOSS_VWAP_FRACTION: f64 = 0.98;

/// One aligned point of the price-vs-VWAP chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub vwap: f64,
}

/// Everything the presentation layer needs for one lookup.
///
/// The built-in text renderer and any external UI fed by the JSON form
/// consume this as-is; neither reaches back into the bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: String,
    pub last_price: f64,
    /// VWAP at the last bar.
    pub vwap: f64,
    /// Signed percent deviation of the last price from VWAP.
    pub deviation_pct: f64,
    pub day_high: f64,
    pub day_low: f64,
    /// Suggested stop: `max(day_low, vwap * 0.98)`.
    pub stop_loss: f64,
    pub assessment: Assessment,
    /// Session the last bar falls in.
    pub session: SessionKind,
    /// Timestamp of the last bar.
    pub last_updated: DateTime<Utc>,
    pub points: Vec<ChartPoint>,
}

/// Annotate a fetched session with its running VWAP, derive the day metrics,
/// and classify the last bar.
///
/// Expects the non-empty, chronologically sorted series the fetcher
/// guarantees; an empty series is rejected rather than analyzed.
pub fn analyze(symbol: &str, bars: &[Bar]) -> Result<Analysis, AnalysisError> {
    let Some(last) = bars.last() else {
        return Err(AnalysisError::EmptySeries);
    };

    let vwap = cumulative_vwap(bars)?;
    let last_vwap = vwap[vwap.len() - 1];

    let day_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let day_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let stop_loss = day_low.max(last_vwap * STOP_LOSS_VWAP_FRACTION);

    let points = bars
        .iter()
        .zip(&vwap)
        .map(|(bar, &vwap)| ChartPoint {
            timestamp: bar.timestamp,
            close: bar.close,
            vwap,
        })
        .collect();

    Ok(Analysis {
        symbol: symbol.to_string(),
        last_price: last.close,
        vwap: last_vwap,
        deviation_pct: verdict::deviation_pct(last.close, last_vwap),
        day_high,
        day_low,
        stop_loss,
        assessment: verdict::classify(last.close, last_vwap),
        session: SessionKind::at(&last.timestamp),
        last_updated: last.timestamp,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;
    use chrono::{TimeZone, Utc};

    fn bar(minute: u32, high: f64, low: f64, close: f64, volume: i64) -> Bar {
        // 14:30 UTC = 9:30 ET, regular session
        Bar {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 14, 30 + minute, 0).unwrap(),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    #[test]
    fn single_bar_is_a_buy_at_zero_deviation() {
        let analysis = analyze("AAPL", &[bar(0, 10.0, 10.0, 10.0, 100)]).unwrap();
        assert_eq!(analysis.symbol, "AAPL");
        assert_eq!(analysis.last_price, 10.0);
        assert_eq!(analysis.vwap, 10.0);
        assert_eq!(analysis.deviation_pct, 0.0);
        assert_eq!(analysis.assessment.verdict, Verdict::Buy);
    }

    #[test]
    fn fading_price_is_no_touch() {
        let bars = [bar(0, 10.0, 10.0, 10.0, 100), bar(1, 9.0, 9.0, 9.0, 100)];
        let analysis = analyze("DXF", &bars).unwrap();
        assert!((analysis.vwap - 9.5).abs() < 1e-9);
        assert_eq!(analysis.assessment.verdict, Verdict::NoTouch);
    }

    #[test]
    fn spiking_price_is_dont_chase() {
        let bars = [bar(0, 10.0, 10.0, 10.0, 100), bar(1, 16.0, 16.0, 16.0, 100)];
        let analysis = analyze("UAVS", &bars).unwrap();
        assert!((analysis.vwap - 13.0).abs() < 1e-9);
        assert!((analysis.deviation_pct - 300.0 / 13.0).abs() < 1e-9);
        assert_eq!(analysis.assessment.verdict, Verdict::DontChase);
    }

    #[test]
    fn day_range_spans_the_whole_series() {
        let bars = [
            bar(0, 10.5, 9.8, 10.0, 100),
            bar(1, 11.2, 10.0, 10.4, 100),
            bar(2, 10.9, 10.2, 10.6, 100),
        ];
        let analysis = analyze("AAPL", &bars).unwrap();
        assert_eq!(analysis.day_high, 11.2);
        assert_eq!(analysis.day_low, 9.8);
    }

    #[test]
    fn stop_loss_uses_the_vwap_floor_when_day_low_is_below_it() {
        let bars = [bar(0, 10.0, 5.0, 10.0, 100)];
        let analysis = analyze("AAPL", &bars).unwrap();
        assert!((analysis.stop_loss - 9.8).abs() < 1e-9);
    }

    #[test]
    fn stop_loss_uses_the_day_low_when_it_is_above_the_floor() {
        let bars = [bar(0, 10.0, 9.9, 10.0, 100)];
        let analysis = analyze("AAPL", &bars).unwrap();
        assert!((analysis.stop_loss - 9.9).abs() < 1e-9);
    }

    #[test]
    fn chart_points_stay_aligned_with_the_series() {
        let bars = [
            bar(0, 10.0, 10.0, 10.0, 100),
            bar(1, 12.0, 12.0, 12.0, 300),
            bar(2, 11.0, 11.0, 11.0, 100),
        ];
        let analysis = analyze("AAPL", &bars).unwrap();
        assert_eq!(analysis.points.len(), bars.len());
        for (point, bar) in analysis.points.iter().zip(&bars) {
            assert_eq!(point.timestamp, bar.timestamp);
            assert_eq!(point.close, bar.close);
        }
        // running VWAP: 10, (10*100+12*300)/400 = 11.5, (4600+11*100)/500 = 11.4
        assert!((analysis.points[1].vwap - 11.5).abs() < 1e-9);
        assert!((analysis.points[2].vwap - 11.4).abs() < 1e-9);
    }

    #[test]
    fn highs_and_lows_of_earlier_bars_never_move_the_verdict() {
        let a = [bar(0, 10.1, 9.9, 10.0, 100), bar(1, 10.3, 10.1, 10.2, 100)];
        let b = [bar(0, 99.0, 0.1, 10.0, 100), bar(1, 10.3, 10.1, 10.2, 100)];
        assert_eq!(
            analyze("AAPL", &a).unwrap().assessment.verdict,
            analyze("AAPL", &b).unwrap().assessment.verdict
        );
    }

    #[test]
    fn session_and_time_come_from_the_last_bar() {
        let bars = [bar(0, 10.0, 10.0, 10.0, 100), bar(5, 10.0, 10.0, 10.0, 100)];
        let analysis = analyze("AAPL", &bars).unwrap();
        assert_eq!(analysis.session, SessionKind::Regular);
        assert_eq!(analysis.last_updated, bars[1].timestamp);
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            analyze("AAPL", &[]),
            Err(AnalysisError::EmptySeries)
        ));
    }

    #[test]
    fn zero_volume_series_is_rejected_not_nan() {
        let bars = [bar(0, 10.0, 10.0, 10.0, 0)];
        assert!(matches!(
            analyze("HALT", &bars),
            Err(AnalysisError::ZeroVolume { index: 0 })
        ));
    }

    #[test]
    fn payload_serializes_with_the_boundary_tags() {
        let analysis = analyze("AAPL", &[bar(0, 10.0, 10.0, 10.0, 100)]).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["assessment"]["verdict"], "BUY");
        assert_eq!(json["assessment"]["severity"], "safe");
        assert_eq!(json["session"], "regular");
        assert_eq!(json["points"][0]["close"], 10.0);
    }
}
