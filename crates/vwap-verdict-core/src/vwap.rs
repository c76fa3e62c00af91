use crate::bar::Bar;
use crate::error::AnalysisError;

/// Running VWAP over a session: `vwap[i] = Σ close·volume / Σ volume` for
/// bars `0..=i`. Computed once, left to right; later bars never revise
/// earlier entries.
///
/// Fails with [`AnalysisError::ZeroVolume`] at the first prefix whose
/// cumulative volume is not positive — the ratio is undefined there and
/// must never surface as NaN or infinity.
pub fn cumulative_vwap(bars: &[Bar]) -> Result<Vec<f64>, AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for (index, bar) in bars.iter().enumerate() {
        let volume = bar.volume as f64;
        cum_pv += bar.close * volume;
        cum_volume += volume;

        if cum_volume <= 0.0 {
            return Err(AnalysisError::ZeroVolume { index });
        }
        values.push(cum_pv / cum_volume);
    }

    Ok(values)
}
