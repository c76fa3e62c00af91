use tracing::{debug, info};
use vwap_verdict_core::bar::Bar;
use vwap_verdict_core::session::session_date;

use crate::error::ProviderError;
use crate::provider::{BarProvider, FetchWindow};

/// Fetch the most recent session's one-minute bars for `symbol`.
///
/// Tries the current trading day first. If that window is empty (market
/// holiday, weekend, freshly listed ticker), widens to five days and keeps
/// only the bars sharing the US/Eastern calendar date of the last bar
/// present, i.e. the most recent session with data. The fallback is part
/// of normal operation, not an error path; anything else that fails here
/// is terminal for the lookup.
///
/// Callers normalize the symbol (trim + uppercase) before calling; the
/// blank-symbol check is the backstop.
pub async fn fetch_latest_session(
    provider: &dyn BarProvider,
    symbol: &str,
) -> Result<Vec<Bar>, ProviderError> {
    if symbol.trim().is_empty() {
        return Err(ProviderError::InvalidSymbol(symbol.to_string()));
    }

    info!("fetching {symbol} via {}", provider.name());

    let bars = provider.fetch_bars(symbol, FetchWindow::OneDay).await?;
    if !bars.is_empty() {
        debug!("{symbol}: {} bar(s) in the 1d window", bars.len());
        return Ok(bars);
    }

    debug!("{symbol}: 1d window empty, widening to 5d");
    let bars = provider.fetch_bars(symbol, FetchWindow::FiveDays).await?;
    let Some(last) = bars.last() else {
        return Err(ProviderError::NoData {
            symbol: symbol.to_string(),
        });
    };

    // Keep the latest session present. The last bar matches its own date,
    // so the result is never empty.
    let latest_date = session_date(&last.timestamp);
    let session: Vec<Bar> = bars
        .into_iter()
        .filter(|b| session_date(&b.timestamp) == latest_date)
        .collect();

    debug!(
        "{symbol}: fell back to session {latest_date} with {} bar(s)",
        session.len()
    );
    Ok(session)
}
