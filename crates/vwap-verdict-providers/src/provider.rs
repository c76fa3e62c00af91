use async_trait::async_trait;
use vwap_verdict_core::bar::Bar;

use crate::error::ProviderError;

/// Fetch window for one request: the current session, or the widened
/// window the fallback uses when the current session has no bars yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchWindow {
    OneDay,
    FiveDays,
}

impl FetchWindow {
    /// The Yahoo chart-API `range` value.
    pub fn as_range(self) -> &'static str {
        match self {
            FetchWindow::OneDay => "1d",
            FetchWindow::FiveDays => "5d",
        }
    }
}

/// Trait for fetching one-minute bars from an external source.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Provider name (for logging/display).
    fn name(&self) -> &str;

    /// Fetch one-minute bars for a symbol over the given window, pre- and
    /// post-market included. Returns bars sorted by timestamp; an empty
    /// vec means the window holds no data (not an error by itself).
    async fn fetch_bars(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<Bar>, ProviderError>;
}
