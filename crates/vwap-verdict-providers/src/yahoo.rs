use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use vwap_verdict_core::bar::Bar;

use crate::error::ProviderError;
use crate::provider::{BarProvider, FetchWindow};

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance market data provider.
/// No authentication required; one-minute bars cover roughly the last week.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_CHART_URL.to_string())
    }

    /// Create with a custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0")
                .build()
                .expect("failed to build reqwest client"),
            base_url,
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

fn parse_yahoo_result(result: &YahooResult) -> Result<Vec<Bar>, ProviderError> {
    let timestamps = result
        .timestamp
        .as_ref()
        .ok_or_else(|| ProviderError::Parse("missing timestamps".into()))?;

    if result.indicators.quote.is_empty() {
        return Ok(Vec::new());
    }

    let quote = &result.indicators.quote[0];
    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(open) = quote.open.get(i).copied().flatten() else {
            skipped += 1;
            continue;
        };
        let Some(high) = quote.high.get(i).copied().flatten() else {
            skipped += 1;
            continue;
        };
        let Some(low) = quote.low.get(i).copied().flatten() else {
            skipped += 1;
            continue;
        };
        let Some(close) = quote.close.get(i).copied().flatten() else {
            skipped += 1;
            continue;
        };
        // Prices must be positive; a non-positive close would poison VWAP.
        if close <= 0.0 {
            skipped += 1;
            continue;
        }
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);

        let timestamp = Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| ProviderError::Parse(format!("invalid unix timestamp: {ts}")))?;

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if skipped > 0 {
        debug!("skipped {skipped} bar(s) with missing or non-positive fields");
    }

    Ok(bars)
}

#[async_trait]
impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<Bar>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, symbol))
            .query(&[
                ("range", window.as_range()),
                ("interval", "1m"),
                ("includePrePost", "true"),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status,
                message: body,
            });
        }

        let body: YahooResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("failed to parse response: {e}")))?;

        if let Some(error) = body.chart.error {
            return Err(ProviderError::Api {
                status: 0,
                message: format!("{}: {}", error.code, error.description),
            });
        }

        let results = body
            .chart
            .result
            .ok_or_else(|| ProviderError::Parse("no results in response".into()))?;

        if results.is_empty() {
            return Ok(Vec::new());
        }

        let mut bars = parse_yahoo_result(&results[0])?;
        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}
