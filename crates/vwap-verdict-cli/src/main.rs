mod render;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use vwap_verdict_core::analysis::{self, Analysis};
use vwap_verdict_providers::fetch::fetch_latest_session;
use vwap_verdict_providers::provider::BarProvider;
use vwap_verdict_providers::yahoo::YahooProvider;

use crate::render::RenderOptions;

#[derive(Parser)]
#[command(
    name = "vwap-verdict",
    about = "Fetch a ticker's intraday bars, compare price to VWAP, render a buy/no-buy verdict"
)]
struct Cli {
    /// Ticker symbol to look up; omit to enter the interactive prompt loop
    symbol: Option<String>,

    /// Emit the analysis as JSON instead of the text dashboard
    #[arg(long)]
    json: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Chart height in rows
    #[arg(long, default_value_t = 12)]
    chart_height: usize,

    /// Chart width in columns
    #[arg(long, default_value_t = 72)]
    chart_width: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            color: !self.no_color,
            chart_height: self.chart_height,
            chart_width: self.chart_width,
        }
    }
}

fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// One full lookup: fetch the latest session, annotate it, classify it.
/// Every call re-fetches; nothing is shared between lookups.
async fn lookup(provider: &dyn BarProvider, symbol: &str) -> Result<Analysis> {
    let bars = fetch_latest_session(provider, symbol).await?;
    let analysis = analysis::analyze(symbol, &bars)?;
    Ok(analysis)
}

fn print_result(analysis: &Analysis, json: bool, opts: &RenderOptions) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        print!("{}", render::render_dashboard(analysis, opts));
    }
    Ok(())
}

/// Prompt loop: one lookup runs to completion before the next symbol is
/// read. `q`, `quit`, or EOF exits.
async fn run_loop(provider: &dyn BarProvider, json: bool, opts: &RenderOptions) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("ticker> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let symbol = normalize_symbol(&line?);
        if symbol.is_empty() {
            continue;
        }
        if symbol == "Q" || symbol == "QUIT" || symbol == "EXIT" {
            break;
        }

        match lookup(provider, &symbol).await {
            Ok(analysis) => print_result(&analysis, json, opts)?,
            Err(e) => {
                warn!("{symbol}: lookup failed: {e}");
                println!("{}", render::render_error(&e.to_string(), opts));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let provider = YahooProvider::new();
    let opts = cli.render_options();

    match &cli.symbol {
        Some(raw) => {
            let symbol = normalize_symbol(raw);
            let analysis = lookup(&provider, &symbol)
                .await
                .with_context(|| format!("lookup failed for {symbol}"))?;
            print_result(&analysis, cli.json, &opts)?;
        }
        None => run_loop(&provider, cli.json, &opts).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_one_shot_args() {
        let cli = Cli::try_parse_from(["vwap-verdict", "aapl", "--json", "--no-color"]).unwrap();
        assert_eq!(cli.symbol.as_deref(), Some("aapl"));
        assert!(cli.json);
        assert!(cli.no_color);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn parse_defaults_enter_loop_mode() {
        let cli = Cli::try_parse_from(["vwap-verdict"]).unwrap();
        assert!(cli.symbol.is_none());
        assert!(!cli.json);
        assert!(!cli.no_color);
        assert_eq!(cli.chart_height, 12);
        assert_eq!(cli.chart_width, 72);
    }

    #[test]
    fn parse_chart_dimensions() {
        let cli = Cli::try_parse_from([
            "vwap-verdict",
            "AAPL",
            "--chart-height",
            "20",
            "--chart-width",
            "100",
        ])
        .unwrap();
        assert_eq!(cli.chart_height, 20);
        assert_eq!(cli.chart_width, 100);
    }

    #[test]
    fn render_options_mirror_the_flags() {
        let cli = Cli::try_parse_from(["vwap-verdict", "AAPL", "--no-color"]).unwrap();
        let opts = cli.render_options();
        assert!(!opts.color);
        assert_eq!(opts.chart_height, 12);
    }

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        assert_eq!(normalize_symbol("  aapl \n"), "AAPL");
        assert_eq!(normalize_symbol("UAVS"), "UAVS");
        assert_eq!(normalize_symbol("   "), "");
    }
}
