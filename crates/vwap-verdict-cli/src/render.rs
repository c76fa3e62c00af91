use vwap_verdict_core::analysis::{Analysis, ChartPoint};
use vwap_verdict_core::session::{display_clock, display_time};
use vwap_verdict_core::verdict::Severity;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Presentation configuration for one lookup, owned by the caller and
/// passed in explicitly; the renderer holds no global state.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub color: bool,
    pub chart_height: usize,
    pub chart_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            chart_height: 12,
            chart_width: 72,
        }
    }
}

fn severity_code(severity: Severity) -> &'static str {
    match severity {
        Severity::Danger => "\x1b[31m",
        Severity::Caution => "\x1b[33m",
        Severity::Safe => "\x1b[32m",
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{code}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Full text dashboard for one lookup: verdict banner, metric cards,
/// price-vs-VWAP chart, and the last-update caption.
pub fn render_dashboard(analysis: &Analysis, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let code = severity_code(analysis.assessment.severity);

    let banner = format!(
        "==== {} — {} ====",
        analysis.symbol,
        analysis.assessment.verdict.label()
    );
    out.push_str(&paint(&banner, &format!("{BOLD}{code}"), opts.color));
    out.push('\n');
    out.push_str(&analysis.assessment.reason);
    out.push_str("\n\n");

    let deviation = format!("{:+.2}%", analysis.deviation_pct);
    out.push_str(&format!(
        "price      {:>10.2}  ({deviation} vs VWAP)\n",
        analysis.last_price
    ));
    out.push_str(&format!("vwap       {:>10.2}\n", analysis.vwap));
    out.push_str(&format!("stop-loss  {:>10.2}\n", analysis.stop_loss));
    out.push_str(&format!(
        "day range  {:>10.2} to {:.2}\n\n",
        analysis.day_low, analysis.day_high
    ));

    for line in chart_lines(&analysis.points, opts.chart_height, opts.chart_width) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("           * close   . vwap\n\n");

    out.push_str(&format!(
        "last update {} ({})\n",
        display_time(&analysis.last_updated),
        analysis.session.label()
    ));

    out
}

/// Error banner: the raw failure message, nothing else.
pub fn render_error(message: &str, opts: &RenderOptions) -> String {
    paint(
        &format!("==== ERROR: {message} ===="),
        &format!("{BOLD}{}", severity_code(Severity::Danger)),
        opts.color,
    )
}

/// ASCII chart of the close and VWAP series: `height` plot rows plus one
/// axis row, each column one sampled minute, `*` for close over `.` for
/// VWAP, price labels on the left edge and ET clock labels under the axis.
fn chart_lines(points: &[ChartPoint], height: usize, width: usize) -> Vec<String> {
    let height = height.max(2);
    let cols = width.clamp(1, points.len());

    // One point per column, sampled evenly across the session.
    let sampled: Vec<&ChartPoint> = (0..cols)
        .map(|c| {
            let idx = if cols == 1 {
                points.len() - 1
            } else {
                c * (points.len() - 1) / (cols - 1)
            };
            &points[idx]
        })
        .collect();

    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for p in &sampled {
        lo = lo.min(p.close).min(p.vwap);
        hi = hi.max(p.close).max(p.vwap);
    }

    let row_for = |value: f64| -> usize {
        if hi == lo {
            height / 2
        } else {
            ((hi - value) / (hi - lo) * (height - 1) as f64).round() as usize
        }
    };

    let mut grid = vec![vec![' '; cols]; height];
    for (c, p) in sampled.iter().enumerate() {
        grid[row_for(p.vwap)][c] = '.';
        // close wins a shared cell
        grid[row_for(p.close)][c] = '*';
    }

    let mut lines = Vec::with_capacity(height + 1);
    for (r, row) in grid.iter().enumerate() {
        let label = if r == 0 {
            format!("{hi:>9.2}")
        } else if r == height - 1 {
            format!("{lo:>9.2}")
        } else {
            " ".repeat(9)
        };
        let body: String = row.iter().collect();
        lines.push(format!("{label} |{body}"));
    }

    let first = display_clock(&sampled[0].timestamp);
    let last = display_clock(&sampled[cols - 1].timestamp);
    let gap = cols.saturating_sub(first.len() + last.len());
    lines.push(format!(
        "{} +{}{}{}",
        " ".repeat(9),
        first,
        " ".repeat(gap),
        last
    ));

    lines
}
