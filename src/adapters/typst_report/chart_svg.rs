//! SVG chart rendering for reports.
//!
//! Equity charts draw the buy-and-hold market curve and the strategy curve on
//! shared axes. Undefined points are skipped, not drawn as zero.

use chrono::NaiveDate;

use crate::domain::metrics::drawdown_series;
use crate::domain::simulator::EquityCurve;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const MARKET_COLOUR: &str = "#1f77b4";
const STRATEGY_COLOUR: &str = "#ff7f0e";
const DRAWDOWN_COLOUR: &str = "#d62728";

struct Frame {
    len: usize,
    min: f64,
    max: f64,
}

impl Frame {
    fn new(len: usize, series: &[&[Option<f64>]]) -> Option<Self> {
        let values: Vec<f64> = series.iter().flat_map(|s| s.iter().flatten().copied()).collect();
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Frame { len, min, max })
    }

    fn x(&self, i: usize) -> f64 {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (i as f64 / (self.len - 1).max(1) as f64) * plot_width
    }

    fn y(&self, v: f64) -> f64 {
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let range = self.max - self.min;
        if range > 0.0 {
            MARGIN_TOP + plot_height - ((v - self.min) / range) * plot_height
        } else {
            MARGIN_TOP + plot_height / 2.0
        }
    }

    fn path(&self, series: &[Option<f64>]) -> String {
        let mut path_data = String::new();
        for (i, value) in series.iter().enumerate() {
            if let Some(v) = value {
                let cmd = if path_data.is_empty() { "M" } else { " L" };
                path_data.push_str(&format!("{} {:.1} {:.1}", cmd, self.x(i), self.y(*v)));
            }
        }
        path_data
    }
}

fn open_svg(label: &str, frame: &Frame, dates: &[NaiveDate], value_fmt: fn(f64) -> String) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" text-anchor=\"end\" font-size=\"12\" fill=\"#666\">{}</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        label
    ));
    svg.push_str(&format!(
        "  <line x1=\"{0}\" y1=\"{1}\" x2=\"{0}\" y2=\"{2}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{2}\" x2=\"{}\" y2=\"{2}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 5.0,
        value_fmt(frame.max)
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT - 5.0,
        CHART_HEIGHT - MARGIN_BOTTOM,
        value_fmt(frame.min)
    ));
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT,
            CHART_HEIGHT - 10.0,
            first
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            CHART_HEIGHT - 10.0,
            last
        ));
    }
    svg
}

fn polyline(path: &str, colour: &str) -> String {
    format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        path, colour
    )
}

/// Market (buy and hold) against strategy equity. Empty string when neither
/// curve has a defined point.
pub fn generate_equity_svg(dates: &[NaiveDate], equity: &EquityCurve) -> String {
    let Some(frame) = Frame::new(
        dates.len(),
        &[equity.market.as_slice(), equity.strategy.as_slice()],
    ) else {
        return String::new();
    };

    let mut svg = open_svg("Growth of 1", &frame, dates, |v| format!("{:.2}", v));
    svg.push_str(&polyline(&frame.path(&equity.market), MARKET_COLOUR));
    svg.push_str(&polyline(&frame.path(&equity.strategy), STRATEGY_COLOUR));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" font-size=\"11\" fill=\"{}\">Benchmark (Buy &amp; Hold)</text>\n",
        MARGIN_LEFT, MARKET_COLOUR
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" font-size=\"11\" fill=\"{}\">Signal Strategy</text>\n",
        MARGIN_LEFT + 180.0,
        STRATEGY_COLOUR
    ));
    svg.push_str("</svg>");
    svg
}

/// Strategy drawdown from its running peak, in percent.
pub fn generate_drawdown_svg(dates: &[NaiveDate], equity: &EquityCurve) -> String {
    let drawdowns = drawdown_series(&equity.strategy);
    if drawdowns.iter().flatten().count() < 2 {
        return String::new();
    }
    let zero_line: Vec<Option<f64>> = vec![Some(0.0); 1];
    let Some(frame) = Frame::new(dates.len(), &[drawdowns.as_slice(), zero_line.as_slice()]) else {
        return String::new();
    };

    let mut svg = open_svg("Drawdown (%)", &frame, dates, |v| format!("{:.1}%", v * 100.0));
    svg.push_str(&polyline(&frame.path(&drawdowns), DRAWDOWN_COLOUR));
    svg.push_str("</svg>");
    svg
}
