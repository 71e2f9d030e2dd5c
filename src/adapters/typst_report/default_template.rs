//! Default Typst report template.
//!
//! Built-in Typst report markup with `{{PLACEHOLDER}}` substitution.

const DEFAULT_TEMPLATE: &str = r#"#set page(paper: "a4", margin: 2cm)
#set text(size: 10pt)

= Signal Backtest Report

== Run

{{RUN_SUMMARY}}

== Performance

{{METRICS_TABLE}}

== Benchmark

{{BENCHMARK_TABLE}}

== Equity Curve

{{EQUITY_CURVE_SVG}}

== Drawdown

{{DRAWDOWN_CHART_SVG}}
"#;

pub fn template() -> &'static str {
    DEFAULT_TEMPLATE
}
