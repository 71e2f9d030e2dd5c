//! Typst-based report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `[report] template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `chart_svg` and `tables`,
//! and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TradelabError;
use crate::ports::report_port::ReportPort;

/// Context for resolving template placeholders.
pub struct ReportContext<'a> {
    pub ticker: &'a str,
    pub result: &'a BacktestResult,
}

fn embed_svg(svg: &str, empty_note: &str) -> String {
    if svg.is_empty() {
        empty_note.to_string()
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, ctx: &ReportContext) -> String {
    let result = ctx.result;
    let mut output = template.to_string();

    let run_summary =
        tables::render_run_summary(ctx.ticker, &result.dates, result.simulation.lag.bars());
    output = output.replace("{{RUN_SUMMARY}}", &run_summary);

    let metrics_table = tables::render_metrics_table(&result.summary, &result.risk);
    output = output.replace("{{METRICS_TABLE}}", &metrics_table);

    let benchmark_table = tables::render_benchmark_table(&result.benchmark);
    output = output.replace("{{BENCHMARK_TABLE}}", &benchmark_table);

    let equity_svg = chart_svg::generate_equity_svg(&result.dates, &result.simulation.equity);
    output = output.replace(
        "{{EQUITY_CURVE_SVG}}",
        &embed_svg(&equity_svg, "_No equity data._"),
    );

    let dd_svg = chart_svg::generate_drawdown_svg(&result.dates, &result.simulation.equity);
    output = output.replace(
        "{{DRAWDOWN_CHART_SVG}}",
        &embed_svg(&dd_svg, "_No drawdown data._"),
    );

    output
}

/// Writes a `.typ` report from the built-in template or a custom one.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template_file(path: &str) -> Result<Self, TradelabError> {
        let template = fs::read_to_string(path).map_err(|e| TradelabError::Data {
            reason: format!("failed to read template {}: {}", path, e),
        })?;
        Ok(Self {
            template: Some(template),
        })
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), TradelabError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or(default_template::template());
        let content = resolve(template, &ReportContext { ticker, result });
        fs::write(output_path, content)?;
        tracing::info!(path = output_path, "report written");
        Ok(())
    }
}
