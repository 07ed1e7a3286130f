//! temperature-heatmap - render the monthly global temperature heatmap to SVG.
//!
//! Run: `temperature-heatmap -o heatmap.svg`
//! Snapshot a hovered cell: `temperature-heatmap --hover 1900-01 -o hover.svg`

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use temperature_heatmap::config::ChartConfig;
use temperature_heatmap::dataset::Dataset;
use temperature_heatmap::output::SvgEncoder;
use temperature_heatmap::plots::HeatmapChart;
use temperature_heatmap::tooltip::TooltipController;

/// Monthly global land-surface temperature heatmap
#[derive(Parser, Debug)]
#[command(name = "temperature-heatmap")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render the monthly global temperature heatmap as SVG", long_about = None)]
struct Cli {
    /// Dataset URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Read the dataset from a local JSON file instead of fetching it
    #[arg(long, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Output SVG path, `-` for stdout
    #[arg(short, long, default_value = "heatmap.svg")]
    output: String,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Render with the tooltip shown for a cell, as YEAR-MONTH (e.g. 1900-01)
    #[arg(long, value_parser = parse_hover)]
    hover: Option<(i32, u8)>,
}

fn parse_hover(value: &str) -> Result<(i32, u8), String> {
    let (year, month) = value
        .rsplit_once('-')
        .filter(|(year, _)| !year.is_empty())
        .ok_or_else(|| format!("expected YEAR-MONTH, got '{value}'"))?;
    let year = year.parse().map_err(|e| format!("invalid year '{year}': {e}"))?;
    let month = month.parse().map_err(|e| format!("invalid month '{month}': {e}"))?;
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {month}"));
    }
    Ok((year, month))
}

fn load_config(path: Option<PathBuf>) -> Result<ChartConfig> {
    if let Some(path) = path {
        return ChartConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let default_path = dirs::config_dir().map(|p| p.join("temperature-heatmap/config.yaml"));
    match default_path {
        Some(path) if path.exists() => ChartConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        _ => Ok(ChartConfig::default()),
    }
}

async fn build_chart(cli: &Cli, config: &ChartConfig) -> Result<HeatmapChart> {
    if let Some(path) = &cli.input {
        info!("Reading dataset from {}", path.display());
        let dataset = Dataset::from_file(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        return HeatmapChart::new(dataset, config).context("failed to build chart");
    }

    let url = cli.url.as_deref().unwrap_or(&config.source_url);
    let timeout = cli.timeout_secs.map(Duration::from_secs);
    temperature_heatmap::chart_from_url(url, config, timeout)
        .await
        .with_context(|| format!("failed to build chart from {url}"))
}

fn render(chart: &HeatmapChart, hover: Option<(i32, u8)>) -> Result<SvgEncoder> {
    let Some((year, month)) = hover else {
        return Ok(chart.render());
    };

    let Some(cell) = chart.find_cell(year, month) else {
        bail!("no cell for {year}-{month:02}");
    };

    // Snapshot the frame where the fade-in has just completed.
    let mut tooltip = TooltipController::new(chart.config().tooltip);
    let pointer = chart.to_document(cell.rect.center());
    tooltip.hover(cell, pointer, Duration::ZERO);
    let now = chart.config().tooltip.fade_in();
    tooltip.tick(now);

    Ok(chart.render_with_tooltip(&tooltip, now))
}

fn write_output(svg: &SvgEncoder, output: &str) -> Result<()> {
    if output == "-" {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        svg.write_to(&mut lock).context("failed to write SVG to stdout")?;
        lock.flush()?;
    } else {
        svg.write_to_file(output).with_context(|| format!("failed to write {output}"))?;
        info!("Wrote {output}");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.clone())?;
    let chart = build_chart(&cli, &config).await?;
    let svg = render(&chart, cli.hover)?;
    write_output(&svg, &cli.output)
}
