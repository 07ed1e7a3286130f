//! End-to-end heatmap pipeline tests against a recorded dataset sample.
//!
//! Run: cargo test --test heatmap_pipeline_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::path::PathBuf;
use std::time::Duration;

use approx::assert_relative_eq;
use temperature_heatmap::axis::{decade_years, MONTH_NAMES};
use temperature_heatmap::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.json")
}

fn sample_chart() -> HeatmapChart {
    let dataset = Dataset::from_file(fixture_path()).unwrap();
    HeatmapChart::new(dataset, &ChartConfig::default()).unwrap()
}

// ============================================================================
// Loading and domain
// ============================================================================

#[test]
fn fixture_loads_every_record() {
    let dataset = Dataset::from_file(fixture_path()).unwrap();

    assert_eq!(dataset.baseline(), 8.66);
    assert_eq!(dataset.len(), 14 * 12);
    assert_eq!(dataset.records()[0], TemperatureRecord::new(1758, 1, -6.976));
}

#[test]
fn fixture_domain() {
    let chart = sample_chart();
    let domain = chart.domain();

    assert_eq!(domain.years.len(), 14);
    assert_eq!(domain.year_span(), (1758, 1771));
    assert_eq!(domain.months.iter().copied().collect::<Vec<_>>(), (1..=12).collect::<Vec<u8>>());

    let (min, max) = domain.value_range;
    assert_relative_eq!(min, 1.684, epsilon = 1e-9);
    assert_relative_eq!(max, 13.888, epsilon = 1e-9);
}

#[test]
fn empty_dataset_is_rejected() {
    let dataset = Dataset::parse(r#"{"baseTemperature": 8.66, "monthlyVariance": []}"#).unwrap();
    assert!(dataset.is_empty());

    let err = HeatmapChart::new(dataset, &ChartConfig::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyDataset));
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(Dataset::parse("<html>").unwrap_err(), Error::Fetch { .. }));
    assert!(matches!(
        Dataset::parse(r#"{"monthlyVariance": []}"#).unwrap_err(),
        Error::Schema(_)
    ));
}

// ============================================================================
// Cells
// ============================================================================

#[test]
fn one_cell_per_record_inside_plot_area() {
    let chart = sample_chart();
    let plot = Rect::new(0.0, 0.0, 1000.0, 500.0);

    assert_eq!(chart.cells().len(), chart.dataset().len());
    for cell in chart.cells() {
        assert!(cell.rect.x >= 0.0 && cell.rect.right() <= plot.width + 1e-9);
        assert!(cell.rect.y >= 0.0 && cell.rect.y + cell.rect.height <= plot.height + 1e-9);
    }
}

#[test]
fn cell_bands_match_scale_bandwidth() {
    let chart = sample_chart();
    let first = chart.find_cell(1758, 1).unwrap();
    let last = chart.find_cell(1771, 12).unwrap();

    assert_relative_eq!(first.rect.width, 1000.0 / 14.0, epsilon = 1e-9);
    assert_relative_eq!(first.rect.height, 500.0 / 12.0, epsilon = 1e-9);
    assert_eq!((first.rect.x, first.rect.y), (0.0, 0.0));
    assert_relative_eq!(last.rect.right(), 1000.0, epsilon = 1e-9);
}

#[test]
fn extreme_cells_take_ramp_ends() {
    let chart = sample_chart();
    let ramp = ColorRamp::rd_yl_bu();

    // Coldest record is the cool end, warmest the warm end.
    assert_eq!(chart.find_cell(1758, 1).unwrap().fill, ramp.interpolate(1.0));
    assert_eq!(chart.find_cell(1758, 2).unwrap().fill, ramp.interpolate(0.0));
    assert_eq!(chart.find_cell(1758, 2).unwrap().fill, Rgba::rgb(0xa5, 0x00, 0x26));
}

#[test]
fn cell_lookup_by_point() {
    let chart = sample_chart();
    let cell = chart.find_cell(1760, 6).unwrap();

    assert_eq!(chart.cell_at(cell.rect.center()), Some(cell));
}

// ============================================================================
// Axes and legend
// ============================================================================

#[test]
fn year_axis_ticks_every_decade() {
    let chart = sample_chart();
    let years: Vec<i32> = chart.domain().years.iter().copied().collect();

    assert_eq!(decade_years(&years), vec![1760, 1770]);
    assert_eq!(chart.x_axis().labels(), vec!["1760", "1770"]);
}

#[test]
fn month_axis_lists_calendar_names() {
    assert_eq!(sample_chart().y_axis().labels(), MONTH_NAMES.to_vec());
}

#[test]
fn legend_samples_four_swatches() {
    let chart = sample_chart();
    let legend = chart.legend();

    assert_eq!(legend.swatches().len(), 4);
    assert_relative_eq!(legend.swatches()[0].value, 1.684, epsilon = 1e-9);
    assert_eq!(legend.axis().labels(), vec!["2", "4", "6", "8", "10", "12"]);
}

// ============================================================================
// SVG document
// ============================================================================

#[test]
fn rendered_document_structure() {
    let chart = sample_chart();
    let svg = chart.render().render();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="1100" height="650""#));
    assert!(svg.contains(r#"id="title""#));
    assert!(svg.contains("1758 - 1771: base temperature 8.66℃"));
    for id in ["x-axis", "y-axis", "legend", "legend-axis"] {
        assert!(svg.contains(&format!(r#"<g id="{id}""#)), "missing group {id}");
    }
    assert_eq!(svg.matches(r#"class="cell""#).count(), 168);
    assert!(svg.contains("<title>Year: 1758\nMonth: January\nTemp: 1.68℃</title>"));
    assert!(!svg.contains(r#"id="tooltip""#));
}

#[test]
fn rendered_document_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heatmap.svg");

    sample_chart().render().write_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.ends_with("</svg>\n"));
    assert_eq!(content.matches("<rect").count(), 1 + 168 + 4);
}

// ============================================================================
// Tooltip
// ============================================================================

#[test]
fn hover_unhover_sequence() {
    let chart = sample_chart();
    let cell = *chart.find_cell(1758, 1).unwrap();
    let mut tooltip = TooltipController::new(chart.config().tooltip);
    let ms = Duration::from_millis;

    tooltip.hover(&cell, chart.to_document(cell.rect.center()), ms(0));
    assert!(tooltip.state().visible);
    assert!(tooltip.state().content.contains("1758"));
    assert!(tooltip.state().content.contains("January"));
    assert!(tooltip.state().content.contains("1.68℃"));
    assert_relative_eq!(tooltip.opacity(ms(200)), 0.9);

    tooltip.unhover(ms(1000));
    assert_eq!(tooltip.tick(ms(1499)), TooltipPhase::Visible);
    assert_eq!(tooltip.tick(ms(1500)), TooltipPhase::Hidden);
}

#[test]
fn finished_fade_out_hides_tooltip_without_tick() {
    let chart = sample_chart();
    let cell = *chart.find_cell(1758, 1).unwrap();
    let mut tooltip = TooltipController::new(chart.config().tooltip);

    tooltip.hover(&cell, Point::new(100.0, 100.0), Duration::ZERO);
    tooltip.unhover(Duration::from_millis(300));

    let later = Duration::from_secs(60);
    assert!(!tooltip.state_at(later).visible);
    assert_eq!(tooltip.phase_at(later), TooltipPhase::Hidden);

    let encoder = chart.render_with_tooltip(&tooltip, later);
    assert!(encoder.find_group("tooltip").is_none());
    assert!(!encoder.render().contains(r#"id="tooltip""#));
}

#[test]
fn oversized_legend_tick_count_is_an_error() {
    let err = ChartConfig::parse("legend:\n  tick_count: 100000000000\n").unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid { .. }), "{err}");
}

#[test]
fn render_with_tooltip_overlays_frame() {
    let chart = sample_chart();
    let cell = *chart.find_cell(1765, 7).unwrap();
    let mut tooltip = TooltipController::default();
    tooltip.hover(&cell, Point::new(300.0, 300.0), Duration::ZERO);

    let encoder = chart.render_with_tooltip(&tooltip, Duration::from_millis(200));
    let group = encoder.find_group("tooltip").unwrap();

    assert_eq!(group.get_attr("data-year"), Some("1765"));
    assert!(matches!(encoder.elements().last(), Some(SvgElement::Group(g)) if g == group));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn yaml_config_resizes_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "width: 1400\nheight: 600\nmargin:\n  left: 100\n").unwrap();

    let config = ChartConfig::load(&path).unwrap();
    let dataset = Dataset::from_file(fixture_path()).unwrap();
    let chart = HeatmapChart::new(dataset, &config).unwrap();

    assert_relative_eq!(chart.scales().years.bandwidth(), 100.0);
    assert_relative_eq!(chart.scales().months.bandwidth(), 50.0);
    assert!(chart.render().render().contains(r#"<g transform="translate(100,50)">"#));
}
