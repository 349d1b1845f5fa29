use std::ops::RangeInclusive;

use eframe::egui::{self, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};
use olist_dashboard::color::BarPalette;
use olist_dashboard::report::charts::{ChartSpec, Orientation};

use crate::state::AppState;

const SMALL_CHART_HEIGHT: f32 = 240.0;
const WIDE_CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Dashboard page (central panel)
// ---------------------------------------------------------------------------

/// Render metrics and charts for the current report.
pub fn dashboard(ui: &mut Ui, state: &AppState, palette: &BarPalette) {
    let outputs = &state.outputs;
    let charts = &outputs.charts;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(&state.config.title).size(28.0).strong());
            ui.add_space(8.0);

            ui.heading("Products Performance");
            ui.columns(3, |cols: &mut [Ui]| {
                metric(&mut cols[0], "Average Quantity Sold", outputs.metrics.qty_sold_label());
                metric(&mut cols[1], "Average Revenue", outputs.metrics.revenue_label());
                metric(&mut cols[2], "Average Rating", outputs.metrics.rating_label());
            });
            ui.columns(3, |cols: &mut [Ui]| {
                bar_chart(&mut cols[0], &charts.by_quantity, palette, SMALL_CHART_HEIGHT);
                bar_chart(&mut cols[1], &charts.by_revenue, palette, SMALL_CHART_HEIGHT);
                bar_chart(&mut cols[2], &charts.by_rating, palette, SMALL_CHART_HEIGHT);
            });
            ui.separator();

            ui.heading("Customer Demography");
            ui.columns(2, |cols: &mut [Ui]| {
                bar_chart(&mut cols[0], &charts.by_state, palette, WIDE_CHART_HEIGHT);
                bar_chart(&mut cols[1], &charts.by_city, palette, WIDE_CHART_HEIGHT);
            });
            ui.separator();

            ui.heading("Customer Satisfaction");
            bar_chart(ui, &charts.satisfaction, palette, WIDE_CHART_HEIGHT);
            ui.separator();

            ui.heading("Most Used Payment Type");
            bar_chart(ui, &charts.payment, palette, WIDE_CHART_HEIGHT);

            ui.add_space(12.0);
            ui.label(RichText::new(&state.config.caption).small().weak());
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Draw one ranked chart. Bars sit at integer positions and the category
/// axis maps those positions back to labels.
pub fn bar_chart(ui: &mut Ui, chart: &ChartSpec, palette: &BarPalette, height: f32) {
    ui.label(RichText::new(&chart.title).strong());

    if chart.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No orders in the selected range").weak());
            });
        });
        return;
    }

    let n = chart.bars.len();
    let orientation = chart.orientation;

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Bar::new(position(i, n, orientation), bar.value)
                .name(&bar.label)
                .width(0.7)
                .fill(palette.fill(bar.highlighted))
                .stroke(Stroke::new(1.0, palette.outline(bar.highlighted)))
        })
        .collect();

    let mut series = BarChart::new(bars);
    if orientation == Orientation::Horizontal {
        series = series.horizontal();
    }

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let category_axis = move |mark: GridMark, _range: &RangeInclusive<f64>| {
        category_label(&labels, mark.value, orientation)
    };

    let plot = Plot::new(&chart.title)
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false);
    let plot = match orientation {
        Orientation::Vertical => plot.x_axis_formatter(category_axis).include_y(0.0),
        Orientation::Horizontal => plot.y_axis_formatter(category_axis).include_x(0.0),
    };

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(series);
    });
}

/// Axis position of the `i`-th bar. Horizontal charts put the leader on top.
fn position(i: usize, n: usize, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Vertical => i as f64,
        Orientation::Horizontal => (n - 1 - i) as f64,
    }
}

fn category_label(labels: &[String], value: f64, orientation: Orientation) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    let n = labels.len();
    let slot = rounded as usize;
    if slot >= n {
        return String::new();
    }
    let index = match orientation {
        Orientation::Vertical => slot,
        Orientation::Horizontal => n - 1 - slot,
    };
    labels[index].clone()
}
