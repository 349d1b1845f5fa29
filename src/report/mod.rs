/// Reporting pipeline: filter → aggregate → metrics → charts.
///
/// ```text
///   OrderDataset ──filter(range)──▶ subset
///                                     │
///        ┌──────────┬──────────┬──────┴─────┬───────────┐
///        ▼          ▼          ▼            ▼           ▼
///    products   payments  satisfaction   states      cities
///        │          │          │            │           │
///        └──────────┴──────────┴─────┬──────┴───────────┘
///                                    ▼
///                          metrics + chart specs
/// ```
///
/// Every call recomputes everything from the dataset; nothing is cached
/// between calls.

pub mod aggregate;
pub mod charts;
pub mod metrics;

use crate::config::DashboardConfig;
use crate::data::filter::{DateRange, filter_by_delivery};
use crate::data::model::OrderDataset;

use aggregate::{CustomerCount, PaymentCount, ProductPerformance, ScoreCount};
use charts::DashboardCharts;
use metrics::HeadlineMetrics;

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutputs {
    pub range: DateRange,
    /// Line items in the filtered subset.
    pub order_rows: usize,
    pub metrics: HeadlineMetrics,
    pub products: Vec<ProductPerformance>,
    pub payments: Vec<PaymentCount>,
    pub satisfaction: Vec<ScoreCount>,
    pub states: Vec<CustomerCount>,
    pub cities: Vec<CustomerCount>,
    pub charts: DashboardCharts,
}

/// Run the whole report for `range` against an immutable dataset.
pub fn render(dataset: &OrderDataset, range: DateRange, config: &DashboardConfig) -> RenderedOutputs {
    let subset = filter_by_delivery(dataset.orders(), &range);

    let products = aggregate::product_performance(&subset);
    let payments = aggregate::payment_mix(&subset);
    let satisfaction = aggregate::satisfaction_histogram(&subset);
    let states = aggregate::state_demographics(&subset);
    let cities = aggregate::city_demographics(&subset);

    let metrics = HeadlineMetrics::from_products(&products);
    let charts = charts::build_charts(&products, &payments, &satisfaction, &states, &cities, config);

    log::debug!(
        "Rendered {} to {}: {} rows, {} categories, {} payment types",
        range.start,
        range.end,
        subset.len(),
        products.len(),
        payments.len()
    );

    RenderedOutputs {
        range,
        order_rows: subset.len(),
        metrics,
        products,
        payments,
        satisfaction,
        states,
        cities,
        charts,
    }
}
