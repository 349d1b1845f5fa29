use super::aggregate::{CustomerCount, PaymentCount, ProductPerformance, ScoreCount, ranked};
use crate::config::DashboardConfig;

/// Which axis the bars grow along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories on the x axis.
    Vertical,
    /// Categories on the y axis, leader at the top.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub highlighted: bool,
}

/// A ranked bar chart ready to draw. Bars are in display order, leader first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub orientation: Orientation,
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    /// Build a chart from already ranked `(label, value)` pairs; only the
    /// first bar is highlighted.
    pub fn ranked<I>(title: &str, orientation: Orientation, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let bars = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (label, value))| Bar {
                label,
                value,
                highlighted: i == 0,
            })
            .collect();
        ChartSpec {
            title: title.to_string(),
            orientation,
            bars,
        }
    }

    pub fn leader(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Every chart on the dashboard, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    pub by_quantity: ChartSpec,
    pub by_revenue: ChartSpec,
    pub by_rating: ChartSpec,
    pub by_state: ChartSpec,
    pub by_city: ChartSpec,
    pub satisfaction: ChartSpec,
    pub payment: ChartSpec,
}

impl DashboardCharts {
    pub fn iter(&self) -> impl Iterator<Item = &ChartSpec> {
        [
            &self.by_quantity,
            &self.by_revenue,
            &self.by_rating,
            &self.by_state,
            &self.by_city,
            &self.satisfaction,
            &self.payment,
        ]
        .into_iter()
    }
}

pub fn build_charts(
    products: &[ProductPerformance],
    payments: &[PaymentCount],
    satisfaction: &[ScoreCount],
    states: &[CustomerCount],
    cities: &[CustomerCount],
    config: &DashboardConfig,
) -> DashboardCharts {
    let top_products = |metric: fn(&ProductPerformance) -> Option<f64>| {
        ranked(products, metric, config.product_top_n)
            .into_iter()
            .filter_map(move |p| metric(&p).map(|v| (p.category, v)))
    };
    let top_locations = |rows: &[CustomerCount]| {
        ranked(rows, |c| Some(c.customer_count as f64), config.demographic_top_n)
            .into_iter()
            .map(|c| (c.location, c.customer_count as f64))
    };

    DashboardCharts {
        by_quantity: ChartSpec::ranked(
            "By Quantity Sold",
            Orientation::Vertical,
            top_products(|p| Some(p.qty_sold as f64)),
        ),
        by_revenue: ChartSpec::ranked(
            "By Revenue",
            Orientation::Vertical,
            top_products(|p| Some(p.revenue)),
        ),
        by_rating: ChartSpec::ranked(
            "By Rating",
            Orientation::Vertical,
            top_products(|p| p.average_score),
        ),
        by_state: ChartSpec::ranked(
            "Customer Demographics by State",
            Orientation::Horizontal,
            top_locations(states),
        ),
        by_city: ChartSpec::ranked(
            "Customer Demographics by City",
            Orientation::Horizontal,
            top_locations(cities),
        ),
        satisfaction: ChartSpec::ranked(
            "Customer Satisfaction Rating Overall",
            Orientation::Vertical,
            ranked(satisfaction, |s| Some(s.counts as f64), satisfaction.len())
                .into_iter()
                .map(|s| (s.review_score.to_string(), s.counts as f64)),
        ),
        // Already ordered by the aggregator.
        payment: ChartSpec::ranked(
            "Most Used Payment Type",
            Orientation::Horizontal,
            payments
                .iter()
                .map(|p| (p.payment_type.clone(), p.counts as f64)),
        ),
    }
}
