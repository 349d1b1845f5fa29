use super::aggregate::ProductPerformance;

/// Shown in place of a metric that has no value (empty selection).
pub const PLACEHOLDER: &str = "–";

pub const QTY_DECIMALS: usize = 1;
pub const REVENUE_DECIMALS: usize = 2;
pub const RATING_DECIMALS: usize = 3;

/// Headline numbers over the whole product performance table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadlineMetrics {
    pub avg_qty_sold: Option<f64>,
    pub avg_revenue: Option<f64>,
    pub avg_rating: Option<f64>,
}

impl HeadlineMetrics {
    pub fn from_products(products: &[ProductPerformance]) -> Self {
        HeadlineMetrics {
            avg_qty_sold: mean(products.iter().map(|p| p.qty_sold as f64))
                .map(|v| round_to(v, QTY_DECIMALS)),
            avg_revenue: mean(products.iter().map(|p| p.revenue))
                .map(|v| round_to(v, REVENUE_DECIMALS)),
            // Categories without any score do not count towards the mean.
            avg_rating: mean(products.iter().filter_map(|p| p.average_score))
                .map(|v| round_to(v, RATING_DECIMALS)),
        }
    }

    pub fn qty_sold_label(&self) -> String {
        format_metric(self.avg_qty_sold, QTY_DECIMALS)
    }

    pub fn revenue_label(&self) -> String {
        format_metric(self.avg_revenue, REVENUE_DECIMALS)
    }

    pub fn rating_label(&self) -> String {
        format_metric(self.avg_rating, RATING_DECIMALS)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: &str, qty_sold: usize, revenue: f64, score: Option<f64>) -> ProductPerformance {
        ProductPerformance {
            category: category.to_string(),
            qty_sold,
            revenue,
            average_score: score,
        }
    }

    #[test]
    fn means_are_rounded_per_metric() {
        let products = vec![
            product("a", 1, 10.005, Some(4.0)),
            product("b", 2, 20.0, Some(4.5)),
            product("c", 2, 30.0, Some(3.3333)),
        ];
        let metrics = HeadlineMetrics::from_products(&products);
        assert_eq!(metrics.avg_qty_sold, Some(1.7));
        assert_eq!(metrics.avg_revenue, Some(20.0));
        assert_eq!(metrics.avg_rating, Some(3.944));
        assert_eq!(metrics.qty_sold_label(), "1.7");
        assert_eq!(metrics.revenue_label(), "20.00");
        assert_eq!(metrics.rating_label(), "3.944");
    }

    #[test]
    fn unscored_categories_are_excluded_from_rating() {
        let products = vec![product("a", 1, 1.0, Some(5.0)), product("b", 1, 1.0, None)];
        let metrics = HeadlineMetrics::from_products(&products);
        assert_eq!(metrics.avg_rating, Some(5.0));
        assert_eq!(metrics.avg_qty_sold, Some(1.0));
    }

    #[test]
    fn empty_table_shows_placeholders() {
        let metrics = HeadlineMetrics::from_products(&[]);
        assert_eq!(metrics, HeadlineMetrics::default());
        assert_eq!(metrics.qty_sold_label(), PLACEHOLDER);
        assert_eq!(metrics.revenue_label(), PLACEHOLDER);
        assert_eq!(metrics.rating_label(), PLACEHOLDER);
    }
}
