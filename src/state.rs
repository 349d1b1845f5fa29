use std::sync::Arc;

use chrono::NaiveDate;
use olist_dashboard::config::DashboardConfig;
use olist_dashboard::data::filter::DateRange;
use olist_dashboard::data::model::OrderDataset;
use olist_dashboard::report::{self, RenderedOutputs};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Outputs are only recomputed when the range or dataset changes; each
/// change reruns the whole report.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset, shared read-only.
    pub dataset: Arc<OrderDataset>,

    /// Active delivery date range.
    pub range: DateRange,

    /// Report for `range` (recomputed on every change).
    pub outputs: RenderedOutputs,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, dataset: OrderDataset) -> Self {
        let range = dataset.full_range();
        let outputs = report::render(&dataset, range, &config);
        Self {
            config,
            dataset: Arc::new(dataset),
            range,
            outputs,
            status_message: None,
        }
    }

    /// Swap in a newly loaded dataset and reset the range to its full span.
    pub fn set_dataset(&mut self, dataset: OrderDataset) {
        self.range = dataset.full_range();
        self.dataset = Arc::new(dataset);
        self.status_message = None;
        self.rerender();
    }

    /// Apply a picker selection, pinned to the dataset's delivered span.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let range = DateRange::clamped(
            start,
            end,
            self.dataset.min_date(),
            self.dataset.max_date(),
        );
        if range != self.range {
            self.range = range;
            self.rerender();
        }
    }

    pub fn reset_range(&mut self) {
        self.set_range(self.dataset.min_date(), self.dataset.max_date());
    }

    fn rerender(&mut self) {
        self.outputs = report::render(&self.dataset, self.range, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use olist_dashboard::data::model::OrderRecord;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(order_id: &str, category: &str, delivered: &str) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            customer_id: format!("cust-{order_id}"),
            customer_state: Some("SP".to_string()),
            customer_city: Some("sao paulo".to_string()),
            product_category_name: Some(category.to_string()),
            price: Some(10.0),
            review_score: Some(5),
            payment_type: Some("credit_card".to_string()),
            order_delivered_carrier_date: None,
            order_delivered_customer_date: Some(
                NaiveDateTime::parse_from_str(delivered, "%Y-%m-%d %H:%M:%S").unwrap(),
            ),
        }
    }

    fn dataset() -> OrderDataset {
        OrderDataset::from_orders(vec![
            order("o1", "toys", "2018-01-01 09:00:00"),
            order("o2", "books", "2018-01-03 12:00:00"),
            order("o3", "toys", "2018-01-05 23:59:59"),
        ])
        .unwrap()
    }

    #[test]
    fn starts_on_the_full_span() {
        let state = AppState::new(DashboardConfig::default(), dataset());
        assert_eq!(state.range, DateRange::new(day(2018, 1, 1), day(2018, 1, 5)));
        assert_eq!(state.outputs.range, state.range);
        assert_eq!(state.outputs.order_rows, 3);
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn set_range_rerenders_every_output() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        state.set_range(day(2018, 1, 3), day(2018, 1, 5));

        let expected = report::render(&state.dataset, state.range, &state.config);
        assert_eq!(state.range, DateRange::new(day(2018, 1, 3), day(2018, 1, 5)));
        assert_eq!(state.outputs, expected);
        assert_eq!(state.outputs.order_rows, 2);
    }

    #[test]
    fn set_range_clamps_into_the_dataset_span() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        state.set_range(day(2018, 1, 2), day(2018, 1, 2));
        state.set_range(day(2017, 6, 1), day(2019, 6, 1));

        assert_eq!(state.range, DateRange::new(day(2018, 1, 1), day(2018, 1, 5)));
        assert_eq!(state.outputs.range, state.range);
        assert_eq!(state.outputs.order_rows, 3);
    }

    #[test]
    fn unchanged_range_keeps_outputs() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        let before = state.outputs.clone();
        state.set_range(day(2000, 1, 1), day(2018, 1, 5));
        assert_eq!(state.outputs, before);
    }

    #[test]
    fn inverted_range_renders_empty() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        state.set_range(day(2018, 1, 4), day(2018, 1, 2));

        assert!(state.range.is_inverted());
        assert_eq!(state.outputs.order_rows, 0);
        assert!(state.outputs.products.is_empty());
    }

    #[test]
    fn set_dataset_resets_range_and_status() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        state.set_range(day(2018, 1, 3), day(2018, 1, 3));
        state.status_message = Some("Error: bad file".to_string());

        let replacement = OrderDataset::from_orders(vec![
            order("n1", "garden", "2019-02-01 10:00:00"),
            order("n2", "garden", "2019-02-10 10:00:00"),
        ])
        .unwrap();
        state.set_dataset(replacement);

        assert_eq!(state.range, DateRange::new(day(2019, 2, 1), day(2019, 2, 10)));
        assert_eq!(state.status_message, None);
        assert_eq!(state.outputs.range, state.range);
        assert_eq!(state.outputs.order_rows, 2);
        assert_eq!(state.outputs.products.len(), 1);
        assert_eq!(state.outputs.products[0].category, "garden");
    }

    #[test]
    fn reset_range_restores_the_full_span() {
        let mut state = AppState::new(DashboardConfig::default(), dataset());
        state.set_range(day(2018, 1, 3), day(2018, 1, 3));
        state.reset_range();
        assert_eq!(state.range, DateRange::new(day(2018, 1, 1), day(2018, 1, 5)));
        assert_eq!(state.outputs.order_rows, 3);
    }
}
