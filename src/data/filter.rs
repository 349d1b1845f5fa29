use chrono::NaiveDate;

use super::model::{OrderDataset, OrderRecord};

// ---------------------------------------------------------------------------
// Date range predicate
// ---------------------------------------------------------------------------

/// Inclusive calendar-day range applied to the customer delivery date.
///
/// `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Every delivered day of the dataset.
    pub fn full(dataset: &OrderDataset) -> Self {
        dataset.full_range()
    }

    /// Pin both ends into `[min, max]`, the bounds the date picker enforces.
    /// The relative order of `start` and `end` is preserved.
    pub fn clamped(start: NaiveDate, end: NaiveDate, min: NaiveDate, max: NaiveDate) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        DateRange {
            start: start.clamp(lo, hi),
            end: end.clamp(lo, hi),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Whether a calendar day lies in the range, both ends included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

// ---------------------------------------------------------------------------
// Filtered subset
// ---------------------------------------------------------------------------

/// Borrowed view of the rows that passed the date filter, in source order.
pub type FilteredOrders<'a> = Vec<&'a OrderRecord>;

/// Return the rows whose customer delivery day falls inside `range`.
///
/// Rows without a delivery date never match. Accepts either the full dataset
/// (`dataset.orders()`) or an existing subset (`subset.iter().copied()`), so
/// re-filtering with the same range returns the same rows.
pub fn filter_by_delivery<'a, I>(orders: I, range: &DateRange) -> FilteredOrders<'a>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    if range.is_inverted() {
        return Vec::new();
    }
    orders
        .into_iter()
        .filter(|order| order.delivery_day().is_some_and(|day| range.contains(day)))
        .collect()
}
