use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::OrderRecord;

// ---------------------------------------------------------------------------
// Aggregate rows
// ---------------------------------------------------------------------------

/// Sales figures for one product category.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPerformance {
    pub category: String,
    /// Distinct orders containing the category, not line items.
    pub qty_sold: usize,
    pub revenue: f64,
    /// `None` when no line item in the category carries a review score.
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCount {
    pub payment_type: String,
    pub counts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCount {
    pub review_score: u8,
    pub counts: usize,
}

/// Distinct customers in one state or city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerCount {
    pub location: String,
    pub customer_count: usize,
}

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Blank ids are missing values: they never count as a distinct id.
fn present_id(id: &str) -> Option<&str> {
    (!id.trim().is_empty()).then_some(id)
}

/// Group by `key`, counting distinct `value`s per group. Rows with no key
/// are dropped; a row with a key but a blank value still opens its group.
/// Groups come back in ascending key order.
fn count_distinct<'a, K, FK, FV>(orders: &[&'a OrderRecord], key: FK, value: FV) -> BTreeMap<K, usize>
where
    K: Ord,
    FK: Fn(&'a OrderRecord) -> Option<K>,
    FV: Fn(&'a OrderRecord) -> &'a str,
{
    let mut groups: BTreeMap<K, BTreeSet<&'a str>> = BTreeMap::new();
    for &order in orders {
        if let Some(k) = key(order) {
            let distinct = groups.entry(k).or_default();
            if let Some(id) = present_id(value(order)) {
                distinct.insert(id);
            }
        }
    }
    groups
        .into_iter()
        .map(|(k, distinct)| (k, distinct.len()))
        .collect()
}

#[derive(Default)]
struct ProductAccumulator<'a> {
    order_ids: BTreeSet<&'a str>,
    revenue: f64,
    score_sum: f64,
    score_count: usize,
}

/// Per category: distinct orders, summed price and mean review score.
/// Missing prices and scores are skipped, like NaN in a dataframe.
pub fn product_performance(orders: &[&OrderRecord]) -> Vec<ProductPerformance> {
    let mut groups: BTreeMap<&str, ProductAccumulator> = BTreeMap::new();
    for &order in orders {
        let Some(category) = order.product_category_name.as_deref() else {
            continue;
        };
        let acc = groups.entry(category).or_default();
        if let Some(id) = present_id(&order.order_id) {
            acc.order_ids.insert(id);
        }
        acc.revenue += order.price.unwrap_or(0.0);
        if let Some(score) = order.review_score {
            acc.score_sum += f64::from(score);
            acc.score_count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(category, acc)| ProductPerformance {
            category: category.to_string(),
            qty_sold: acc.order_ids.len(),
            revenue: acc.revenue,
            average_score: (acc.score_count > 0).then(|| acc.score_sum / acc.score_count as f64),
        })
        .collect()
}

/// Distinct orders per payment type, most used first (ties by name).
pub fn payment_mix(orders: &[&OrderRecord]) -> Vec<PaymentCount> {
    let mut rows: Vec<PaymentCount> = count_distinct(
        orders,
        |o| o.payment_type.as_deref(),
        |o| o.order_id.as_str(),
    )
    .into_iter()
    .map(|(payment_type, counts)| PaymentCount {
        payment_type: payment_type.to_string(),
        counts,
    })
    .collect();
    // Stable: equal counts keep ascending name order.
    rows.sort_by(|a, b| b.counts.cmp(&a.counts));
    rows
}

/// Distinct orders per review score, ascending by score.
pub fn satisfaction_histogram(orders: &[&OrderRecord]) -> Vec<ScoreCount> {
    count_distinct(orders, |o| o.review_score, |o| o.order_id.as_str())
        .into_iter()
        .map(|(review_score, counts)| ScoreCount {
            review_score,
            counts,
        })
        .collect()
}

pub fn state_demographics(orders: &[&OrderRecord]) -> Vec<CustomerCount> {
    customers_by(orders, |o| o.customer_state.as_deref())
}

pub fn city_demographics(orders: &[&OrderRecord]) -> Vec<CustomerCount> {
    customers_by(orders, |o| o.customer_city.as_deref())
}

fn customers_by<'a, F>(orders: &[&'a OrderRecord], location: F) -> Vec<CustomerCount>
where
    F: Fn(&'a OrderRecord) -> Option<&'a str>,
{
    count_distinct(orders, location, |o| o.customer_id.as_str())
        .into_iter()
        .map(|(location, customer_count)| CustomerCount {
            location: location.to_string(),
            customer_count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort descending by `metric` and keep the first `n` rows.
///
/// The sort is stable, so rows that tie keep their incoming (key) order.
/// Rows whose metric is `None` go last.
pub fn ranked<T, F>(rows: &[T], metric: F, n: usize) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<f64>,
{
    let mut sorted: Vec<T> = rows.to_vec();
    sorted.sort_by(|a, b| match (metric(a), metric(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted.truncate(n);
    sorted
}
