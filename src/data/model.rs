use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::error::DataError;
use super::filter::DateRange;
use super::timestamp;

// ---------------------------------------------------------------------------
// OrderRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single order line item. One `order_id` may span several rows.
///
/// Blank cells in the optional columns are kept as `None` and are skipped by
/// group keys, sums and means downstream. Blank ids stay as empty strings and
/// are never counted as a distinct order or customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    #[serde(default)]
    pub customer_state: Option<String>,
    #[serde(default)]
    pub customer_city: Option<String>,
    #[serde(default)]
    pub product_category_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub review_score: Option<u8>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub order_delivered_customer_date: Option<NaiveDateTime>,
}

impl OrderRecord {
    /// Calendar day the customer received the order, if delivered.
    pub fn delivery_day(&self) -> Option<NaiveDate> {
        self.order_delivered_customer_date.map(|ts| ts.date())
    }
}

/// Review scores arrive as `5`, `5.0` or `"5"` depending on the writer.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreCell {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<ScoreCell> = Option::deserialize(deserializer)?;
    let score = match cell {
        None => return Ok(None),
        Some(ScoreCell::Int(i)) => u8::try_from(i).map_err(|_| DataError::InvalidScore {
            value: i.to_string(),
        }),
        Some(ScoreCell::Float(f)) => score_from_f64(f),
        Some(ScoreCell::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map_err(|_| DataError::InvalidScore {
                    value: text.to_string(),
                })
                .and_then(score_from_f64)
        }
    };
    score.map(Some).map_err(serde::de::Error::custom)
}

/// Narrow a numeric cell to an ordinal score; fractional values are rejected.
pub fn score_from_f64(value: f64) -> Result<u8, DataError> {
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DataError::InvalidScore {
            value: value.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// OrderDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All order rows, sorted ascending by customer delivery time, with the
/// delivered date span pre-computed. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct OrderDataset {
    orders: Vec<OrderRecord>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl OrderDataset {
    /// Sort rows by delivery time (undelivered rows last) and compute the
    /// global date span.
    pub fn from_orders(mut orders: Vec<OrderRecord>) -> Result<Self, DataError> {
        orders.sort_by(|a, b| {
            match (a.order_delivered_customer_date, b.order_delivered_customer_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });

        let min_date = orders
            .iter()
            .find_map(OrderRecord::delivery_day)
            .ok_or(DataError::NoDeliveryDates)?;
        let max_date = orders
            .iter()
            .rev()
            .find_map(OrderRecord::delivery_day)
            .ok_or(DataError::NoDeliveryDates)?;

        Ok(OrderDataset {
            orders,
            min_date,
            max_date,
        })
    }

    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// The default picker selection: every delivered day.
    pub fn full_range(&self) -> DateRange {
        DateRange::new(self.min_date, self.max_date)
    }

    /// Number of rows (line items, not distinct orders).
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::order;

    #[test]
    fn sorts_by_delivery_and_tracks_span() {
        let mut undelivered = order("o4", "toys", 5.0, 3, "2018-01-01 00:00:00");
        undelivered.order_delivered_customer_date = None;

        let dataset = OrderDataset::from_orders(vec![
            order("o1", "toys", 10.0, 4, "2018-03-05 10:00:00"),
            undelivered,
            order("o2", "toys", 20.0, 5, "2017-11-20 08:30:00"),
            order("o3", "toys", 30.0, 3, "2018-01-15 23:59:59"),
        ])
        .unwrap();

        let ids: Vec<&str> = dataset.orders().iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, ["o2", "o3", "o1", "o4"]);
        assert_eq!(dataset.min_date(), NaiveDate::from_ymd_opt(2017, 11, 20).unwrap());
        assert_eq!(dataset.max_date(), NaiveDate::from_ymd_opt(2018, 3, 5).unwrap());
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn rejects_dataset_without_deliveries() {
        let mut row = order("o1", "toys", 10.0, 4, "2018-03-05 10:00:00");
        row.order_delivered_customer_date = None;
        assert_eq!(
            OrderDataset::from_orders(vec![row]).unwrap_err(),
            DataError::NoDeliveryDates
        );
        assert_eq!(
            OrderDataset::from_orders(Vec::new()).unwrap_err(),
            DataError::NoDeliveryDates
        );
    }

    #[test]
    fn score_narrowing() {
        assert_eq!(score_from_f64(5.0), Ok(5));
        assert!(score_from_f64(4.5).is_err());
        assert!(score_from_f64(-1.0).is_err());
    }

    #[test]
    fn deserializes_json_record_with_gaps() {
        let json = r#"{
            "order_id": "a1",
            "customer_id": "c1",
            "customer_state": null,
            "price": 12.5,
            "review_score": 4.0,
            "order_delivered_customer_date": "2018-02-01 12:00:00"
        }"#;
        let record: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.review_score, Some(4));
        assert_eq!(record.customer_state, None);
        assert_eq!(record.payment_type, None);
        assert_eq!(record.order_delivered_carrier_date, None);
        assert_eq!(
            record.delivery_day(),
            NaiveDate::from_ymd_opt(2018, 2, 1)
        );
    }
}
