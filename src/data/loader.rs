use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{OrderDataset, OrderRecord, score_from_f64};
use super::timestamp::parse_timestamp;

/// Columns every source format must provide.
const REQUIRED_COLUMNS: [&str; 3] = ["order_id", "customer_id", "order_delivered_customer_date"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an order dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited with a header row (the default export)
/// * `.json`    – `[{ "order_id": ..., "price": ..., ... }, ...]`
/// * `.parquet` – one column per field; dates as text or native timestamps
pub fn load_file(path: &Path) -> Result<OrderDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let orders = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = OrderDataset::from_orders(orders)
        .with_context(|| format!("indexing {}", path.display()))?;
    log::info!(
        "Loaded {} order rows from {} (deliveries {} to {})",
        dataset.len(),
        path.display(),
        dataset.min_date(),
        dataset.max_date()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; columns the dashboard does not use are
/// ignored. Blank cells become `None`.
fn load_csv(path: &Path) -> Result<Vec<OrderRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn {
                column: column.to_string(),
            })
            .context("CSV header");
        }
    }

    reader
        .deserialize::<OrderRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented layout (the default `df.to_json(orient='records')`).
/// Timestamps may be text or epoch milliseconds, pandas' default for
/// datetime columns:
///
/// ```json
/// [
///   {
///     "order_id": "e481f51c...",
///     "customer_id": "9ef432eb...",
///     "price": 29.99,
///     "review_score": 4,
///     "order_delivered_customer_date": 1507670713000
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<OrderRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let JsonValue::Array(records) = root else {
        bail!("Expected top-level JSON array");
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            serde_json::from_value::<OrderRecord>(rec)
                .with_context(|| format!("JSON row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per order field.
///
/// Text columns may be `Utf8` or `LargeUtf8`; `price` and `review_score`
/// may be any integer or float width; the two delivery columns may be text
/// or a native `Timestamp` / `Date32`. Optional columns may be absent.
fn load_parquet(path: &Path) -> Result<Vec<OrderRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut orders = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = OrderColumns::locate(&batch)?;

        for row in 0..batch.num_rows() {
            let record = columns
                .record(row)
                .with_context(|| format!("Parquet row {}", offset + row))?;
            orders.push(record);
        }
        offset += batch.num_rows();
    }

    Ok(orders)
}

/// The order fields of one record batch, resolved by column name.
struct OrderColumns {
    order_id: (String, ArrayRef),
    customer_id: (String, ArrayRef),
    customer_state: Option<(String, ArrayRef)>,
    customer_city: Option<(String, ArrayRef)>,
    product_category_name: Option<(String, ArrayRef)>,
    price: Option<(String, ArrayRef)>,
    review_score: Option<(String, ArrayRef)>,
    payment_type: Option<(String, ArrayRef)>,
    order_delivered_carrier_date: Option<(String, ArrayRef)>,
    order_delivered_customer_date: (String, ArrayRef),
}

impl OrderColumns {
    fn locate(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let optional = |name: &str| {
            schema
                .index_of(name)
                .ok()
                .map(|idx| (name.to_string(), batch.column(idx).clone()))
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(OrderColumns {
            order_id: required("order_id")?,
            customer_id: required("customer_id")?,
            customer_state: optional("customer_state"),
            customer_city: optional("customer_city"),
            product_category_name: optional("product_category_name"),
            price: optional("price"),
            review_score: optional("review_score"),
            payment_type: optional("payment_type"),
            order_delivered_carrier_date: optional("order_delivered_carrier_date"),
            order_delivered_customer_date: required("order_delivered_customer_date")?,
        })
    }

    fn record(&self, row: usize) -> Result<OrderRecord> {
        let opt_string = |col: &Option<(String, ArrayRef)>| match col {
            Some((name, array)) => string_at(name, array, row),
            None => Ok(None),
        };
        let opt_float = |col: &Option<(String, ArrayRef)>| match col {
            Some((name, array)) => float_at(name, array, row),
            None => Ok(None),
        };
        let opt_timestamp = |col: &Option<(String, ArrayRef)>| match col {
            Some((name, array)) => timestamp_at(name, array, row),
            None => Ok(None),
        };

        // Null ids read as blank, the same as an empty CSV cell.
        let (id_name, id_array) = &self.order_id;
        let order_id = string_at(id_name, id_array, row)?.unwrap_or_default();
        let (cust_name, cust_array) = &self.customer_id;
        let customer_id = string_at(cust_name, cust_array, row)?.unwrap_or_default();
        let (delivered_name, delivered_array) = &self.order_delivered_customer_date;

        Ok(OrderRecord {
            order_id,
            customer_id,
            customer_state: opt_string(&self.customer_state)?,
            customer_city: opt_string(&self.customer_city)?,
            product_category_name: opt_string(&self.product_category_name)?,
            price: opt_float(&self.price)?,
            review_score: opt_float(&self.review_score)?
                .map(score_from_f64)
                .transpose()?,
            payment_type: opt_string(&self.payment_type)?,
            order_delivered_carrier_date: opt_timestamp(&self.order_delivered_carrier_date)?,
            order_delivered_customer_date: timestamp_at(delivered_name, delivered_array, row)?,
        })
    }
}

// -- Parquet / Arrow helpers --

fn unsupported(name: &str, col: &ArrayRef) -> DataError {
    DataError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    }
}

/// Extract a text cell; empty strings are treated like nulls.
fn string_at(name: &str, col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row),
        _ => return Err(unsupported(name, col).into()),
    };
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Extract a numeric cell of any common width as `f64`.
fn float_at(name: &str, col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => f64::from(col.as_primitive::<Float32Type>().value(row)),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => f64::from(col.as_primitive::<Int32Type>().value(row)),
        _ => return Err(unsupported(name, col).into()),
    };
    Ok((!value.is_nan()).then_some(value))
}

/// Extract a timestamp cell stored as text, `Timestamp(_, _)` or `Date32`.
fn timestamp_at(name: &str, col: &ArrayRef, row: usize) -> Result<Option<NaiveDateTime>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let converted = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = string_at(name, col, row)?.unwrap_or_default();
            return Ok(parse_timestamp(&text)?);
        }
        DataType::Timestamp(TimeUnit::Second, _) => {
            col.as_primitive::<TimestampSecondType>().value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row)
        }
        DataType::Date32 => col.as_primitive::<Date32Type>().value_as_datetime(row),
        _ => return Err(unsupported(name, col).into()),
    };
    converted
        .map(Some)
        .with_context(|| format!("{name}: timestamp out of range"))
}
