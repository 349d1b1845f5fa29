//! Write a deterministic synthetic order export (`all_dataset.csv` and
//! `all_dataset.parquet`) with the columns the dashboard reads.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use parquet::arrow::ArrowWriter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CATEGORIES: [(&str, f64, f64); 10] = [
    ("bed_bath_table", 20.0, 180.0),
    ("health_beauty", 10.0, 250.0),
    ("sports_leisure", 15.0, 300.0),
    ("furniture_decor", 30.0, 400.0),
    ("computers_accessories", 25.0, 900.0),
    ("housewares", 8.0, 150.0),
    ("watches_gifts", 40.0, 600.0),
    ("telephony", 12.0, 700.0),
    ("toys", 10.0, 200.0),
    ("auto", 20.0, 350.0),
];

const LOCATIONS: [(&str, &str, f64); 10] = [
    ("SP", "sao paulo", 0.22),
    ("SP", "campinas", 0.08),
    ("RJ", "rio de janeiro", 0.15),
    ("MG", "belo horizonte", 0.12),
    ("RS", "porto alegre", 0.09),
    ("PR", "curitiba", 0.08),
    ("BA", "salvador", 0.07),
    ("SC", "florianopolis", 0.07),
    ("DF", "brasilia", 0.07),
    ("GO", "goiania", 0.05),
];

const PAYMENTS: [(&str, f64); 4] = [
    ("credit_card", 0.74),
    ("boleto", 0.19),
    ("voucher", 0.05),
    ("debit_card", 0.02),
];

const SCORES: [(i64, f64); 5] = [(5, 0.58), (4, 0.19), (3, 0.08), (2, 0.03), (1, 0.12)];

const ORDERS: usize = 3000;
const CUSTOMERS: usize = 1800;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    /// Index into `weights` drawn proportionally to the weights.
    fn weighted(&mut self, weights: impl Iterator<Item = f64> + Clone) -> usize {
        let total: f64 = weights.clone().sum();
        let mut target = self.next_f64() * total;
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            if target < w {
                return i;
            }
            target -= w;
            last = i;
        }
        last
    }
}

/// One generated line item.
struct SampleRow {
    order_id: String,
    customer_id: String,
    state: &'static str,
    city: &'static str,
    category: Option<&'static str>,
    price: f64,
    review_score: i64,
    payment_type: &'static str,
    carrier_date: Option<NaiveDateTime>,
    delivered_date: Option<NaiveDateTime>,
}

fn random_time(rng: &mut SimpleRng) -> Result<NaiveTime> {
    let secs = rng.range(0, 86_399) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).context("time of day out of range")
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<SampleRow>> {
    let first_day = NaiveDate::from_ymd_opt(2017, 1, 5).context("invalid start date")?;

    // Each customer lives in one place for the whole export.
    let homes: Vec<usize> = (0..CUSTOMERS)
        .map(|_| rng.weighted(LOCATIONS.iter().map(|l| l.2)))
        .collect();

    let mut rows = Vec::new();
    for order_no in 0..ORDERS {
        let customer = rng.range(0, CUSTOMERS as u64 - 1) as usize;
        let (state, city, _) = LOCATIONS[homes[customer]];
        let payment_type = PAYMENTS[rng.weighted(PAYMENTS.iter().map(|p| p.1))].0;
        let review_score = SCORES[rng.weighted(SCORES.iter().map(|s| s.1))].0;

        let purchase = first_day
            .checked_add_days(Days::new(rng.range(0, 600)))
            .context("purchase date overflow")?;
        let carrier_day = purchase
            .checked_add_days(Days::new(rng.range(1, 4)))
            .context("carrier date overflow")?;
        let delivered_day = carrier_day
            .checked_add_days(Days::new(rng.range(2, 20)))
            .context("delivery date overflow")?;

        // A few orders are still in transit.
        let delivered = rng.next_f64() >= 0.03;
        let carrier_date = Some(carrier_day.and_time(random_time(rng)?));
        let delivered_date = if delivered {
            Some(delivered_day.and_time(random_time(rng)?))
        } else {
            None
        };

        let items = 1 + rng.weighted([0.85, 0.11, 0.04].into_iter());
        let (category, lo, hi) = CATEGORIES[rng.range(0, CATEGORIES.len() as u64 - 1) as usize];
        let price = ((lo + rng.next_f64() * (hi - lo)) * 100.0).round() / 100.0;
        // Uncategorised products exist in the real export too.
        let category = (rng.next_f64() >= 0.01).then_some(category);

        for _ in 0..items {
            rows.push(SampleRow {
                order_id: format!("ord{order_no:06}"),
                customer_id: format!("cust{customer:05}"),
                state,
                city,
                category,
                price,
                review_score,
                payment_type,
                carrier_date,
                delivered_date,
            });
        }
    }
    Ok(rows)
}

const HEADER: [&str; 10] = [
    "order_id",
    "customer_id",
    "customer_state",
    "customer_city",
    "product_category_name",
    "price",
    "review_score",
    "payment_type",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
];

fn format_ts(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([
            row.order_id.clone(),
            row.customer_id.clone(),
            row.state.to_string(),
            row.city.to_string(),
            row.category.unwrap_or_default().to_string(),
            format!("{:.2}", row.price),
            row.review_score.to_string(),
            row.payment_type.to_string(),
            format_ts(row.carrier_date),
            format_ts(row.delivered_date),
        ])?;
    }
    writer.flush().with_context(|| format!("flushing {path}"))?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let text = |f: &dyn Fn(&SampleRow) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<ArrayRef> = vec![
        text(&|r| Some(r.order_id.clone())),
        text(&|r| Some(r.customer_id.clone())),
        text(&|r| Some(r.state.to_string())),
        text(&|r| Some(r.city.to_string())),
        text(&|r| r.category.map(str::to_string)),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.price).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.review_score).collect::<Vec<_>>())),
        text(&|r| Some(r.payment_type.to_string())),
        text(&|r| r.carrier_date.map(|t| t.format(TIMESTAMP_FORMAT).to_string())),
        text(&|r| r.delivered_date.map(|t| t.format(TIMESTAMP_FORMAT).to_string())),
    ];

    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .map(|&name| match name {
                "price" => Field::new(name, DataType::Float64, false),
                "review_score" => Field::new(name, DataType::Int64, false),
                _ => Field::new(name, DataType::Utf8, true),
            })
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng)?;

    write_csv(&rows, "all_dataset.csv")?;
    write_parquet(&rows, "all_dataset.parquet")?;

    log::info!("Wrote {} line items for {ORDERS} orders", rows.len());
    println!(
        "Wrote {} line items ({ORDERS} orders, {CUSTOMERS} customers) to all_dataset.csv and all_dataset.parquet",
        rows.len()
    );
    Ok(())
}
