//! End-to-end report tests: CSV on disk → loader → render.

use std::collections::BTreeSet;
use std::io::Write;

use chrono::NaiveDate;
use olist_dashboard::config::DashboardConfig;
use olist_dashboard::data::filter::{DateRange, filter_by_delivery};
use olist_dashboard::data::loader::load_file;
use olist_dashboard::data::model::OrderDataset;
use olist_dashboard::report::aggregate::PaymentCount;
use olist_dashboard::report::metrics::PLACEHOLDER;
use olist_dashboard::report::render;

const HEADER: &str = "order_id,customer_id,customer_state,customer_city,product_category_name,\
price,review_score,payment_type,order_delivered_carrier_date,order_delivered_customer_date";

/// Ten line items over eight orders, delivered between 2018-01-01 and 2018-01-10.
const ROWS: &str = "\
o1,c1,SP,sao paulo,toys,10.0,4,credit_card,2017-12-28 10:00:00,2018-01-01 09:00:00
o2,c2,SP,campinas,toys,20.0,5,credit_card,2017-12-29 10:00:00,2018-01-02 18:30:00
o3,c3,RJ,rio de janeiro,toys,30.0,3,voucher,2017-12-30 10:00:00,2018-01-03 12:00:00
o4,c1,SP,sao paulo,books,15.0,5,boleto,2018-01-01 10:00:00,2018-01-04 08:00:00
o4,c1,SP,sao paulo,books,15.0,5,boleto,2018-01-01 10:00:00,2018-01-04 08:00:00
o5,c4,MG,belo horizonte,books,25.0,1,credit_card,2018-01-02 10:00:00,2018-01-06 23:59:59
o6,c5,RJ,niteroi,auto,99.9,2,credit_card,2018-01-03 10:00:00,2018-01-08 07:15:00
o7,c6,SP,sao paulo,auto,120.0,4,debit_card,2018-01-04 10:00:00,2018-01-09 10:00:00
o8,c7,RS,porto alegre,housewares,8.5,5,credit_card,2018-01-05 10:00:00,2018-01-10 16:45:00
o8,c7,RS,porto alegre,toys,12.0,5,credit_card,2018-01-05 10:00:00,2018-01-10 16:45:00
";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load(rows: &str) -> OrderDataset {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{HEADER}\n{rows}").unwrap();
    file.flush().unwrap();
    load_file(file.path()).unwrap()
}

#[test]
fn full_range_covers_every_row() {
    let dataset = load(ROWS);
    let config = DashboardConfig::default();

    assert_eq!(dataset.min_date(), day(2018, 1, 1));
    assert_eq!(dataset.max_date(), day(2018, 1, 10));

    let out = render(&dataset, dataset.full_range(), &config);
    assert_eq!(out.order_rows, dataset.len());
    assert_eq!(out.order_rows, 10);

    let categories: BTreeSet<&str> = dataset
        .orders()
        .iter()
        .filter_map(|o| o.product_category_name.as_deref())
        .collect();
    assert!(out.products.len() <= categories.len());

    let toys = out.products.iter().find(|p| p.category == "toys").unwrap();
    assert_eq!(toys.qty_sold, 4);
    assert_eq!(toys.revenue, 72.0);

    // o4 appears twice but is one order.
    let books = out.products.iter().find(|p| p.category == "books").unwrap();
    assert_eq!(books.qty_sold, 2);
    assert_eq!(books.revenue, 55.0);
}

#[test]
fn toys_and_payment_examples() {
    let dataset = load(ROWS);
    let range = DateRange::new(day(2018, 1, 1), day(2018, 1, 3));
    let out = render(&dataset, range, &DashboardConfig::default());

    assert_eq!(out.order_rows, 3);
    assert_eq!(out.products.len(), 1);
    let toys = &out.products[0];
    assert_eq!(toys.category, "toys");
    assert_eq!(toys.qty_sold, 3);
    assert_eq!(toys.revenue, 60.0);
    assert_eq!(toys.average_score, Some(4.0));

    assert_eq!(
        out.payments,
        vec![
            PaymentCount {
                payment_type: "credit_card".to_string(),
                counts: 2
            },
            PaymentCount {
                payment_type: "voucher".to_string(),
                counts: 1
            },
        ]
    );

    assert_eq!(out.metrics.qty_sold_label(), "3.0");
    assert_eq!(out.metrics.revenue_label(), "60.00");
    assert_eq!(out.metrics.rating_label(), "4.000");
}

#[test]
fn payment_mix_is_sorted_descending() {
    let dataset = load(ROWS);
    let out = render(&dataset, dataset.full_range(), &DashboardConfig::default());

    assert!(out.payments.windows(2).all(|w| w[0].counts >= w[1].counts));
    assert_eq!(out.payments[0].payment_type, "credit_card");
    assert_eq!(out.payments[0].counts, 5);
    assert_eq!(out.charts.payment.leader().unwrap().label, "credit_card");
}

#[test]
fn inverted_range_renders_empty_report() {
    let dataset = load(ROWS);
    let range = DateRange::new(day(2018, 1, 9), day(2018, 1, 2));
    let out = render(&dataset, range, &DashboardConfig::default());

    assert_eq!(out.order_rows, 0);
    assert!(out.products.is_empty());
    assert!(out.payments.is_empty());
    assert!(out.satisfaction.is_empty());
    assert!(out.states.is_empty());
    assert!(out.cities.is_empty());
    assert!(out.charts.iter().all(|c| c.bars.is_empty()));
    assert_eq!(out.metrics.revenue_label(), PLACEHOLDER);
}

#[test]
fn filtering_twice_changes_nothing() {
    let dataset = load(ROWS);
    let range = DateRange::new(day(2018, 1, 4), day(2018, 1, 8));
    let once = filter_by_delivery(dataset.orders(), &range);
    let twice = filter_by_delivery(once.iter().copied(), &range);
    assert_eq!(once.len(), 4);
    assert_eq!(once, twice);
}

#[test]
fn demography_counts_customers_not_orders() {
    let dataset = load(ROWS);
    let out = render(&dataset, dataset.full_range(), &DashboardConfig::default());

    // c1 placed o1 and o4 in sao paulo; c6 placed o7 there.
    let sao_paulo = out.cities.iter().find(|c| c.location == "sao paulo").unwrap();
    assert_eq!(sao_paulo.customer_count, 2);

    let sp = out.states.iter().find(|s| s.location == "SP").unwrap();
    assert_eq!(sp.customer_count, 3);
    assert_eq!(out.charts.by_state.leader().unwrap().label, "SP");
}

#[test]
fn top_n_follows_config() {
    let dataset = load(ROWS);
    let config = DashboardConfig {
        product_top_n: 2,
        demographic_top_n: 3,
        ..DashboardConfig::default()
    };
    let out = render(&dataset, dataset.full_range(), &config);

    assert_eq!(out.charts.by_revenue.bars.len(), 2);
    assert_eq!(out.charts.by_revenue.bars[0].label, "auto");
    assert_eq!(out.charts.by_city.bars.len(), 3);
    assert_eq!(out.charts.satisfaction.bars.len(), out.satisfaction.len());
}

#[test]
fn undelivered_rows_are_never_in_range() {
    let rows = format!("{ROWS}o9,c8,BA,salvador,toys,5.0,3,boleto,2018-01-06 10:00:00,\n");
    let dataset = load(&rows);
    assert_eq!(dataset.len(), 11);

    let out = render(&dataset, dataset.full_range(), &DashboardConfig::default());
    assert_eq!(out.order_rows, 10);
    assert!(out.states.iter().all(|s| s.location != "BA"));
}

#[test]
fn blank_ids_are_not_distinct_values() {
    let rows = "\
o1,,SP,sao paulo,toys,10.0,4,credit_card,,2018-01-01 09:00:00
o2,c2,SP,sao paulo,toys,20.0,5,credit_card,,2018-01-02 09:00:00
,c3,SP,sao paulo,toys,30.0,3,voucher,,2018-01-03 09:00:00
";
    let dataset = load(rows);
    let out = render(&dataset, dataset.full_range(), &DashboardConfig::default());

    assert_eq!(out.order_rows, 3);
    assert_eq!(out.states[0].location, "SP");
    assert_eq!(out.states[0].customer_count, 2);

    let toys = &out.products[0];
    assert_eq!(toys.qty_sold, 2);
    assert_eq!(toys.revenue, 60.0);

    let voucher = out.payments.iter().find(|p| p.payment_type == "voucher").unwrap();
    assert_eq!(voucher.counts, 0);
}
