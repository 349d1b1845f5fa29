//! E-commerce order dashboard: load a pre-aggregated order export, filter it
//! by delivery date and summarise it per category, payment type, review
//! score and customer location.

pub mod color;
pub mod config;
pub mod data;
pub mod report;
