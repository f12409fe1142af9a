//! Shared wire model for the barcode lookup backend HTTP contract.
//!
//! The backend itself lives outside this repository; these types document
//! the JSON shapes the frontend sends and receives. Everything here is
//! plain serde data, decoded exactly once at the gateway boundary.

pub mod model;
pub mod requests;
