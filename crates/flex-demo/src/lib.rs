//! # flex-demo
//!
//! Settings loading and the showcase checkouts run by the `flexorder-demo`
//! binary.

pub mod scenarios;
pub mod settings;
