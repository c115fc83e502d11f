//! Command line presentation layer.

pub mod rates;
pub mod ui;
