//! Data pipeline behind the quantum market intelligence dashboard: CSV
//! loading, filtering, export and the timing helpers the UI is driven by.

pub mod config;
pub mod data;
pub mod debounce;
pub mod error;
pub mod schedule;
