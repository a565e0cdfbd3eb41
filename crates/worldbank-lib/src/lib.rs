//! World Bank gateway library entry points.
//!
//! This crate owns the immutable local indicator dataset and the two HTTP
//! clients used for live lookups (country profiles and indicator series).
//! Higher-level consumers (the MCP handlers, the CLI) should only depend on
//! the items exported here instead of talking to the CSV file or the upstream
//! APIs directly.
//!

pub mod code;
pub mod config;
pub mod dataset;
pub mod error;
pub mod upstream;

pub use code::normalize_country_code;
pub use config::{resolve_dataset_path, UpstreamConfig};
pub use dataset::{ColumnSchema, ColumnType, CountryEntry, Dataset, IndicatorRecord};
pub use error::{Error, Result};
pub use upstream::country::{CountryClient, CountryProfile};
pub use upstream::indicator::{IndicatorClient, IndicatorObservation};
pub use upstream::{CountrySource, IndicatorSource, UpstreamError};
