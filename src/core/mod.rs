//! Core rate table, retrieval and conversion logic

pub mod config;
pub mod convert;
pub mod fetcher;
pub mod log;
pub mod rates;
pub mod source;

// Re-export main types for cleaner imports
pub use convert::{convert, convert_unrounded, round_to_cents};
pub use fetcher::RateFetcher;
pub use rates::{RateEntry, RateTable, RawRow};
pub use source::RateSource;
