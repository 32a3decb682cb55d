//! Input/output helpers.
//!
//! - CSV ingest + column normalization (`ingest`)
//! - JSON export of processed campaigns (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
