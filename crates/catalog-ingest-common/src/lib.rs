//! Catalog-Ingest-Common: Shared error handling.
//!
//! Both the ingestion driver and the document store report failures through
//! the same [`Error`] enum so the caller can decide, per category, whether a
//! failure aborts the run.
//!
//! # Examples
//!
//! ```
//! use catalog_ingest_common::{Error, Result};
//!
//! fn example() -> Result<()> {
//!     Err(Error::database("insert failed"))
//! }
//!
//! assert!(example().is_err());
//! ```

pub mod error;

pub use error::{Error, Result};
