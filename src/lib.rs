//! Catalog-Ingest - TMDB catalog snapshot loader
//!
//! Pulls a fixed set of paginated list endpoints from the TMDB API and
//! bulk-inserts the raw results into document store collections. The library
//! crate exposes the pieces for integration testing; `main.rs` wires them
//! together.

pub mod config;
pub mod ingest;
pub mod tmdb;
