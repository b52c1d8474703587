//! Barcode lookups with sustainability scoring.
//!
//! A lookup resolves a barcode against the catalog, scores the product's packaging,
//! transport, and disposal attributes, selects up to four substitutes, and attaches a
//! motivational message produced by an external text-generation service (or a local
//! template when that service is unavailable). The `accounts` module covers
//! registration, login, and the points credited for product requests.

pub mod accounts;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod products;
pub mod telemetry;
