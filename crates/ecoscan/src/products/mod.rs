//! Barcode lookup: catalog access, sustainability scoring, and substitute selection.

pub mod alternatives;
pub mod domain;
pub mod memory;
pub mod router;
pub mod scoring;
pub mod search;
pub mod seed;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use alternatives::{
    is_preferred_packaging, AlternativesQuery, AlternativesSelector, MatchScope,
    ALTERNATIVE_LIMIT, PREFERRED_PACKAGING,
};
pub use domain::{Barcode, Product, ProductId, ScoredProduct};
pub use memory::InMemoryCatalog;
pub use router::product_router;
pub use scoring::{ScoreBreakdown, ScoreEngine, ScoreRating};
pub use search::NameSearch;
pub use seed::{CatalogSeed, CatalogSeedError};
pub use service::{LookupError, LookupOptions, MessageStatus, ProductLookup, ProductService};
pub use store::{CatalogError, CatalogStore};
