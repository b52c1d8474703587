use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::alternatives::AlternativesSelector;
use super::domain::{Barcode, Product, ScoredProduct};
use super::scoring::{ScoreBreakdown, ScoreEngine, ScoreRating};
use super::search::NameSearch;
use super::store::{bounded, CatalogError, CatalogStore};
use crate::enrichment::Enricher;

/// Tuning for the lookup pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupOptions {
    pub read_timeout: Duration,
    pub rescore_alternatives: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(2),
            rescore_alternatives: true,
        }
    }
}

/// Full lookup result returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ProductLookup {
    pub product: Product,
    pub score: u8,
    pub score_rating: ScoreRating,
    pub score_breakdown: ScoreBreakdown,
    pub alternatives: Vec<ScoredProduct>,
    pub message: Option<String>,
}

/// Progress of the enrichment message for one barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageStatus {
    pub barcode: Barcode,
    pub status: &'static str,
    pub message: Option<String>,
}

impl MessageStatus {
    pub fn is_ready(&self) -> bool {
        self.message.is_some()
    }
}

/// Service composing the catalog, score engine, alternatives selector, and enricher.
pub struct ProductService<C> {
    catalog: Arc<C>,
    engine: ScoreEngine,
    selector: AlternativesSelector<C>,
    enricher: Enricher,
    read_timeout: Duration,
}

impl<C> ProductService<C>
where
    C: CatalogStore + 'static,
{
    pub fn new(catalog: Arc<C>, enricher: Enricher, options: LookupOptions) -> Self {
        let engine = ScoreEngine::new();
        let selector = AlternativesSelector::new(
            catalog.clone(),
            engine,
            options.rescore_alternatives,
            options.read_timeout,
        );

        Self {
            catalog,
            engine,
            selector,
            enricher,
            read_timeout: options.read_timeout,
        }
    }

    /// Resolve a barcode and assemble the scored response.
    pub async fn lookup(&self, barcode: &Barcode) -> Result<ProductLookup, LookupError> {
        let product = self.fetch(barcode).await?;

        let breakdown = self.engine.evaluate(&product);
        let score = breakdown.score();
        let score_rating = breakdown.rating();
        info!(%barcode, score, rating = score_rating.label(), "calculated product score");

        let alternatives = self.selector.select(&product).await;
        let message = self.enricher.message_for(&product, score).await;

        Ok(ProductLookup {
            product,
            score,
            score_rating,
            score_breakdown: breakdown,
            alternatives,
            message,
        })
    }

    /// Current enrichment state for a barcode, for clients polling after a lookup.
    pub async fn message(&self, barcode: &Barcode) -> Result<MessageStatus, LookupError> {
        let product = self.fetch(barcode).await?;
        let message = self.enricher.cached(&product).await;
        let status = if message.is_some() { "ready" } else { "pending" };

        Ok(MessageStatus {
            barcode: product.barcode,
            status,
            message,
        })
    }

    /// Fuzzy name search; an exact (case-insensitive) hit is returned alone.
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, LookupError> {
        let search = NameSearch::new(term).ok_or(LookupError::EmptyQuery)?;
        let ranked = bounded(self.read_timeout, self.catalog.search_by_name(&search)).await?;
        let results = search.finalize(ranked);
        info!(query = search.term(), results = results.len(), "product search");
        Ok(results)
    }

    pub async fn update_image(
        &self,
        barcode: &Barcode,
        image_url: &str,
    ) -> Result<Product, LookupError> {
        bounded(
            self.read_timeout,
            self.catalog.update_image_url(barcode, image_url),
        )
        .await?
        .ok_or(LookupError::NotFound)
    }

    async fn fetch(&self, barcode: &Barcode) -> Result<Product, LookupError> {
        bounded(self.read_timeout, self.catalog.product_by_barcode(barcode))
            .await?
            .ok_or(LookupError::NotFound)
    }
}

/// Errors surfaced to callers of the lookup service.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("product not found")]
    NotFound,
    #[error("query parameter 'q' is required")]
    EmptyQuery,
    #[error(transparent)]
    DataAccess(#[from] CatalogError),
}
