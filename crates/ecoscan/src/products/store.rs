use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::alternatives::AlternativesQuery;
use super::domain::{Barcode, Product, ProductId};
use super::search::NameSearch;

/// Read access to the product catalog plus the message write-back columns.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, CatalogError>;

    /// Rows matching the query predicate, already ordered and capped by the store.
    async fn query_alternatives(
        &self,
        query: &AlternativesQuery,
    ) -> Result<Vec<Product>, CatalogError>;

    async fn search_by_name(&self, search: &NameSearch) -> Result<Vec<Product>, CatalogError>;

    async fn cached_message(&self, id: ProductId) -> Result<Option<String>, CatalogError>;

    async fn save_message(&self, id: ProductId, message: String) -> Result<(), CatalogError>;

    /// Returns the updated row, or `None` when the barcode is unknown.
    async fn update_image_url(
        &self,
        barcode: &Barcode,
        image_url: &str,
    ) -> Result<Option<Product>, CatalogError>;
}

/// Catalog access failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("catalog read exceeded {0:?}")]
    Timeout(Duration),
}

/// Applies the catalog read deadline to a store call.
pub async fn bounded<T, F>(deadline: Duration, call: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| CatalogError::Timeout(deadline))?
}
