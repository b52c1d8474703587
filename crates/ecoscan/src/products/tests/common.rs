use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use serde_json::Value;

use crate::enrichment::{
    EnrichmentMode, Enricher, GenerationError, InMemoryMessageCache, MessageGenerator,
    MessagePrompt,
};
use crate::products::alternatives::AlternativesQuery;
use crate::products::domain::{Barcode, Product, ProductId};
use crate::products::memory::InMemoryCatalog;
use crate::products::search::NameSearch;
use crate::products::service::{LookupOptions, ProductService};
use crate::products::store::{CatalogError, CatalogStore};

pub(super) const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[allow(clippy::too_many_arguments)]
pub(super) fn product(
    id: i64,
    barcode: &str,
    name: &str,
    category: &str,
    sub_category: &str,
    price: f64,
    packaging_material: &str,
    manufacturing_location: &str,
    disposal_method: &str,
) -> Product {
    Product {
        id: ProductId(id),
        barcode: Barcode::new(barcode),
        name: name.to_string(),
        brand_name: "Acme Dairy".to_string(),
        category: category.to_string(),
        sub_category: sub_category.to_string(),
        image_url: format!("https://img.example/{barcode}.png"),
        price,
        packaging_material: packaging_material.to_string(),
        manufacturing_location: manufacturing_location.to_string(),
        disposal_method: disposal_method.to_string(),
    }
}

/// Scores: Plastic Milk 57, Glass Milk 86, Budget Milk 31, Carton Milk 86, Pouch Milk 19.
pub(super) fn dairy_catalog() -> Vec<Product> {
    vec![
        product(1, "1001", "Plastic Milk", "dairy", "milk", 60.0, "plastic", "national", "recyclable"),
        product(2, "1002", "Glass Milk", "dairy", "milk", 75.0, "glass", "regional", "recyclable"),
        product(3, "1003", "Budget Milk", "dairy", "milk", 45.0, "plastic", "national", "landfill"),
        product(4, "1004", "Carton Milk", "dairy", "milk", 55.0, "cardboard", "local", "recyclable"),
        product(5, "1005", "Pouch Milk", "dairy", "milk", 80.0, "mixed_materials", "international", "landfill"),
        product(6, "1006", "Oat Milk", "dairy", "plant_milk", 40.0, "paper", "local", "compostable"),
        product(7, "1007", "Lonely Yogurt", "dairy", "yogurt", 50.0, "plastic", "national", "recyclable"),
        product(8, "2001", "Rice Crackers", "snacks", "crackers", 20.0, "glass", "local", "reusable"),
    ]
}

pub(super) fn memory_catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::from_products(dairy_catalog()))
}

pub(super) fn options(rescore_alternatives: bool) -> LookupOptions {
    LookupOptions {
        read_timeout: READ_TIMEOUT,
        rescore_alternatives,
    }
}

pub(super) fn inline_enricher(cache: Arc<InMemoryMessageCache>) -> Enricher {
    Enricher::new(cache, EnrichmentMode::Inline, Duration::from_secs(1), "English")
}

pub(super) fn quiet_enricher(cache: Arc<InMemoryMessageCache>) -> Enricher {
    Enricher::new(cache, EnrichmentMode::Off, Duration::from_secs(1), "English")
}

/// Generator that always fails after an optional delay.
#[derive(Default)]
pub(super) struct BrokenGenerator {
    pub(super) delay: Option<Duration>,
    calls: AtomicUsize,
}

impl BrokenGenerator {
    pub(super) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageGenerator for BrokenGenerator {
    async fn generate(&self, _prompt: &MessagePrompt) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Err(GenerationError::Status(502))
    }
}

pub(super) fn build_service<C>(catalog: Arc<C>) -> ProductService<C>
where
    C: CatalogStore + 'static,
{
    ProductService::new(
        catalog,
        inline_enricher(Arc::new(InMemoryMessageCache::default())),
        options(true),
    )
}

pub(super) fn ids(products: &[Product]) -> Vec<i64> {
    products.iter().map(|product| product.id.0).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = response.into_body();
    let bytes = axum::body::to_bytes(body, 64 * 1024)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("valid json body")
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

/// Which calls a [`ScriptedCatalog`] should break, and how.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Faults {
    pub(super) fail_reads: bool,
    pub(super) fail_alternatives: bool,
    pub(super) slow_reads: Option<Duration>,
    /// Return every row from `query_alternatives`, ignoring the query.
    pub(super) unfiltered_alternatives: bool,
}

/// In-memory catalog with injectable failures and call counting.
pub(super) struct ScriptedCatalog {
    inner: InMemoryCatalog,
    rows: Vec<Product>,
    faults: Faults,
    pub(super) alternative_calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub(super) fn new(rows: Vec<Product>, faults: Faults) -> Self {
        Self {
            inner: InMemoryCatalog::from_products(rows.clone()),
            rows,
            faults,
            alternative_calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn alternative_calls(&self) -> usize {
        self.alternative_calls.load(Ordering::SeqCst)
    }
}

fn unavailable() -> CatalogError {
    CatalogError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl CatalogStore for ScriptedCatalog {
    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, CatalogError> {
        if let Some(delay) = self.faults.slow_reads {
            tokio::time::sleep(delay).await;
        }
        if self.faults.fail_reads {
            return Err(unavailable());
        }
        self.inner.product_by_barcode(barcode).await
    }

    async fn query_alternatives(
        &self,
        query: &AlternativesQuery,
    ) -> Result<Vec<Product>, CatalogError> {
        self.alternative_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_alternatives {
            return Err(unavailable());
        }
        if self.faults.unfiltered_alternatives {
            return Ok(self.rows.clone());
        }
        self.inner.query_alternatives(query).await
    }

    async fn search_by_name(&self, search: &NameSearch) -> Result<Vec<Product>, CatalogError> {
        if self.faults.fail_reads {
            return Err(unavailable());
        }
        self.inner.search_by_name(search).await
    }

    async fn cached_message(&self, id: ProductId) -> Result<Option<String>, CatalogError> {
        self.inner.cached_message(id).await
    }

    async fn save_message(&self, id: ProductId, message: String) -> Result<(), CatalogError> {
        self.inner.save_message(id, message).await
    }

    async fn update_image_url(
        &self,
        barcode: &Barcode,
        image_url: &str,
    ) -> Result<Option<Product>, CatalogError> {
        if self.faults.fail_reads {
            return Err(unavailable());
        }
        self.inner.update_image_url(barcode, image_url).await
    }
}
