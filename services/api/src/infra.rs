use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use ecoscan::accounts::TokenService;
use ecoscan::config::{AuthConfig, EnrichmentConfig, MessageCacheKind};
use ecoscan::enrichment::{
    CatalogMessageCache, Enricher, InMemoryMessageCache, MessageCache, OpenRouterGenerator,
};
use ecoscan::error::AppError;
use ecoscan::products::{CatalogSeed, InMemoryCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seeds the in-memory catalog; no path yields an empty catalog.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Arc<InMemoryCatalog>, AppError> {
    let Some(path) = path else {
        warn!("CATALOG_CSV not set; serving an empty catalog");
        return Ok(Arc::new(InMemoryCatalog::default()));
    };

    let products = CatalogSeed::from_path(path)?;
    info!(path = %path.display(), products = products.len(), "catalog seeded");
    Ok(Arc::new(InMemoryCatalog::from_products(products)))
}

pub(crate) fn build_enricher(config: &EnrichmentConfig, catalog: Arc<InMemoryCatalog>) -> Enricher {
    let cache: Arc<dyn MessageCache> = match config.cache {
        MessageCacheKind::Memory => Arc::new(InMemoryMessageCache::default()),
        MessageCacheKind::Catalog => Arc::new(CatalogMessageCache::new(catalog)),
    };

    let enricher = Enricher::new(cache, config.mode, config.timeout, &config.language);
    match config.api_key.as_deref() {
        Some(api_key) => {
            info!(model = %config.model, mode = ?config.mode, "message generation enabled");
            enricher.with_generator(Arc::new(OpenRouterGenerator::new(
                config.endpoint.clone(),
                api_key,
                config.model.clone(),
            )))
        }
        None => {
            warn!("OPENROUTER_API_KEY not set; messages use local templates");
            enricher
        }
    }
}

pub(crate) fn build_tokens(config: &AuthConfig) -> Arc<TokenService> {
    Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        chrono::Duration::minutes(config.access_ttl_minutes),
        chrono::Duration::days(config.refresh_ttl_days),
    ))
}
