use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use crate::products::{Barcode, CatalogStore, Product};

/// Storage for generated messages. Absent means "not generated yet".
#[async_trait]
pub trait MessageCache: Send + Sync {
    async fn get(&self, product: &Product) -> Option<String>;
    /// Last write wins.
    async fn put(&self, product: &Product, message: String);
}

/// Barcode-keyed map that lives as long as the process.
#[derive(Default)]
pub struct InMemoryMessageCache {
    entries: RwLock<HashMap<Barcode, String>>,
}

impl InMemoryMessageCache {
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl MessageCache for InMemoryMessageCache {
    async fn get(&self, product: &Product) -> Option<String> {
        self.entries.read().get(&product.barcode).cloned()
    }

    async fn put(&self, product: &Product, message: String) {
        self.entries.write().insert(product.barcode.clone(), message);
    }
}

/// Writes messages back to the catalog, keyed by product id.
pub struct CatalogMessageCache<C> {
    catalog: Arc<C>,
}

impl<C> CatalogMessageCache<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl<C> MessageCache for CatalogMessageCache<C>
where
    C: CatalogStore + 'static,
{
    async fn get(&self, product: &Product) -> Option<String> {
        match self.catalog.cached_message(product.id).await {
            Ok(message) => message,
            Err(err) => {
                warn!(product_id = %product.id, error = %err, "cached message read failed");
                None
            }
        }
    }

    async fn put(&self, product: &Product, message: String) {
        if let Err(err) = self.catalog.save_message(product.id, message).await {
            warn!(product_id = %product.id, error = %err, "cached message write failed");
        }
    }
}
