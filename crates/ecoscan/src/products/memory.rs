use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::alternatives::AlternativesQuery;
use super::domain::{Barcode, Product, ProductId};
use super::search::NameSearch;
use super::store::{CatalogError, CatalogStore};

/// Process-local catalog seeded at startup.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
    messages: RwLock<HashMap<ProductId, String>>,
}

impl InMemoryCatalog {
    pub fn from_products<I>(products: I) -> Self
    where
        I: IntoIterator<Item = Product>,
    {
        let catalog = Self::default();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    pub fn upsert(&self, product: Product) {
        self.products.write().insert(product.id, product);
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn product_by_barcode(&self, barcode: &Barcode) -> Result<Option<Product>, CatalogError> {
        let guard = self.products.read();
        Ok(guard
            .values()
            .find(|product| product.barcode == *barcode)
            .cloned())
    }

    async fn query_alternatives(
        &self,
        query: &AlternativesQuery,
    ) -> Result<Vec<Product>, CatalogError> {
        let guard = self.products.read();
        Ok(query.apply(guard.values().cloned()))
    }

    async fn search_by_name(&self, search: &NameSearch) -> Result<Vec<Product>, CatalogError> {
        let guard = self.products.read();
        Ok(search.rank(guard.values()))
    }

    async fn cached_message(&self, id: ProductId) -> Result<Option<String>, CatalogError> {
        Ok(self.messages.read().get(&id).cloned())
    }

    async fn save_message(&self, id: ProductId, message: String) -> Result<(), CatalogError> {
        self.messages.write().insert(id, message);
        Ok(())
    }

    async fn update_image_url(
        &self,
        barcode: &Barcode,
        image_url: &str,
    ) -> Result<Option<Product>, CatalogError> {
        let mut guard = self.products.write();
        Ok(guard
            .values_mut()
            .find(|product| product.barcode == *barcode)
            .map(|product| {
                product.image_url = image_url.to_string();
                product.clone()
            }))
    }
}
