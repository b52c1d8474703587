//! Best-effort motivational messages attached to lookup results.
//!
//! Generation never fails a lookup: errors and timeouts are logged and replaced by
//! a local template. In background mode the lookup only reads the cache and a
//! detached task fills it, so the lookup latency does not depend on generation.

pub mod cache;
pub mod fallback;
pub mod generator;
pub mod openrouter;


use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::products::{Barcode, Product};

pub use cache::{CatalogMessageCache, InMemoryMessageCache, MessageCache};
pub use fallback::fallback_message;
pub use generator::{GenerationError, MessageGenerator, MessagePrompt};
pub use openrouter::OpenRouterGenerator;

/// When the message is produced relative to the lookup response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentMode {
    /// Cache hit or `null`; misses are generated by a detached task.
    Background,
    /// Generated (or templated) before the response is written.
    Inline,
    /// No message is attached.
    Off,
}

/// Message producer shared by the lookup handlers.
#[derive(Clone)]
pub struct Enricher {
    generator: Option<Arc<dyn MessageGenerator>>,
    cache: Arc<dyn MessageCache>,
    mode: EnrichmentMode,
    timeout: Duration,
    language: Arc<str>,
    /// Barcodes with a background generation still running.
    in_flight: Arc<Mutex<HashSet<Barcode>>>,
}

impl Enricher {
    pub fn new(
        cache: Arc<dyn MessageCache>,
        mode: EnrichmentMode,
        timeout: Duration,
        language: &str,
    ) -> Self {
        Self {
            generator: None,
            cache,
            mode,
            timeout,
            language: Arc::from(language),
            in_flight: Arc::default(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn MessageGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn mode(&self) -> EnrichmentMode {
        self.mode
    }

    /// Message to embed in a lookup response.
    pub async fn message_for(&self, product: &Product, score: u8) -> Option<String> {
        if self.mode == EnrichmentMode::Off {
            return None;
        }

        if let Some(message) = self.cache.get(product).await {
            return Some(message);
        }

        match self.mode {
            EnrichmentMode::Inline => {
                let message = self.compose(product, score).await;
                self.cache.put(product, message.clone()).await;
                Some(message)
            }
            EnrichmentMode::Background => {
                self.dispatch(product.clone(), score);
                None
            }
            EnrichmentMode::Off => None,
        }
    }

    /// Cache read used by the polling endpoint.
    pub async fn cached(&self, product: &Product) -> Option<String> {
        self.cache.get(product).await
    }

    /// Generated text, or the local template when generation is unavailable.
    pub async fn compose(&self, product: &Product, score: u8) -> String {
        let Some(generator) = self.generator.as_ref() else {
            return fallback_message(&product.name, score);
        };

        let prompt = MessagePrompt::new(product, score, &self.language);
        match tokio::time::timeout(self.timeout, generator.generate(&prompt)).await {
            Ok(Ok(message)) => message,
            Ok(Err(err)) => {
                warn!(barcode = %product.barcode, error = %err, "message generation failed; using fallback");
                fallback_message(&product.name, score)
            }
            Err(_) => {
                warn!(barcode = %product.barcode, timeout = ?self.timeout, "message generation timed out; using fallback");
                fallback_message(&product.name, score)
            }
        }
    }

    // Detached: no handle is kept and the cache write is the only effect.
    // At most one task per barcode runs at a time.
    fn dispatch(&self, product: Product, score: u8) {
        if !self.in_flight.lock().insert(product.barcode.clone()) {
            debug!(barcode = %product.barcode, "message generation already in flight");
            return;
        }

        let enricher = self.clone();
        debug!(barcode = %product.barcode, "dispatching background message generation");
        tokio::spawn(async move {
            let message = enricher.compose(&product, score).await;
            enricher.cache.put(&product, message).await;
            enricher.in_flight.lock().remove(&product.barcode);
        });
    }
}
