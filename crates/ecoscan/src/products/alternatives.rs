use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::domain::{Product, ProductId, ScoredProduct};
use super::scoring::ScoreEngine;
use super::store::{bounded, CatalogStore};

pub const ALTERNATIVE_LIMIT: usize = 4;

/// Packaging that qualifies a candidate even when it is not cheaper.
pub const PREFERRED_PACKAGING: [&str; 5] = ["glass", "paper", "none", "compostable_paper", "cardboard"];

pub fn is_preferred_packaging(material: &str) -> bool {
    PREFERRED_PACKAGING.contains(&material)
}

/// Grouping a candidate must share with the scanned product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchScope {
    SubCategory(String),
    Category(String),
}

impl MatchScope {
    fn admits(&self, candidate: &Product) -> bool {
        match self {
            MatchScope::SubCategory(value) => candidate.sub_category == *value,
            MatchScope::Category(value) => candidate.category == *value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchScope::SubCategory(_) => "sub_category",
            MatchScope::Category(_) => "category",
        }
    }
}

/// Substitute lookup: same scope, different id, and cheaper or preferred packaging.
///
/// Ordered by price ascending, then packaging material ascending, then id.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativesQuery {
    pub scope: MatchScope,
    pub exclude: ProductId,
    pub price_threshold: f64,
    pub limit: usize,
}

impl AlternativesQuery {
    pub fn new(product: &Product, scope: MatchScope) -> Self {
        Self {
            scope,
            exclude: product.id,
            price_threshold: product.price,
            limit: ALTERNATIVE_LIMIT,
        }
    }

    /// Sub-category first when the product has one, category as the wider fallback.
    pub fn tiers(product: &Product) -> Vec<Self> {
        let mut tiers = Vec::with_capacity(2);
        if !product.sub_category.is_empty() {
            tiers.push(Self::new(
                product,
                MatchScope::SubCategory(product.sub_category.clone()),
            ));
        }
        tiers.push(Self::new(
            product,
            MatchScope::Category(product.category.clone()),
        ));
        tiers
    }

    pub fn matches(&self, candidate: &Product) -> bool {
        self.scope.admits(candidate)
            && candidate.id != self.exclude
            && (candidate.price < self.price_threshold
                || is_preferred_packaging(&candidate.packaging_material))
    }

    pub fn order(a: &Product, b: &Product) -> Ordering {
        a.price
            .total_cmp(&b.price)
            .then_with(|| a.packaging_material.cmp(&b.packaging_material))
            .then_with(|| a.id.cmp(&b.id))
    }

    /// Filters, orders, and caps rows; stores without a native query can run this directly.
    pub fn apply<I>(&self, rows: I) -> Vec<Product>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut selected: Vec<Product> = rows
            .into_iter()
            .filter(|candidate| self.matches(candidate))
            .collect();
        selected.sort_by(Self::order);
        selected.truncate(self.limit);
        selected
    }
}

/// Picks substitutes for a scanned product, degrading to an empty set on store failures.
pub struct AlternativesSelector<C> {
    catalog: Arc<C>,
    engine: ScoreEngine,
    rescore: bool,
    read_timeout: Duration,
}

impl<C> AlternativesSelector<C>
where
    C: CatalogStore + 'static,
{
    pub fn new(catalog: Arc<C>, engine: ScoreEngine, rescore: bool, read_timeout: Duration) -> Self {
        Self {
            catalog,
            engine,
            rescore,
            read_timeout,
        }
    }

    pub fn rescores(&self) -> bool {
        self.rescore
    }

    pub async fn select(&self, product: &Product) -> Vec<ScoredProduct> {
        for query in AlternativesQuery::tiers(product) {
            let rows = match bounded(self.read_timeout, self.catalog.query_alternatives(&query)).await
            {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(
                        product_id = %product.id,
                        scope = query.scope.label(),
                        error = %err,
                        "alternatives lookup failed; returning none"
                    );
                    return Vec::new();
                }
            };

            // Rows are re-checked so the predicate and cap hold for every store.
            let rows = query.apply(rows);
            if rows.is_empty() {
                debug!(product_id = %product.id, scope = query.scope.label(), "no alternatives in scope");
                continue;
            }

            return rows.into_iter().map(|row| self.decorate(row)).collect();
        }

        Vec::new()
    }

    fn decorate(&self, product: Product) -> ScoredProduct {
        if !self.rescore {
            return ScoredProduct::unscored(product);
        }

        let breakdown = self.engine.evaluate(&product);
        ScoredProduct {
            product,
            score: Some(breakdown.score()),
            score_rating: Some(breakdown.rating().label()),
        }
    }
}
