//! Fuzzy product-name matching.
//!
//! Similarity follows the trigram model used by PostgreSQL's `pg_trgm`: names are
//! lower-cased and split into alphanumeric words, each word is padded with two
//! leading spaces and one trailing space, and the score is the size of the shared
//! trigram set divided by the size of the union.

use std::collections::BTreeSet;

use super::domain::Product;

pub const SIMILARITY_THRESHOLD: f64 = 0.3;
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Normalized search term plus the ranking policy.
#[derive(Debug, Clone, PartialEq)]
pub struct NameSearch {
    term: String,
    lowered: String,
    trigrams: BTreeSet<[char; 3]>,
    pub threshold: f64,
    pub limit: usize,
}

impl NameSearch {
    /// Returns `None` for blank terms.
    pub fn new(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        Some(Self {
            term: term.to_string(),
            lowered: term.to_lowercase(),
            trigrams: trigrams(term),
            threshold: SIMILARITY_THRESHOLD,
            limit: MAX_SEARCH_RESULTS,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_exact(&self, name: &str) -> bool {
        name.to_lowercase() == self.lowered
    }

    pub fn similarity(&self, name: &str) -> f64 {
        jaccard(&self.trigrams, &trigrams(name))
    }

    /// Candidates above the threshold or matching exactly, exact matches first.
    pub fn rank<'a, I>(&self, products: I) -> Vec<Product>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut scored: Vec<(bool, f64, &Product)> = products
            .into_iter()
            .filter_map(|product| {
                let exact = self.is_exact(&product.name);
                let similarity = self.similarity(&product.name);
                (exact || similarity > self.threshold).then_some((exact, similarity, product))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.total_cmp(&a.1))
                .then_with(|| a.2.id.cmp(&b.2.id))
        });

        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, _, product)| product.clone())
            .collect()
    }

    /// Collapses the result to the exact match when the best hit is one.
    pub fn finalize(&self, mut ranked: Vec<Product>) -> Vec<Product> {
        if ranked
            .first()
            .map(|first| self.is_exact(&first.name))
            .unwrap_or(false)
        {
            ranked.truncate(1);
        }
        ranked
    }
}

pub fn trigram_similarity(left: &str, right: &str) -> f64 {
    jaccard(&trigrams(left), &trigrams(right))
}

fn trigrams(value: &str) -> BTreeSet<[char; 3]> {
    let lowered = value.to_lowercase();
    let mut set = BTreeSet::new();

    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

fn jaccard(left: &BTreeSet<[char; 3]>, right: &BTreeSet<[char; 3]>) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(right).count();
    let union = left.len() + right.len() - shared;
    shared as f64 / union as f64
}
