use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier; never changes for the lifetime of a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External identifier printed on the package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Barcode(pub String);

impl Barcode {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog row as read by the lookup pipeline.
///
/// The three sustainability attributes are free-form strings. They are matched
/// case-sensitively against the scoring tables and never normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub barcode: Barcode,
    pub name: String,
    pub brand_name: String,
    pub category: String,
    pub sub_category: String,
    pub image_url: String,
    pub price: f64,
    pub packaging_material: String,
    pub manufacturing_location: String,
    pub disposal_method: String,
}

/// A product decorated with its own score for display next to the primary result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_rating: Option<&'static str>,
}

impl ScoredProduct {
    pub fn unscored(product: Product) -> Self {
        Self {
            product,
            score: None,
            score_rating: None,
        }
    }
}
