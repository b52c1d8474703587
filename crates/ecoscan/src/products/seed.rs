use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Barcode, Product, ProductId};

#[derive(Debug, thiserror::Error)]
pub enum CatalogSeedError {
    #[error("failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate product id {0} in catalog seed")]
    DuplicateId(ProductId),
    #[error("duplicate barcode {0} in catalog seed")]
    DuplicateBarcode(Barcode),
    #[error("row for product {0} has an empty barcode")]
    MissingBarcode(ProductId),
}

/// Loads catalog rows from a CSV export.
pub struct CatalogSeed;

impl CatalogSeed {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Product>, CatalogSeedError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Product>, CatalogSeedError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut ids = HashSet::new();
        let mut barcodes = HashSet::new();
        let mut products = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            let product = Product::from(record?);

            if product.barcode.as_str().is_empty() {
                return Err(CatalogSeedError::MissingBarcode(product.id));
            }
            if !ids.insert(product.id) {
                return Err(CatalogSeedError::DuplicateId(product.id));
            }
            if !barcodes.insert(product.barcode.clone()) {
                return Err(CatalogSeedError::DuplicateBarcode(product.barcode));
            }

            products.push(product);
        }

        Ok(products)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: i64,
    barcode: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    brand_name: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    sub_category: String,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    image_url: String,
    price: f64,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    packaging_material: String,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    manufacturing_location: String,
    #[serde(default, deserialize_with = "empty_string_as_default")]
    disposal_method: String,
}

impl From<CatalogRow> for Product {
    fn from(row: CatalogRow) -> Self {
        Product {
            id: ProductId(row.id),
            barcode: Barcode(row.barcode),
            name: row.name,
            brand_name: row.brand_name,
            category: row.category,
            sub_category: row.sub_category,
            image_url: row.image_url,
            price: row.price,
            packaging_material: row.packaging_material,
            manufacturing_location: row.manufacturing_location,
            disposal_method: row.disposal_method,
        }
    }
}

fn empty_string_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
