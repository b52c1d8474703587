use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use ecoscan::config::DEFAULT_MESSAGE_LANGUAGE;
use ecoscan::enrichment::{EnrichmentMode, Enricher, InMemoryMessageCache};
use ecoscan::error::AppError;
use ecoscan::products::{
    Barcode, CatalogSeed, InMemoryCatalog, LookupOptions, Product, ProductService, ScoreEngine,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Packaging material, e.g. glass, plastic, compostable_paper
    #[arg(long)]
    pub(crate) packaging: String,
    /// Manufacturing location: local, regional, national, international
    #[arg(long)]
    pub(crate) location: String,
    /// Disposal method, e.g. recyclable, landfill, reusable
    #[arg(long)]
    pub(crate) disposal: String,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogCheckArgs {
    /// Catalog CSV to validate
    #[arg(long)]
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    /// Catalog CSV to load
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Barcode to resolve
    #[arg(long)]
    pub(crate) barcode: String,
    /// Skip scoring the alternatives
    #[arg(long)]
    pub(crate) no_rescore: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let breakdown = ScoreEngine::new().breakdown(&args.packaging, &args.location, &args.disposal);

    println!("Sustainability score");
    println!("- packaging ({}): {}", args.packaging, breakdown.packaging);
    println!("- transport ({}): {}", args.location, breakdown.transport);
    println!("- disposal ({}): {}", args.disposal, breakdown.disposal);
    println!(
        "Overall: {} ({}) from weighted {:.2}",
        breakdown.score(),
        breakdown.rating().label(),
        breakdown.overall
    );

    Ok(())
}

pub(crate) fn run_catalog_check(args: CatalogCheckArgs) -> Result<(), AppError> {
    let products = CatalogSeed::from_path(&args.path)?;
    let summary = CatalogSummary::from_products(&products);

    println!("Catalog {} is valid", args.path.display());
    println!("- {} products", summary.products);
    println!(
        "- {} without sub-category | {} with unscored attributes",
        summary.missing_sub_category, summary.unscored_attributes
    );
    println!("Categories:");
    for (category, count) in &summary.categories {
        println!("  - {category}: {count}");
    }

    Ok(())
}

pub(crate) async fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let products = CatalogSeed::from_path(&args.catalog)?;
    let catalog = Arc::new(InMemoryCatalog::from_products(products));
    let enricher = Enricher::new(
        Arc::new(InMemoryMessageCache::default()),
        EnrichmentMode::Inline,
        Duration::from_secs(1),
        DEFAULT_MESSAGE_LANGUAGE,
    );
    let service = ProductService::new(
        catalog,
        enricher,
        LookupOptions {
            rescore_alternatives: !args.no_rescore,
            ..LookupOptions::default()
        },
    );

    let lookup = service.lookup(&Barcode::new(args.barcode)).await?;
    match serde_json::to_string_pretty(&lookup) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Lookup payload unavailable: {err}"),
    }

    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CatalogSummary {
    products: usize,
    missing_sub_category: usize,
    unscored_attributes: usize,
    categories: BTreeMap<String, usize>,
}

impl CatalogSummary {
    fn from_products(products: &[Product]) -> Self {
        let mut summary = Self {
            products: products.len(),
            ..Self::default()
        };

        for product in products {
            *summary
                .categories
                .entry(product.category.clone())
                .or_default() += 1;
            if product.sub_category.is_empty() {
                summary.missing_sub_category += 1;
            }
            if has_unscored_attribute(product) {
                summary.unscored_attributes += 1;
            }
        }

        summary
    }
}

fn has_unscored_attribute(product: &Product) -> bool {
    use ecoscan::products::scoring::{
        UNKNOWN_DISPOSAL_SCORE, UNKNOWN_PACKAGING_SCORE, UNKNOWN_TRANSPORT_SCORE,
    };

    let breakdown = ScoreEngine::new().evaluate(product);
    // Table values never collide with the defaults except through unknown inputs.
    breakdown.packaging == UNKNOWN_PACKAGING_SCORE
        || breakdown.transport == UNKNOWN_TRANSPORT_SCORE
        || breakdown.disposal == UNKNOWN_DISPOSAL_SCORE
}
