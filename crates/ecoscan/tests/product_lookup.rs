use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use ecoscan::accounts::{account_router, AccountService, InMemoryAccountStore, TokenService};
use ecoscan::enrichment::{fallback_message, EnrichmentMode, Enricher, InMemoryMessageCache};
use ecoscan::products::{product_router, CatalogSeed, InMemoryCatalog, LookupOptions, ProductService};
use serde_json::{json, Value};
use tower::ServiceExt;

const SAMPLE_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/catalog.csv");

fn catalog() -> Arc<InMemoryCatalog> {
    let products = CatalogSeed::from_path(SAMPLE_CATALOG).expect("sample catalog parses");
    Arc::new(InMemoryCatalog::from_products(products))
}

fn app(mode: EnrichmentMode, rescore_alternatives: bool) -> Router {
    let enricher = Enricher::new(
        Arc::new(InMemoryMessageCache::default()),
        mode,
        Duration::from_secs(1),
        "English",
    );
    let products = Arc::new(ProductService::new(
        catalog(),
        enricher,
        LookupOptions {
            read_timeout: Duration::from_secs(2),
            rescore_alternatives,
        },
    ));
    let tokens = Arc::new(TokenService::new(
        b"integration-secret",
        chrono::Duration::minutes(15),
        chrono::Duration::days(7),
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryAccountStore::default()),
        tokens.clone(),
        10,
    ));

    product_router(products, tokens).merge(account_router(accounts))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[test]
fn sample_catalog_is_valid() {
    let products = CatalogSeed::from_path(SAMPLE_CATALOG).expect("sample catalog parses");
    assert_eq!(products.len(), 18);
}

#[tokio::test]
async fn plastic_juice_gets_cheaper_and_glass_alternatives() {
    let (status, body) = send(
        app(EnrichmentMode::Inline, true),
        get("/api/v1/products/barcode/8941100500012"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // (20 * 0.35) + (70 * 0.30) + (85 * 0.35) = 57.75
    assert_eq!(body["score"], 57);
    assert_eq!(body["score_rating"], "Moderate Impact");
    assert_eq!(body["score_breakdown"]["packaging"], 20);
    assert_eq!(body["score_breakdown"]["transport"], 70);
    assert_eq!(body["score_breakdown"]["disposal"], 85);

    let alternatives = body["alternatives"].as_array().expect("alternatives");
    let barcodes: Vec<&str> = alternatives
        .iter()
        .filter_map(|alt| alt["barcode"].as_str())
        .collect();
    assert_eq!(barcodes, vec!["8941100500036", "8941100500043", "8941100500029"]);
    // Orange Drink: (20 * 0.35) + (70 * 0.30) + (10 * 0.35) = 31.5
    assert_eq!(alternatives[0]["score"], 31);
    assert_eq!(alternatives[2]["score_rating"], "Excellent Choice");

    assert_eq!(
        body["message"].as_str(),
        Some(fallback_message("Mango Juice", 57).as_str())
    );
}

#[tokio::test]
async fn alternatives_omit_scores_when_rescoring_is_off() {
    let (status, body) = send(
        app(EnrichmentMode::Off, false),
        get("/api/v1/products/barcode/8941100500012"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_null());
    let first = &body["alternatives"][0];
    assert_eq!(first["name"], "Orange Drink");
    assert!(first.get("score").is_none());
    assert!(first.get("score_rating").is_none());
}

#[tokio::test]
async fn product_without_sub_category_matches_on_category() {
    let (status, body) = send(
        app(EnrichmentMode::Off, true),
        get("/api/v1/products/barcode/8941000700047"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Only Puffed Rice is in paper; nothing else in snacks is cheaper than 15.
    let names: Vec<&str> = body["alternatives"]
        .as_array()
        .expect("alternatives")
        .iter()
        .filter_map(|alt| alt["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Puffed Rice"]);
}

#[tokio::test]
async fn yogurt_widens_to_dairy_when_alone_in_sub_category() {
    let (status, body) = send(
        app(EnrichmentMode::Off, true),
        get("/api/v1/products/barcode/8941161120052"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["alternatives"]
        .as_array()
        .expect("alternatives")
        .iter()
        .filter_map(|alt| alt["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Pasteurized Milk", "Pasteurized Milk Glass"]);
}

#[tokio::test]
async fn unknown_barcode_is_404() {
    let (status, body) = send(
        app(EnrichmentMode::Off, true),
        get("/api/v1/products/barcode/0000000000000"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "product not found" }));
}

#[tokio::test]
async fn fuzzy_search_tolerates_typos() {
    let (status, body) = send(
        app(EnrichmentMode::Off, true),
        get("/api/v1/products/search?q=potato%20chps"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Potato Chips");
}

#[tokio::test]
async fn registered_user_earns_points_for_product_requests() {
    let router = app(EnrichmentMode::Off, true);

    let (status, _) = send(
        router.clone(),
        post_json(
            "/api/v1/auth/register",
            json!({ "name": "Arif", "email": "arif@example.com", "password": "password123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = send(
        router.clone(),
        post_json(
            "/api/v1/auth/login",
            json!({ "email": "arif@example.com", "password": "password123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["access_token"].as_str().expect("token").to_string();

    let (status, receipt) = send(
        router,
        post_json(
            "/api/v1/products/requests",
            json!({ "barcode": "8940000000001", "name": "Mustard Oil", "brand_name": "Rupchanda" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["points"], 10);
}
