use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::accounts::{TokenService, UserId};
use crate::enrichment::{
    fallback_message, EnrichmentMode, Enricher, InMemoryMessageCache, MessageCache,
};
use crate::products::router::lookup_handler;
use crate::products::service::ProductService;
use crate::products::{product_router, Barcode, CatalogStore};

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(
        b"routing-secret",
        chrono::Duration::minutes(15),
        chrono::Duration::days(7),
    ))
}

fn router_for<C>(service: ProductService<C>) -> (Router, Arc<TokenService>)
where
    C: CatalogStore + 'static,
{
    let tokens = tokens();
    (product_router(Arc::new(service), tokens.clone()), tokens)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn lookup_route_returns_scored_product() {
    let (router, _) = router_for(build_service(memory_catalog()));

    let response = router
        .oneshot(get("/api/v1/products/barcode/1001"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["product"]["name"], "Plastic Milk");
    assert_eq!(body["score"], 57);
    assert_eq!(body["score_rating"], "Moderate Impact");
    assert_eq!(body["alternatives"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["alternatives"][0]["barcode"], "1003");
    assert_eq!(body["alternatives"][0]["score"], 31);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn lookup_route_returns_not_found() {
    let (router, _) = router_for(build_service(memory_catalog()));

    let response = router
        .oneshot(get("/api/v1/products/barcode/999999"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "product not found");
}

#[tokio::test]
async fn lookup_handler_hides_catalog_failures() {
    let catalog = Arc::new(ScriptedCatalog::new(
        dairy_catalog(),
        Faults {
            fail_reads: true,
            ..Faults::default()
        },
    ));
    let service = Arc::new(build_service(catalog));

    let response =
        lookup_handler::<ScriptedCatalog>(State(service), Path("1001".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "internal server error reading product");
}

#[tokio::test]
async fn message_route_reports_pending_then_ready() {
    let cache = Arc::new(InMemoryMessageCache::default());
    let catalog = memory_catalog();
    let service = ProductService::new(catalog.clone(), quiet_enricher(cache.clone()), options(true));
    let (router, _) = router_for(service);

    let pending = router
        .clone()
        .oneshot(get("/api/v1/products/1004/message"))
        .await
        .expect("router responds");
    assert_eq!(pending.status(), StatusCode::ACCEPTED);
    let body = read_json_body(pending).await;
    assert_eq!(body["status"], "pending");
    assert!(body["message"].is_null());

    let product = catalog
        .product_by_barcode(&Barcode::new("1004"))
        .await
        .expect("catalog read")
        .expect("fixture product");
    cache.put(&product, "Carton is a fine choice".to_string()).await;

    let ready = router
        .oneshot(get("/api/v1/products/1004/message"))
        .await
        .expect("router responds");
    assert_eq!(ready.status(), StatusCode::OK);
    let body = read_json_body(ready).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["message"], "Carton is a fine choice");
}

#[tokio::test]
async fn search_route_requires_query() {
    let (router, _) = router_for(build_service(memory_catalog()));

    let response = router
        .oneshot(get("/api/v1/products/search"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "query parameter 'q' is required");
}

#[tokio::test]
async fn search_route_returns_matches() {
    let (router, _) = router_for(build_service(memory_catalog()));

    let response = router
        .oneshot(get("/api/v1/products/search?q=Oat%20Milk"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let results = body.as_array().expect("array body");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["barcode"], "1006");
}

#[tokio::test]
async fn image_route_rejects_missing_token() {
    let (router, _) = router_for(build_service(memory_catalog()));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/products/image",
            &json!({ "barcode": "1001", "image_url": "https://cdn.example/a.png" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "authorization header required");
}

#[tokio::test]
async fn image_route_updates_with_valid_token() {
    let (router, tokens) = router_for(build_service(memory_catalog()));
    let token = tokens.issue_access(UserId(4)).expect("token");

    let mut request = json_request(
        "PUT",
        "/api/v1/products/image",
        &json!({ "barcode": "1001", "image_url": "https://cdn.example/a.png" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().expect("header value"),
    );

    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["image_url"], "https://cdn.example/a.png");
    assert_eq!(body["barcode"], "1001");
}

#[tokio::test]
async fn image_route_reports_unknown_barcode() {
    let (router, tokens) = router_for(build_service(memory_catalog()));
    let token = tokens.issue_access(UserId(4)).expect("token");

    let mut request = json_request(
        "PUT",
        "/api/v1/products/image",
        &json!({ "barcode": "424242", "image_url": "https://cdn.example/a.png" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("bearer {token}").parse().expect("header value"),
    );

    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_generation_keeps_lookup_status_and_payload() {
    let (baseline, _) = router_for(ProductService::new(
        memory_catalog(),
        quiet_enricher(Arc::new(InMemoryMessageCache::default())),
        options(true),
    ));
    let expected = read_json_body(
        baseline
            .oneshot(get("/api/v1/products/barcode/1001"))
            .await
            .expect("router responds"),
    )
    .await;

    let generator = Arc::new(BrokenGenerator::default());
    let enricher = Enricher::new(
        Arc::new(InMemoryMessageCache::default()),
        EnrichmentMode::Inline,
        Duration::from_secs(1),
        "English",
    )
    .with_generator(generator.clone());
    let (router, _) = router_for(ProductService::new(memory_catalog(), enricher, options(true)));

    let response = router
        .oneshot(get("/api/v1/products/barcode/1001"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;

    assert_eq!(generator.calls(), 1);
    for field in ["product", "score", "score_rating", "score_breakdown", "alternatives"] {
        assert_eq!(body[field], expected[field], "{field} changed");
    }
    assert_eq!(body["message"], json!(fallback_message("Plastic Milk", 57)));
}

#[tokio::test]
async fn background_lookup_does_not_wait_for_generation() {
    let generator = Arc::new(BrokenGenerator::slow(Duration::from_secs(2)));
    let enricher = Enricher::new(
        Arc::new(InMemoryMessageCache::default()),
        EnrichmentMode::Background,
        Duration::from_secs(5),
        "English",
    )
    .with_generator(generator);
    let (router, _) = router_for(ProductService::new(memory_catalog(), enricher, options(true)));

    let started = Instant::now();
    let response = router
        .oneshot(get("/api/v1/products/barcode/1001"))
        .await
        .expect("router responds");
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(elapsed < Duration::from_millis(500), "lookup took {elapsed:?}");
    let body = read_json_body(response).await;
    assert_eq!(body["score"], 57);
    assert!(body["message"].is_null());
}
