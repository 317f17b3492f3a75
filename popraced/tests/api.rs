//! Integration tests for the provider endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! binding a socket; each test gets its own throwaway document path.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

// The binary's modules, compiled into the test as source.
#[path = "../src/routes.rs"]
mod routes;
#[path = "../src/store.rs"]
mod store;

use routes::{build_router, AppState};
use store::DocStore;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("popraced-api-{name}-{}", std::process::id()))
}

fn make_router(doc: Option<&str>, name: &str) -> (axum::Router, PathBuf) {
    let path = temp_path(name);
    let _ = fs::remove_file(&path);
    if let Some(contents) = doc {
        fs::write(&path, contents).unwrap();
    }
    let state = Arc::new(AppState {
        store: DocStore::open(&path),
    });
    let flags = temp_path(&format!("{name}-flags"));
    fs::create_dir_all(&flags).unwrap();
    (build_router(state, flags), path)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn population_returns_document_without_id() {
    let (router, path) = make_router(
        Some(
            r#"{"_id":"651f2","1950":[{"Country_name":"X","Population":100,"Continent":"Asia","Flags":"x"}]}"#,
        ),
        "strip-id",
    );

    let response = router
        .oneshot(Request::get("/population").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("_id").is_none());
    assert_eq!(json["1950"][0]["Country_name"], "X");
    assert_eq!(json["1950"][0]["Population"], 100);
    let _ = fs::remove_file(path);
}

#[tokio::test]
async fn empty_store_returns_empty_object_with_200() {
    let (router, _path) = make_router(None, "empty");

    let response = router
        .oneshot(Request::get("/population").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::json!({}));
}

#[tokio::test]
async fn store_fault_is_a_generic_500() {
    let (router, path) = make_router(Some("definitely not json"), "corrupt");

    let response = router
        .oneshot(Request::get("/population").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    // The generic message, no leaked detail.
    assert_eq!(json, serde_json::json!({ "message": "Internal Server Error" }));
    let _ = fs::remove_file(path);
}

#[tokio::test]
async fn flags_are_served_from_the_flags_dir() {
    let (router, path) = make_router(None, "flags");
    let flags = temp_path("flags-flags");
    fs::write(flags.join("x.svg"), "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

    let response = router
        .oneshot(Request::get("/flags/x.svg").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let _ = fs::remove_file(path);
}
