//! Integration tests for the HTML pages and static scripts.

use std::fs;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

fn site() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let templates = temp_dir.path().join("templates");
    let statics = temp_dir.path().join("static");
    fs::create_dir_all(&templates).unwrap();
    fs::create_dir_all(&statics).unwrap();

    for page in ["index", "symptoms", "community"] {
        fs::write(templates.join(format!("{page}.html")), format!("<h1>{page}</h1>")).unwrap();
    }
    fs::write(statics.join("script.js"), "console.log('home');").unwrap();

    (symlog_api::pages::router(&templates, &statics), temp_dir)
}

async fn get(router: &axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_pages_are_served() {
    let (router, _temp_dir) = site();

    assert_eq!(get(&router, "/").await, (StatusCode::OK, "<h1>index</h1>".to_string()));
    assert_eq!(
        get(&router, "/symptoms").await,
        (StatusCode::OK, "<h1>symptoms</h1>".to_string())
    );
    assert_eq!(
        get(&router, "/community").await,
        (StatusCode::OK, "<h1>community</h1>".to_string())
    );
}

#[tokio::test]
async fn test_scripts_are_served_under_static() {
    let (router, _temp_dir) = site();

    let (status, body) = get(&router, "/static/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('home');");

    let (status, _) = get(&router, "/static/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&router, "/script.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
