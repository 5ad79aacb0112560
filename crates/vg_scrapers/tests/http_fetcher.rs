use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use vg_core::{ContentStore, Error};
use vg_scrapers::{build_http_client, ContentExtractor, HttpFetcher, PageFetcher};
use vg_storage::InMemoryStorage;

async fn spawn_site() -> String {
    let app = Router::new()
        .route(
            "/a",
            get(|| async {
                Html(r#"<html><head><meta name="description" content="desc A"></head></html>"#)
            }),
        )
        .route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "not here") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_page() {
    let base = spawn_site().await;
    let fetcher = HttpFetcher::new(build_http_client(None).unwrap());

    let body = fetcher.fetch(&format!("{}/a", base)).await.unwrap();
    assert!(body.contains("desc A"));
}

#[tokio::test]
async fn test_non_success_status_is_a_fetch_error() {
    let base = spawn_site().await;
    let fetcher = HttpFetcher::new(build_http_client(None).unwrap());

    let err = fetcher.fetch(&format!("{}/gone", base)).await.unwrap_err();
    match err {
        Error::Fetch { reason, .. } => assert!(reason.contains("404")),
        other => panic!("expected a fetch error, got {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_a_fetch_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let fetcher = HttpFetcher::new(build_http_client(None).unwrap());
    let err = fetcher.fetch(&format!("http://{}/a", addr)).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
}

#[tokio::test]
async fn test_extractor_over_http() {
    let base = spawn_site().await;
    let store = Arc::new(InMemoryStorage::new());
    let extractor = ContentExtractor::new(
        Arc::new(HttpFetcher::new(build_http_client(None).unwrap())),
        store.clone(),
    );

    let url = format!("{}/a", base);
    assert_eq!(extractor.extract_content(&url).await.unwrap(), "desc A");
    assert!(store.get_article(&url).await.unwrap().is_some());

    let missing = format!("{}/gone", base);
    assert!(matches!(
        extractor.extract_content(&missing).await,
        Err(Error::Fetch { .. })
    ));
    assert!(store.get_article(&missing).await.unwrap().is_none());
}
