use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use client_core::{
    CatalogLoader, CatalogState, FetchError, HttpProductSource, HttpSourceConfig, ProductSource,
};
use serde_json::{json, Value};
use shared::domain::ProductId;
use tokio::{net::TcpListener, time::timeout};

#[derive(Clone, Default)]
struct ServerState {
    flaky_calls: Arc<AtomicUsize>,
}

fn catalog_body() -> Value {
    json!([
        {
            "id": 1,
            "nombre": "Casa Roja",
            "descripcion": "Two floors near the park",
            "precio": 50000.0,
            "categoria": "Summer Rentals",
            "imagen": "https://img.example/casa.png"
        },
        {
            "id": 2,
            "nombre": "Depto Azul",
            "descripcion": "Sea view",
            "precio": 42000.0,
            "categoria": "Properties for Sale",
            "imagen": "https://img.example/depto.png"
        }
    ])
}

async fn products() -> Json<Value> {
    Json(catalog_body())
}

async fn failing() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"code": "internal", "message": "catalog database offline"})),
    )
}

async fn malformed() -> &'static str {
    "<html>maintenance</html>"
}

async fn duplicates() -> Json<Value> {
    Json(json!([
        {"id": 3, "nombre": "A", "precio": 1.0},
        {"id": 3, "nombre": "B", "precio": 2.0}
    ]))
}

async fn negative_price() -> Json<Value> {
    Json(json!([{"id": 1, "nombre": "X", "precio": -500.0}]))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(catalog_body())
}

async fn flaky(State(state): State<ServerState>) -> impl IntoResponse {
    if state.flaky_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!([]))).into_response()
    } else {
        Json(catalog_body()).into_response()
    }
}

async fn spawn_catalog_server() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/productos", get(products))
        .route("/failing", get(failing))
        .route("/malformed", get(malformed))
        .route("/duplicates", get(duplicates))
        .route("/negative-price", get(negative_price))
        .route("/slow", get(slow))
        .route("/flaky", get(flaky))
        .with_state(ServerState::default());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn source(server_url: &str, endpoint: &str) -> HttpProductSource {
    let mut config = HttpSourceConfig::new(server_url);
    config.endpoint = endpoint.to_string();
    config.timeout = Duration::from_millis(500);
    HttpProductSource::new(&config).expect("http source")
}

#[tokio::test]
async fn decodes_backend_catalog() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let products = source(&server_url, "productos")
        .get_products()
        .await
        .expect("products");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId(1));
    assert_eq!(products[0].name, "Casa Roja");
    assert_eq!(products[1].category, "Properties for Sale");
}

#[tokio::test]
async fn non_success_status_carries_api_error_message() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let err = source(&server_url, "failing")
        .get_products()
        .await
        .expect_err("should fail");

    match err {
        FetchError::Status { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("catalog database offline"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let err = source(&server_url, "malformed")
        .get_products()
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn duplicate_ids_are_rejected() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let err = source(&server_url, "duplicates")
        .get_products()
        .await
        .expect_err("should fail");
    assert!(matches!(err, FetchError::DuplicateId(ProductId(3))));
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let err = source(&server_url, "negative-price")
        .get_products()
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        FetchError::InvalidPrice { id: ProductId(1), .. }
    ));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let err = source(&server_url, "slow")
        .get_products()
        .await
        .expect_err("should time out");
    assert!(matches!(err, FetchError::Timeout));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = source(&format!("http://{addr}"), "productos")
        .get_products()
        .await
        .expect_err("nothing listening");
    assert!(matches!(
        err,
        FetchError::Transport(_) | FetchError::Timeout
    ));
}

#[tokio::test]
async fn loader_recovers_through_explicit_retry() {
    let server_url = spawn_catalog_server().await.expect("spawn server");
    let loader = CatalogLoader::spawn(Arc::new(source(&server_url, "flaky")));

    let first = timeout(Duration::from_secs(2), loader.wait_settled())
        .await
        .expect("settled");
    assert_eq!(first, CatalogState::Error);

    loader.retry();
    let second = timeout(Duration::from_secs(2), loader.wait_settled())
        .await
        .expect("settled");
    let names: Vec<_> = second
        .products()
        .expect("success")
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(names, ["Casa Roja", "Depto Azul"]);

    let groups = second.categories();
    assert_eq!(groups.len(), 2);
    assert_eq!(
        loader.find_by_id(ProductId(2)).map(|p| p.name),
        Some("Depto Azul".to_string())
    );
}
