use attendance_api::client::{ApiClient, ClientError, MemoryTokenStore, TokenStore};
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Servidor de prueba que imita las rutas protegidas del backend
async fn spawn_server() -> String {
    async fn me(headers: HeaderMap) -> impl IntoResponse {
        match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some("Bearer valid-token") => (StatusCode::OK, Json(json!({ "name": "Ada" }))),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Not authorized" })),
            ),
        }
    }

    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({ "received": body, "content_type": content_type }))
    }

    async fn broken() -> impl IntoResponse {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Already checked in today" })),
        )
    }

    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/echo", post(echo))
        .route("/api/attendance/checkin", post(broken));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let base_url = spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("valid-token"));
    let client = ApiClient::new(base_url, tokens.clone()).unwrap();

    let body: Value = client.get("/auth/me").await.unwrap();
    assert_eq!(body["name"], "Ada");
    assert_eq!(tokens.token().as_deref(), Some("valid-token"));
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let base_url = spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("expired-token"));
    let client = ApiClient::new(base_url, tokens.clone()).unwrap();

    let result = client.get::<Value>("/auth/me").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
    assert_eq!(tokens.token(), None);
}

#[tokio::test]
async fn test_request_without_token_has_no_auth_header() {
    let base_url = spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::new(base_url, tokens).unwrap();

    let result = client.get::<Value>("/auth/me").await;
    assert!(matches!(result, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn test_post_sends_json() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(base_url, Arc::new(MemoryTokenStore::new())).unwrap();

    let body: Value = client
        .post("/echo", &json!({ "status": "present" }))
        .await
        .unwrap();
    assert_eq!(body["received"]["status"], "present");
    assert!(body["content_type"]
        .as_str()
        .unwrap()
        .starts_with("application/json"));
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let base_url = spawn_server().await;
    let tokens = Arc::new(MemoryTokenStore::with_token("valid-token"));
    let client = ApiClient::new(base_url, tokens.clone()).unwrap();

    let result = client.post::<_, Value>("/attendance/checkin", &json!({})).await;
    match result {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Already checked in today");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
    // Solo un 401 cierra la sesión
    assert_eq!(tokens.token().as_deref(), Some("valid-token"));
}
