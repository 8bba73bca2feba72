//! Router principal
//! 
//! Monta las rutas bajo `/api` y aplica las capas comunes: trazas HTTP,
//! rechazo de orígenes fuera de la lista blanca, CORS, captura de pánicos y
//! respuesta JSON para rutas desconocidas.

pub mod health_routes;

use axum::{
    http::{Method, Uri},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::middleware::cors::{cors_middleware_with_origins, reject_blocked_origin, OriginAllowList};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};

/// Crear el router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let allow_list = OriginAllowList::new(state.config.allowed_origins());

    let router = Router::new()
        .nest("/api", health_routes::create_health_router())
        .fallback(route_not_found);

    with_common_layers(router, allow_list).with_state(state)
}

/// Capas compartidas por todas las rutas
///
/// El rechazo de orígenes va por fuera de CORS para que también cubra los
/// preflight; CORS va por fuera de la captura de pánicos para que los 500
/// lleven sus cabeceras.
pub fn with_common_layers<S>(router: Router<S>, allow_list: OriginAllowList) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(from_fn_with_state(allow_list.clone(), reject_blocked_origin))
            .layer(cors_middleware_with_origins(allow_list))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

async fn route_not_found(method: Method, uri: Uri) -> AppError {
    not_found_error(&format!("Route {} {}", method, uri.path()))
}

/// Convertir un pánico de un handler en un 500 JSON con el texto del pánico
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        String::new()
    };
    error!("💥 Handler panicked: {}", detail);

    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn explode() -> &'static str {
        panic!("attendance ledger corrupted")
    }

    #[tokio::test]
    async fn test_handle_panic_keeps_panic_text() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "boom");
    }

    #[tokio::test]
    async fn test_handle_panic_unknown_payload_uses_generic_text() {
        let response = handle_panic(Box::new(42_u32));
        let body = json_body(response).await;
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_json_500_with_cors_headers() {
        let allow_list = OriginAllowList::new(vec!["http://localhost:5173".to_string()]);
        let app: Router = with_common_layers(Router::new().route("/api/explode", get(explode)), allow_list);

        let response = app
            .oneshot(
                Request::get("/api/explode")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "attendance ledger corrupted");
    }

    #[tokio::test]
    async fn test_blocked_origin_never_reaches_handler() {
        let allow_list = OriginAllowList::new(vec!["http://localhost:5173".to_string()]);
        let app: Router = with_common_layers(Router::new().route("/api/explode", get(explode)), allow_list);

        let response = app
            .oneshot(
                Request::get("/api/explode")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Not allowed by CORS");
    }
}
