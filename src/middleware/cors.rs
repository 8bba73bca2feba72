//! Middleware de CORS
//! 
//! Las peticiones sin cabecera `Origin` (curl, servidor a servidor) pasan
//! sin cambios. Un `Origin` fuera de la lista blanca se rechaza con 500
//! antes de llegar al router, igual que en el backend original; los
//! orígenes permitidos reciben las cabeceras CORS.

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::utils::errors::AppError;

pub const CORS_REJECTION_MESSAGE: &str = "Not allowed by CORS";

/// Lista blanca de orígenes
#[derive(Debug, Clone)]
pub struct OriginAllowList {
    origins: Arc<Vec<String>>,
}

impl OriginAllowList {
    pub fn new(origins: Vec<String>) -> Self {
        Self {
            origins: Arc::new(origins),
        }
    }

    /// Comparación exacta, ignorando una barra final
    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim_end_matches('/');
        self.origins.iter().any(|allowed| allowed == origin)
    }

    fn allows_header(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .map(|origin| self.is_allowed(origin))
            .unwrap_or(false)
    }
}

/// Rechazar peticiones cuyo `Origin` no está en la lista blanca
pub async fn reject_blocked_origin(
    State(allow_list): State<OriginAllowList>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allow_list.allows_header(origin) {
            warn!("🚫 Blocked CORS origin: {:?}", origin);
            return Err(AppError::Internal(CORS_REJECTION_MESSAGE.to_string()));
        }
    }

    Ok(next.run(request).await)
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(allow_list: OriginAllowList) -> CorsLayer {
    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
        allow_list.allows_header(origin)
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
