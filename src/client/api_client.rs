//! Cliente HTTP para la API de asistencia
//!
//! Equivalente en servidor del cliente del frontend: URL base normalizada,
//! JSON por defecto, token Bearer en cada petición y cierre de sesión ante
//! un 401.

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, RequestBuilder, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::token_store::TokenStore;

/// URL usada cuando no se configura `API_URL`
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Errores del cliente
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Unauthorized: session cleared")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Asegurar que una URL absoluta apunte a `/api`
///
/// Si la ruta ya empieza por `/api` se devuelve tal cual; si no, se añade
/// `/api` conservando la ruta existente. Lo que no es una URL absoluta se
/// devuelve sin tocar.
pub fn normalize_api_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.cannot_be_a_base() || parsed.path().starts_with("/api") {
        return url.to_string();
    }

    let path = parsed.path();
    let path = path.strip_suffix('/').unwrap_or(path).to_string();
    parsed.set_path(&format!("{}/api", path));
    parsed.to_string()
}

/// URL base efectiva a partir del valor configurado
pub fn resolve_api_url(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => normalize_api_url(raw),
        None => DEFAULT_API_URL.to_string(),
    }
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Cliente HTTP con autenticación por token
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            tokens,
        })
    }

    /// Crear el cliente leyendo `API_URL` del entorno
    pub fn from_env(tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let raw = std::env::var("API_URL").ok();
        Self::new(resolve_api_url(raw.as_deref()), tokens)
    }

    /// Unir la URL base con una ruta relativa
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("📡 {} {}", status, response.url());

        if status == StatusCode::UNAUTHORIZED {
            warn!("🔒 401 from {}, clearing session", response.url());
            self.tokens.logout();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<MessageBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PATCH, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }
}
