//! Configuración de base de datos
//! 
//! Parámetros de conexión a MongoDB y de la política de reintentos del arranque.

use std::time::Duration;

use super::{load_or_default, ConfigError};

pub const MONGODB_URI_VAR: &str = "MONGODB_URI";
pub const MAX_RETRIES_VAR: &str = "DB_MAX_RETRIES";
pub const RETRY_DELAY_VAR: &str = "DB_RETRY_DELAY_MS";
pub const CONNECT_TIMEOUT_VAR: &str = "DB_CONNECT_TIMEOUT_MS";

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Configuración de la base de datos, inmutable durante la vida del proceso
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub uri: String,
    /// Número máximo de intentos (siempre >= 1)
    pub max_retries: u32,
    /// Unidad base del backoff lineal
    pub base_delay: Duration,
    /// Límite de un intento individual (server selection)
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Cargar desde una fuente arbitraria de pares clave/valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(MONGODB_URI_VAR)
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::Missing(MONGODB_URI_VAR))?;

        let max_retries = load_or_default(&lookup, MAX_RETRIES_VAR, DEFAULT_MAX_RETRIES)?;
        if max_retries == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_RETRIES_VAR,
                message: "must be at least 1".to_string(),
            });
        }

        let base_delay_ms = load_or_default(&lookup, RETRY_DELAY_VAR, DEFAULT_RETRY_DELAY_MS)?;
        let connect_timeout_ms =
            load_or_default(&lookup, CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_MS)?;

        Ok(Self {
            uri,
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
        })
    }

    /// URI sin credenciales, apta para logs
    pub fn masked_uri(&self) -> String {
        mask_database_url(&self.uri)
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    // Las credenciales solo pueden estar en la autoridad, antes de la ruta o la query
    let authority_end = rest.find(&['/', '?'][..]).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at_pos) => format!("{}***:***@{}", &url[..scheme_end + 3], &rest[at_pos + 1..]),
        None => url.to_string(),
    }
}
