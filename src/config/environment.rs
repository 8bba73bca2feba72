//! Configuración de variables de entorno
//! 
//! Este módulo maneja la configuración del servidor HTTP y los orígenes
//! permitidos por CORS.

use super::{load_or_default, ConfigError};

pub const DEFAULT_FRONTEND_URL: &str = "https://employee-attendance-ecru.vercel.app";
/// Origen del servidor de desarrollo de Vite
pub const DEV_FRONTEND_URL: &str = "http://localhost:5173";

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub frontend_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            environment: load_or_default(&lookup, "ENVIRONMENT", defaults.environment)?,
            port: load_or_default(&lookup, "PORT", defaults.port)?,
            host: load_or_default(&lookup, "HOST", defaults.host)?,
            frontend_url: load_or_default(&lookup, "FRONTEND_URL", defaults.frontend_url)?,
        })
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Orígenes aceptados por CORS: el frontend desplegado y Vite en local
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.trim_end_matches('/').to_string()];
        if !origins.iter().any(|o| o == DEV_FRONTEND_URL) {
            origins.push(DEV_FRONTEND_URL.to_string());
        }
        origins
    }
}
