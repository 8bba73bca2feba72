//! Configuración del proyecto
//! 
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y el manejo de errores de configuración. Todo se lee una sola vez en `main`
//! y se pasa explícitamente a quien lo necesite.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::EnvironmentConfig;

use std::{fmt::Display, str::FromStr};
use thiserror::Error;
use tracing::info;

/// Errores de configuración (siempre fatales en el arranque)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Leer una variable opcional con valor por defecto, registrando el fallback
pub(crate) fn load_or_default<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: format!("'{}' ({})", raw, e),
        }),
        None => {
            info!("⚙️ {} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
pub(crate) fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}
