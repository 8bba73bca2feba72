//! Arranque de la base de datos con reintentos
//!
//! Abre la conexión una sola vez al iniciar el proceso. Los fallos
//! transitorios se reintentan con backoff lineal (`base * intento`); al
//! agotar los intentos se devuelve un error fatal y es `main` quien termina
//! el proceso.

use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use super::connection::{Connector, DatabaseHandle};
use crate::config::{ConfigError, DatabaseConfig};

/// Motivos por los que el arranque no puede continuar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("MongoDB configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("MongoDB connection failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

/// Registro efímero de un intento fallido
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAttempt {
    pub attempt_number: u32,
    pub error_message: String,
}

/// Retardo antes del intento `attempt + 1`
pub fn linear_backoff(base_delay: Duration, attempt: u32) -> Duration {
    base_delay.saturating_mul(attempt)
}

/// Secuencia de arranque de un solo uso: `run` consume el bootstrapper
pub struct Bootstrapper<C> {
    connector: C,
    config: DatabaseConfig,
}

impl<C: Connector> Bootstrapper<C> {
    pub fn new(connector: C, config: DatabaseConfig) -> Self {
        Self { connector, config }
    }

    /// Construir desde pares clave/valor; sin URI no se intenta ninguna conexión
    pub fn from_lookup<F>(connector: C, lookup: F) -> Result<Self, BootstrapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = DatabaseConfig::from_lookup(lookup).map_err(|e| {
            error!("❌ MongoDB Connection Error: {}", e);
            BootstrapError::from(e)
        })?;
        Ok(Self::new(connector, config))
    }

    /// Construir desde las variables de entorno del proceso
    pub fn from_env(connector: C) -> Result<Self, BootstrapError> {
        Self::from_lookup(connector, |key| std::env::var(key).ok())
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Intentar conectar hasta `max_retries` veces
    pub async fn run(self) -> Result<C::Handle, BootstrapError> {
        let max_retries = self.config.max_retries;
        info!(
            "🔌 Connecting to MongoDB at {} (max {} attempts)",
            self.config.masked_uri(),
            max_retries
        );

        let mut last_failure: Option<ConnectionAttempt> = None;

        for attempt_number in 1..=max_retries {
            match self.connector.connect(&self.config).await {
                Ok(handle) => {
                    info!(
                        "✅ MongoDB Connected: {} (attempt {}/{})",
                        handle.host(),
                        attempt_number,
                        max_retries
                    );
                    return Ok(handle);
                }
                Err(e) => {
                    let failure = ConnectionAttempt {
                        attempt_number,
                        error_message: e.to_string(),
                    };
                    error!(
                        "❌ MongoDB Connection Error (attempt {}/{}): {}",
                        failure.attempt_number, max_retries, failure.error_message
                    );

                    if attempt_number < max_retries {
                        let delay = linear_backoff(self.config.base_delay, attempt_number);
                        warn!("🔄 Retrying in {:.1}s ...", delay.as_secs_f64());
                        tokio::time::sleep(delay).await;
                    }

                    last_failure = Some(failure);
                }
            }
        }

        error!("💥 Exhausted all retries. Exiting.");
        let (attempts, last_error) = last_failure
            .map(|failure| (failure.attempt_number, failure.error_message))
            .unwrap_or_default();
        Err(BootstrapError::RetriesExhausted {
            attempts,
            last_error,
        })
    }
}
