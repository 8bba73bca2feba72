//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::database::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub database: DatabaseConnection,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, database: DatabaseConnection) -> Self {
        Self { config, database }
    }
}
