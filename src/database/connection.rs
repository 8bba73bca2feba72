//! Configuración de conexión a MongoDB
//! 
//! Este módulo abre el cliente de MongoDB y verifica que el servidor responde
//! antes de entregar el handle al resto de la aplicación.

use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};

use crate::config::DatabaseConfig;

/// Base de datos usada cuando la URI no nombra ninguna
pub const DEFAULT_DATABASE: &str = "attendance";

/// Un handle de conexión viva capaz de describir su endpoint
pub trait DatabaseHandle: Send {
    /// Host (o endpoint) al que quedó conectado
    fn host(&self) -> String;
}

/// Estrategia para abrir una conexión (un único intento)
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: DatabaseHandle;
    type Error: std::fmt::Display + Send;

    async fn connect(&self, config: &DatabaseConfig) -> Result<Self::Handle, Self::Error>;
}

/// Conexión establecida con MongoDB
#[derive(Clone, Debug)]
pub struct DatabaseConnection {
    client: Client,
    database: Database,
    host: String,
}

impl DatabaseConnection {
    /// Envolver un cliente ya construido
    pub fn from_client(client: Client, host: impl Into<String>) -> Self {
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        Self {
            client,
            database,
            host: host.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Base de datos por defecto (la de la URI o `attendance`)
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl DatabaseHandle for DatabaseConnection {
    fn host(&self) -> String {
        self.host.clone()
    }
}

/// Conector real contra MongoDB
#[derive(Debug, Clone)]
pub struct MongoConnector {
    app_name: String,
}

impl MongoConnector {
    pub fn new() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = DatabaseConnection;
    type Error = mongodb::error::Error;

    async fn connect(&self, config: &DatabaseConfig) -> Result<DatabaseConnection, mongodb::error::Error> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(self.app_name.clone());
        options.server_selection_timeout = Some(config.connect_timeout);

        let host = options
            .hosts
            .first()
            .map(|address| address.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let client = Client::with_options(options)?;

        // El driver conecta de forma perezosa: sin ping no sabemos si hay servidor
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        Ok(DatabaseConnection::from_client(client, host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_uri_fails_without_network() {
        let connector = MongoConnector::new();
        let result = connector.connect(&DatabaseConfig::new("not-a-mongodb-uri")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_default_database_from_uri() {
        let client = Client::with_uri_str("mongodb://localhost:27017/employees")
            .await
            .unwrap();
        let connection = DatabaseConnection::from_client(client, "localhost:27017");
        assert_eq!(connection.database().name(), "employees");
        assert_eq!(connection.host(), "localhost:27017");
    }

    #[tokio::test]
    async fn test_fallback_database_name() {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        let connection = DatabaseConnection::from_client(client, "localhost:27017");
        assert_eq!(connection.database().name(), DEFAULT_DATABASE);
    }
}
