//! Módulo de base de datos
//! 
//! Maneja la conexión con MongoDB y el arranque con reintentos

pub mod bootstrap;
pub mod connection;

pub use bootstrap::{BootstrapError, Bootstrapper, ConnectionAttempt};
pub use connection::{Connector, DatabaseConnection, DatabaseHandle, MongoConnector};
