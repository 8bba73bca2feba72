//! API de asistencia de empleados
//! 
//! Backend HTTP sobre MongoDB: arranque de la base de datos con reintentos,
//! router Axum con CORS y cliente HTTP autenticado por token.

pub mod client;
pub mod config;
pub mod database;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod utils;
