//! Utilidades del sistema
//! 
//! Este módulo contiene el manejo de errores HTTP compartido por las rutas.

pub mod errors;

pub use errors::{AppError, ErrorResponse};
