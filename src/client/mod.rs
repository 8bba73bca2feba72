//! Cliente HTTP de la API de asistencia
//! 
//! Cliente `reqwest` que adjunta el token Bearer guardado y cierra la sesión
//! local cuando el servidor responde 401.

pub mod api_client;
pub mod token_store;

pub use api_client::{normalize_api_url, resolve_api_url, ApiClient, ClientError};
pub use token_store::{MemoryTokenStore, TokenStore};
