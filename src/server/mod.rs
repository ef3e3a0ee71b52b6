//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes
//! 3. Lee y parsea requests HTTP
//! 4. Despacha cada request en la aplicación
//! 5. Escribe la respuesta al socket

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::Server;
