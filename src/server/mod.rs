//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes y lanza un thread por conexión
//! 3. Corre el pipeline por conexión (`handler`) sobre cada socket
//!
//! El mismo pipeline se reutiliza en el modo archivo, donde la "conexión"
//! es un par de archivos de entrada/salida.

pub mod handler;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use handler::{run_file_request, serve_client, ServedRequest};
pub use tcp::Server;
