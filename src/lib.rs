//! # CGI Server
//! src/lib.rs
//!
//! Servidor CGI concurrente implementado desde cero para demostrar
//! conceptos de sistemas operativos: procesos hijos, pipes, concurrencia
//! y monitoreo de recursos vía /proc.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de la request line y escritura chunked de respuestas
//! - `cgi`: Despacho de rutas cgi-bin (comando + argumentos url-encoded)
//! - `process`: Lanzamiento del proceso hijo con stdout redirigido a un pipe
//! - `stats`: Muestreo periódico de CPU/memoria del hijo vía /proc/<pid>/stat
//! - `render`: Construcción de los fragmentos HTML de la respuesta
//! - `server`: Listener TCP y pipeline por conexión
//! - `metrics`: Recolección de métricas y observabilidad
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use cgi_server::server::Server;
//! use cgi_server::config::Config;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod cgi;
pub mod config;
pub mod http;
pub mod metrics;
pub mod process;
pub mod render;
pub mod server;
pub mod stats;
