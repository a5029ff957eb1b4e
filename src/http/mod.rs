//! # Módulo HTTP
//!
//! Este módulo implementa la porción del protocolo HTTP que el servidor
//! necesita, sin usar librerías de alto nivel:
//!
//! - Extracción del path desde la request line
//! - Escritura de respuestas con Transfer-Encoding: chunked
//! - Manejo de status codes (200 y 404)
//!
//! El servidor no valida método ni versión: solo localiza la request line,
//! descarta los headers y responde siempre con `Connection: close`.
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Transfer-Encoding: chunked\r\n
//! Connection: close\r\n
//! \r\n
//! <hex-len>\r\n<bytes>\r\n
//! ...
//! 0\r\n\r\n
//! ```

pub mod chunked;
pub mod request;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use chunked::ChunkedWriter;
pub use status::StatusCode;
