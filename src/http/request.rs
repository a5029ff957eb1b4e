//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! El servidor solo necesita la primera línea de la request:
//!
//! ```text
//! GET <path> HTTP/1.1\r\n
//! ```
//!
//! El path es el token entre el primer y el último espacio. El resto de
//! headers se lee y se descarta hasta la línea en blanco.

use std::io::BufRead;

/// Extrae el path de una request line de la forma `METHOD <path> VERSION`.
///
/// Retorna `None` si la línea no tiene al menos dos espacios distintos
/// (request malformada: el caller no debe despachar nada). Si el path
/// extraído es vacío (o es solo `/`), retorna el documento por defecto.
///
/// # Ejemplo
/// ```
/// use cgi_server::http::request::file_path;
///
/// let path = file_path("GET cgi-bin/exec?cmd=ls&args= HTTP/1.1", "index.html");
/// assert_eq!(path.as_deref(), Some("cgi-bin/exec?cmd=ls&args="));
///
/// assert_eq!(file_path("GET / HTTP/1.1", "index.html").as_deref(), Some("index.html"));
/// assert_eq!(file_path("garbage", "index.html"), None);
/// ```
pub fn file_path(line: &str, root_file: &str) -> Option<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let first = line.find(' ')?;
    let last = line.rfind(' ')?;
    if first == last {
        // Un solo espacio: no hay token entre primer y último espacio
        return None;
    }
    let path = &line[first + 1..last];
    if path.is_empty() || path == "/" {
        return Some(root_file.to_string());
    }
    Some(path.to_string())
}

/// Lee y descarta las líneas de headers hasta la línea en blanco.
///
/// El servidor no procesa headers del cliente; solo necesita consumirlos
/// para dejar el stream en una posición consistente.
pub fn discard_headers<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            // EOF antes de la línea en blanco: nada más que consumir
            return Ok(());
        }
        if line == "\r\n" || line == "\n" || line == "\r" {
            return Ok(());
        }
    }
}
