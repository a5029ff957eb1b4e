//! # Despacho de Requests CGI
//! src/cgi/mod.rs
//!
//! Este módulo decide si un path nombra una invocación CGI y extrae el
//! comando y sus argumentos.
//!
//! ## Gramática del path CGI
//!
//! ```text
//! cgi-bin/exec?cmd=<comando>&args=<argumentos-url-encoded>
//! ```
//!
//! Los argumentos vienen percent/plus-encoded; decodificados se separan por
//! espacios en blanco y el comando se antepone como argumento cero, según la
//! convención de `argv`.

/// Request CGI ya despachada: comando y lista ordenada de argumentos.
///
/// `argv[0]` es siempre el nombre del comando. Inmutable una vez parseada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiRequest {
    command: String,
    argv: Vec<String>,
}

/// Errores de despacho de un path que sí tiene el prefijo CGI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// El path tiene el prefijo CGI pero no contiene el marcador `&args=`;
    /// leer más allá sería indefinido, así que se trata como request malformada
    MissingArgsMarker,

    /// El nombre de comando quedó vacío (`cgi-bin/exec?cmd=&args=...`)
    EmptyCommand,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::MissingArgsMarker => {
                write!(f, "CGI path is missing the '&args=' marker")
            }
            DispatchError::EmptyCommand => write!(f, "CGI path has an empty command name"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Marcador que separa el comando de la cadena de argumentos
const ARGS_MARKER: &str = "&args=";

impl CgiRequest {
    /// Despacha un path contra el prefijo CGI configurado.
    ///
    /// Retorna:
    /// - `None` si el path no es una invocación CGI (el caller responde 404)
    /// - `Some(Err(_))` si tiene el prefijo pero está malformado
    /// - `Some(Ok(req))` con comando y argv extraídos
    ///
    /// Se tolera un `/` inicial: las request lines del caso base llevan el
    /// prefijo sin barra, pero un navegador real siempre la envía.
    ///
    /// # Ejemplo
    /// ```
    /// use cgi_server::cgi::CgiRequest;
    ///
    /// let req = CgiRequest::parse("cgi-bin/exec?cmd=echo&args=hello%2C+world%21", "cgi-bin/exec?cmd=")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(req.command(), "echo");
    /// assert_eq!(req.argv(), ["echo", "hello,", "world!"]);
    /// ```
    pub fn parse(path: &str, prefix: &str) -> Option<Result<Self, DispatchError>> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let rest = path.strip_prefix(prefix)?;
        Some(Self::parse_query(rest))
    }

    /// Parsea la porción `<comando>&args=<argumentos>` posterior al prefijo
    fn parse_query(rest: &str) -> Result<Self, DispatchError> {
        let marker = rest.find(ARGS_MARKER).ok_or(DispatchError::MissingArgsMarker)?;
        let command = rest[..marker].to_string();
        if command.is_empty() {
            return Err(DispatchError::EmptyCommand);
        }
        let args = url_decode(&rest[marker + ARGS_MARKER.len()..]);

        // argv[0] es el comando, después cada palabra de los argumentos
        let mut argv = vec![command.clone()];
        argv.extend(args.split_whitespace().map(str::to_string));

        Ok(Self { command, argv })
    }

    /// Obtiene el nombre del comando
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Obtiene la lista completa de argumentos (comando incluido como argv[0])
    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Decodifica un string percent/plus-encoded.
///
/// `+` se convierte en espacio y `%xx` en el byte con ese valor hexadecimal.
/// Un `%` que no va seguido de dos dígitos hex se conserva literal (el
/// servidor original abortaba en ese caso; aquí se endurece).
///
/// # Ejemplo
/// ```
/// use cgi_server::cgi::url_decode;
///
/// assert_eq!(url_decode("hello%2C+world%21"), "hello, world!");
/// assert_eq!(url_decode("plain"), "plain");
/// ```
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                match bytes
                    .get(i + 1..i + 3)
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
