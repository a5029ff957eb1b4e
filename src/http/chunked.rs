//! # Escritura Chunked de Respuestas
//! src/http/chunked.rs
//!
//! Codificador del protocolo de respuesta con `Transfer-Encoding: chunked`.
//! Cada chunk es `<longitud-en-hex>\r\n<bytes>\r\n` y el stream termina con
//! el chunk vacío `0\r\n\r\n`.
//!
//! La longitud declarada de cada chunk se calcula siempre del mismo buffer
//! que se escribe, de modo que es imposible por construcción que difiera
//! del payload transmitido.
//!
//! ## Máquina de estados
//!
//! ```text
//! Created → HeadersSent → Streaming → FinalChunkSent
//! ```
//!
//! Llamadas fuera de orden retornan `io::ErrorKind::InvalidInput`.

use super::StatusCode;
use std::io::{self, Write};

/// Estados del escritor chunked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Recién creado, aún no se envió nada
    Created,

    /// Status line y headers enviados
    HeadersSent,

    /// Al menos un chunk de body enviado
    Streaming,

    /// Chunk final `0\r\n\r\n` enviado; la conexión debe cerrarse
    FinalChunkSent,
}

/// Escritor de respuestas HTTP chunked sobre cualquier `Write`
pub struct ChunkedWriter<W: Write> {
    out: W,
    state: WriterState,
}

impl<W: Write> ChunkedWriter<W> {
    /// Crea un escritor sobre el stream de salida (socket o archivo)
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: WriterState::Created,
        }
    }

    fn bad_state(&self, op: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("chunked writer: {} called in state {:?}", op, self.state),
        )
    }

    /// Envía la status line y los headers fijos de la respuesta.
    ///
    /// Solo puede llamarse una vez, antes de cualquier chunk.
    pub fn send_headers(&mut self, status: StatusCode, content_type: &str) -> io::Result<()> {
        if self.state != WriterState::Created {
            return Err(self.bad_state("send_headers"));
        }
        write!(
            self.out,
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
            status, content_type
        )?;
        self.state = WriterState::HeadersSent;
        Ok(())
    }

    /// Envía un chunk con el payload dado.
    ///
    /// La longitud en hex se toma de `payload.len()`. Un payload vacío se
    /// ignora: el chunk de longitud cero está reservado para `finish()`.
    pub fn write_chunk(&mut self, payload: &[u8]) -> io::Result<()> {
        match self.state {
            WriterState::HeadersSent | WriterState::Streaming => {}
            _ => return Err(self.bad_state("write_chunk")),
        }
        if payload.is_empty() {
            return Ok(());
        }
        write!(self.out, "{:x}\r\n", payload.len())?;
        self.out.write_all(payload)?;
        self.out.write_all(b"\r\n")?;
        self.state = WriterState::Streaming;
        Ok(())
    }

    /// Envía el chunk terminador de longitud cero y hace flush.
    pub fn finish(&mut self) -> io::Result<()> {
        match self.state {
            WriterState::HeadersSent | WriterState::Streaming => {}
            _ => return Err(self.bad_state("finish")),
        }
        self.out.write_all(b"0\r\n\r\n")?;
        self.out.flush()?;
        self.state = WriterState::FinalChunkSent;
        Ok(())
    }

    /// Indica si ya se envió el chunk final
    pub fn is_finished(&self) -> bool {
        self.state == WriterState::FinalChunkSent
    }
}

/// Decodifica un body chunked validando estrictamente el framing: cada
/// longitud declarada debe coincidir con el payload y cada chunk debe
/// terminar en CRLF. Retorna los payloads (sin incluir el chunk final vacío).
///
/// Solo disponible para pruebas; la usan también las pruebas del handler.
#[cfg(test)]
pub fn dechunk(body: &[u8]) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    loop {
        let line_end = body[pos..]
            .windows(2)
            .position(|w| w == b"\r\n")
            .expect("missing chunk size line");
        let size_line = std::str::from_utf8(&body[pos..pos + line_end]).unwrap();
        let size = usize::from_str_radix(size_line, 16)
            .unwrap_or_else(|_| panic!("invalid chunk size: {:?}", size_line));
        pos += line_end + 2;
        if size == 0 {
            assert_eq!(&body[pos..pos + 2], b"\r\n", "final chunk must end with CRLF");
            break;
        }
        let payload = body[pos..pos + size].to_vec();
        pos += size;
        assert_eq!(&body[pos..pos + 2], b"\r\n", "chunk payload must end with CRLF");
        pos += 2;
        chunks.push(payload);
    }
    chunks
}

/// Separa una respuesta cruda en (headers, body) en el separador `\r\n\r\n`.
#[cfg(test)]
pub fn headers_and_body(raw: &[u8]) -> (String, Vec<u8>) {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("missing header separator");
    (
        String::from_utf8(raw[..split].to_vec()).unwrap(),
        raw[split + 4..].to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_format() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/html").unwrap();
        writer.finish().unwrap();

        let (headers, _) = headers_and_body(&buf);
        assert!(headers.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(headers.contains("Content-Type: text/html\r\n"));
        assert!(headers.contains("Transfer-Encoding: chunked\r\n"));
        assert!(headers.contains("Connection: close"));
    }

    #[test]
    fn test_single_chunk_framing() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/plain").unwrap();
        writer.write_chunk(b"hello\n").unwrap();
        writer.finish().unwrap();

        let (_, body) = headers_and_body(&buf);
        assert!(body.starts_with(b"6\r\nhello\n\r\n"));
        assert!(body.ends_with(b"0\r\n\r\n"));
    }

    #[test]
    fn test_declared_length_matches_payload() {
        // La longitud en hex de cada chunk debe ser exactamente la del payload,
        // incluso cuando cruza el umbral de un dígito hex (15 → 16 → 255 → 256)
        let payload_sizes = [1usize, 15, 16, 255, 256, 4096];
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/plain").unwrap();
        for size in payload_sizes {
            writer.write_chunk(&vec![b'x'; size]).unwrap();
        }
        writer.finish().unwrap();

        let (_, body) = headers_and_body(&buf);
        let chunks = dechunk(&body);
        assert_eq!(chunks.len(), payload_sizes.len());
        for (chunk, size) in chunks.iter().zip(payload_sizes) {
            assert_eq!(chunk.len(), size);
        }
    }

    #[test]
    fn test_payload_with_embedded_crlf() {
        // Los CRLF dentro del payload cuentan en la longitud y no rompen el framing
        let payload = b"\r\nExit code: 0\r\n";
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/html").unwrap();
        writer.write_chunk(payload).unwrap();
        writer.finish().unwrap();

        let (_, body) = headers_and_body(&buf);
        let chunks = dechunk(&body);
        assert_eq!(chunks, vec![payload.to_vec()]);
    }

    #[test]
    fn test_empty_payload_is_skipped() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/plain").unwrap();
        writer.write_chunk(b"").unwrap();
        writer.finish().unwrap();

        let (_, body) = headers_and_body(&buf);
        assert_eq!(body, b"0\r\n\r\n");
    }

    #[test]
    fn test_chunk_before_headers_is_error() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        let err = writer.write_chunk(b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_double_headers_is_error() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/plain").unwrap();
        let err = writer.send_headers(StatusCode::Ok, "text/plain").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_write_after_finish_is_error() {
        let mut buf = Vec::new();
        let mut writer = ChunkedWriter::new(&mut buf);
        writer.send_headers(StatusCode::Ok, "text/plain").unwrap();
        writer.finish().unwrap();
        assert!(writer.is_finished());
        assert!(writer.write_chunk(b"late").is_err());
        assert!(writer.finish().is_err());
    }
}
