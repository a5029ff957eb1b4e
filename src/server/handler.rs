//! # Pipeline por Conexión
//! src/server/handler.rs
//!
//! Orquesta el ciclo completo de una request sobre cualquier par de streams
//! (socket TCP o archivos en el modo de request simulada):
//!
//! ```text
//! request line → parser → dispatcher CGI
//!      → { proceso hijo + muestreador concurrente }
//!      → renderer → escritor chunked → cierre
//! ```
//!
//! El handler es dueño exclusivo de la conexión, del proceso hijo y de su
//! pipe; el muestreador corre en paralelo y solo conoce el pid. El join del
//! muestreador ocurre siempre antes de leer las estadísticas, que es el
//! único requisito de orden entre las dos tareas.

use crate::cgi::CgiRequest;
use crate::config::Config;
use crate::http::chunked::ChunkedWriter;
use crate::http::request::{discard_headers, file_path};
use crate::http::StatusCode;
use crate::process::{ChildProcess, EXIT_CODE_NOT_FOUND};
use crate::render::{exit_code_line, stats_block, PREAMBLE, TRAILER};
use crate::stats::ResourceSampler;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Duration;

/// Resumen de una request atendida, para logging y métricas
#[derive(Debug, Clone)]
pub struct ServedRequest {
    /// Path extraído de la request line (o la línea cruda si fue ilegible)
    pub path: String,

    /// Código de estado respondido
    pub status: StatusCode,

    /// Si la request despachó un comando CGI
    pub was_cgi: bool,
}

/// Atiende una conexión completa: lee la request, despacha y responde.
///
/// Retorna `None` si el cliente cerró sin enviar nada (no se responde nada).
/// Los fallos de I/O sobre los streams abortan solo esta request; el caller
/// decide si registrarlos.
pub fn serve_client<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    config: &Config,
) -> io::Result<Option<ServedRequest>> {
    // Request line; se tolera contenido no UTF-8 tratándolo con pérdida
    let mut raw_line = Vec::new();
    if reader.read_until(b'\n', &mut raw_line)? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(&raw_line).into_owned();

    let path = match file_path(&line, &config.root_file) {
        Some(path) => path,
        None => {
            // Request line malformada: 404 nombrando lo que llegó
            let offending = line.trim().to_string();
            send_not_found(writer, &offending)?;
            return Ok(Some(ServedRequest {
                path: offending,
                status: StatusCode::NotFound,
                was_cgi: false,
            }));
        }
    };

    // El resto de headers se lee y se ignora
    discard_headers(reader)?;

    match CgiRequest::parse(&path, &config.cgi_prefix) {
        Some(Ok(cgi)) => {
            run_cgi(writer, &cgi, config)?;
            Ok(Some(ServedRequest {
                path,
                status: StatusCode::Ok,
                was_cgi: true,
            }))
        }
        Some(Err(err)) => {
            // Prefijo CGI presente pero malformado (p. ej. sin `&args=`):
            // nunca se indexa más allá del final, se responde como not found
            println!("   ⚠️  CGI path malformado ({}): {}", err, path);
            send_not_found(writer, &path)?;
            Ok(Some(ServedRequest {
                path,
                status: StatusCode::NotFound,
                was_cgi: false,
            }))
        }
        None => {
            // Paths no CGI (archivos estáticos) están fuera del alcance
            send_not_found(writer, &path)?;
            Ok(Some(ServedRequest {
                path,
                status: StatusCode::NotFound,
                was_cgi: false,
            }))
        }
    }
}

/// Responde 404 con un body de texto plano que nombra el path ofensor
fn send_not_found<W: Write>(writer: &mut W, path: &str) -> io::Result<()> {
    let mut out = ChunkedWriter::new(writer);
    out.send_headers(StatusCode::NotFound, "text/plain")?;
    let msg = format!("The following file was not found: {}", path);
    out.write_chunk(msg.as_bytes())?;
    out.finish()
}

/// Ejecuta el comando CGI y transmite la respuesta chunked completa:
/// preámbulo, salida del hijo línea a línea, código de salida, bloque de
/// estadísticas y trailer.
fn run_cgi<W: Write>(writer: &mut W, cgi: &CgiRequest, config: &Config) -> io::Result<()> {
    let mut out = ChunkedWriter::new(writer);
    out.send_headers(StatusCode::Ok, "text/html")?;
    out.write_chunk(PREAMBLE.as_bytes())?;

    let interval = Duration::from_millis(config.sample_interval_ms);

    match ChildProcess::spawn(cgi.argv()) {
        Ok(mut child) => {
            // El muestreador arranca junto con el streaming y solo recibe
            // el pid; el handle del hijo queda aquí
            let sampler = ResourceSampler::new(interval).spawn(child.pid());

            let stdout = child.take_stdout().ok_or_else(|| {
                io::Error::new(io::ErrorKind::Other, "child stdout already taken")
            })?;
            let mut child_out = BufReader::new(stdout);

            // Cada línea del hijo (con su '\n') viaja como un chunk
            let mut line = Vec::new();
            loop {
                line.clear();
                if child_out.read_until(b'\n', &mut line)? == 0 {
                    break;
                }
                if !line.ends_with(b"\n") {
                    line.push(b'\n');
                }
                out.write_chunk(&line)?;
            }

            // EOF del pipe: join del muestreador ANTES de leer estadísticas
            // y recolección del código de salida del hijo
            let samples = sampler.join().unwrap_or_default();
            let exit_code = child.wait()?;

            out.write_chunk(exit_code_line(exit_code).as_bytes())?;
            out.write_chunk(stats_block(&samples, config.chart).as_bytes())?;
        }
        Err(_) => {
            // Comando inexistente: el fallo queda confinado a esta request,
            // se reporta como diagnóstico más un código distinto de cero
            let diagnostic = format!("Command {} not found!\n", cgi.command());
            out.write_chunk(diagnostic.as_bytes())?;
            out.write_chunk(exit_code_line(EXIT_CODE_NOT_FOUND).as_bytes())?;
            out.write_chunk(stats_block(&[], config.chart).as_bytes())?;
        }
    }

    out.write_chunk(TRAILER.as_bytes())?;
    out.finish()
}

/// Procesa una única request simulada leída de un archivo (modo funcional
/// de pruebas): la respuesta va al archivo de salida o a stdout.
pub fn run_file_request(config: &Config) -> io::Result<()> {
    let input = config.input.as_ref().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "file mode requires --input")
    })?;
    let mut reader = BufReader::new(File::open(input)?);

    match &config.output {
        Some(path) => {
            let mut output = File::create(path)?;
            serve_client(&mut reader, &mut output, config)?;
            output.flush()
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serve_client(&mut reader, &mut lock, config)?;
            lock.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::chunked::{dechunk, headers_and_body};
    use std::io::Cursor;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.sample_interval_ms = 50;
        config
    }

    fn serve(request: &str, config: &Config) -> (Option<ServedRequest>, Vec<u8>) {
        let mut reader = Cursor::new(request.as_bytes().to_vec());
        let mut response = Vec::new();
        let served = serve_client(&mut reader, &mut response, config).unwrap();
        (served, response)
    }

    #[test]
    fn test_scenario_echo_hello() {
        let config = fast_config();
        let (served, response) =
            serve("GET cgi-bin/exec?cmd=echo&args=hello HTTP/1.1\r\nHost: x\r\n\r\n", &config);

        let served = served.unwrap();
        assert_eq!(served.status, StatusCode::Ok);
        assert!(served.was_cgi);

        let (headers, body) = headers_and_body(&response);
        assert!(headers.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(headers.contains("Transfer-Encoding: chunked"));
        assert!(headers.contains("Connection: close"));

        // dechunk valida que cada longitud declarada coincide con el payload
        let chunks = dechunk(&body);
        assert_eq!(chunks[0], PREAMBLE.as_bytes());
        assert!(chunks.iter().any(|c| c == b"hello\n"));
        assert!(chunks.iter().any(|c| c == b"\r\nExit code: 0\r\n"));

        let dechunked: Vec<u8> = chunks.concat();
        let text = String::from_utf8_lossy(&dechunked);
        assert!(text.contains("Runtime statistics"));
        assert!(text.contains("<tr><th>Time (sec)</th>"));
        assert!(text.ends_with(TRAILER));
    }

    #[test]
    fn test_scenario_missing_file_is_404() {
        let config = fast_config();
        let (served, response) = serve("GET /missing.html HTTP/1.1\r\n\r\n", &config);

        let served = served.unwrap();
        assert_eq!(served.status, StatusCode::NotFound);
        assert!(!served.was_cgi);

        let (headers, body) = headers_and_body(&response);
        assert!(headers.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(headers.contains("Content-Type: text/plain"));

        let chunks = dechunk(&body);
        let text = String::from_utf8(chunks.concat()).unwrap();
        assert_eq!(text, "The following file was not found: /missing.html");
    }

    #[test]
    fn test_scenario_unknown_command_still_terminates() {
        let config = fast_config();
        let (served, response) = serve(
            "GET cgi-bin/exec?cmd=not_a_real_binary_xyz&args= HTTP/1.1\r\n\r\n",
            &config,
        );

        assert_eq!(served.unwrap().status, StatusCode::Ok);

        let (headers, body) = headers_and_body(&response);
        assert!(headers.starts_with("HTTP/1.1 200 OK\r\n"));

        // El body termina con un chunk final bien formado (dechunk lo exige)
        let chunks = dechunk(&body);
        let text = String::from_utf8_lossy(&chunks.concat()).into_owned();
        assert!(text.contains("Command not_a_real_binary_xyz not found!"));
        assert!(text.contains("Exit code: 127"));
        assert!(text.ends_with(TRAILER));
    }

    #[test]
    fn test_cgi_path_without_args_marker_is_404() {
        let config = fast_config();
        let (served, response) = serve("GET cgi-bin/exec?cmd=echo HTTP/1.1\r\n\r\n", &config);

        assert_eq!(served.unwrap().status, StatusCode::NotFound);
        let (_, body) = headers_and_body(&response);
        let text = String::from_utf8(dechunk(&body).concat()).unwrap();
        assert!(text.contains("cgi-bin/exec?cmd=echo"));
    }

    #[test]
    fn test_malformed_request_line_is_404() {
        let config = fast_config();
        let (served, response) = serve("garbage\r\n\r\n", &config);

        assert_eq!(served.unwrap().status, StatusCode::NotFound);
        let (headers, _) = headers_and_body(&response);
        assert!(headers.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_empty_connection_is_ignored() {
        let config = fast_config();
        let (served, response) = serve("", &config);
        assert!(served.is_none());
        assert!(response.is_empty());
    }

    #[test]
    fn test_long_running_child_produces_sample_rows() {
        let config = fast_config();
        let (_, response) =
            serve("GET cgi-bin/exec?cmd=sleep&args=0.4 HTTP/1.1\r\n\r\n", &config);

        let (_, body) = headers_and_body(&response);
        let text = String::from_utf8(dechunk(&body).concat()).unwrap();
        // Con intervalo de 50ms y un hijo de ~400ms debe haber filas de datos
        assert!(text.contains("<tr><td>1</td>"), "expected a data row: {}", text);
    }

    #[test]
    fn test_chart_disabled_omits_triples() {
        let mut config = fast_config();
        config.chart = false;
        let (_, response) =
            serve("GET cgi-bin/exec?cmd=sleep&args=0.2 HTTP/1.1\r\n\r\n", &config);

        let (_, body) = headers_and_body(&response);
        let text = String::from_utf8(dechunk(&body).concat()).unwrap();
        assert!(text.contains("getChartData"));
        assert!(!text.contains("],\n          ["));
    }

    #[test]
    fn test_multi_line_output_one_chunk_per_line() {
        let config = fast_config();
        let (_, response) =
            serve("GET cgi-bin/exec?cmd=printf&args=a%5Cnb%5Cn HTTP/1.1\r\n\r\n", &config);

        let (_, body) = headers_and_body(&response);
        let chunks = dechunk(&body);
        assert!(chunks.iter().any(|c| c == b"a\n"));
        assert!(chunks.iter().any(|c| c == b"b\n"));
    }

    #[test]
    fn test_file_mode_writes_response_file() {
        use std::io::Read;

        let dir = tempfile::TempDir::new().unwrap();
        let input_path = dir.path().join("request.txt");
        let output_path = dir.path().join("response.txt");
        std::fs::write(
            &input_path,
            "GET cgi-bin/exec?cmd=echo&args=file+mode HTTP/1.1\r\n\r\n",
        )
        .unwrap();

        let mut config = fast_config();
        config.chart = false;
        config.input = Some(input_path);
        config.output = Some(output_path.clone());

        run_file_request(&config).unwrap();

        let mut raw = Vec::new();
        std::fs::File::open(&output_path)
            .unwrap()
            .read_to_end(&mut raw)
            .unwrap();
        let (headers, body) = headers_and_body(&raw);
        assert!(headers.starts_with("HTTP/1.1 200 OK\r\n"));
        let text = String::from_utf8(dechunk(&body).concat()).unwrap();
        assert!(text.contains("file mode"));
        assert!(text.contains("Exit code: 0"));
    }
}
