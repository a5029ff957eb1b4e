//! # CGI Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor CGI.
//!
//! Dos modos de operación:
//! - servidor: escucha en `host:port` y atiende conexiones para siempre
//! - archivo: procesa una request simulada leída de `--input` y escribe la
//!   respuesta en `--output` (o stdout), para pruebas funcionales

use cgi_server::config::Config;
use cgi_server::server::{run_file_request, Server};

fn main() {
    println!("=================================");
    println!("  RedUnix CGI Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // clap reporta por sí solo los argumentos inválidos con un usage error
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    if config.input.is_some() {
        // Modo archivo: una sola request simulada
        if let Err(e) = run_file_request(&config) {
            eprintln!("💥 Error procesando la request simulada: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Modo servidor (esto bloquea el thread principal)
    let mut server = Server::new(config);
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
