//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor CGI con soporte completo
//! para argumentos CLI y variables de entorno.
//!
//! Las constantes que el servidor original llevaba como globales implícitos
//! (documento por defecto, prefijo CGI, intervalo de muestreo) viven aquí
//! como valores de configuración explícitos.
//!
//! ## Ejemplos de uso
//!
//! ### Modo servidor
//! ```bash
//! ./cgi_server --port 4040 --chart true
//! ```
//!
//! ### Modo archivo (una request simulada, para pruebas funcionales)
//! ```bash
//! ./cgi_server --input base_case1_inputs.txt --output result.txt --chart false
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! CGI_PORT=4040 CGI_HOST=0.0.0.0 ./cgi_server
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Configuración del servidor CGI
#[derive(Debug, Clone, Parser)]
#[command(name = "cgi_server")]
#[command(about = "Servidor CGI concurrente con monitoreo de recursos para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4040", env = "CGI_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "CGI_HOST")]
    pub host: String,

    /// Documento por defecto cuando la request pide la raíz
    #[arg(long = "root-file", default_value = "index.html", env = "CGI_ROOT_FILE")]
    pub root_file: String,

    /// Prefijo de path que identifica una invocación CGI
    #[arg(long = "cgi-prefix", default_value = "cgi-bin/exec?cmd=", env = "CGI_PREFIX")]
    pub cgi_prefix: String,

    /// Generar datos de gráfico junto a la tabla de estadísticas
    #[arg(long = "chart", default_value_t = true, action = clap::ArgAction::Set, env = "CGI_CHART")]
    pub chart: bool,

    /// Intervalo de muestreo de recursos del proceso hijo en milisegundos
    #[arg(long = "sample-interval-ms", default_value = "1000", env = "CGI_SAMPLE_INTERVAL_MS")]
    pub sample_interval_ms: u64,

    // === Modo archivo ===

    /// Archivo con una request simulada; si se indica, el servidor no escucha
    /// en TCP y procesa solo esa request
    #[arg(long, env = "CGI_INPUT")]
    pub input: Option<PathBuf>,

    /// Archivo donde escribir la respuesta del modo archivo
    /// (por defecto se escribe a stdout)
    #[arg(long, env = "CGI_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use cgi_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4040");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_interval_ms == 0 {
            return Err("Sample interval must be > 0 ms".to_string());
        }
        if self.cgi_prefix.is_empty() {
            return Err("CGI prefix must not be empty".to_string());
        }
        if self.root_file.is_empty() {
            return Err("Root file must not be empty".to_string());
        }
        if self.output.is_some() && self.input.is_none() {
            return Err("--output requires --input".to_string());
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════╗");
        println!("║       RedUnix CGI Server Configuration       ║");
        println!("╚══════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Root file:    {}", self.root_file);
        println!("   CGI prefix:   {}", self.cgi_prefix);
        println!();
        println!("📊 Resource sampling:");
        println!("   Interval:     {} ms", self.sample_interval_ms);
        println!("   Chart data:   {}", if self.chart { "enabled" } else { "disabled" });
        if let Some(input) = &self.input {
            println!();
            println!("📄 File mode:");
            println!("   Input:        {}", input.display());
            match &self.output {
                Some(output) => println!("   Output:       {}", output.display()),
                None => println!("   Output:       stdout"),
            }
        }
        println!();
        println!("═══════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4040,
            host: "127.0.0.1".to_string(),
            root_file: "index.html".to_string(),
            cgi_prefix: "cgi-bin/exec?cmd=".to_string(),
            chart: true,
            sample_interval_ms: 1000,
            input: None,
            output: None,
        }
    }
}
