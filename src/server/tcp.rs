//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del listener TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread y el accept loop nunca espera a que un handler termine.
//!
//! No hay pool ni backpressure: la tasa de accept la limitan solo los
//! recursos del sistema operativo.

use crate::config::Config;
use crate::metrics::MetricsCollector;
use crate::server::handler::serve_client;
use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Servidor CGI concurrente con métricas
pub struct Server {
    config: Arc<Config>,
    metrics: MetricsCollector,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            metrics: MetricsCollector::new(),
            listener: None,
        }
    }

    /// Acceso al collector compartido (para pruebas y observabilidad)
    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    /// Hace bind del socket de escucha y retorna la dirección local.
    ///
    /// Separado de `run` para que las pruebas puedan usar el puerto 0
    /// (efímero) y conocer el puerto asignado antes de arrancar el loop.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        let local_addr = listener.local_addr()?;
        println!("[+] Servidor escuchando en {}", local_addr);
        println!("[*] Modo concurrente: un thread por conexion\n");

        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// Acepta conexiones para siempre, una en su propio thread cada vez
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self.listener.as_ref().expect("listener bound above");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let config = Arc::clone(&self.config);
                    let metrics = self.metrics.clone();

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {} (spawning thread)", peer_addr);

                    metrics.increment_active_threads();

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, config, metrics.clone()) {
                            // Fatal solo para esta conexión
                            eprintln!("   ❌ Error en thread: {}", e);
                        }
                        metrics.decrement_active_threads();
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Atiende una conexión: lectura bufferizada sobre un clon del socket,
    /// escritura directa sobre el original
    fn handle_connection(
        mut stream: TcpStream,
        config: Arc<Config>,
        metrics: MetricsCollector,
    ) -> io::Result<()> {
        let start = Instant::now();

        let mut reader = BufReader::new(stream.try_clone()?);
        let served = serve_client(&mut reader, &mut stream, &config)?;

        match served {
            Some(served) => {
                metrics.record_request(served.status.as_u16(), served.was_cgi);
                let snapshot = metrics.get_snapshot();
                println!(
                    "   ✅ {} {} ({:.2}ms) [total: {}, cgi: {}]\n",
                    served.status,
                    served.path,
                    start.elapsed().as_secs_f64() * 1000.0,
                    snapshot.total_requests,
                    snapshot.cgi_executions
                );
            }
            None => {
                println!("   ✅ Conexión cerrada sin request\n");
            }
        }

        Ok(())
    }
}
