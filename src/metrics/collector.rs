//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta métricas del servidor en tiempo real. Compartido entre el
//! accept loop y los threads de conexión vía `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests atendidas
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Comandos CGI despachados a un proceso hijo
    cgi_executions: u64,

    /// Threads de conexión activos actualmente
    active_threads: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                cgi_executions: 0,
                active_threads: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra una request atendida con su código de estado
    pub fn record_request(&self, status_code: u16, was_cgi: bool) {
        let mut data = self.inner.lock().unwrap();
        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        if was_cgi {
            data.cgi_executions += 1;
        }
    }

    /// Incrementa el contador de threads activos
    pub fn increment_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_threads += 1;
    }

    /// Decrementa el contador de threads activos
    pub fn decrement_active_threads(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_threads > 0 {
            data.active_threads -= 1;
        }
    }

    /// Obtiene el número de threads activos
    pub fn active_threads(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.active_threads
    }

    /// Obtiene un snapshot de las métricas
    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();
        MetricsSnapshot {
            total_requests: data.total_requests,
            cgi_executions: data.cgi_executions,
            not_found: data.status_codes.get(&404).copied().unwrap_or(0),
            active_threads: data.active_threads,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub cgi_executions: u64,
    pub not_found: u64,
    pub active_threads: u64,
    pub uptime_secs: u64,
}
