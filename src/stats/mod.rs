//! # Muestreo de Recursos del Proceso Hijo
//! src/stats/mod.rs
//!
//! Este módulo implementa el monitoreo concurrente del proceso hijo:
//! - `proc`: lectura del registro /proc/<pid>/stat (contrato posicional)
//! - `sampler`: el loop de muestreo de una vez por segundo en su propio thread
//!
//! El muestreador solo conoce el `pid` del hijo; nunca el pipe ni el handle.

pub mod proc;
pub mod sampler;

pub use proc::ProcStat;
pub use sampler::ResourceSampler;

/// Una muestra de uso de recursos del proceso hijo.
///
/// Se produce exactamente una por intervalo de muestreo mientras el hijo
/// viva; `elapsed_secs` crece 1, 2, 3, … sin huecos por construcción.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSample {
    /// Segundo (índice de muestreo) al que corresponde la muestra
    pub elapsed_secs: u64,

    /// Tiempo de CPU en modo usuario acumulado, en segundos
    pub user_time_secs: f32,

    /// Tiempo de CPU en modo kernel acumulado, en segundos
    pub system_time_secs: f32,

    /// Memoria residente en KB (divisor del caso base, ver `proc`)
    pub resident_memory_kb: i64,
}

impl StatSample {
    /// Tiempo total de CPU (usuario + kernel) usado por el gráfico
    pub fn cpu_time_secs(&self) -> f32 {
        self.user_time_secs + self.system_time_secs
    }
}
