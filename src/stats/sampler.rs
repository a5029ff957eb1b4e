//! # Loop de Muestreo Concurrente
//! src/stats/sampler.rs
//!
//! El muestreador corre en su propio thread, en paralelo con el streaming de
//! la salida del hijo: duerme un intervalo, hace un chequeo no bloqueante de
//! si el hijo terminó y, si sigue vivo, toma una muestra de CPU/memoria.
//!
//! El resultado se entrega como valor de retorno del thread: hacer join del
//! `JoinHandle` es el handoff productor→consumidor, de modo que el renderer
//! jamás puede observar una secuencia de muestras a medio construir. No hay
//! string mutable compartido ni mutex.
//!
//! Si el chequeo de salida nunca observa la terminación (fuga de proceso
//! externa), el loop continúa indefinidamente; limitación aceptada, no hay
//! timeout de guardia.

use super::{ProcStat, StatSample};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Muestreador de recursos de un proceso hijo
pub struct ResourceSampler {
    proc_stat: ProcStat,
    interval: Duration,
}

impl ResourceSampler {
    /// Crea un muestreador sobre el /proc real con el intervalo dado
    pub fn new(interval: Duration) -> Self {
        Self::with_source(ProcStat::new(), interval)
    }

    /// Crea un muestreador con una fuente de estadísticas alternativa
    pub fn with_source(proc_stat: ProcStat, interval: Duration) -> Self {
        Self { proc_stat, interval }
    }

    /// Arranca el loop de muestreo en un thread dedicado.
    ///
    /// El thread retorna la secuencia completa de muestras; el caller debe
    /// hacer join antes de renderizar las estadísticas.
    pub fn spawn(self, pid: u32) -> JoinHandle<Vec<StatSample>> {
        thread::spawn(move || self.run(pid))
    }

    /// El loop de muestreo: dormir, chequear salida, muestrear
    fn run(self, pid: u32) -> Vec<StatSample> {
        let mut samples = Vec::new();
        loop {
            thread::sleep(self.interval);
            if self.proc_stat.has_exited(pid) {
                return samples;
            }
            let elapsed = samples.len() as u64 + 1;
            samples.push(self.proc_stat.sample(pid, elapsed));
        }
    }
}
