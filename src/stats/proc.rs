//! # Lectura de /proc/<pid>/stat
//! src/stats/proc.rs
//!
//! Fuente de estadísticas por proceso que expone el sistema operativo:
//! un registro estructurado pero delimitado por espacios en blanco.
//!
//! ## Contrato posicional (versionado)
//!
//! Campos 1-based sobre el registro separado por espacios:
//! - campo 3: estado del proceso (`R`, `S`, `Z`, …)
//! - campo 14: ticks de CPU en modo usuario
//! - campo 15: ticks de CPU en modo kernel
//! - campo 23: memoria residente
//!
//! El layout exacto es específico de Linux; por eso la lectura queda aislada
//! en este tipo, con la raíz de /proc como parámetro para que las pruebas
//! (o un sampler equivalente de otra plataforma) puedan sustituirla.
//!
//! Nota de portabilidad heredada del contrato: el split por espacios asume
//! que el nombre del ejecutable (campo 2, entre paréntesis) no contiene
//! espacios, y la memoria se divide entre 1000 tal como esperan los
//! resultados del caso base, no con una conversión páginas→KB real.

use super::StatSample;
use std::fs;
use std::path::PathBuf;

/// Índices 0-based de los campos del registro stat
const FIELD_STATE: usize = 2;
const FIELD_UTIME: usize = 13;
const FIELD_STIME: usize = 14;
const FIELD_RSS: usize = 22;

/// Divisor de memoria del caso base
const MEMORY_DIVISOR: i64 = 1000;

/// Frecuencia de ticks por defecto si sysconf no es consultable
const DEFAULT_CLOCK_TICKS: i64 = 100;

/// Lector del registro de estadísticas por proceso
#[derive(Debug, Clone)]
pub struct ProcStat {
    root: PathBuf,
    clock_ticks: i64,
}

impl ProcStat {
    /// Crea un lector sobre el /proc real, consultando la frecuencia de
    /// ticks del reloj de la plataforma con `sysconf(_SC_CLK_TCK)`
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Crea un lector con una raíz alternativa (fixtures en pruebas)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        Self {
            root: root.into(),
            clock_ticks: if ticks > 0 { ticks } else { DEFAULT_CLOCK_TICKS },
        }
    }

    /// Fija una frecuencia de ticks explícita (pruebas deterministas)
    pub fn with_clock_ticks(mut self, clock_ticks: i64) -> Self {
        self.clock_ticks = clock_ticks;
        self
    }

    /// Lee el registro stat del pid y lo separa en campos
    fn stat_fields(&self, pid: u32) -> std::io::Result<Vec<String>> {
        let path = self.root.join(pid.to_string()).join("stat");
        let raw = fs::read_to_string(path)?;
        Ok(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Chequeo no bloqueante de si el proceso terminó.
    ///
    /// El padre recolecta el estado de salida solo después de hacer join del
    /// muestreador, así que un hijo terminado es observable como zombie
    /// (estado `Z`). Un registro ilegible también cuenta como terminado:
    /// el proceso ya no existe.
    pub fn has_exited(&self, pid: u32) -> bool {
        match self.stat_fields(pid) {
            Ok(fields) => matches!(
                fields.get(FIELD_STATE).map(String::as_str),
                Some("Z") | Some("X") | None
            ),
            Err(_) => true,
        }
    }

    /// Toma una muestra de CPU y memoria del proceso.
    ///
    /// Una extracción fallida (campo ausente o no numérico) produce valores
    /// en cero para esa muestra en vez de abortar el loop de muestreo;
    /// comportamiento documentado, no endurecido.
    pub fn sample(&self, pid: u32, elapsed_secs: u64) -> StatSample {
        let fields = self.stat_fields(pid).unwrap_or_default();
        let ticks = self.clock_ticks as f32;

        let user_ticks: f32 = parse_field(&fields, FIELD_UTIME);
        let system_ticks: f32 = parse_field(&fields, FIELD_STIME);
        let rss: i64 = parse_field(&fields, FIELD_RSS);

        StatSample {
            elapsed_secs,
            user_time_secs: user_ticks / ticks,
            system_time_secs: system_ticks / ticks,
            resident_memory_kb: rss / MEMORY_DIVISOR,
        }
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new()
    }
}

/// Extrae y parsea un campo por índice; cero si falta o no es numérico
fn parse_field<T: std::str::FromStr + Default>(fields: &[String], index: usize) -> T {
    fields
        .get(index)
        .and_then(|f| f.parse().ok())
        .unwrap_or_default()
}
