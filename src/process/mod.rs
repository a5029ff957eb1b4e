//! # Lanzamiento del Proceso Hijo
//! src/process/mod.rs
//!
//! Este módulo crea el proceso hijo que ejecuta el comando CGI con su
//! stdout redirigido a un pipe unidireccional. El extremo de escritura del
//! lado del padre lo cierra el runtime al terminar el spawn, de modo que el
//! extremo de lectura observa EOF cuando el hijo termina.
//!
//! El handle es un recurso con adquisición acotada: pase lo que pase en el
//! handler, el estado de salida del hijo se recolecta (ver `Drop`), así que
//! ningún zombie sobrevive a la conexión que lo creó.

use std::io;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Código de salida reportado cuando el comando no existe o el estado real
/// no es observable (por ejemplo, terminado por señal)
pub const EXIT_CODE_NOT_FOUND: i32 = 127;

/// Proceso hijo en ejecución con su stdout capturado por pipe.
///
/// Es propiedad exclusiva del handler de la conexión que lo creó; el
/// muestreador de recursos solo recibe el `pid` (identificador no-dueño).
pub struct ChildProcess {
    inner: Child,
    waited: bool,
}

impl ChildProcess {
    /// Lanza el comando con la lista de argumentos dada.
    ///
    /// `argv[0]` es el comando; el resto son sus argumentos. El fallo de
    /// ejecución (comando inexistente) queda confinado: retorna `Err` y el
    /// caller lo reporta como una línea de diagnóstico más un código de
    /// salida distinto de cero, nunca como una caída del servidor.
    pub fn spawn(argv: &[String]) -> io::Result<Self> {
        let (command, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty argv"))?;
        let inner = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()?;
        Ok(Self {
            inner,
            waited: false,
        })
    }

    /// Obtiene el identificador de proceso del hijo
    pub fn pid(&self) -> u32 {
        self.inner.id()
    }

    /// Toma el extremo de lectura del pipe de stdout.
    ///
    /// Solo puede tomarse una vez; llamadas posteriores retornan `None`.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.inner.stdout.take()
    }

    /// Espera a que el hijo termine y retorna su código de salida.
    ///
    /// Si el proceso murió por señal (sin código), se reporta
    /// `EXIT_CODE_NOT_FOUND`.
    pub fn wait(&mut self) -> io::Result<i32> {
        let status = self.inner.wait()?;
        self.waited = true;
        Ok(status.code().unwrap_or(EXIT_CODE_NOT_FOUND))
    }
}

impl Drop for ChildProcess {
    /// Garantiza la recolección del estado de salida en toda ruta de salida,
    /// incluidas las de error: si el handler aborta (cliente desconectado)
    /// el hijo se espera aquí y nunca queda zombie.
    fn drop(&mut self) {
        if !self.waited {
            let _ = self.inner.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_spawn_captures_stdout() {
        let mut child = ChildProcess::spawn(&argv(&["echo", "hello"])).unwrap();
        assert!(child.pid() > 0);

        let mut output = String::new();
        child.take_stdout().unwrap().read_to_string(&mut output).unwrap();
        assert_eq!(output, "hello\n");

        assert_eq!(child.wait().unwrap(), 0);
    }

    #[test]
    fn test_stdout_can_only_be_taken_once() {
        let mut child = ChildProcess::spawn(&argv(&["true"])).unwrap();
        assert!(child.take_stdout().is_some());
        assert!(child.take_stdout().is_none());
        child.wait().unwrap();
    }

    #[test]
    fn test_nonzero_exit_code() {
        let mut child = ChildProcess::spawn(&argv(&["false"])).unwrap();
        assert_eq!(child.wait().unwrap(), 1);
    }

    #[test]
    fn test_spawn_unknown_command_fails_in_parent_only() {
        let result = ChildProcess::spawn(&argv(&["definitely_not_a_real_binary_xyz"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_spawn_empty_argv() {
        let result = ChildProcess::spawn(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_drop_reaps_without_explicit_wait() {
        // No hay forma directa de observar el reap, pero el drop no debe
        // entrar en pánico ni dejar el wait pendiente
        let child = ChildProcess::spawn(&argv(&["true"])).unwrap();
        drop(child);
    }

    #[test]
    fn test_eof_on_child_exit() {
        // El extremo de escritura del padre se cierra al terminar el spawn:
        // la lectura debe terminar (EOF) cuando el hijo termina
        let mut child = ChildProcess::spawn(&argv(&["sh", "-c", "printf 'a\\nb\\n'"])).unwrap();
        let mut output = Vec::new();
        child.take_stdout().unwrap().read_to_end(&mut output).unwrap();
        assert_eq!(output, b"a\nb\n");
        child.wait().unwrap();
    }
}
