//! Invocación de herramientas externas con límite de tiempo y salida capturada.

use log::{debug, error, warn};
use std::ffi::{OsStr, OsString};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, ScrubError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Resultado de una ejecución que terminó dentro del plazo.
#[derive(Clone, Debug)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Comando externo con argumentos y plazo máximo de ejecución.
#[derive(Clone, Debug)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Nombre corto del programa para mensajes de error.
    pub fn tool_name(&self) -> String {
        tool_name(&self.program)
    }

    /// Ejecuta el programa y espera como máximo el plazo configurado.
    ///
    /// Al vencer el plazo el proceso se mata y se recoge antes de devolver
    /// `ToolTimeout`. Un código de salida distinto de cero no es un error aquí;
    /// ver [`ToolCommand::run_checked`].
    pub fn run(&self) -> Result<ToolOutput> {
        let tool = self.tool_name();
        debug!(
            "Ejecutando {} {}",
            self.program.to_string_lossy(),
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScrubError::ToolNotFound { tool });
            }
            Err(e) => return Err(ScrubError::io(format!("No se pudo ejecutar {tool}"), e)),
        };

        // Los lectores vacían las tuberías mientras el proceso corre para que
        // una herramienta muy verbosa no se bloquee con el búfer lleno.
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("{tool} superó {}s y fue detenido", self.timeout.as_secs());
                    return Err(ScrubError::ToolTimeout {
                        tool,
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ScrubError::io(format!("Error esperando a {tool}"), e));
                }
            }
        };

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);

        Ok(ToolOutput {
            code: status.code(),
            stdout,
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    /// Igual que [`ToolCommand::run`], pero un código distinto de cero se
    /// convierte en `ToolFailure` con el stderr de la herramienta.
    pub fn run_checked(&self) -> Result<ToolOutput> {
        let output = self.run()?;
        if output.success() {
            return Ok(output);
        }

        let tool = self.tool_name();
        let stderr = output.stderr.trim().to_string();
        error!("{tool} terminó con {:?}: {stderr}", output.code);
        Err(ScrubError::ToolFailure {
            tool,
            code: output.code,
            stderr,
        })
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn tool_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

/// Busca el ejecutable en `PATH`, o lo comprueba directamente si `program`
/// ya es una ruta.
pub fn locate_tool(program: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(program.as_ref()).ok()
}

/// Falla con `ToolNotFound` antes de empezar si la herramienta no existe.
pub(crate) fn require_tool(program: &OsStr) -> Result<PathBuf> {
    locate_tool(program).ok_or_else(|| ScrubError::ToolNotFound {
        tool: tool_name(program),
    })
}
