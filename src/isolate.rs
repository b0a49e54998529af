//! Crash isolation for the removal engine.
//!
//! The parent writes the input image to a child process's stdin. The child
//! answers with the output image on stdout and exit code 0, or with a
//! one-line JSON [`ProcessingFailure`] as the last line of stderr and a
//! non-zero exit code. Anything else the child does (crash, signal, garbage)
//! is mapped to a failure on the parent side, so a fault in native inference
//! code never reaches the GUI process.

use std::{
    ffi::OsString,
    io::{Read, Write},
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
    thread,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Error half of a processing result: a short message for the user and a
/// full diagnostic trace for the log.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProcessingFailure {
    pub message: String,
    pub trace: String,
}

impl ProcessingFailure {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }

    pub fn from_error(err: &anyhow::Error) -> Self {
        Self::new(format!("{err:#}"), format!("{err:?}"))
    }
}

/// Bytes in, bytes out. Implementations block until the result is ready.
pub trait BackgroundRemover: Send + Sync {
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, ProcessingFailure>;
}

/// Spawns one child per call and reaps it before returning.
#[derive(Debug, Clone)]
pub struct IsolatedProcessor {
    program: PathBuf,
    args: Vec<OsString>,
}

impl IsolatedProcessor {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Re-invokes the running executable in worker mode.
    pub fn current_exe(args: Vec<OsString>) -> Result<Self> {
        Ok(Self::new(std::env::current_exe()?, args))
    }

    fn run_child(&self, image: &[u8]) -> Result<Vec<u8>, ProcessingFailure> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                ProcessingFailure::new(
                    format!("Unable to start worker process: {err}"),
                    format!("{} {:?}: {err:?}", self.program.display(), self.args),
                )
            })?;
        debug!(pid = child.id(), bytes = image.len(), "worker process started");

        // Feed stdin from a helper thread so a child that writes a lot before
        // draining its input cannot deadlock against us.
        let feeder = child.stdin.take().map(|mut stdin| {
            let input = image.to_vec();
            thread::spawn(move || {
                // A child that exits early closes the pipe; its exit status tells the story.
                let _ = stdin.write_all(&input);
            })
        });

        let output = child.wait_with_output().map_err(|err| {
            ProcessingFailure::new(
                format!("Lost contact with worker process: {err}"),
                format!("{err:?}"),
            )
        })?;
        if let Some(feeder) = feeder {
            let _ = feeder.join();
        }
        debug!(status = %output.status, bytes = output.stdout.len(), "worker process finished");

        if output.status.success() {
            return Ok(output.stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(parse_failure(&stderr).unwrap_or_else(|| {
            ProcessingFailure::new(describe_exit(output.status), stderr.trim().to_string())
        }))
    }
}

impl BackgroundRemover for IsolatedProcessor {
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, ProcessingFailure> {
        self.run_child(image)
    }
}

/// Finds the report among whatever else the child logged to stderr.
pub fn parse_failure(stderr: &str) -> Option<ProcessingFailure> {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find_map(|line| serde_json::from_str(line).ok())
}

fn describe_exit(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Worker process exited with code {code}");
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Worker process was killed by signal {signal}");
        }
    }
    format!("Worker process terminated abnormally ({status})")
}

/// Child side of the protocol. Reads the whole input, runs `engine`, and
/// writes either the output or a failure report. Returns the exit code.
pub fn serve<R, W, E, F>(input: &mut R, output: &mut W, errors: &mut E, engine: F) -> i32
where
    R: Read,
    W: Write,
    E: Write,
    F: FnOnce(&[u8]) -> Result<Vec<u8>>,
{
    let outcome = (|| -> Result<Vec<u8>, ProcessingFailure> {
        let mut image = Vec::new();
        input.read_to_end(&mut image).map_err(|err| {
            ProcessingFailure::new(format!("Unable to read input: {err}"), format!("{err:?}"))
        })?;
        match panic::catch_unwind(AssertUnwindSafe(|| engine(&image))) {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(err)) => Err(ProcessingFailure::from_error(&err)),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                Err(ProcessingFailure::new(
                    format!("Background removal panicked: {message}"),
                    message,
                ))
            }
        }
    })();

    let written = match &outcome {
        Ok(bytes) => output.write_all(bytes).and_then(|()| output.flush()),
        Err(failure) => {
            // Compact JSON escapes newlines, so the report stays on one line.
            let line = serde_json::to_string(failure).unwrap_or_default();
            writeln!(errors, "{line}").and_then(|()| errors.flush())
        }
    };
    if let Err(err) = written {
        warn!("unable to deliver worker result: {err}");
        return 2;
    }
    if outcome.is_ok() {
        0
    } else {
        1
    }
}

pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
