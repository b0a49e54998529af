use std::{
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc,
    },
    thread::{self, JoinHandle},
};

use anyhow::Result;
use tracing::{error, info, info_span};

use crate::{
    app::drop_zone::ImageRequest,
    fs_utils::{artifact_path, read_image_bytes, write_artifact},
    isolate::{panic_message, BackgroundRemover},
};

pub const NO_DATA_MESSAGE: &str = "Processing produced no image data.";
pub const WORKER_LOST_MESSAGE: &str = "An error occurred: the background worker stopped unexpectedly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Progress(String),
    Succeeded(PathBuf),
    Failed(String),
}

impl WorkerEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Progress(_))
    }
}

/// GUI-side end of one request. Dropping it detaches the thread.
pub struct WorkerHandle {
    events_rx: Receiver<WorkerEvent>,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl WorkerHandle {
    pub fn spawn(
        request: ImageRequest,
        processor: Arc<dyn BackgroundRemover>,
        output_dir: PathBuf,
        notify: impl Fn() + Send + 'static,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            let reporter = Reporter {
                tx: events_tx,
                notify: Box::new(notify),
            };
            run(&request, processor.as_ref(), &output_dir, &reporter);
        });
        Self {
            events_rx,
            thread: Some(thread),
            finished: false,
        }
    }

    /// Drains pending events without blocking. Nothing is returned after the
    /// terminal event, and the thread is joined once it has been seen. A
    /// thread that vanishes without a terminal event yields a synthetic failure.
    pub fn poll(&mut self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }
        loop {
            let event = match self.events_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => Self::lost(),
            };
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                self.finish();
                break;
            }
        }
        events
    }

    /// Blocks until the next event. Used by tests and headless callers.
    pub fn recv(&mut self) -> Option<WorkerEvent> {
        if self.finished {
            return None;
        }
        let event = self.events_rx.recv().unwrap_or_else(|_| Self::lost());
        if event.is_terminal() {
            self.finish();
        }
        Some(event)
    }

    fn lost() -> WorkerEvent {
        error!("worker thread ended without reporting a result");
        WorkerEvent::Failed(WORKER_LOST_MESSAGE.to_string())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(thread) = self.thread.take() {
            // The terminal event is the thread's last act, so this returns promptly.
            let _ = thread.join();
        }
    }
}

struct Reporter {
    tx: Sender<WorkerEvent>,
    notify: Box<dyn Fn() + Send>,
}

impl Reporter {
    fn send(&self, event: WorkerEvent) {
        // The GUI may already be gone on shutdown.
        let _ = self.tx.send(event);
        (self.notify)();
    }

    fn progress(&self, text: &str) {
        info!("{text}");
        self.send(WorkerEvent::Progress(text.to_string()));
    }
}

/// Runs one request to completion. Emits progress events followed by exactly
/// one terminal event, whatever happens inside.
fn run(request: &ImageRequest, processor: &dyn BackgroundRemover, output_dir: &Path, reporter: &Reporter) {
    let _span = info_span!("request", path = %request.path.display()).entered();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        process(request, processor, output_dir, reporter)
    }));
    let terminal = match outcome {
        Ok(Ok(event)) => event,
        Ok(Err(err)) => {
            error!("{err:?}");
            WorkerEvent::Failed(format!("An error occurred: {err:#}"))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("worker panicked: {message}");
            WorkerEvent::Failed(format!("An error occurred: {message}"))
        }
    };
    reporter.send(terminal);
}

fn process(
    request: &ImageRequest,
    processor: &dyn BackgroundRemover,
    output_dir: &Path,
    reporter: &Reporter,
) -> Result<WorkerEvent> {
    reporter.progress("Reading image file...");
    let image = read_image_bytes(&request.path)?;

    reporter.progress("Removing background...");
    let output = match processor.remove_background(&image) {
        Ok(output) => output,
        Err(failure) => {
            error!(message = %failure.message, "background removal failed:\n{}", failure.trace);
            return Ok(WorkerEvent::Failed(format!(
                "Failed to process image: {}",
                failure.message
            )));
        }
    };
    if output.is_empty() {
        return Ok(WorkerEvent::Failed(NO_DATA_MESSAGE.to_string()));
    }

    reporter.progress("Saving result...");
    let path = artifact_path(&request.path, output_dir)?;
    write_artifact(&path, &output)?;
    info!(output = %path.display(), bytes = output.len(), "result saved");
    Ok(WorkerEvent::Succeeded(path))
}
