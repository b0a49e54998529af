use std::path::PathBuf;

use tracing::{debug, warn};

use super::{
    drop_zone::{DropZone, ImageRequest},
    worker::WorkerEvent,
};

pub const READY_STATUS: &str = "Ready for an image...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Processing,
    /// Waiting for the user to confirm opening the result.
    Confirming(PathBuf),
    /// Showing a failure message until dismissed.
    Reporting(String),
}

/// Request lifecycle, independent of any window. Only one request is in
/// flight at a time; drops outside `Idle` are refused here even if the drop
/// zone somehow let them through.
pub struct Session {
    pub phase: Phase,
    pub drop_zone: DropZone,
    pub status: String,
    /// Latest result the user chose to open.
    pub current_result: Option<PathBuf>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            drop_zone: DropZone::new(),
            status: READY_STATUS.to_string(),
            current_result: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Returns true when the request was taken and a worker should be started.
    pub fn begin(&mut self, request: &ImageRequest) -> bool {
        if !self.is_idle() {
            warn!(path = %request.path.display(), "request refused, another one is in flight");
            return false;
        }
        debug!(path = %request.path.display(), "request accepted");
        self.phase = Phase::Processing;
        self.drop_zone.disable();
        true
    }

    pub fn handle(&mut self, event: WorkerEvent) {
        if self.phase != Phase::Processing {
            debug!(?event, "ignoring worker event outside of processing");
            return;
        }
        match event {
            WorkerEvent::Progress(text) => self.status = text,
            WorkerEvent::Succeeded(path) => {
                self.status = format!("Done! Result saved to: {}", path.display());
                self.phase = Phase::Confirming(path);
            }
            WorkerEvent::Failed(message) => {
                self.status = "Failed to process image.".to_string();
                self.drop_zone.reset();
                self.phase = Phase::Reporting(message);
            }
        }
    }

    /// User answered the success dialog. Returns the path to display when
    /// they accepted.
    pub fn confirm(&mut self, accepted: bool) -> Option<PathBuf> {
        let Phase::Confirming(path) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        self.drop_zone.reset();
        if accepted {
            self.current_result = Some(path.clone());
            Some(path)
        } else {
            None
        }
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, Phase::Reporting(_)) {
            self.phase = Phase::Idle;
            self.drop_zone.reset();
        }
    }
}
