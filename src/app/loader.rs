use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::Instant,
};

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    fs_utils::read_image_bytes,
    image_utils::{decode_result, LoadedImage},
};

pub enum LoadState {
    Loading,
    Ready(LoadedImage),
    Failed(String),
}

/// Decodes one result image on a helper thread so large files never stall a frame.
pub struct Loader {
    rx: Option<Receiver<Result<LoadedImage>>>,
}

impl Loader {
    pub fn spawn(path: PathBuf, notify: impl Fn() + Send + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let start = Instant::now();
            let result = read_image_bytes(&path).and_then(|bytes| decode_result(path.clone(), &bytes));
            match &result {
                Ok(loaded) => debug!(
                    path = %path.display(),
                    width = loaded.size[0],
                    height = loaded.size[1],
                    elapsed = ?start.elapsed(),
                    "result decoded"
                ),
                Err(err) => warn!("Failed to decode {}: {err:#}", path.display()),
            }
            let _ = tx.send(result);
            notify();
        });
        Self { rx: Some(rx) }
    }

    /// Yields `Loading` until the helper thread reports, then its outcome once.
    /// Afterwards it keeps returning `Loading`; callers store the outcome.
    pub fn poll(&mut self) -> LoadState {
        let Some(rx) = &self.rx else {
            return LoadState::Loading;
        };
        let state = match rx.try_recv() {
            Ok(Ok(loaded)) => LoadState::Ready(loaded),
            Ok(Err(err)) => LoadState::Failed(format!("{err:#}")),
            Err(TryRecvError::Empty) => return LoadState::Loading,
            Err(TryRecvError::Disconnected) => LoadState::Failed("Loader stopped unexpectedly".into()),
        };
        self.rx = None;
        state
    }
}
