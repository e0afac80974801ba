//! Background writer for deferred (non-blocking) syncs.
//!
//! The store serializes on the calling thread and hands the finished
//! snapshot over a channel, so what lands on disk is always the state at
//! the moment `sync` was invoked. Writes are applied in submission order;
//! failures are reported out-of-band since no caller is waiting.

use crate::error::Error;
use crate::persist::atomic_write;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Callback invoked on the writer thread when a deferred write fails.
pub type ErrorHook = Arc<dyn Fn(Error) + Send + Sync>;

/// Owns the background thread that applies deferred writes.
///
/// Dropping it disconnects the channel and joins the thread, so every
/// snapshot accepted before the drop still gets its write attempt.
pub struct DeferredWriter {
    tx: Option<mpsc::Sender<Vec<u8>>>,
    last_error: Arc<Mutex<Option<Error>>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl DeferredWriter {
    /// Spawn a writer thread for `path`. `hook`, if given, is called with
    /// every write failure in addition to the error being parked for
    /// [`take_error`](Self::take_error).
    pub fn spawn(path: PathBuf, hook: Option<ErrorHook>) -> Self {
        let last_error = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&last_error);
        let (tx, rx) = mpsc::channel::<Vec<u8>>();

        let join_handle = thread::spawn(move || {
            while let Ok(bytes) = rx.recv() {
                if let Err(err) = atomic_write(&path, &bytes) {
                    log::error!("deferred write to {} failed: {err}", path.display());
                    if let Some(hook) = &hook {
                        hook(err.clone());
                    }
                    *slot.lock() = Some(err);
                }
            }
        });

        Self {
            tx: Some(tx),
            last_error,
            join_handle: Some(join_handle),
        }
    }

    /// Queue a serialized snapshot for writing. Returns as soon as the
    /// snapshot is handed off; there is no delivery guarantee beyond
    /// "issued".
    pub fn submit(&self, bytes: Vec<u8>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(bytes);
        }
    }

    /// Take the most recent write failure, if any. Earlier failures are
    /// overwritten by later ones; `None` means no failure since the last
    /// call.
    pub fn take_error(&self) -> Option<Error> {
        self.last_error.lock().take()
    }
}

impl Drop for DeferredWriter {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}

impl std::fmt::Debug for DeferredWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredWriter").finish_non_exhaustive()
    }
}
