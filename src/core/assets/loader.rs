//=========================================================================
// Asset Loader
//=========================================================================
//
// Background worker that reads asset files off the engine thread.
//
//   AssetManager ──LoadRequest──► crossbeam channel ──► "bt-asset-loader"
//        ▲                                                     │
//        └──────────── poll() ◄── AsyncVector<LoadResult> ◄────┘
//
// Dropping the Loader closes the channel; the worker finishes the request
// it is on, exits, and is joined.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Sender};
use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::{Asset, AssetError, AssetHandle};
use crate::core::memory::AsyncVector;

//=== Messages ============================================================

pub(super) struct LoadRequest {
    pub(super) handle: AssetHandle,
    pub(super) path: String,
    pub(super) full_path: PathBuf,
}

pub(super) struct LoadResult {
    pub(super) handle: AssetHandle,
    pub(super) result: Result<Asset, AssetError>,
}

//=== Loader ==============================================================

pub(super) struct Loader {
    requests: Option<Sender<LoadRequest>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Loader {
    pub(super) fn spawn(results: Arc<AsyncVector<LoadResult>>) -> Result<Self, AssetError> {
        let (sender, receiver) = unbounded::<LoadRequest>();

        let worker = thread::Builder::new()
            .name("bt-asset-loader".into())
            .spawn(move || {
                debug!(target: "assets", "asset loader started");
                for request in receiver.iter() {
                    let result = read_asset(&request.path, &request.full_path);
                    results.push(LoadResult {
                        handle: request.handle,
                        result,
                    });
                }
                debug!(target: "assets", "asset loader exiting");
            })
            .map_err(|err| AssetError::LoaderSpawn(err.to_string()))?;

        Ok(Self {
            requests: Some(sender),
            worker: Some(worker),
        })
    }

    pub(super) fn submit(&self, request: LoadRequest) -> Result<(), AssetError> {
        self.requests
            .as_ref()
            .ok_or(AssetError::LoaderStopped)?
            .send(request)
            .map_err(|_| AssetError::LoaderStopped)
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(target: "assets", "asset loader thread panicked");
            }
        }
    }
}

//=== File Access =========================================================

/// Reads `full_path` into an [`Asset`] named `path`.
pub(super) fn read_asset(path: &str, full_path: &Path) -> Result<Asset, AssetError> {
    let bytes = fs::read(full_path).map_err(|err| AssetError::io(path, &err))?;
    debug!(target: "assets", "read '{}' ({} bytes)", path, bytes.len());
    Ok(Asset::new(path, bytes))
}
