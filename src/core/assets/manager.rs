//=========================================================================
// Asset Manager
//=========================================================================
//
// Handle-based asset cache fed by a background loader.
//
// Lifecycle of a handle:
//
//   load(path) ──► Loading ──worker──► poll() ──► Loaded │ Failed
//                                         │
//                                         ├─ AssetLoaded / AssetFailed
//                                         └─ load_with() callbacks
//
// Paths are relative to the asset root and deduplicated: loading a path
// that is already loading or loaded hands back the same handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::loader::{self, LoadRequest, LoadResult, Loader};
use super::AssetError;
use crate::core::ecs::EventsManager;
use crate::core::memory::{AsyncMap, AsyncVector, IdMap};

//=== Types ===============================================================

/// Stable reference to an asset slot. Never reused after `unload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(u64);

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Loading,
    Loaded,
    Failed,
}

/// Raw asset contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    path: String,
    bytes: Vec<u8>,
}

impl Asset {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The contents as UTF-8 text, if valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//--- Events ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoaded {
    pub handle: AssetHandle,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailed {
    pub handle: AssetHandle,
    pub path: String,
    pub error: AssetError,
}

//=== AssetManager ========================================================

pub type LoadCallback = Box<dyn FnOnce(Result<Arc<Asset>, AssetError>) + Send>;

struct AssetEntry {
    path: String,
    state: AssetState,
    error: Option<AssetError>,
    callbacks: Vec<LoadCallback>,
}

pub struct AssetManager {
    root: PathBuf,
    entries: IdMap<AssetEntry>,
    by_path: HashMap<String, u64>,
    cache: AsyncMap<AssetHandle, Arc<Asset>>,
    results: Arc<AsyncVector<LoadResult>>,
    loader: Option<Loader>,
    // Callbacks of unloaded handles; run with `UnknownHandle` on next poll.
    orphaned: Vec<(AssetHandle, LoadCallback)>,
}

impl AssetManager {
    /// Creates a manager rooted at `root`. The loader thread starts on
    /// the first asynchronous load.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: IdMap::new(),
            by_path: HashMap::new(),
            cache: AsyncMap::new(),
            results: Arc::new(AsyncVector::new()),
            loader: None,
            orphaned: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    //--- Path Resolution --------------------------------------------------

    /// Normalizes `path` and joins it onto the root.
    ///
    /// Rejects empty paths, absolute paths and any `..` component.
    fn resolve(&self, path: &str) -> Result<(String, PathBuf), AssetError> {
        let mut parts = Vec::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(AssetError::InvalidPath(path.to_string()));
                }
            }
        }
        if parts.is_empty() {
            return Err(AssetError::InvalidPath(path.to_string()));
        }

        let full_path = parts.iter().fold(self.root.clone(), |acc, part| acc.join(part));
        Ok((parts.join("/"), full_path))
    }

    fn loader(&mut self) -> Result<&Loader, AssetError> {
        if self.loader.is_none() {
            info!(target: "assets", "starting asset loader (root: {})", self.root.display());
            self.loader = Some(Loader::spawn(Arc::clone(&self.results))?);
        }
        self.loader.as_ref().ok_or(AssetError::LoaderStopped)
    }

    //--- Loading ----------------------------------------------------------

    /// Starts loading `path` in the background.
    pub fn load(&mut self, path: &str) -> Result<AssetHandle, AssetError> {
        let (key, full_path) = self.resolve(path)?;

        if let Some(&id) = self.by_path.get(&key) {
            if let Some(entry) = self.entries.get(id) {
                if entry.state != AssetState::Failed {
                    return Ok(AssetHandle(id));
                }
            }
            // failed earlier; retry under the same handle
            self.submit(AssetHandle(id), key, full_path)?;
            return Ok(AssetHandle(id));
        }

        let id = self.entries.insert(AssetEntry {
            path: key.clone(),
            state: AssetState::Loading,
            error: None,
            callbacks: Vec::new(),
        });
        self.by_path.insert(key.clone(), id);

        if let Err(err) = self.submit(AssetHandle(id), key.clone(), full_path) {
            self.entries.remove(id);
            self.by_path.remove(&key);
            return Err(err);
        }
        Ok(AssetHandle(id))
    }

    fn submit(
        &mut self,
        handle: AssetHandle,
        path: String,
        full_path: PathBuf,
    ) -> Result<(), AssetError> {
        debug!(target: "assets", "queueing load of '{}' as {}", path, handle);
        self.loader()?.submit(LoadRequest {
            handle,
            path,
            full_path,
        })?;

        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.state = AssetState::Loading;
            entry.error = None;
        }
        Ok(())
    }

    /// Like [`load`](Self::load), but also runs `callback` during the
    /// `poll` that observes the outcome.
    ///
    /// For an asset that has already finished, the callback runs during
    /// the next `poll`.
    pub fn load_with<F>(&mut self, path: &str, callback: F) -> Result<AssetHandle, AssetError>
    where
        F: FnOnce(Result<Arc<Asset>, AssetError>) + Send + 'static,
    {
        let handle = self.load(path)?;
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.callbacks.push(Box::new(callback));
        }
        Ok(handle)
    }

    /// Reads `path` on the calling thread and caches it.
    pub fn load_blocking(&mut self, path: &str) -> Result<Arc<Asset>, AssetError> {
        let (key, full_path) = self.resolve(path)?;

        let existing = self.by_path.get(&key).copied();
        if let Some(asset) = existing.and_then(|id| self.cache.get(&AssetHandle(id))) {
            return Ok(asset);
        }

        let asset = Arc::new(loader::read_asset(&key, &full_path)?);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = self.entries.insert(AssetEntry {
                    path: key.clone(),
                    state: AssetState::Loading,
                    error: None,
                    callbacks: Vec::new(),
                });
                self.by_path.insert(key, id);
                id
            }
        };

        if let Some(entry) = self.entries.get_mut(id) {
            entry.state = AssetState::Loaded;
            entry.error = None;
        }
        self.cache.insert(AssetHandle(id), Arc::clone(&asset));
        Ok(asset)
    }

    //--- Completion -------------------------------------------------------

    /// Applies finished loads, publishes their events and runs callbacks.
    ///
    /// Returns the number of loads that completed (success or failure).
    pub fn poll(&mut self, events: &mut EventsManager) -> usize {
        let mut completed = 0;

        for LoadResult { handle, result } in self.results.take_all() {
            let Some(entry) = self.entries.get_mut(handle.0) else {
                debug!(target: "assets", "discarding result for unloaded asset {}", handle);
                continue;
            };
            if entry.state != AssetState::Loading {
                continue;
            }
            completed += 1;

            match result {
                Ok(asset) => {
                    entry.state = AssetState::Loaded;
                    self.cache.insert(handle, Arc::new(asset));
                    debug!(target: "assets", "loaded '{}'", entry.path);
                    events.publish(AssetLoaded {
                        handle,
                        path: entry.path.clone(),
                    });
                }
                Err(error) => {
                    warn!(target: "assets", "{}", error);
                    entry.state = AssetState::Failed;
                    entry.error = Some(error.clone());
                    events.publish(AssetFailed {
                        handle,
                        path: entry.path.clone(),
                        error,
                    });
                }
            }
        }

        self.run_callbacks();
        completed
    }

    fn run_callbacks(&mut self) {
        for (handle, callback) in self.orphaned.drain(..) {
            callback(Err(AssetError::UnknownHandle(handle)));
        }

        let cache = &self.cache;
        for (id, entry) in self.entries.iter_mut() {
            if entry.callbacks.is_empty() || entry.state == AssetState::Loading {
                continue;
            }

            let outcome = match (entry.state, cache.get(&AssetHandle(id))) {
                (AssetState::Loaded, Some(asset)) => Ok(asset),
                _ => Err(entry
                    .error
                    .clone()
                    .unwrap_or(AssetError::UnknownHandle(AssetHandle(id)))),
            };

            for callback in entry.callbacks.drain(..) {
                callback(outcome.clone());
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self, handle: AssetHandle) -> Option<AssetState> {
        self.entries.get(handle.0).map(|entry| entry.state)
    }

    /// The error of a failed load.
    pub fn error(&self, handle: AssetHandle) -> Option<&AssetError> {
        self.entries.get(handle.0).and_then(|entry| entry.error.as_ref())
    }

    pub fn get(&self, handle: AssetHandle) -> Option<Arc<Asset>> {
        self.cache.get(&handle)
    }

    pub fn handle_of(&self, path: &str) -> Option<AssetHandle> {
        let (key, _) = self.resolve(path).ok()?;
        self.by_path.get(&key).map(|&id| AssetHandle(id))
    }

    pub fn path(&self, handle: AssetHandle) -> Option<&str> {
        self.entries.get(handle.0).map(|entry| entry.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    //--- Eviction ---------------------------------------------------------

    /// Forgets `handle`. A load still in flight is discarded on arrival;
    /// its pending callbacks receive `UnknownHandle` on the next `poll`.
    pub fn unload(&mut self, handle: AssetHandle) -> Result<(), AssetError> {
        let mut entry = self
            .entries
            .remove(handle.0)
            .ok_or(AssetError::UnknownHandle(handle))?;

        self.by_path.remove(&entry.path);
        self.cache.remove(&handle);
        self.orphaned
            .extend(entry.callbacks.drain(..).map(|callback| (handle, callback)));
        debug!(target: "assets", "unloaded '{}'", entry.path);
        Ok(())
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("text")).unwrap();
        fs::write(dir.path().join("text/hello.txt"), "hello").unwrap();
        fs::write(dir.path().join("blob.bin"), b"\xff\x00\xfe").unwrap();
        dir
    }

    /// Polls until `expected` loads completed or a timeout elapses.
    fn poll_until(
        assets: &mut AssetManager,
        events: &mut EventsManager,
        expected: usize,
    ) -> usize {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut completed = 0;
        while completed < expected && Instant::now() < deadline {
            completed += assets.poll(events);
            thread::sleep(Duration::from_millis(2));
        }
        completed
    }

    #[test]
    fn loads_in_background_and_publishes_event() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();

        let handle = assets.load("text/hello.txt").unwrap();
        assert_eq!(assets.state(handle), Some(AssetState::Loading));

        assert_eq!(poll_until(&mut assets, &mut events, 1), 1);
        assert_eq!(assets.state(handle), Some(AssetState::Loaded));
        assert_eq!(assets.get(handle).unwrap().as_str(), Some("hello"));

        events.dispatch();
        assert_eq!(
            events.read::<AssetLoaded>(),
            &[AssetLoaded {
                handle,
                path: "text/hello.txt".into()
            }]
        );
    }

    #[test]
    fn same_path_returns_same_handle() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());

        let a = assets.load("text/hello.txt").unwrap();
        let b = assets.load("./text/hello.txt").unwrap();
        assert_eq!(a, b);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets.handle_of("text/hello.txt"), Some(a));
    }

    #[test]
    fn missing_file_fails_with_io_error() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();

        let handle = assets.load("nope.png").unwrap();
        poll_until(&mut assets, &mut events, 1);

        assert_eq!(assets.state(handle), Some(AssetState::Failed));
        assert!(assets.get(handle).is_none());
        assert!(matches!(
            assets.error(handle),
            Some(AssetError::Io { kind: std::io::ErrorKind::NotFound, .. })
        ));

        events.dispatch();
        assert_eq!(events.read::<AssetFailed>().len(), 1);
        assert_eq!(events.read::<AssetFailed>()[0].path, "nope.png");
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());

        for path in ["../secret", "text/../../x", "/etc/passwd", "", "."] {
            assert_eq!(
                assets.load(path),
                Err(AssetError::InvalidPath(path.to_string())),
                "{path:?} should be rejected"
            );
        }
        assert!(assets.is_empty());
    }

    #[test]
    fn callbacks_run_during_poll() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for path in ["blob.bin", "missing.bin"] {
            let seen = Arc::clone(&seen);
            assets
                .load_with(path, move |result| {
                    seen.lock().unwrap().push(result.map(|asset| asset.len()).is_ok());
                })
                .unwrap();
        }
        assert!(seen.lock().unwrap().is_empty());

        poll_until(&mut assets, &mut events, 2);
        let mut outcomes = seen.lock().unwrap().clone();
        outcomes.sort();
        assert_eq!(outcomes, vec![false, true]);
    }

    #[test]
    fn callback_on_loaded_asset_runs_next_poll() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();
        assets.load_blocking("blob.bin").unwrap();

        let hits = Arc::new(Mutex::new(0));
        {
            let hits = Arc::clone(&hits);
            assets
                .load_with("blob.bin", move |result| {
                    assert_eq!(result.unwrap().bytes(), &[0xff, 0x00, 0xfe]);
                    *hits.lock().unwrap() += 1;
                })
                .unwrap();
        }

        assert_eq!(assets.poll(&mut events), 0);
        assert_eq!(*hits.lock().unwrap(), 1);
        assets.poll(&mut events);
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn load_blocking_caches_and_shares_handle() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());

        let first = assets.load_blocking("text/hello.txt").unwrap();
        let second = assets.load_blocking("text/hello.txt").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let handle = assets.load("text/hello.txt").unwrap();
        assert_eq!(assets.state(handle), Some(AssetState::Loaded));
        assert!(matches!(
            assets.load_blocking("absent"),
            Err(AssetError::Io { .. })
        ));
    }

    #[test]
    fn unload_forgets_handle_and_discards_in_flight_result() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();

        let handle = assets.load("text/hello.txt").unwrap();
        assets.unload(handle).unwrap();
        assert_eq!(assets.unload(handle), Err(AssetError::UnknownHandle(handle)));

        thread::sleep(Duration::from_millis(50));
        assert_eq!(assets.poll(&mut events), 0);
        assert!(assets.state(handle).is_none());

        let reloaded = assets.load("text/hello.txt").unwrap();
        assert_ne!(reloaded, handle);
    }

    #[test]
    fn unload_fails_pending_callbacks_on_next_poll() {
        let dir = fixture();
        let mut assets = AssetManager::new(dir.path());
        let mut events = EventsManager::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let seen = Arc::clone(&seen);
            assets
                .load_with("text/hello.txt", move |result| {
                    seen.lock().unwrap().push(result.map(|asset| asset.len()));
                })
                .unwrap()
        };
        assets.unload(handle).unwrap();
        assert!(seen.lock().unwrap().is_empty());

        assets.poll(&mut events);
        assets.poll(&mut events);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Err(AssetError::UnknownHandle(handle))]
        );
    }
}
