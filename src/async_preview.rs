// Background preview generation with a small LRU cache
use crate::domain::FileRecord;
use crate::preview::{Preview, PreviewProvider};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, Mutex};

/// Maximum number of cached previews
const CACHE_SIZE: usize = 10;

/// Upper bound for one preview; video frame extraction is the slow path
const PREVIEW_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub enum PreviewState {
    Loading,
    Ready(Arc<Preview>),
}

enum PreviewRequest {
    Load {
        record: FileRecord,
        response_tx: oneshot::Sender<Arc<Preview>>,
    },
    Shutdown,
}

/// Least-recently-used cache keyed by file path
#[derive(Debug)]
struct PreviewCache {
    entries: HashMap<PathBuf, Arc<Preview>>,
    /// Most recently used at the back
    order: VecDeque<PathBuf>,
    max_size: usize,
}

impl PreviewCache {
    fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_size,
        }
    }

    fn touch(&mut self, path: &Path) {
        self.order.retain(|p| p != path);
        self.order.push_back(path.to_path_buf());
    }

    fn get(&mut self, path: &Path) -> Option<Arc<Preview>> {
        let preview = self.entries.get(path).cloned()?;
        self.touch(path);
        Some(preview)
    }

    fn insert(&mut self, path: PathBuf, preview: Arc<Preview>) {
        if !self.entries.contains_key(&path) && self.entries.len() >= self.max_size {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        self.touch(&path);
        self.entries.insert(path, preview);
    }

    fn remove(&mut self, path: &Path) {
        self.entries.remove(path);
        self.order.retain(|p| p != path);
    }

    fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Handle for sending requests to the preview worker
#[derive(Clone)]
pub struct PreviewLoader {
    request_tx: mpsc::Sender<PreviewRequest>,
    cache: Arc<Mutex<PreviewCache>>,
}

impl PreviewLoader {
    /// Spawns the background worker. Must be called inside a tokio runtime.
    pub fn new(provider: Arc<PreviewProvider>) -> Self {
        Self::with_timeout(provider, PREVIEW_TIMEOUT)
    }

    /// Like [`PreviewLoader::new`], answering with a fallback icon when a
    /// preview takes longer than `timeout`
    pub fn with_timeout(provider: Arc<PreviewProvider>, timeout: Duration) -> Self {
        let (request_tx, request_rx) = mpsc::channel(32);
        let cache = Arc::new(Mutex::new(PreviewCache::new(CACHE_SIZE)));

        tokio::spawn(Self::worker(
            request_rx,
            provider,
            Arc::clone(&cache),
            timeout,
        ));

        Self { request_tx, cache }
    }

    async fn worker(
        mut request_rx: mpsc::Receiver<PreviewRequest>,
        provider: Arc<PreviewProvider>,
        cache: Arc<Mutex<PreviewCache>>,
        timeout: Duration,
    ) {
        while let Some(request) = request_rx.recv().await {
            match request {
                PreviewRequest::Load {
                    record,
                    response_tx,
                } => {
                    if let Some(cached) = cache.lock().await.get(&record.path) {
                        let _ = response_tx.send(cached);
                        continue;
                    }

                    // One task per load so a slow file never holds up the next
                    tokio::spawn(Self::load(
                        record,
                        Arc::clone(&provider),
                        Arc::clone(&cache),
                        timeout,
                        response_tx,
                    ));
                }
                PreviewRequest::Shutdown => break,
            }
        }
    }

    async fn load(
        record: FileRecord,
        provider: Arc<PreviewProvider>,
        cache: Arc<Mutex<PreviewCache>>,
        timeout: Duration,
        response_tx: oneshot::Sender<Arc<Preview>>,
    ) {
        let path = record.path.clone();
        let category = record.category;
        let task = tokio::task::spawn_blocking(move || provider.preview(&record));

        let preview = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(preview)) => {
                let preview = Arc::new(preview);
                cache.lock().await.insert(path, Arc::clone(&preview));
                preview
            }
            Ok(Err(e)) => {
                log::error!("Preview task for {} panicked: {}", path.display(), e);
                Arc::new(Preview::unavailable(category))
            }
            Err(_) => {
                log::debug!("Preview of {} timed out", path.display());
                Arc::new(Preview::unavailable(category))
            }
        };

        let _ = response_tx.send(preview);
    }

    async fn send_load(&self, record: &FileRecord) -> Option<oneshot::Receiver<Arc<Preview>>> {
        let (response_tx, response_rx) = oneshot::channel();
        let request = PreviewRequest::Load {
            record: record.clone(),
            response_tx,
        };
        self.request_tx.send(request).await.ok()?;
        Some(response_rx)
    }

    /// Waits for the preview of `record`, served from the cache when possible
    pub async fn request_preview(&self, record: &FileRecord) -> Arc<Preview> {
        if let Some(cached) = self.get_cached(&record.path).await {
            return cached;
        }

        let Some(response_rx) = self.send_load(record).await else {
            log::warn!("Preview loader has shut down");
            return Arc::new(Preview::unavailable(record.category));
        };

        // The worker always answers, with a fallback icon on timeout
        response_rx
            .await
            .unwrap_or_else(|_| Arc::new(Preview::unavailable(record.category)))
    }

    pub async fn get_cached(&self, path: &Path) -> Option<Arc<Preview>> {
        self.cache.lock().await.get(path)
    }

    pub async fn is_cached(&self, path: &Path) -> bool {
        self.cache.lock().await.contains(path)
    }

    /// Drops a cached preview, e.g. after the file was moved or deleted
    pub async fn forget(&self, path: &Path) {
        self.cache.lock().await.remove(path);
    }

    pub async fn shutdown(&self) {
        let _ = self.request_tx.send(PreviewRequest::Shutdown).await;
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }
}

/// Drives a [`PreviewLoader`] from the synchronous UI loop by polling
pub struct SyncPreviewManager {
    loader: PreviewLoader,
    runtime: tokio::runtime::Runtime,
    current_state: PreviewState,
    current_path: Option<PathBuf>,
    receiver: Option<oneshot::Receiver<Arc<Preview>>>,
    /// Past this the current load is abandoned even if the worker never answers
    deadline: Option<Instant>,
    timeout: Duration,
}

impl SyncPreviewManager {
    pub fn new(provider: PreviewProvider) -> io::Result<Self> {
        Self::with_timeout(provider, PREVIEW_TIMEOUT)
    }

    pub fn with_timeout(provider: PreviewProvider, timeout: Duration) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let provider = Arc::new(provider);
        let loader = runtime.block_on(async { PreviewLoader::with_timeout(provider, timeout) });

        Ok(Self {
            loader,
            runtime,
            current_state: PreviewState::Loading,
            current_path: None,
            receiver: None,
            deadline: None,
            timeout,
        })
    }

    /// Returns the preview state for `record` without blocking on generation.
    ///
    /// A new record starts a background load; calling again with the same
    /// record polls for its completion.
    pub fn request_preview(&mut self, record: &FileRecord) -> &PreviewState {
        if self.current_path.as_ref() != Some(&record.path) {
            self.start(record);
        }

        if matches!(self.current_state, PreviewState::Loading) {
            if let Some(rx) = self.receiver.as_mut() {
                match rx.try_recv() {
                    Ok(preview) => {
                        self.current_state = PreviewState::Ready(preview);
                        self.receiver = None;
                    }
                    Err(oneshot::error::TryRecvError::Empty) => {
                        if self.deadline.is_some_and(|d| Instant::now() >= d) {
                            log::debug!("Gave up waiting for {}", record.path.display());
                            self.current_state = PreviewState::Ready(Arc::new(
                                Preview::unavailable(record.category),
                            ));
                            self.receiver = None;
                        }
                    }
                    Err(oneshot::error::TryRecvError::Closed) => {
                        // The worker is gone: use whatever the cache has
                        let cached = self.runtime.block_on(self.loader.get_cached(&record.path));
                        let preview = cached
                            .unwrap_or_else(|| Arc::new(Preview::unavailable(record.category)));
                        self.current_state = PreviewState::Ready(preview);
                        self.receiver = None;
                    }
                }
            }
        }

        &self.current_state
    }

    fn start(&mut self, record: &FileRecord) {
        self.current_path = Some(record.path.clone());
        self.receiver = None;
        self.deadline = None;

        if let Some(cached) = self.runtime.block_on(self.loader.get_cached(&record.path)) {
            self.current_state = PreviewState::Ready(cached);
            return;
        }

        self.current_state = PreviewState::Loading;
        // A little slack so the worker's own timeout answer normally wins
        self.deadline = Some(Instant::now() + self.timeout + Duration::from_millis(500));
        self.receiver = self.runtime.block_on(self.loader.send_load(record));
        if self.receiver.is_none() {
            self.current_state = PreviewState::Ready(Arc::new(Preview::unavailable(record.category)));
        }
    }

    pub fn current_state(&self) -> &PreviewState {
        &self.current_state
    }

    /// Forgets the current file so the next request starts fresh. A load
    /// still running for it finishes in the background and lands in the cache.
    pub fn reset(&mut self) {
        self.current_path = None;
        self.current_state = PreviewState::Loading;
        self.receiver = None;
        self.deadline = None;
    }

    pub fn forget(&mut self, path: &Path) {
        self.runtime.block_on(self.loader.forget(path));
        if self.current_path.as_deref() == Some(path) {
            self.reset();
        }
    }

    pub fn cache_size(&self) -> usize {
        self.runtime.block_on(self.loader.cache_size())
    }
}

impl Drop for SyncPreviewManager {
    fn drop(&mut self) {
        self.runtime.block_on(self.loader.shutdown());
    }
}
