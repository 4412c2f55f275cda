//! Identifier-keyed asset cache with background loading
//!
//! Every identifier is loaded at most once. Requests for the same identifier
//! share one in-flight load and resolve to the same `Arc<LoadedAsset>`.
//! Results travel back over a oneshot channel, so the frame loop can poll a
//! request without blocking while tests simply `block_on` it.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::{
    channel::oneshot,
    future::{FutureExt, Shared},
};

use super::{AssetError, AssetProvider, LoadedAsset};

/// Result of resolving one identifier
pub type LoadOutcome = Result<Arc<LoadedAsset>, Arc<AssetError>>;

type SharedLoad = Shared<oneshot::Receiver<LoadOutcome>>;

/// Where provider calls run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// One short-lived thread per uncached identifier
    #[default]
    Background,
    /// On the caller's thread, completing before `request` returns
    Inline,
}

pub struct AssetCache {
    provider: Arc<dyn AssetProvider>,
    strategy: LoadStrategy,
    entries: HashMap<String, SharedLoad>,
}

impl AssetCache {
    pub fn new(provider: Arc<dyn AssetProvider>) -> Self {
        Self::with_strategy(provider, LoadStrategy::Background)
    }

    pub fn with_strategy(provider: Arc<dyn AssetProvider>, strategy: LoadStrategy) -> Self {
        Self {
            provider,
            strategy,
            entries: HashMap::new(),
        }
    }

    /// Requests an asset, starting a load only if the identifier is not cached
    pub fn request(&mut self, id: &str) -> AssetRequest {
        let load = match self.entries.get(id) {
            Some(load) => load.clone(),
            None => {
                log::info!("Loading asset '{}'", id);
                let load = spawn_load(self.provider.clone(), self.strategy, id.to_string());
                self.entries.insert(id.to_string(), load.clone());
                load
            }
        };

        AssetRequest {
            id: id.to_string(),
            load: Some(load),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn spawn_load(provider: Arc<dyn AssetProvider>, strategy: LoadStrategy, id: String) -> SharedLoad {
    let (sender, receiver) = oneshot::channel::<LoadOutcome>();

    let job = move || {
        let outcome = provider.load(&id).map(Arc::new).map_err(Arc::new);
        match &outcome {
            Ok(asset) => log::info!(
                "Asset '{}' ready ({} nodes, {} meshes)",
                id,
                asset.nodes.len(),
                asset.meshes.len()
            ),
            Err(err) => log::error!("Asset '{}' failed to load: {}", id, err),
        }
        // The receiver side lives in the cache, so a send failure only means
        // the cache itself was dropped.
        let _ = sender.send(outcome);
    };

    match strategy {
        LoadStrategy::Inline => job(),
        LoadStrategy::Background => {
            if let Err(err) = std::thread::Builder::new()
                .name("asset-loader".to_string())
                .spawn(job)
            {
                log::error!("Failed to spawn asset loader thread: {}", err);
            }
        }
    }

    receiver.shared()
}

/// Pending or completed load of a single identifier
pub struct AssetRequest {
    id: String,
    load: Option<SharedLoad>,
}

impl AssetRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the outcome once it is available, without blocking.
    ///
    /// Yields `Some` exactly once; afterwards the request is spent.
    pub fn try_take(&mut self) -> Option<LoadOutcome> {
        let load = self.load.as_mut()?;
        let received = load.now_or_never()?;
        self.load = None;
        Some(flatten(&self.id, received))
    }

    pub fn is_spent(&self) -> bool {
        self.load.is_none()
    }
}

impl Future for AssetRequest {
    type Output = LoadOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let Some(load) = this.load.as_mut() else {
            return Poll::Ready(Err(Arc::new(AssetError::ProviderGone(this.id.clone()))));
        };

        match load.poll_unpin(cx) {
            Poll::Ready(received) => {
                this.load = None;
                Poll::Ready(flatten(&this.id, received))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

fn flatten(id: &str, received: Result<LoadOutcome, oneshot::Canceled>) -> LoadOutcome {
    received.unwrap_or_else(|_| Err(Arc::new(AssetError::ProviderGone(id.to_string()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{NodeCollection, SceneNode};
    use cgmath::Vector3;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl AssetProvider for CountingProvider {
        fn load(&self, id: &str) -> Result<LoadedAsset, AssetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id.ends_with(".bad") {
                return Err(AssetError::UnsupportedFormat(id.to_string()));
            }
            let nodes: NodeCollection =
                std::iter::once(SceneNode::new("slot_0", Vector3::new(1.0, 2.0, 3.0))).collect();
            Ok(LoadedAsset {
                id: id.to_string(),
                nodes,
                meshes: Vec::new(),
            })
        }
    }

    fn counting() -> Arc<CountingProvider> {
        Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_inline_request_is_ready_immediately() {
        let provider = counting();
        let mut cache = AssetCache::with_strategy(provider.clone(), LoadStrategy::Inline);

        let mut request = cache.request("scene.glb");
        let asset = request.try_take().expect("inline load completes").unwrap();
        assert_eq!(asset.id, "scene.glb");
        assert!(request.is_spent());
        assert!(request.try_take().is_none());
    }

    #[test]
    fn test_same_identifier_loads_once() {
        let provider = counting();
        let mut cache = AssetCache::with_strategy(provider.clone(), LoadStrategy::Inline);

        let first = futures::executor::block_on(cache.request("a.glb")).unwrap();
        let second = futures::executor::block_on(cache.request("a.glb")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_background_load_resolves() {
        let provider = counting();
        let mut cache = AssetCache::new(provider.clone());

        let asset = futures::executor::block_on(cache.request("b.glb")).unwrap();
        assert_eq!(asset.nodes.len(), 1);
    }

    #[test]
    fn test_failure_is_reported_and_cached() {
        let provider = counting();
        let mut cache = AssetCache::with_strategy(provider.clone(), LoadStrategy::Inline);

        assert!(futures::executor::block_on(cache.request("x.bad")).is_err());
        assert!(futures::executor::block_on(cache.request("x.bad")).is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
