use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use shared::domain::{Product, ProductId};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    transport::ProductSource,
    views::{self, CategoryGroup},
};

/// Shown to the user in place of any specific fetch failure.
pub const FETCH_FAILED_MESSAGE: &str =
    "Could not load the catalog. Check your connection and try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Success(Vec<Product>),
    Error,
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn products(&self) -> Option<&[Product]> {
        match self {
            Self::Success(products) => Some(products.as_slice()),
            Self::Loading | Self::Error => None,
        }
    }

    /// Category grouping of the loaded products; empty unless `Success`.
    pub fn categories(&self) -> Vec<CategoryGroup> {
        self.products()
            .map(views::group_by_category)
            .unwrap_or_default()
    }

    pub fn find_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products()
            .and_then(|products| views::find_by_id(products, id))
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Error => Some(FETCH_FAILED_MESSAGE),
            Self::Loading | Self::Success(_) => None,
        }
    }
}

struct LoaderShared {
    state: watch::Sender<CatalogState>,
    attempt: AtomicU64,
}

impl LoaderShared {
    fn publish(&self, token: u64, outcome: Result<Vec<Product>, FetchError>) {
        let next = match outcome {
            Ok(products) => {
                info!(attempt = token, count = products.len(), "catalog loaded");
                CatalogState::Success(products)
            }
            Err(err) => {
                warn!(attempt = token, error = %err, "catalog fetch failed");
                CatalogState::Error
            }
        };

        // The token is compared under the watch write lock, so a newer
        // `load()` either lands before this check or after this write.
        let applied = self.state.send_if_modified(|state| {
            if self.attempt.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = next;
            true
        });
        if !applied {
            debug!(attempt = token, "discarding superseded catalog result");
        }
    }
}

/// Owns the catalog fetch state machine.
///
/// The loader must be created inside a tokio runtime; fetches run on that
/// runtime, so `load()`/`retry()` may then be called from any thread. They
/// publish `Loading` before returning. Only the most recently started attempt
/// may publish its result. Dropping the loader aborts the in-flight fetch and
/// discards anything still pending.
pub struct CatalogLoader {
    source: Arc<dyn ProductSource>,
    runtime: Handle,
    shared: Arc<LoaderShared>,
    inflight: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogLoader {
    /// Creates an idle loader in the `Loading` state. Nothing is fetched
    /// until `load()`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        let (state, _) = watch::channel(CatalogState::Loading);
        Self {
            source,
            runtime: Handle::current(),
            shared: Arc::new(LoaderShared {
                state,
                attempt: AtomicU64::new(0),
            }),
            inflight: Mutex::new(None),
        }
    }

    /// Creates a loader and immediately starts the first attempt.
    pub fn spawn(source: Arc<dyn ProductSource>) -> Self {
        let loader = Self::new(source);
        loader.load();
        loader
    }

    /// Starts a new fetch attempt and returns its token.
    pub fn load(&self) -> u64 {
        let mut token = 0;
        self.shared.state.send_modify(|state| {
            token = self.shared.attempt.fetch_add(1, Ordering::SeqCst) + 1;
            *state = CatalogState::Loading;
        });
        info!(attempt = token, "loading catalog");

        let source = Arc::clone(&self.source);
        let shared = Arc::downgrade(&self.shared);
        let handle = self.runtime.spawn(async move {
            let outcome = source.get_products().await;
            match shared.upgrade() {
                Some(shared) => shared.publish(token, outcome),
                None => debug!(attempt = token, "catalog loader gone; dropping result"),
            }
        });

        // An older task keeps running; its token is already stale.
        *self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        token
    }

    pub fn retry(&self) -> u64 {
        self.load()
    }

    /// Token of the most recently started attempt, `0` before the first one.
    pub fn attempt(&self) -> u64 {
        self.shared.attempt.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> CatalogState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.shared.state.subscribe()
    }

    pub fn updates(&self) -> WatchStream<CatalogState> {
        WatchStream::new(self.subscribe())
    }

    /// Waits until the current attempt leaves `Loading`.
    pub async fn wait_settled(&self) -> CatalogState {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    pub fn find_by_id(&self, id: ProductId) -> Option<Product> {
        self.shared.state.borrow().find_by_id(id).cloned()
    }

    pub fn categories(&self) -> Vec<CategoryGroup> {
        self.shared.state.borrow().categories()
    }
}

impl Drop for CatalogLoader {
    fn drop(&mut self) {
        // Invalidate every outstanding token under the watch lock.
        self.shared.state.send_if_modified(|_| {
            self.shared.attempt.fetch_add(1, Ordering::SeqCst);
            false
        });
        if let Some(handle) = self
            .inflight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
