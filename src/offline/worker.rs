use anyhow::{Context, Result};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use super::policy::{cache_name, route, Request, Response, Route, SHELL_DOCUMENT, SHELL_MANIFEST};

/// Named, versioned request→response store shared by all worker versions.
/// Each operation is atomic on its own; nothing composes transactionally,
/// so a revalidation write racing a purge is a stale read, not corruption.
pub(crate) trait CacheStore {
    /// Ensure a named cache exists.
    fn open(&mut self, name: &str);
    fn names(&self) -> Vec<String>;
    fn delete(&mut self, name: &str) -> bool;
    fn get(&self, name: &str, path: &str) -> Option<Response>;
    fn put(&mut self, name: &str, path: &str, response: Response);
    /// Match a path across every named cache.
    fn get_any(&self, path: &str) -> Option<Response>;
}

/// The network seam. `Err` means the network itself failed; HTTP-level
/// errors come back as `Ok` with their status.
pub(crate) trait Network {
    fn fetch(&mut self, request: &Request) -> Result<Response>;
}

pub(crate) type SharedCacheStore = Rc<RefCell<dyn CacheStore>>;
pub(crate) type SharedNetwork = Rc<RefCell<dyn Network>>;

/// What interception did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    /// Not intercepted; the host lets the request through untouched.
    Ignored,
    Served(Response),
}

/// One worker version: a version token, the named cache that goes with it,
/// and handles to the shared cache store and network. No ambient state.
pub(crate) struct CacheManager {
    version: String,
    cache: String,
    store: SharedCacheStore,
    network: SharedNetwork,
    navigation_preload: bool,
}

impl CacheManager {
    pub(crate) fn new(version: &str, store: SharedCacheStore, network: SharedNetwork) -> Self {
        Self {
            version: version.to_string(),
            cache: cache_name(version),
            store,
            network,
            navigation_preload: false,
        }
    }

    pub(crate) fn version(&self) -> &str {
        &self.version
    }

    /// Install phase: open this version's cache and eagerly fetch the whole
    /// shell manifest. Any miss aborts the install, leaving the previous
    /// version in control (the host retries on its own schedule).
    pub(crate) fn install(&mut self) -> Result<()> {
        self.store.borrow_mut().open(&self.cache);
        for path in SHELL_MANIFEST {
            let request = Request::get(path);
            let response = self
                .network
                .borrow_mut()
                .fetch(&request)
                .with_context(|| format!("Shell prefetch failed: {path}"))?;
            if !response.is_success() {
                anyhow::bail!("Shell prefetch for {path} returned {}", response.status);
            }
            self.store.borrow_mut().put(&self.cache, path, response);
        }
        debug!(version = %self.version, "Shell precached");
        Ok(())
    }

    /// Activate phase: purge every cache that is not ours, then opportunistically
    /// turn on navigation preload where the host supports it.
    pub(crate) fn activate(&mut self, preload_supported: bool) {
        let stale: Vec<String> = self
            .store
            .borrow()
            .names()
            .into_iter()
            .filter(|name| *name != self.cache)
            .collect();
        for name in stale {
            self.store.borrow_mut().delete(&name);
            debug!(version = %self.version, cache = %name, "Purged stale cache");
        }
        self.navigation_preload = preload_supported;
    }

    /// Request interception. Only GETs are handled; everything served goes
    /// through the fallback chain for its route, ending in a synthesized
    /// network-error response rather than an unhandled failure.
    pub(crate) fn handle_fetch(&self, request: &Request, preload: Option<Response>) -> FetchOutcome {
        match route(request) {
            Route::PassThrough => FetchOutcome::Ignored,
            Route::Navigation => FetchOutcome::Served(self.serve_navigation(request, preload)),
            Route::StaticAsset => FetchOutcome::Served(self.serve_static(request)),
            Route::NetworkFirst => FetchOutcome::Served(self.serve_default(request)),
        }
    }

    /// Navigations are network-first: an in-flight preload wins, then the
    /// network, then the cached shell document.
    fn serve_navigation(&self, request: &Request, preload: Option<Response>) -> Response {
        if self.navigation_preload {
            if let Some(response) = preload {
                return response;
            }
        }
        match self.network.borrow_mut().fetch(request) {
            Ok(response) => response,
            Err(e) => {
                debug!(path = %request.path, error = %e, "Navigation fell back to shell");
                self.store
                    .borrow()
                    .get(&self.cache, SHELL_DOCUMENT)
                    .unwrap_or_else(Response::network_error)
            }
        }
    }

    /// Static assets are stale-while-revalidate: a cached copy is returned
    /// immediately and refreshed behind the caller's back; a miss waits on
    /// the network.
    fn serve_static(&self, request: &Request) -> Response {
        let cached = self.store.borrow().get(&self.cache, &request.path);
        if let Some(response) = cached {
            self.revalidate(request);
            return response;
        }
        match self.network.borrow_mut().fetch(request) {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .borrow_mut()
                        .put(&self.cache, &request.path, response.clone());
                }
                response
            }
            Err(e) => {
                debug!(path = %request.path, error = %e, "Static asset miss with no network");
                Response::network_error()
            }
        }
    }

    /// Refresh an already-served asset for next time. Only a 200 overwrites
    /// the cache entry; failures are swallowed.
    fn revalidate(&self, request: &Request) {
        match self.network.borrow_mut().fetch(request) {
            Ok(response) if response.is_success() => {
                self.store
                    .borrow_mut()
                    .put(&self.cache, &request.path, response);
            }
            Ok(response) => {
                debug!(path = %request.path, status = response.status, "Revalidation kept cached copy");
            }
            Err(e) => {
                debug!(path = %request.path, error = %e, "Revalidation failed; keeping cached copy");
            }
        }
    }

    /// Everything else is network-first with silent caching of 200s and a
    /// fallback to any previously cached response.
    fn serve_default(&self, request: &Request) -> Response {
        match self.network.borrow_mut().fetch(request) {
            Ok(response) => {
                if response.is_success() {
                    self.store
                        .borrow_mut()
                        .put(&self.cache, &request.path, response.clone());
                }
                response
            }
            Err(e) => {
                debug!(path = %request.path, error = %e, "Falling back to cache");
                self.store
                    .borrow()
                    .get_any(&request.path)
                    .unwrap_or_else(Response::network_error)
            }
        }
    }
}

// ── Worker lifecycle ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerState {
    Installing,
    /// Installed, but an older version still controls the pages.
    Waiting,
    Active,
    /// Replaced by a newer active version; its cache has been purged.
    Superseded,
}

/// The one message the page sends the worker: activate the waiting
/// version immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerMessage {
    SkipWaiting,
}

struct WorkerUnit {
    manager: CacheManager,
    state: WorkerState,
}

/// Drives worker versions through their lifecycle the way the platform
/// registration does: one active version at a time, a newer install parked
/// in waiting until the page sends [`WorkerMessage::SkipWaiting`].
pub(crate) struct WorkerHost {
    preload_supported: bool,
    workers: Vec<WorkerUnit>,
}

impl WorkerHost {
    pub(crate) fn new(preload_supported: bool) -> Self {
        Self {
            preload_supported,
            workers: Vec::new(),
        }
    }

    /// Run a new version through install. An install failure discards the
    /// version entirely; whatever was active stays in control.
    pub(crate) fn register(&mut self, manager: CacheManager) -> Result<WorkerState> {
        let mut unit = WorkerUnit {
            manager,
            state: WorkerState::Installing,
        };
        unit.manager
            .install()
            .with_context(|| format!("Install failed for version {}", unit.manager.version()))?;

        if self.active_index().is_none() {
            unit.manager.activate(self.preload_supported);
            unit.state = WorkerState::Active;
        } else {
            unit.state = WorkerState::Waiting;
        }
        let state = unit.state;
        self.workers.push(unit);
        Ok(state)
    }

    /// True once a newer version has finished installing and is parked.
    /// This is the page-visible "update ready" signal.
    pub(crate) fn update_ready(&self) -> bool {
        self.waiting_index().is_some()
    }

    pub(crate) fn message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::SkipWaiting => {
                let Some(waiting) = self.waiting_index() else {
                    return;
                };
                if let Some(active) = self.active_index() {
                    self.workers[active].state = WorkerState::Superseded;
                }
                // Activation purges every older cache as a side effect.
                let preload = self.preload_supported;
                self.workers[waiting].manager.activate(preload);
                self.workers[waiting].state = WorkerState::Active;
            }
        }
    }

    /// Dispatch a fetch to whichever version controls the pages.
    pub(crate) fn handle_fetch(&self, request: &Request, preload: Option<Response>) -> FetchOutcome {
        match self.active_index() {
            Some(i) => self.workers[i].manager.handle_fetch(request, preload),
            None => FetchOutcome::Ignored,
        }
    }

    pub(crate) fn active_version(&self) -> Option<&str> {
        self.active_index().map(|i| self.workers[i].manager.version())
    }

    pub(crate) fn state_of(&self, version: &str) -> Option<WorkerState> {
        self.workers
            .iter()
            .find(|u| u.manager.version() == version)
            .map(|u| u.state)
    }

    fn active_index(&self) -> Option<usize> {
        self.workers
            .iter()
            .position(|u| u.state == WorkerState::Active)
    }

    fn waiting_index(&self) -> Option<usize> {
        self.workers
            .iter()
            .position(|u| u.state == WorkerState::Waiting)
    }
}
