use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::cache::CacheStorage;
use super::request::{Network, Request, RequestMode, Response};
use super::{DEFAULT_CACHE_NAME, DEFAULT_PRECACHE, OFFLINE_PAGE};
use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Scheme, host and port the app is served from, e.g. `https://cde-prep.app`.
    pub origin: String,
    pub cache_name: String,
    /// Paths relative to `origin`.
    pub precache: Vec<String>,
    /// Activate as soon as install finishes instead of waiting for a
    /// [`ShellMessage::SkipWaiting`].
    pub skip_waiting: bool,
}

impl ShellConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            cache_name: DEFAULT_CACHE_NAME.into(),
            precache: DEFAULT_PRECACHE.iter().map(|s| s.to_string()).collect(),
            skip_waiting: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installed,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMessage {
    SkipWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Left to the browser (cross-origin, or worker not active).
    NotHandled,
    FromCache(Response),
    FromNetwork(Response),
    /// Network failed; cached offline page served instead.
    OfflineFallback(Response),
    /// Network failed and nothing suitable is cached.
    Unavailable,
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            FetchOutcome::FromCache(r)
            | FetchOutcome::FromNetwork(r)
            | FetchOutcome::OfflineFallback(r) => Some(r),
            FetchOutcome::NotHandled | FetchOutcome::Unavailable => None,
        }
    }
}

pub struct OfflineShell<N: Network> {
    origin: Url,
    cache_name: String,
    precache: Vec<String>,
    caches: CacheStorage,
    network: N,
    state: WorkerState,
    skip_waiting: bool,
    clients_claimed: bool,
}

impl<N: Network> OfflineShell<N> {
    pub fn new(config: ShellConfig, network: N) -> Result<Self, ShellError> {
        Self::with_storage(config, network, CacheStorage::new())
    }

    /// Start from caches left by a previous generation.
    pub fn with_storage(
        config: ShellConfig,
        network: N,
        caches: CacheStorage,
    ) -> Result<Self, ShellError> {
        let origin = Url::parse(&config.origin)
            .ok()
            .filter(|u| u.has_host())
            .ok_or_else(|| ShellError::InvalidOrigin(config.origin.clone()))?;
        Ok(Self {
            origin,
            cache_name: config.cache_name,
            precache: config.precache,
            caches,
            network,
            state: WorkerState::Parsed,
            skip_waiting: config.skip_waiting,
            clients_claimed: false,
        })
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Installed but held back from activating.
    pub fn is_waiting(&self) -> bool {
        self.state == WorkerState::Installed && !self.skip_waiting
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    /// Fetch every precache asset into the named cache.
    ///
    /// All-or-nothing: if any asset fails to fetch or returns a non-2xx
    /// status, nothing is stored and the worker stays `Parsed`. On success
    /// the worker is `Installed`, and waiting unless skip-waiting was
    /// requested.
    pub fn install(&mut self) -> Result<(), ShellError> {
        let mut fetched = Vec::with_capacity(self.precache.len());
        for path in &self.precache {
            let key = resolve(&self.origin, path).ok_or_else(|| ShellError::PrecacheFailed {
                url: path.clone(),
                message: "not a valid path".into(),
            })?;
            let response = self
                .network
                .fetch(&Request::get(key.clone()))
                .map_err(|e| ShellError::PrecacheFailed {
                    url: key.clone(),
                    message: e.to_string(),
                })?;
            if !response.is_ok() {
                return Err(ShellError::PrecacheFailed {
                    url: key,
                    message: format!("status {}", response.status),
                });
            }
            fetched.push((key, response));
        }

        let cache = self.caches.open(&self.cache_name);
        for (key, response) in fetched {
            cache.put(key, response);
        }
        info!(cache = %self.cache_name, assets = self.precache.len(), "offline shell installed");

        self.state = WorkerState::Installed;
        Ok(())
    }

    /// Delete caches from other generations and take control of clients.
    /// Returns the names of the deleted caches.
    ///
    /// A waiting worker cannot activate until it receives
    /// [`ShellMessage::SkipWaiting`].
    pub fn activate(&mut self) -> Result<Vec<String>, ShellError> {
        match self.state {
            WorkerState::Parsed => return Err(ShellError::NotInstalled),
            WorkerState::Active => return Ok(Vec::new()),
            WorkerState::Installed if !self.skip_waiting => return Err(ShellError::Waiting),
            WorkerState::Installed => {}
        }

        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| *name != self.cache_name)
            .map(str::to_string)
            .collect();
        for name in &stale {
            self.caches.delete(name);
            debug!(cache = %name, "deleted stale cache");
        }

        self.state = WorkerState::Active;
        self.clients_claimed = true;
        Ok(stale)
    }

    /// `SkipWaiting` activates a waiting worker and returns the caches
    /// deleted by that activation. Before install it only marks the worker
    /// to skip waiting once installed.
    pub fn handle_message(&mut self, message: ShellMessage) -> Result<Vec<String>, ShellError> {
        match message {
            ShellMessage::SkipWaiting => {
                let was_waiting = self.is_waiting();
                self.skip_waiting = true;
                if was_waiting {
                    info!(cache = %self.cache_name, "skip waiting");
                    return self.activate();
                }
                Ok(Vec::new())
            }
        }
    }

    /// Answer an intercepted request: cache first, then network.
    pub fn handle_fetch(&mut self, request: &Request) -> FetchOutcome {
        if self.state != WorkerState::Active {
            return FetchOutcome::NotHandled;
        }
        let Some(key) = self.same_origin_key(&request.url) else {
            return FetchOutcome::NotHandled;
        };

        if let Some(hit) = self.caches.match_url(&key) {
            debug!(url = %key, "cache hit");
            return FetchOutcome::FromCache(hit.clone());
        }

        if request.mode == RequestMode::Navigate {
            return match self.network.fetch(request) {
                Ok(response) => FetchOutcome::FromNetwork(response),
                Err(e) => {
                    warn!(url = %key, error = %e, "navigation failed, serving offline page");
                    self.offline_page()
                }
            };
        }

        match self.network.fetch(request) {
            Ok(response) => {
                if response.is_cacheable() {
                    self.caches
                        .open(&self.cache_name)
                        .put(key, response.clone());
                }
                FetchOutcome::FromNetwork(response)
            }
            Err(e) if request.accepts_html() => {
                warn!(url = %key, error = %e, "fetch failed, serving offline page");
                self.offline_page()
            }
            Err(e) => {
                debug!(url = %key, error = %e, "fetch failed");
                FetchOutcome::Unavailable
            }
        }
    }

    fn offline_page(&self) -> FetchOutcome {
        resolve(&self.origin, OFFLINE_PAGE)
            .and_then(|key| self.caches.match_url(&key).cloned())
            .map_or(FetchOutcome::Unavailable, FetchOutcome::OfflineFallback)
    }

    /// Cache key for a same-origin URL; `None` for cross-origin or unparseable.
    fn same_origin_key(&self, url: &str) -> Option<String> {
        let mut parsed = Url::parse(url).ok()?;
        if parsed.origin() != self.origin.origin() {
            return None;
        }
        parsed.set_fragment(None);
        Some(parsed.into())
    }
}

fn resolve(origin: &Url, path: &str) -> Option<String> {
    let mut url = origin.join(path).ok()?;
    url.set_fragment(None);
    Some(url.into())
}
