//! Offline shell: a cache-first asset cache with an offline fallback page.
//!
//! Models the app's service worker. Assets listed in [`ShellConfig::precache`]
//! are fetched into a single named cache at install time; activation deletes
//! caches left behind by earlier generations; fetches are answered from the
//! cache first and from the [`Network`] otherwise.

mod cache;
mod request;
mod shell;

pub use cache::{Cache, CacheStorage};
pub use request::{Network, Request, RequestMode, Response, ResponseType};
pub use shell::{FetchOutcome, OfflineShell, ShellConfig, ShellMessage, WorkerState};

pub const DEFAULT_CACHE_NAME: &str = "cde-event-prep-cache-v1";

pub const OFFLINE_PAGE: &str = "/offline.html";

pub const DEFAULT_PRECACHE: &[&str] = &[
    "/",
    "/index.html",
    OFFLINE_PAGE,
    "/vite.svg",
    "/manifest.json",
];
