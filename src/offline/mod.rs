// Allow dead code: the worker core is host-driven and exercised by its
// tests; the CLI binary has no event loop to mount it on.
#![allow(dead_code)]

//! Offline cache manager: the versioned asset-cache lifecycle and the
//! request-interception policy that serves the app shell without a network.
//!
//! The core is split the same way the logic separates naturally:
//! - [`policy`] — pure request classification and the shell manifest;
//! - [`worker`] — the `CacheManager` (install / activate / fetch handling)
//!   and the `WorkerHost` that drives one worker version at a time through
//!   installing → waiting → active → superseded.
//!
//! The cache store and the network are trait seams; the manager never
//! touches ambient globals.

mod policy;
mod worker;

pub(crate) use policy::{cache_name, route, Request, Response, Route};
pub(crate) use worker::{
    CacheManager, CacheStore, FetchOutcome, Network, WorkerHost, WorkerMessage, WorkerState,
};
