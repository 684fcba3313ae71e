// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage backends behind the ledger store.
//!
//! The store applies every mutation to its own cache first and then hands
//! the equivalent [`WriteBatch`] to its backend. The backend answers with
//! the ids it assigned and may push replacement snapshots later.

mod local;
mod synced;

use std::fmt;

use async_trait::async_trait;

pub use local::LocalBackend;
pub use synced::SyncedBackend;

use crate::error::Result;
use crate::remote::{Snapshot, WriteBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Local,
    RemoteSynced,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Local => f.write_str("local"),
            Mode::RemoteSynced => f.write_str("remote-synced"),
        }
    }
}

#[async_trait]
pub trait LedgerBackend: Send {
    fn mode(&self) -> Mode;

    /// Persists a batch already applied to the cache. Returns the final ids
    /// of the inserted records, in batch order.
    async fn commit(&mut self, batch: WriteBatch) -> Result<Vec<String>>;

    /// Next queued snapshot, without waiting.
    fn try_next_snapshot(&mut self) -> Option<Snapshot>;

    /// Waits for the next snapshot. `None` once the feed is closed or when
    /// the backend has no feed at all.
    async fn next_snapshot(&mut self) -> Option<Snapshot>;

    async fn close(&mut self);
}
