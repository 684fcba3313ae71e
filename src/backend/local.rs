// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use async_trait::async_trait;
use tracing::debug;

use super::{LedgerBackend, Mode};
use crate::error::Result;
use crate::remote::{Snapshot, WriteBatch};

/// In-process backend. The store's cache is the only copy of the data, so
/// committing just confirms the ids the store already chose.
#[derive(Debug, Default)]
pub struct LocalBackend {
    commits: usize,
}

impl LocalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerBackend for LocalBackend {
    fn mode(&self) -> Mode {
        Mode::Local
    }

    async fn commit(&mut self, batch: WriteBatch) -> Result<Vec<String>> {
        self.commits += 1;
        debug!(ops = batch.len(), commits = self.commits, "local commit");
        Ok(batch.inserted_ids())
    }

    fn try_next_snapshot(&mut self) -> Option<Snapshot> {
        None
    }

    async fn next_snapshot(&mut self) -> Option<Snapshot> {
        None
    }

    async fn close(&mut self) {
        debug!(commits = self.commits, "local backend closed");
    }
}
