// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{LedgerBackend, Mode};
use crate::error::Result;
use crate::remote::{Collection, RemoteStore, Snapshot, Subscription, WriteBatch};

/// Backend that forwards writes to a [`RemoteStore`] and relays its
/// subscription feeds for one user.
pub struct SyncedBackend {
    remote: Arc<dyn RemoteStore>,
    user_id: String,
    accounts: Subscription,
    transactions: Subscription,
}

impl SyncedBackend {
    /// Opens both collection feeds. Fails if either handshake fails.
    pub async fn connect(remote: Arc<dyn RemoteStore>, user_id: &str) -> Result<Self> {
        let accounts = remote.subscribe(user_id, Collection::Accounts).await?;
        let transactions = remote.subscribe(user_id, Collection::Transactions).await?;
        info!(user_id, "synced backend connected");
        Ok(Self {
            remote,
            user_id: user_id.to_string(),
            accounts,
            transactions,
        })
    }
}

#[async_trait]
impl LedgerBackend for SyncedBackend {
    fn mode(&self) -> Mode {
        Mode::RemoteSynced
    }

    async fn commit(&mut self, batch: WriteBatch) -> Result<Vec<String>> {
        let ops = batch.len();
        match self.remote.commit(&self.user_id, batch).await {
            Ok(ids) => {
                debug!(user_id = %self.user_id, ops, "remote commit confirmed");
                Ok(ids)
            }
            Err(err) => {
                warn!(user_id = %self.user_id, ops, error = %err, "remote commit failed");
                Err(err)
            }
        }
    }

    fn try_next_snapshot(&mut self) -> Option<Snapshot> {
        self.accounts
            .try_recv()
            .or_else(|| self.transactions.try_recv())
    }

    async fn next_snapshot(&mut self) -> Option<Snapshot> {
        tokio::select! {
            Some(snap) = self.accounts.recv() => Some(snap),
            Some(snap) = self.transactions.recv() => Some(snap),
            else => None,
        }
    }

    async fn close(&mut self) {
        self.accounts.close();
        self.transactions.close();
        info!(user_id = %self.user_id, "subscriptions closed");
    }
}
