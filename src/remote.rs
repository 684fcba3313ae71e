// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Contract for a remote, push-synchronised persistence service.
//!
//! A [`RemoteStore`] keeps one `accounts` and one `transactions` collection
//! per user. Writes are grouped into a [`WriteBatch`] that the store applies
//! all-or-nothing. Every change to a collection, whoever made it, is pushed
//! to its subscribers as a complete [`Snapshot`].

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::models::{Account, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Transactions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record to insert. Its `id` is provisional; the store assigns the real one.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Account(Account),
    Transaction(Transaction),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Record::Account(_) => Collection::Accounts,
            Record::Transaction(_) => Collection::Transactions,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Account(a) => &a.id,
            Record::Transaction(t) => &t.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Insert(Record),
    Remove { collection: Collection, id: String },
    /// Field update on an account: `balance += delta`.
    AdjustBalance { account_id: String, delta: Decimal },
}

impl WriteOp {
    pub fn collection(&self) -> Collection {
        match self {
            WriteOp::Insert(record) => record.collection(),
            WriteOp::Remove { collection, .. } => *collection,
            WriteOp::AdjustBalance { .. } => Collection::Accounts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, op: WriteOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Provisional ids of inserted records, in batch order.
    pub fn inserted_ids(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriteOp::Insert(record) => Some(record.id().to_string()),
                _ => None,
            })
            .collect()
    }
}

/// Full contents of one collection for one user.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Accounts(Vec<Account>),
    Transactions(Vec<Transaction>),
}

impl Snapshot {
    pub fn collection(&self) -> Collection {
        match self {
            Snapshot::Accounts(_) => Collection::Accounts,
            Snapshot::Transactions(_) => Collection::Transactions,
        }
    }
}

/// Receiving half of a subscription feed. Dropping it ends the subscription.
#[derive(Debug)]
pub struct Subscription {
    collection: Collection,
    receiver: mpsc::UnboundedReceiver<Snapshot>,
}

impl Subscription {
    pub fn new(collection: Collection, receiver: mpsc::UnboundedReceiver<Snapshot>) -> Self {
        Self {
            collection,
            receiver,
        }
    }

    pub fn try_recv(&mut self) -> Option<Snapshot> {
        self.receiver.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.receiver.recv().await
    }

    pub fn close(&mut self) {
        self.receiver.close();
        debug!(collection = %self.collection, "subscription closed");
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Opens a feed for `(user_id, collection)`. The current contents are
    /// delivered as the first snapshot.
    async fn subscribe(&self, user_id: &str, collection: Collection) -> Result<Subscription>;

    /// Applies every operation or none. Returns the ids assigned to inserted
    /// records, in batch order.
    async fn commit(&self, user_id: &str, batch: WriteBatch) -> Result<Vec<String>>;

    async fn write(&self, user_id: &str, record: Record) -> Result<String> {
        let ids = self
            .commit(user_id, WriteBatch::new().push(WriteOp::Insert(record)))
            .await?;
        Ok(ids.into_iter().next().unwrap_or_default())
    }

    async fn remove(&self, user_id: &str, collection: Collection, id: &str) -> Result<()> {
        let op = WriteOp::Remove {
            collection,
            id: id.to_string(),
        };
        self.commit(user_id, WriteBatch::new().push(op)).await?;
        Ok(())
    }

    async fn update(&self, user_id: &str, account_id: &str, delta: Decimal) -> Result<()> {
        let op = WriteOp::AdjustBalance {
            account_id: account_id.to_string(),
            delta,
        };
        self.commit(user_id, WriteBatch::new().push(op)).await?;
        Ok(())
    }
}
