// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::models::{Account, AccountKind, Transaction, TxKind};
use crate::remote::{
    Collection, Record, RemoteStore, Snapshot, Subscription, WriteBatch, WriteOp,
};

struct Subscriber {
    user_id: String,
    collection: Collection,
    sender: mpsc::UnboundedSender<Snapshot>,
}

/// SQLite-backed [`RemoteStore`]. Sessions sharing one instance see each
/// other's writes through their subscriptions.
pub struct SqliteRemote {
    conn: Mutex<Connection>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SqliteRemote {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(LedgerError::backend)?;
        info!(path = %path.display(), "opened synced ledger database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(LedgerError::backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        init_schema(&mut conn).map_err(LedgerError::backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::backend("database lock poisoned"))
    }

    fn snapshot(&self, user_id: &str, collection: Collection) -> Result<Snapshot> {
        let conn = self.conn()?;
        let snap = match collection {
            Collection::Accounts => Snapshot::Accounts(load_accounts(&conn, user_id)?),
            Collection::Transactions => {
                Snapshot::Transactions(load_transactions(&conn, user_id)?)
            }
        };
        Ok(snap)
    }

    fn subscribers(&self) -> Result<MutexGuard<'_, Vec<Subscriber>>> {
        self.subscribers
            .lock()
            .map_err(|_| LedgerError::backend("subscriber lock poisoned"))
    }

    /// Pushes the current contents of `collection` to its live subscribers.
    /// The snapshot is read while the subscriber list is locked, so every
    /// feed sees snapshots in commit order.
    fn publish(&self, user_id: &str, collection: Collection) -> Result<()> {
        let mut subs = self.subscribers()?;
        let snap = self.snapshot(user_id, collection)?;
        subs.retain(|s| {
            if s.user_id != user_id || s.collection != collection {
                return !s.sender.is_closed();
            }
            s.sender.send(snap.clone()).is_ok()
        });
        debug!(user_id, %collection, subscribers = subs.len(), "published snapshot");
        Ok(())
    }
}

fn init_schema(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        institution TEXT NOT NULL,
        balance TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('checking','savings','credit')),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_accounts_user ON accounts(user_id);

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        account_id TEXT NOT NULL,
        category_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        date TEXT NOT NULL,
        note TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    "#,
    )
}

fn conversion_err<E>(e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

fn parse_decimal_col(s: &str) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>().map_err(conversion_err)
}

fn load_accounts(conn: &Connection, user_id: &str) -> Result<Vec<Account>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, institution, balance, kind FROM accounts
             WHERE user_id=?1 ORDER BY created_at, rowid",
        )
        .map_err(LedgerError::backend)?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            let balance: String = r.get(3)?;
            let kind: String = r.get(4)?;
            Ok(Account {
                id: r.get(0)?,
                name: r.get(1)?,
                institution: r.get(2)?,
                balance: parse_decimal_col(&balance)?,
                kind: kind.parse::<AccountKind>().map_err(conversion_err)?,
            })
        })
        .map_err(LedgerError::backend)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(LedgerError::backend)
}

fn load_transactions(conn: &Connection, user_id: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, account_id, category_id, amount, kind, date, note FROM transactions
             WHERE user_id=?1 ORDER BY date DESC, rowid DESC",
        )
        .map_err(LedgerError::backend)?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            let amount: String = r.get(3)?;
            let kind: String = r.get(4)?;
            Ok(Transaction {
                id: r.get(0)?,
                account_id: r.get(1)?,
                category_id: r.get(2)?,
                amount: parse_decimal_col(&amount)?,
                kind: kind.parse::<TxKind>().map_err(conversion_err)?,
                date: r.get::<_, NaiveDate>(5)?,
                note: r.get(6)?,
            })
        })
        .map_err(LedgerError::backend)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(LedgerError::backend)
}

fn apply_op(
    tx: &rusqlite::Transaction<'_>,
    user_id: &str,
    op: &WriteOp,
) -> Result<Option<String>> {
    match op {
        WriteOp::Insert(Record::Account(a)) => {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO accounts(id, user_id, name, institution, balance, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    user_id,
                    a.name,
                    a.institution,
                    a.balance.to_string(),
                    a.kind.as_str()
                ],
            )
            .map_err(LedgerError::backend)?;
            Ok(Some(id))
        }
        WriteOp::Insert(Record::Transaction(t)) => {
            let owner: Option<String> = tx
                .query_row(
                    "SELECT user_id FROM accounts WHERE id=?1",
                    params![t.account_id],
                    |r| r.get(0),
                )
                .optional()
                .map_err(LedgerError::backend)?;
            if owner.as_deref() != Some(user_id) {
                return Err(LedgerError::not_found("account", t.account_id.clone()));
            }
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO transactions(id, user_id, account_id, category_id, amount, kind, date, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    user_id,
                    t.account_id,
                    t.category_id,
                    t.amount.to_string(),
                    t.kind.as_str(),
                    t.date,
                    t.note
                ],
            )
            .map_err(LedgerError::backend)?;
            Ok(Some(id))
        }
        WriteOp::Remove { collection, id } => {
            let sql = match collection {
                Collection::Accounts => "DELETE FROM accounts WHERE id=?1 AND user_id=?2",
                Collection::Transactions => "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            };
            tx.execute(sql, params![id, user_id])
                .map_err(LedgerError::backend)?;
            Ok(None)
        }
        WriteOp::AdjustBalance { account_id, delta } => {
            let current: Option<String> = tx
                .query_row(
                    "SELECT balance FROM accounts WHERE id=?1 AND user_id=?2",
                    params![account_id, user_id],
                    |r| r.get(0),
                )
                .optional()
                .map_err(LedgerError::backend)?;
            let current =
                current.ok_or_else(|| LedgerError::not_found("account", account_id.clone()))?;
            let balance = parse_decimal_col(&current)
                .map_err(LedgerError::backend)?
                .checked_add(*delta)
                .ok_or_else(|| LedgerError::validation("amount", "balance overflow"))?;
            tx.execute(
                "UPDATE accounts SET balance=?1 WHERE id=?2",
                params![balance.to_string(), account_id],
            )
            .map_err(LedgerError::backend)?;
            Ok(None)
        }
    }
}

#[async_trait]
impl RemoteStore for SqliteRemote {
    async fn subscribe(&self, user_id: &str, collection: Collection) -> Result<Subscription> {
        let (sender, receiver) = mpsc::unbounded_channel();
        // Registered under the same lock `publish` holds, so no commit can
        // land between the initial snapshot and the first push.
        let mut subs = self.subscribers()?;
        let initial = self.snapshot(user_id, collection)?;
        sender.send(initial).map_err(LedgerError::backend)?;
        subs.push(Subscriber {
            user_id: user_id.to_string(),
            collection,
            sender,
        });
        drop(subs);
        info!(user_id, %collection, "subscription opened");
        Ok(Subscription::new(collection, receiver))
    }

    async fn commit(&self, user_id: &str, batch: WriteBatch) -> Result<Vec<String>> {
        let mut touched = Vec::new();
        let ids = {
            let mut conn = self.conn()?;
            let tx = conn.transaction().map_err(LedgerError::backend)?;
            let mut ids = Vec::new();
            for op in &batch.ops {
                if let Some(id) = apply_op(&tx, user_id, op)? {
                    ids.push(id);
                }
                let collection = op.collection();
                if !touched.contains(&collection) {
                    touched.push(collection);
                }
                // Account removal cascades into the transactions table.
                if matches!(op, WriteOp::Remove { collection: Collection::Accounts, .. })
                    && !touched.contains(&Collection::Transactions)
                {
                    touched.push(Collection::Transactions);
                }
            }
            tx.commit().map_err(LedgerError::backend)?;
            ids
        };
        debug!(user_id, ops = batch.len(), "committed batch");
        for collection in touched {
            if let Err(err) = self.publish(user_id, collection) {
                warn!(user_id, %collection, error = %err, "publish after commit failed");
            }
        }
        Ok(ids)
    }
}
