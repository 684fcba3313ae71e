// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The authoritative in-memory ledger for one session.
//!
//! Every account balance equals its opening balance plus the signed sum of
//! its transactions. Mutations keep that true by changing the transaction
//! set and the owning balance in the same step, then handing the matching
//! [`WriteBatch`] to the backend.
//!
//! Cache updates happen before the backend is awaited, so the caller's next
//! [`LedgerStore::current_view`] already shows the change. If the backend is
//! unavailable the change is kept until the next snapshot replaces the
//! affected collection wholesale. Any other rejection is undone before the
//! error is returned.

use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{LedgerBackend, Mode};
use crate::error::{LedgerError, Result};
use crate::models::{Account, Category, LedgerView, NewAccount, NewTransaction, Transaction};
use crate::remote::{Collection, Record, Snapshot, WriteBatch, WriteOp};

pub struct LedgerStore {
    backend: Box<dyn LedgerBackend>,
    categories: Vec<Category>,
    view: LedgerView,
}

impl LedgerStore {
    pub fn new(backend: Box<dyn LedgerBackend>, categories: Vec<Category>) -> Self {
        Self {
            backend,
            categories,
            view: LedgerView::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.backend.mode()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// The cache as it stands, without merging queued snapshots.
    pub fn view(&self) -> &LedgerView {
        &self.view
    }

    /// The cache after merging every snapshot received so far.
    pub fn current_view(&mut self) -> &LedgerView {
        self.apply_pending();
        &self.view
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.view.account(id)
    }

    pub async fn create_account(&mut self, draft: NewAccount) -> Result<Account> {
        draft.validate()?;
        self.apply_pending();

        let account = draft.into_account(provisional_id());
        self.view.accounts.push(account.clone());

        let batch = WriteBatch::new().push(WriteOp::Insert(Record::Account(account.clone())));
        let ids = self.backend.commit(batch).await?;
        let account = match ids.into_iter().next() {
            Some(id) => self.rekey_account(&account.id, id).unwrap_or(account),
            None => account,
        };
        info!(account_id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Removes the account and all of its transactions in one step. Returns
    /// the number of transactions removed with it.
    pub async fn delete_account(&mut self, account_id: &str) -> Result<usize> {
        self.apply_pending();
        let pos = self
            .view
            .accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| LedgerError::not_found("account", account_id))?;

        let mut batch = WriteBatch::new();
        let mut kept = Vec::with_capacity(self.view.transactions.len());
        for t in std::mem::take(&mut self.view.transactions) {
            if t.account_id == account_id {
                batch = batch.push(WriteOp::Remove {
                    collection: Collection::Transactions,
                    id: t.id,
                });
            } else {
                kept.push(t);
            }
        }
        let removed = batch.len();
        self.view.transactions = kept;
        self.view.accounts.remove(pos);
        let batch = batch.push(WriteOp::Remove {
            collection: Collection::Accounts,
            id: account_id.to_string(),
        });

        self.backend.commit(batch).await?;
        info!(account_id, removed, "account deleted");
        Ok(removed)
    }

    pub async fn record_transaction(&mut self, draft: NewTransaction) -> Result<Transaction> {
        draft.validate()?;
        self.apply_pending();
        if self.category(&draft.category_id).is_none() {
            return Err(LedgerError::not_found("category", draft.category_id));
        }
        let delta = draft.kind.signed(draft.amount);
        let account = self
            .view
            .accounts
            .iter_mut()
            .find(|a| a.id == draft.account_id)
            .ok_or_else(|| LedgerError::not_found("account", draft.account_id.clone()))?;

        let balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::validation("amount", "balance overflow"))?;

        let tx = draft.into_transaction(provisional_id());
        account.balance = balance;
        self.view.transactions.insert(0, tx.clone());

        let batch = WriteBatch::new()
            .push(WriteOp::Insert(Record::Transaction(tx.clone())))
            .push(WriteOp::AdjustBalance {
                account_id: tx.account_id.clone(),
                delta,
            });
        let ids = match self.backend.commit(batch).await {
            Ok(ids) => ids,
            // Only an unreachable backend leaves the optimistic change in place.
            Err(err @ LedgerError::BackendUnavailable(_)) => return Err(err),
            Err(err) => {
                self.revert_transaction(&tx, delta);
                return Err(err);
            }
        };
        let tx = match ids.into_iter().next() {
            Some(id) => self.rekey_transaction(&tx.id, id).unwrap_or(tx),
            None => tx,
        };
        debug!(tx_id = %tx.id, account_id = %tx.account_id, %delta, "transaction recorded");
        Ok(tx)
    }

    /// Merges every queued snapshot without waiting. Returns how many were
    /// applied.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(snap) = self.backend.try_next_snapshot() {
            self.merge(snap);
            applied += 1;
        }
        applied
    }

    /// Waits for the next snapshot and merges it. `None` when the backend
    /// has no feed or the feed was closed.
    pub async fn next_change(&mut self) -> Option<Collection> {
        let snap = self.backend.next_snapshot().await?;
        let collection = snap.collection();
        self.merge(snap);
        Some(collection)
    }

    pub async fn close(&mut self) {
        self.backend.close().await;
    }

    fn merge(&mut self, snap: Snapshot) {
        match snap {
            Snapshot::Accounts(accounts) => {
                debug!(count = accounts.len(), "accounts snapshot merged");
                self.view.accounts = accounts;
            }
            Snapshot::Transactions(mut transactions) => {
                transactions.sort_by(|a, b| b.date.cmp(&a.date));
                debug!(count = transactions.len(), "transactions snapshot merged");
                self.view.transactions = transactions;
            }
        }
    }

    fn revert_transaction(&mut self, tx: &Transaction, delta: Decimal) {
        self.view.transactions.retain(|t| t.id != tx.id);
        if let Some(account) = self
            .view
            .accounts
            .iter_mut()
            .find(|a| a.id == tx.account_id)
        {
            account.balance -= delta;
        }
        debug!(tx_id = %tx.id, "rejected transaction reverted");
    }

    fn rekey_account(&mut self, provisional: &str, id: String) -> Option<Account> {
        if provisional == id {
            return self.view.account(&id).cloned();
        }
        let account = self.view.accounts.iter_mut().find(|a| a.id == provisional)?;
        account.id = id;
        Some(account.clone())
    }

    fn rekey_transaction(&mut self, provisional: &str, id: String) -> Option<Transaction> {
        let tx = self
            .view
            .transactions
            .iter_mut()
            .find(|t| t.id == provisional)?;
        tx.id = id;
        Some(tx.clone())
    }
}

fn provisional_id() -> String {
    Uuid::new_v4().to_string()
}

