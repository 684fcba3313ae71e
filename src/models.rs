// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "credit" => Ok(AccountKind::Credit),
            other => Err(LedgerError::validation(
                "kind",
                format!("'{}' is not one of checking|savings|credit", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    /// Balance delta for a transaction of this kind.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TxKind::Income => amount,
            TxKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(LedgerError::validation(
                "kind",
                format!("'{}' is not one of income|expense", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub institution: String,
    pub balance: Decimal,
    pub kind: AccountKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub kind: TxKind,
    pub date: NaiveDate,
    pub note: String,
}

impl Transaction {
    pub fn delta(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Input for a new account. The opening balance is folded into `balance`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub institution: String,
    pub kind: AccountKind,
    pub opening_balance: Decimal,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("name", "must not be empty"));
        }
        Ok(())
    }

    pub fn into_account(self, id: String) -> Account {
        Account {
            id,
            name: self.name.trim().to_string(),
            institution: self.institution.trim().to_string(),
            balance: self.opening_balance,
            kind: self.kind,
        }
    }
}

/// Input for a new transaction. Foreign keys are checked by the store.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub kind: TxKind,
    pub date: NaiveDate,
    pub note: String,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::validation(
                "amount",
                format!("{} must be greater than zero", self.amount),
            ));
        }
        if self.account_id.trim().is_empty() {
            return Err(LedgerError::validation("account_id", "must not be empty"));
        }
        if self.category_id.trim().is_empty() {
            return Err(LedgerError::validation("category_id", "must not be empty"));
        }
        Ok(())
    }

    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            category_id: self.category_id,
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            note: self.note.trim().to_string(),
        }
    }
}

/// Accounts and transactions for one user, transactions most-recent-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl LedgerView {
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn transactions_for<'a>(
        &'a self,
        account_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.account_id == account_id)
    }
}
