// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates derived from a ledger snapshot.
//!
//! Nothing here is stored. Every function is recomputed from the
//! transactions it is given, so results can never drift from the ledger.
//! Sums saturate at the `Decimal` bounds instead of panicking.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::models::{Account, Category, LedgerView, Transaction, TxKind};

/// A calendar month. Matching is by year/month components only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(
                "month",
                format!("{} is not in 1..=12", month),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(Period::of)
            .map_err(|_| LedgerError::validation("month", format!("'{}', expected YYYY-MM", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: Category,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub period: Period,
    pub total_assets: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub by_category: Vec<CategorySpend>,
}

pub fn total_assets(accounts: &[Account]) -> Decimal {
    accounts
        .iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.balance))
}

fn period_sum(transactions: &[Transaction], period: Period, kind: TxKind) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind && period.contains(t.date))
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

pub fn period_expense(transactions: &[Transaction], period: Period) -> Decimal {
    period_sum(transactions, period, TxKind::Expense)
}

pub fn period_income(transactions: &[Transaction], period: Period) -> Decimal {
    period_sum(transactions, period, TxKind::Income)
}

/// Expense totals per category in catalog order. Categories with nothing
/// spent are left out rather than reported as zero.
pub fn category_breakdown<'a, I>(transactions: I, categories: &[Category]) -> Vec<CategorySpend>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = vec![Decimal::ZERO; categories.len()];
    for t in transactions {
        if t.kind != TxKind::Expense {
            continue;
        }
        if let Some(idx) = categories.iter().position(|c| c.id == t.category_id) {
            totals[idx] = totals[idx].saturating_add(t.amount);
        }
    }
    categories
        .iter()
        .zip(totals)
        .filter(|(_, total)| !total.is_zero())
        .map(|(c, total)| CategorySpend {
            category: c.clone(),
            total,
        })
        .collect()
}

/// Income and expense for each month of `year`, January at index 0.
pub fn monthly_series(transactions: &[Transaction], year: i32) -> [MonthTotals; 12] {
    let mut series = [MonthTotals::default(); 12];
    for t in transactions.iter().filter(|t| t.date.year() == year) {
        let slot = &mut series[t.date.month0() as usize];
        match t.kind {
            TxKind::Income => slot.income = slot.income.saturating_add(t.amount),
            TxKind::Expense => slot.expense = slot.expense.saturating_add(t.amount),
        }
    }
    series
}

pub fn dashboard(view: &LedgerView, categories: &[Category], period: Period) -> Dashboard {
    let in_period = view.transactions.iter().filter(|t| period.contains(t.date));
    Dashboard {
        period,
        total_assets: total_assets(&view.accounts),
        income: period_income(&view.transactions, period),
        expense: period_expense(&view.transactions, period),
        by_category: category_breakdown(in_period, categories),
    }
}
