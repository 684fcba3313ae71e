// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{AccountKind, Category, NewAccount, NewTransaction, TxKind};
use crate::store::LedgerStore;

// (id, name, icon, color)
const CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("food", "Food & Dining", "utensils", "#f97316"),
    ("transport", "Transport", "car", "#3b82f6"),
    ("housing", "Housing", "home", "#8b5cf6"),
    ("utilities", "Utilities", "bolt", "#eab308"),
    ("entertainment", "Entertainment", "film", "#ec4899"),
    ("health", "Health", "heart", "#ef4444"),
    ("shopping", "Shopping", "bag", "#14b8a6"),
    ("salary", "Salary", "briefcase", "#22c55e"),
    ("other", "Other", "dots", "#6b7280"),
];

static CATALOG: Lazy<Vec<Category>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .map(|(id, name, icon, color)| Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        })
        .collect()
});

/// The fixed category catalog every session starts with.
pub fn default_categories() -> Vec<Category> {
    CATALOG.clone()
}

/// Fills a fresh store with two accounts and a few months of activity,
/// dated relative to `today`.
pub async fn seed_demo(store: &mut LedgerStore, today: NaiveDate) -> Result<()> {
    let checking = store
        .create_account(NewAccount {
            name: "Everyday Checking".into(),
            institution: "First Demo Bank".into(),
            kind: AccountKind::Checking,
            opening_balance: Decimal::new(2_500_00, 2),
        })
        .await?;
    let savings = store
        .create_account(NewAccount {
            name: "Rainy Day Savings".into(),
            institution: "First Demo Bank".into(),
            kind: AccountKind::Savings,
            opening_balance: Decimal::new(10_000_00, 2),
        })
        .await?;

    // (months back, day, account, category, cents, kind, note)
    let rows: [(u32, u32, &str, &str, i64, TxKind, &str); 10] = [
        (2, 1, checking.id.as_str(), "salary", 4_200_00, TxKind::Income, "Payroll"),
        (2, 3, checking.id.as_str(), "housing", 1_350_00, TxKind::Expense, "Rent"),
        (2, 12, checking.id.as_str(), "food", 86_40, TxKind::Expense, "Groceries"),
        (1, 1, checking.id.as_str(), "salary", 4_200_00, TxKind::Income, "Payroll"),
        (1, 3, checking.id.as_str(), "housing", 1_350_00, TxKind::Expense, "Rent"),
        (1, 9, checking.id.as_str(), "utilities", 120_15, TxKind::Expense, "Power bill"),
        (1, 20, savings.id.as_str(), "other", 500_00, TxKind::Income, "Transfer in"),
        (0, 1, checking.id.as_str(), "salary", 4_200_00, TxKind::Income, "Payroll"),
        (0, 1, checking.id.as_str(), "transport", 45_00, TxKind::Expense, "Transit pass"),
        (0, 1, checking.id.as_str(), "entertainment", 15_99, TxKind::Expense, "Streaming"),
    ];
    for (back, day, account_id, category_id, cents, kind, note) in rows {
        store
            .record_transaction(NewTransaction {
                account_id: account_id.to_string(),
                category_id: category_id.to_string(),
                amount: Decimal::new(cents, 2),
                kind,
                date: months_back(today, back, day),
                note: note.to_string(),
            })
            .await?;
    }
    Ok(())
}

fn months_back(today: NaiveDate, back: u32, day: u32) -> NaiveDate {
    let total = today.year() * 12 + today.month0() as i32 - back as i32;
    let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    NaiveDate::from_ymd_opt(year, month, day.min(28)).unwrap_or(today)
}
