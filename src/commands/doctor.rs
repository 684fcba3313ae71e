// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, LedgerView};
use crate::store::LedgerStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub code: &'static str,
    pub detail: String,
}

/// Integrity problems visible in a view, e.g. from records another client
/// wrote to the synced store.
pub fn find_issues(view: &LedgerView, categories: &[Category]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for t in &view.transactions {
        if view.account(&t.account_id).is_none() {
            issues.push(Issue {
                code: "orphaned_transaction",
                detail: format!("{} references missing account {}", t.id, t.account_id),
            });
        }
        if !categories.iter().any(|c| c.id == t.category_id) {
            issues.push(Issue {
                code: "unknown_category",
                detail: format!("{} uses category '{}'", t.id, t.category_id),
            });
        }
        if t.amount <= Decimal::ZERO {
            issues.push(Issue {
                code: "non_positive_amount",
                detail: format!("{} has amount {}", t.id, t.amount),
            });
        }
    }
    issues
}

pub fn handle(store: &mut LedgerStore) -> Result<()> {
    let categories = store.categories().to_vec();
    let rows: Vec<Vec<String>> = find_issues(store.current_view(), &categories)
        .into_iter()
        .map(|i| vec![i.code.to_string(), i.detail])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
