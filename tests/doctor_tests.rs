// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook::Session;
use tallybook::catalog::default_categories;
use tallybook::commands::doctor::find_issues;
use tallybook::models::{Account, AccountKind, LedgerView, Transaction, TxKind};

fn tx(id: &str, account_id: &str, category_id: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: id.into(),
        account_id: account_id.into(),
        category_id: category_id.into(),
        amount,
        kind: TxKind::Expense,
        date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
        note: String::new(),
    }
}

#[test]
fn reports_each_kind_of_issue() {
    let view = LedgerView {
        accounts: vec![Account {
            id: "a1".into(),
            name: "Main".into(),
            institution: String::new(),
            balance: Decimal::ZERO,
            kind: AccountKind::Checking,
        }],
        transactions: vec![
            tx("ok", "a1", "food", Decimal::ONE),
            tx("orphan", "gone", "food", Decimal::ONE),
            tx("weird", "a1", "crypto", Decimal::ONE),
            tx("zero", "a1", "food", Decimal::ZERO),
        ],
    };
    let issues = find_issues(&view, &default_categories());
    let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
    assert_eq!(
        codes,
        vec!["orphaned_transaction", "unknown_category", "non_positive_amount"]
    );
    assert!(issues[0].detail.contains("orphan"));
    assert!(issues[1].detail.contains("crypto"));
}

#[tokio::test]
async fn demo_ledger_is_clean() {
    let mut session = Session::builder().demo(true).open().await.unwrap();
    let categories = session.store().categories().to_vec();
    let issues = find_issues(session.store().current_view(), &categories);
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}
