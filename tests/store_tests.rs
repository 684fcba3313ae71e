// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook::aggregate::{self, Period};
use tallybook::backend::{LocalBackend, Mode};
use tallybook::catalog::default_categories;
use tallybook::models::{AccountKind, LedgerView, NewAccount, NewTransaction, TxKind};
use tallybook::{LedgerError, LedgerStore, Session};

fn setup() -> LedgerStore {
    LedgerStore::new(Box::new(LocalBackend::new()), default_categories())
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_account(name: &str, opening: &str) -> NewAccount {
    NewAccount {
        name: name.into(),
        institution: "Test Bank".into(),
        kind: AccountKind::Checking,
        opening_balance: dec(opening),
    }
}

fn new_tx(account_id: &str, category: &str, amount: &str, kind: TxKind, on: &str) -> NewTransaction {
    NewTransaction {
        account_id: account_id.into(),
        category_id: category.into(),
        amount: dec(amount),
        kind,
        date: date(on),
        note: String::new(),
    }
}

fn replayed(view: &LedgerView, account_id: &str, opening: &str) -> Decimal {
    dec(opening)
        + view
            .transactions_for(account_id)
            .map(|t| t.delta())
            .sum::<Decimal>()
}

#[tokio::test]
async fn salary_and_coffee_scenario() {
    let mut store = setup();
    let acct = store.create_account(new_account("Main", "50000")).await.unwrap();
    store
        .record_transaction(new_tx(&acct.id, "salary", "45000", TxKind::Income, "2024-03-01"))
        .await
        .unwrap();
    store
        .record_transaction(new_tx(&acct.id, "food", "150", TxKind::Expense, "2024-03-02"))
        .await
        .unwrap();

    let view = store.current_view();
    assert_eq!(view.account(&acct.id).unwrap().balance, dec("94850"));

    let march = Period::new(2024, 3).unwrap();
    assert_eq!(aggregate::period_expense(&view.transactions, march), dec("150"));
    let series = aggregate::monthly_series(&view.transactions, 2024);
    assert_eq!(series[2].income, dec("45000"));
    assert_eq!(series[2].expense, dec("150"));

    store.delete_account(&acct.id).await.unwrap();
    let view = store.current_view();
    assert!(view.accounts.is_empty());
    assert!(view.transactions.is_empty());
}

#[tokio::test]
async fn delete_cascades_only_owned_transactions() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "100")).await.unwrap();
    let b = store.create_account(new_account("B", "200")).await.unwrap();
    for on in ["2025-01-01", "2025-01-02"] {
        store
            .record_transaction(new_tx(&a.id, "food", "10", TxKind::Expense, on))
            .await
            .unwrap();
    }
    store
        .record_transaction(new_tx(&b.id, "salary", "5", TxKind::Income, "2025-01-03"))
        .await
        .unwrap();

    let removed = store.delete_account(&a.id).await.unwrap();
    assert_eq!(removed, 2);
    let view = store.current_view();
    assert!(view.transactions.iter().all(|t| t.account_id != a.id));
    assert_eq!(view.transactions.len(), 1);
    assert_eq!(view.account(&b.id).unwrap().balance, dec("205"));
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "0")).await.unwrap();
    store.delete_account(&a.id).await.unwrap();
    let err = store.delete_account(&a.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "account", .. }));
}

#[tokio::test]
async fn unknown_account_leaves_balances_untouched() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "75")).await.unwrap();
    let err = store
        .record_transaction(new_tx("nope", "food", "10", TxKind::Expense, "2025-02-01"))
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::not_found("account", "nope"));
    let view = store.current_view();
    assert_eq!(view.account(&a.id).unwrap().balance, dec("75"));
    assert!(view.transactions.is_empty());
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "75")).await.unwrap();
    let err = store
        .record_transaction(new_tx(&a.id, "yachts", "10", TxKind::Expense, "2025-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { entity: "category", .. }));
    assert_eq!(store.current_view().account(&a.id).unwrap().balance, dec("75"));
}

#[tokio::test]
async fn zero_and_negative_amounts_are_rejected() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "10")).await.unwrap();
    for amount in ["0", "-5"] {
        let err = store
            .record_transaction(new_tx(&a.id, "food", amount, TxKind::Expense, "2025-02-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));
    }
    let view = store.current_view();
    assert!(view.transactions.is_empty());
    assert_eq!(view.account(&a.id).unwrap().balance, dec("10"));
}

#[tokio::test]
async fn balance_overflow_is_rejected_without_side_effects() {
    let mut store = setup();
    let rich = store
        .create_account(NewAccount {
            opening_balance: Decimal::MAX,
            ..new_account("Rich", "0")
        })
        .await
        .unwrap();
    let err = store
        .record_transaction(new_tx(&rich.id, "salary", "1", TxKind::Income, "2025-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));

    let view = store.current_view();
    assert!(view.transactions.is_empty());
    assert_eq!(view.account(&rich.id).unwrap().balance, Decimal::MAX);

    // Spending from the same account still works
    store
        .record_transaction(new_tx(&rich.id, "food", "1", TxKind::Expense, "2025-02-02"))
        .await
        .unwrap();
    assert_eq!(
        store.current_view().account(&rich.id).unwrap().balance,
        Decimal::MAX - Decimal::ONE
    );
}

#[tokio::test]
async fn blank_account_name_is_rejected() {
    let mut store = setup();
    let err = store.create_account(new_account("  ", "10")).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation { field: "name", .. }));
    assert!(store.current_view().accounts.is_empty());
}

#[tokio::test]
async fn balances_match_replay_after_every_step() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "1000")).await.unwrap();
    let b = store.create_account(new_account("B", "-250.50")).await.unwrap();
    let steps = [
        (&a.id, "salary", "300", TxKind::Income, "2025-03-01"),
        (&b.id, "shopping", "49.99", TxKind::Expense, "2025-03-02"),
        (&a.id, "housing", "800", TxKind::Expense, "2025-03-03"),
        (&b.id, "other", "100.25", TxKind::Income, "2025-03-04"),
        (&a.id, "food", "12.34", TxKind::Expense, "2025-04-01"),
    ];
    for (acct, cat, amount, kind, on) in steps {
        store
            .record_transaction(new_tx(acct, cat, amount, kind, on))
            .await
            .unwrap();
        let view = store.current_view();
        assert_eq!(view.account(&a.id).unwrap().balance, replayed(view, &a.id, "1000"));
        assert_eq!(view.account(&b.id).unwrap().balance, replayed(view, &b.id, "-250.50"));
    }
    assert_eq!(store.current_view().account(&a.id).unwrap().balance, dec("487.66"));
}

#[tokio::test]
async fn newest_recorded_transaction_comes_first() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "0")).await.unwrap();
    store
        .record_transaction(new_tx(&a.id, "food", "1", TxKind::Expense, "2025-05-02"))
        .await
        .unwrap();
    let latest = store
        .record_transaction(new_tx(&a.id, "food", "2", TxKind::Expense, "2025-05-01"))
        .await
        .unwrap();
    assert_eq!(store.current_view().transactions[0].id, latest.id);
}

#[tokio::test]
async fn local_ids_are_stable() {
    let mut store = setup();
    let a = store.create_account(new_account("A", "0")).await.unwrap();
    let t = store
        .record_transaction(new_tx(&a.id, "food", "1", TxKind::Expense, "2025-05-02"))
        .await
        .unwrap();
    let view = store.current_view();
    assert_eq!(view.accounts[0].id, a.id);
    assert_eq!(view.transactions[0].id, t.id);
    assert_eq!(view.transactions[0].account_id, a.id);
}

#[tokio::test]
async fn demo_session_is_local_and_consistent() {
    let mut session = Session::builder().demo(true).open().await.unwrap();
    assert_eq!(session.mode(), Mode::Local);
    assert_eq!(session.user_id(), None);

    let store = session.store();
    let view = store.current_view().clone();
    assert_eq!(view.accounts.len(), 2);
    assert_eq!(view.transactions.len(), 10);
    let checking = &view.accounts[0];
    let savings = &view.accounts[1];
    assert_eq!(checking.balance, replayed(&view, &checking.id, "2500.00"));
    assert_eq!(savings.balance, replayed(&view, &savings.id, "10000.00"));
    session.close().await;
}

#[tokio::test]
async fn user_without_remote_stays_local() {
    let session = Session::builder().user("alice").open().await.unwrap();
    assert_eq!(session.mode(), Mode::Local);
    assert_eq!(session.user_id(), None);
    session.close().await;
}
