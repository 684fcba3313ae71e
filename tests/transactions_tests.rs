// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tallybook::backend::LocalBackend;
use tallybook::catalog::default_categories;
use tallybook::commands::{accounts, transactions};
use tallybook::{LedgerStore, cli};

fn setup() -> LedgerStore {
    LedgerStore::new(Box::new(LocalBackend::new()), default_categories())
}

async fn run_account(store: &mut LedgerStore, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("account", m)) => accounts::handle(store, m).await,
        _ => panic!("no account subcommand"),
    }
}

async fn run_tx(store: &mut LedgerStore, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("tx", m)) => transactions::handle(store, m).await,
        _ => panic!("no tx subcommand"),
    }
}

async fn seeded() -> LedgerStore {
    let mut store = setup();
    run_account(&mut store, &["tallybook", "account", "add", "--name", "A1", "--opening", "100"])
        .await
        .unwrap();
    for day in 1..=3 {
        let date = format!("2025-01-0{}", day);
        run_tx(
            &mut store,
            &[
                "tallybook", "tx", "add", "--account", "a1", "--category", "Food & Dining",
                "--amount", "10", "--date", &date,
            ],
        )
        .await
        .unwrap();
    }
    store
}

#[tokio::test]
async fn add_by_name_updates_balance() {
    let mut store = seeded().await;
    let view = store.current_view();
    assert_eq!(view.accounts[0].balance, Decimal::from(70));
    assert_eq!(view.transactions.len(), 3);
    assert!(view.transactions.iter().all(|t| t.category_id == "food"));
}

#[tokio::test]
async fn list_limit_respected() {
    let mut store = seeded().await;
    let matches = cli::build_cli().get_matches_from(["tallybook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let filter = transactions::TxFilter::from_matches(list_m).unwrap();
            let categories = store.categories().to_vec();
            let rows = transactions::query_rows(store.current_view(), &categories, &filter)
                .unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].account, "A1");
            assert_eq!(rows[0].category, "Food & Dining");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[tokio::test]
async fn list_filters_by_month() {
    let mut store = seeded().await;
    let matches =
        cli::build_cli().get_matches_from(["tallybook", "tx", "list", "--month", "2025-02"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let filter = transactions::TxFilter::from_matches(list_m).unwrap();
    let categories = store.categories().to_vec();
    let rows = transactions::query_rows(store.current_view(), &categories, &filter).unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn add_rejects_zero_amount() {
    let mut store = seeded().await;
    let err = run_tx(
        &mut store,
        &[
            "tallybook", "tx", "add", "--account", "A1", "--category", "food", "--amount", "0",
            "--date", "2025-01-09",
        ],
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("amount"));
    assert_eq!(store.current_view().transactions.len(), 3);
}

#[tokio::test]
async fn add_rejects_unknown_account() {
    let mut store = seeded().await;
    let err = run_tx(
        &mut store,
        &[
            "tallybook", "tx", "add", "--account", "Nope", "--category", "food", "--amount",
            "5", "--date", "2025-01-09",
        ],
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn account_rm_cascades() {
    let mut store = seeded().await;
    run_account(&mut store, &["tallybook", "account", "rm", "A1"])
        .await
        .unwrap();
    let view = store.current_view();
    assert!(view.accounts.is_empty());
    assert!(view.transactions.is_empty());

    let err = run_account(&mut store, &["tallybook", "account", "rm", "A1"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn account_add_rejects_unknown_kind() {
    let mut store = setup();
    let err = run_account(
        &mut store,
        &["tallybook", "account", "add", "--name", "X", "--kind", "brokerage"],
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("kind"));
    assert!(store.current_view().accounts.is_empty());
}
