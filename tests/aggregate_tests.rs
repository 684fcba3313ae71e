// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook::LedgerError;
use tallybook::aggregate::{
    Period, category_breakdown, dashboard, monthly_series, period_expense, period_income,
    total_assets,
};
use tallybook::catalog::default_categories;
use tallybook::models::{Account, AccountKind, LedgerView, Transaction, TxKind};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: &str, category: &str, amount: &str, kind: TxKind, on: &str) -> Transaction {
    Transaction {
        id: id.into(),
        account_id: "acct".into(),
        category_id: category.into(),
        amount: dec(amount),
        kind,
        date: NaiveDate::parse_from_str(on, "%Y-%m-%d").unwrap(),
        note: String::new(),
    }
}

fn account(id: &str, balance: &str) -> Account {
    Account {
        id: id.into(),
        name: id.into(),
        institution: String::new(),
        balance: dec(balance),
        kind: AccountKind::Checking,
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx("1", "salary", "3000", TxKind::Income, "2024-03-01"),
        tx("2", "shopping", "20", TxKind::Expense, "2024-03-31"),
        tx("3", "food", "12.50", TxKind::Expense, "2024-03-15"),
        tx("4", "food", "7.50", TxKind::Expense, "2024-04-01"),
        tx("5", "transport", "30", TxKind::Expense, "2023-03-10"),
        tx("6", "food", "100", TxKind::Income, "2024-03-20"),
    ]
}

#[test]
fn total_assets_sums_signed_balances() {
    let accounts = vec![account("a", "100.10"), account("b", "-40.05"), account("c", "0")];
    assert_eq!(total_assets(&accounts), dec("60.05"));
    assert_eq!(total_assets(&[]), Decimal::ZERO);
}

#[test]
fn sums_saturate_instead_of_panicking() {
    let accounts = vec![
        Account {
            balance: Decimal::MAX,
            ..account("a", "0")
        },
        Account {
            balance: Decimal::MAX,
            ..account("b", "0")
        },
    ];
    assert_eq!(total_assets(&accounts), Decimal::MAX);

    let mut big = tx("1", "food", "1", TxKind::Expense, "2024-03-01");
    big.amount = Decimal::MAX;
    let txs = vec![big.clone(), big];
    let march = Period::new(2024, 3).unwrap();
    assert_eq!(period_expense(&txs, march), Decimal::MAX);
    assert_eq!(monthly_series(&txs, 2024)[2].expense, Decimal::MAX);
    assert_eq!(category_breakdown(&txs, &default_categories())[0].total, Decimal::MAX);
}

#[test]
fn period_sums_match_calendar_month_only() {
    let txs = sample();
    let march = Period::new(2024, 3).unwrap();
    assert_eq!(period_expense(&txs, march), dec("32.50"));
    assert_eq!(period_income(&txs, march), dec("3100"));
    assert_eq!(period_expense(&txs, Period::new(2023, 3).unwrap()), dec("30"));
    assert_eq!(period_expense(&txs, Period::new(2024, 5).unwrap()), Decimal::ZERO);
}

#[test]
fn breakdown_keeps_catalog_order_and_drops_zero_rows() {
    let categories = default_categories();
    let rows = category_breakdown(&sample(), &categories);
    let names: Vec<(&str, Decimal)> = rows
        .iter()
        .map(|r| (r.category.id.as_str(), r.total))
        .collect();
    // salary only has income, so it is omitted
    assert_eq!(
        names,
        vec![
            ("food", dec("20")),
            ("transport", dec("30")),
            ("shopping", dec("20")),
        ]
    );
    assert_eq!(rows, category_breakdown(&sample(), &categories));
}

#[test]
fn breakdown_ignores_unknown_categories() {
    let categories = default_categories();
    let txs = vec![tx("1", "mystery", "5", TxKind::Expense, "2024-01-01")];
    assert!(category_breakdown(&txs, &categories).is_empty());
}

#[test]
fn monthly_series_has_twelve_slots() {
    let txs = sample();
    let series = monthly_series(&txs, 2024);
    assert_eq!(series.len(), 12);
    assert_eq!(series[2].income, dec("3100"));
    assert_eq!(series[2].expense, dec("32.50"));
    assert_eq!(series[3].expense, dec("7.50"));
    assert!(series[0].income.is_zero() && series[0].expense.is_zero());
    assert_eq!(monthly_series(&txs, 2023)[2].expense, dec("30"));
    assert_eq!(series, monthly_series(&txs, 2024));
}

#[test]
fn dashboard_scopes_breakdown_to_period() {
    let view = LedgerView {
        accounts: vec![account("acct", "500")],
        transactions: sample(),
    };
    let board = dashboard(&view, &default_categories(), Period::new(2024, 4).unwrap());
    assert_eq!(board.total_assets, dec("500"));
    assert_eq!(board.expense, dec("7.50"));
    assert_eq!(board.income, Decimal::ZERO);
    assert_eq!(board.by_category.len(), 1);
    assert_eq!(board.by_category[0].category.id, "food");
}

#[test]
fn period_parses_year_month() {
    let p: Period = "2024-03".parse().unwrap();
    assert_eq!(p, Period::new(2024, 3).unwrap());
    assert_eq!(p.to_string(), "2024-03");
    assert!(matches!(
        "2024-13".parse::<Period>(),
        Err(LedgerError::Validation { field: "month", .. })
    ));
    assert!(Period::new(2024, 0).is_err());
}
