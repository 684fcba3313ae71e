// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Period;
use crate::models::{Category, LedgerView, NewTransaction, TxKind};
use crate::store::LedgerStore;
use crate::utils::{
    category_name, find_account, find_category, fmt_money, maybe_print_json, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Context, Result};
use serde::Serialize;

pub async fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub).await?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

async fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").context("--date is required")?)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").context("--amount is required")?)?;
    let kind = sub
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("expense")
        .parse::<TxKind>()?;
    let note = sub.get_one::<String>("note").cloned().unwrap_or_default();
    let account_key = sub.get_one::<String>("account").context("--account is required")?;
    let category_key = sub
        .get_one::<String>("category")
        .context("--category is required")?;

    let (account_id, account_name) = {
        let account = find_account(store.current_view(), account_key)?;
        (account.id.clone(), account.name.clone())
    };
    let category_id = find_category(store.categories(), category_key)?.id.clone();

    let tx = store
        .record_transaction(NewTransaction {
            account_id: account_id.clone(),
            category_id,
            amount,
            kind,
            date,
            note,
        })
        .await?;
    let balance = store
        .account(&account_id)
        .map(|a| fmt_money(&a.balance))
        .unwrap_or_default();
    println!(
        "Recorded {} {} on {} (acct: {}, balance now {})",
        tx.kind,
        fmt_money(&tx.amount),
        tx.date,
        account_name,
        balance
    );
    Ok(())
}

fn list(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = TxFilter::from_matches(sub)?;
    let categories = store.categories().to_vec();
    let data = query_rows(store.current_view(), &categories, &filter)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Kind", "Amount", "Category", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct TxFilter {
    pub month: Option<Period>,
    pub account: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl TxFilter {
    pub fn from_matches(sub: &clap::ArgMatches) -> Result<Self> {
        let month = sub
            .get_one::<String>("month")
            .map(|m| m.parse::<Period>())
            .transpose()?;
        Ok(Self {
            month,
            account: sub.get_one::<String>("account").cloned(),
            category: sub.get_one::<String>("category").cloned(),
            limit: sub.get_one::<usize>("limit").copied(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub note: String,
}

/// Rows for the view's transactions, most recent first, after filtering.
pub fn query_rows(
    view: &LedgerView,
    categories: &[Category],
    filter: &TxFilter,
) -> Result<Vec<TransactionRow>> {
    let account_id = match &filter.account {
        Some(key) => Some(find_account(view, key)?.id.clone()),
        None => None,
    };
    let category_id = match &filter.category {
        Some(key) => Some(find_category(categories, key)?.id.clone()),
        None => None,
    };

    let rows = view
        .transactions
        .iter()
        .filter(|t| filter.month.is_none_or(|p| p.contains(t.date)))
        .filter(|t| account_id.as_ref().is_none_or(|id| &t.account_id == id))
        .filter(|t| category_id.as_ref().is_none_or(|id| &t.category_id == id))
        .take(filter.limit.unwrap_or(usize::MAX))
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            account: view
                .account(&t.account_id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| "(deleted)".to_string()),
            kind: t.kind.to_string(),
            amount: fmt_money(&t.amount),
            category: category_name(categories, &t.category_id).to_string(),
            note: t.note.clone(),
        })
        .collect();
    Ok(rows)
}
