// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, Period};
use crate::store::LedgerStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::{Datelike, Local};
use serde::Serialize;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("by-category", sub)) => by_category(store, sub)?,
        Some(("monthly", sub)) => monthly(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_arg(sub: &clap::ArgMatches) -> Result<Period> {
    match sub.get_one::<String>("month") {
        Some(m) => Ok(m.parse::<Period>()?),
        None => Ok(Period::current()),
    }
}

fn summary(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let categories = store.categories().to_vec();
    let board = aggregate::dashboard(store.current_view(), &categories, period);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &board)? {
        return Ok(());
    }
    let data = vec![
        vec!["Total assets".to_string(), fmt_money(&board.total_assets)],
        vec![format!("Income {}", period), fmt_money(&board.income)],
        vec![format!("Expense {}", period), fmt_money(&board.expense)],
        vec![
            format!("Net {}", period),
            fmt_money(&(board.income - board.expense)),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Amount"], data));
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    icon: String,
    spent: String,
}

fn by_category(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_arg(sub)?;
    let categories = store.categories().to_vec();
    let view = store.current_view();
    let in_period = view.transactions.iter().filter(|t| period.contains(t.date));
    let rows: Vec<CategoryRow> = aggregate::category_breakdown(in_period, &categories)
        .into_iter()
        .map(|s| CategoryRow {
            category: s.category.name,
            icon: s.category.icon,
            spent: fmt_money(&s.total),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.category, r.icon, r.spent])
            .collect();
        let hdr = format!("Spent {}", period);
        println!("{}", pretty_table(&["Category", "Icon", &hdr], data));
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthRow {
    month: String,
    income: String,
    expense: String,
}

fn monthly(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| Local::now().year());
    let series = aggregate::monthly_series(&store.current_view().transactions, year);
    let rows: Vec<MonthRow> = series
        .iter()
        .enumerate()
        .map(|(i, totals)| MonthRow {
            month: format!("{:04}-{:02}", year, i + 1),
            income: fmt_money(&totals.income),
            expense: fmt_money(&totals.expense),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.month, r.income, r.expense])
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}
