// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{Account, Category, LedgerView};

const UA: &str = concat!(
    "tallybook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/tallybook)"
);

pub fn http_client() -> Result<reqwest::Client> {
    let c = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Finds an account by id, falling back to a case-insensitive name match.
pub fn find_account<'a>(view: &'a LedgerView, key: &str) -> Result<&'a Account> {
    let key = key.trim();
    if let Some(a) = view.account(key) {
        return Ok(a);
    }
    let mut matches = view
        .accounts
        .iter()
        .filter(|a| a.name.eq_ignore_ascii_case(key));
    match (matches.next(), matches.next()) {
        (Some(a), None) => Ok(a),
        (Some(_), Some(_)) => Err(anyhow!(
            "Account name '{}' is ambiguous, use its id instead",
            key
        )),
        _ => Err(anyhow!("Account '{}' not found", key)),
    }
}

/// Finds a category by id or name.
pub fn find_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    let key = key.trim();
    categories
        .iter()
        .find(|c| c.id == key || c.name.eq_ignore_ascii_case(key))
        .with_context(|| format!("Category '{}' not found", key))
}

pub fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or("(unknown)")
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
