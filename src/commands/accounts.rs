// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{AccountKind, NewAccount};
use crate::store::LedgerStore;
use crate::utils::{find_account, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub async fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub).await?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").context("--name is required")?;
    let institution = sub
        .get_one::<String>("institution")
        .cloned()
        .unwrap_or_default();
    let kind = sub
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("checking")
        .parse::<AccountKind>()?;
    let opening = parse_decimal(sub.get_one::<String>("opening").map_or("0", String::as_str))?;

    let account = store
        .create_account(NewAccount {
            name: name.clone(),
            institution,
            kind,
            opening_balance: opening,
        })
        .await?;
    println!(
        "Added account '{}' ({}, opening {}) id={}",
        account.name,
        account.kind,
        fmt_money(&account.balance),
        account.id
    );
    Ok(())
}

fn list(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let view = store.current_view();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view.accounts)? {
        return Ok(());
    }
    let data = view
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.institution.clone(),
                a.kind.to_string(),
                fmt_money(&a.balance),
                a.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Institution", "Kind", "Balance", "Id"], data)
    );
    Ok(())
}

async fn rm(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("account").context("account is required")?;
    let (id, name) = {
        let account = find_account(store.current_view(), key)?;
        (account.id.clone(), account.name.clone())
    };
    let removed = store.delete_account(&id).await?;
    println!("Removed account '{}' and {} transaction(s)", name, removed);
    Ok(())
}
