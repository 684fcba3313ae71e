// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{TxFilter, query_rows};
use crate::store::LedgerStore;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let Some(out) = sub.get_one::<String>("out").map(|s| s.trim()) else {
        bail!("--out is required");
    };

    let categories = store.categories().to_vec();
    let mut rows = query_rows(store.current_view(), &categories, &TxFilter::default())?;
    // Oldest first in exports
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "account", "kind", "amount", "category", "note"])?;
            for r in rows {
                wtr.write_record([r.id, r.date, r.account, r.kind, r.amount, r.category, r.note])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .into_iter()
                .map(|r| {
                    json!({
                        "id": r.id, "date": r.date, "account": r.account, "kind": r.kind,
                        "amount": r.amount, "category": r.category, "note": r.note
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
