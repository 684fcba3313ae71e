// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::backend::Mode;
use crate::remote::Collection;
use crate::store::LedgerStore;
use crate::utils::fmt_money;
use anyhow::{Result, bail};
use chrono::Local;

pub async fn handle(store: &mut LedgerStore) -> Result<()> {
    if store.mode() != Mode::RemoteSynced {
        bail!("watch needs a synced session (pass --user)");
    }
    println!("Watching for changes, Ctrl-C to stop");
    loop {
        let change = tokio::select! {
            change = store.next_change() => change,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(collection) = change else {
            println!("Feed closed");
            break;
        };
        print_change(store, collection);
    }
    Ok(())
}

fn print_change(store: &LedgerStore, collection: Collection) {
    let view = store.view();
    let stamp = Local::now().format("%H:%M:%S");
    match collection {
        Collection::Accounts => println!(
            "[{}] accounts: {} (total assets {})",
            stamp,
            view.accounts.len(),
            fmt_money(&aggregate::total_assets(&view.accounts))
        ),
        Collection::Transactions => println!(
            "[{}] transactions: {}",
            stamp,
            view.transactions.len()
        ),
    }
}
