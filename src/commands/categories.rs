// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let categories = store.categories();
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
            let data = categories
                .iter()
                .map(|c| vec![c.id.clone(), c.name.clone(), c.icon.clone(), c.color.clone()])
                .collect();
            println!("{}", pretty_table(&["Id", "Name", "Icon", "Color"], data));
        }
    }
    Ok(())
}
