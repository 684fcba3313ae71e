// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::advice::{AdviceGenerator, request_summary};
use crate::store::LedgerStore;
use anyhow::Result;

pub async fn handle(
    store: &mut LedgerStore,
    generator: Option<&dyn AdviceGenerator>,
) -> Result<()> {
    let categories = store.categories().to_vec();
    let view = store.current_view().clone();
    let text = request_summary(generator, &view, &categories).await;
    println!("{}", text);
    Ok(())
}
