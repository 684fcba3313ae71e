// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tallybook::advice::{AdviceGenerator, HttpAdvisor};
use tallybook::backend::Mode;
use tallybook::config::{Overrides, Settings};
use tallybook::db::SqliteRemote;
use tallybook::{Session, catalog, cli, commands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("TALLYBOOK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli::build_cli().get_matches();

    let settings = Settings::load(Overrides {
        user: matches.get_one::<String>("user").cloned(),
        database: matches.get_one::<PathBuf>("db").cloned(),
        local: matches.get_flag("local"),
    })?;

    let mut builder = Session::builder()
        .categories(catalog::default_categories())
        .demo(settings.demo);
    if let Some(user) = &settings.user {
        match SqliteRemote::open(&settings.database_path()?) {
            Ok(remote) => builder = builder.user(user.clone()).remote(Arc::new(remote)),
            Err(err) => warn!(error = %err, "synced store unavailable, using a local session"),
        }
    }
    let mut session = builder.open().await?;
    if session.mode() == Mode::Local {
        warn!("local session: changes are discarded on exit");
    }

    let advisor = HttpAdvisor::from_key(
        settings.advice.api_key.as_deref(),
        &settings.advice.model,
        settings.advice.endpoint.as_deref(),
    );
    let generator = advisor.as_ref().map(|a| a as &dyn AdviceGenerator);

    let result = run(&mut session, &matches, generator).await;
    session.close().await;
    result
}

async fn run(
    session: &mut Session,
    matches: &clap::ArgMatches,
    generator: Option<&dyn AdviceGenerator>,
) -> Result<()> {
    let store = session.store();
    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(store, sub).await?,
        Some(("category", sub)) => commands::categories::handle(store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(store, sub).await?,
        Some(("report", sub)) => commands::reports::handle(store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(store, sub)?,
        Some(("advice", _)) => commands::advice::handle(store, generator).await?,
        Some(("doctor", _)) => commands::doctor::handle(store)?,
        Some(("watch", _)) => commands::watch::handle(store).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
