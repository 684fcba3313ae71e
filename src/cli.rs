// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Calendar month (defaults to the current month)")
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .version(clap::crate_version!())
        .about("Personal finance ledger: accounts, transactions, and monthly reports")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_name("ID")
                .help("User id for the synced ledger (omit for a local demo session)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Path of the synced ledger database"),
        )
        .arg(
            Arg::new("local")
                .long("local")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Force a local in-memory session"),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("institution").long("institution").default_value(""))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("checking")
                                .help("checking|savings|credit"),
                        )
                        .arg(
                            Arg::new("opening")
                                .long("opening")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account and all of its transactions")
                        .arg(Arg::new("account").required(true).help("Account id or name")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Show the category catalog")
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(Arg::new("date").long("date").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("note").long("note").default_value("")),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived totals and breakdowns")
                .subcommand(json_args(Command::new("summary").arg(month_arg())))
                .subcommand(json_args(Command::new("by-category").arg(month_arg())))
                .subcommand(json_args(
                    Command::new("monthly").arg(
                        Arg::new("year")
                            .long("year")
                            .value_parser(value_parser!(i32))
                            .help("Calendar year (defaults to the current year)"),
                    ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("advice").about("Ask the advice generator for suggestions"))
        .subcommand(Command::new("doctor").about("Check the ledger for integrity issues"))
        .subcommand(Command::new("watch").about("Print changes pushed by the synced store"))
}
