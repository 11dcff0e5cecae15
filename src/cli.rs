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
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn filter_arg() -> Arg {
    Arg::new("filter")
        .long("filter")
        .short('f')
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help("Table filter; suffix the key with _from, _to or _min for ranges")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn ids_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .num_args(1..)
        .action(ArgAction::Append)
        .value_parser(value_parser!(i64))
        .help("One or more ids to delete")
}

fn entry_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("due_date").long("due-date").required(required))
        .arg(Arg::new("description").long("description").required(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(Arg::new("payment_date").long("payment-date"))
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("account").long("account"))
        .arg(Arg::new("payment_method").long("payment-method"))
        .arg(
            Arg::new("installments")
                .long("installments")
                .value_parser(value_parser!(u32)),
        )
        .arg(Arg::new("notes").long("notes"))
}

fn entry_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(json_args(Command::new("list").about("List rows passing the filters")).arg(filter_arg()))
        .subcommand(entry_fields(Command::new("add").about("Record a new entry"), true))
        .subcommand(entry_fields(
            Command::new("edit").about("Edit one entry").arg(id_arg()),
            false,
        ))
        .subcommand(
            Command::new("pay")
                .about("Set or clear the payment date")
                .arg(id_arg())
                .arg(Arg::new("date").long("date").help("Omit to mark unpaid")),
        )
        .subcommand(Command::new("rm").about("Delete entries").arg(ids_arg()))
}

fn card_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("name").long("name").required(required))
        .arg(
            Arg::new("closing_day")
                .long("closing-day")
                .required(required)
                .value_parser(value_parser!(u8).range(1..=31)),
        )
        .arg(
            Arg::new("due_day")
                .long("due-day")
                .required(required)
                .value_parser(value_parser!(u8).range(1..=31)),
        )
        .arg(Arg::new("limit").long("limit"))
        .arg(Arg::new("annual_fee").long("annual-fee"))
        .arg(Arg::new("status").long("status"))
}

pub fn build_cli() -> Command {
    Command::new("caixa")
        .about("Household incomes, expenses and credit cards")
        .version(clap::crate_version!())
        .subcommand(entry_cmd("income", "Incomes (receitas)"))
        .subcommand(entry_cmd("expense", "Expenses (despesas)"))
        .subcommand(
            Command::new("card")
                .about("Credit cards")
                .subcommand_required(true)
                .subcommand(
                    json_args(Command::new("list").about("Cards with spend and available limit"))
                        .arg(filter_arg()),
                )
                .subcommand(card_fields(Command::new("add").about("Add a card"), true))
                .subcommand(card_fields(
                    Command::new("edit").about("Edit one card").arg(id_arg()),
                    false,
                ))
                .subcommand(Command::new("rm").about("Delete cards").arg(ids_arg())),
        )
        .subcommand(
            Command::new("card-tx")
                .about("Credit card purchases")
                .subcommand_required(true)
                .subcommand(json_args(Command::new("list").about("List purchases")).arg(filter_arg()))
                .subcommand(
                    Command::new("add")
                        .about("Record a purchase, split in installments")
                        .arg(
                            Arg::new("card_id")
                                .long("card-id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("purchase_date").long("purchase-date").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        )
                        .arg(Arg::new("due_date").long("due-date"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").about("Delete purchases").arg(ids_arg())),
        )
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Cash position, period and annual balances, monthly series")
                .arg(
                    Arg::new("year")
                        .long("year")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(i32)),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(u32).range(1..=12)),
                ),
        ))
        .subcommand(
            Command::new("params")
                .about("Categories, accounts and payment methods")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("side").long("side").required(true)),
                )
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("side").long("side").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("categories | accounts | payment-methods"),
                        )
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a filtered table to CSV or JSON")
                .arg(
                    Arg::new("table")
                        .long("table")
                        .required(true)
                        .help("incomes | expenses | cards | card-transactions"),
                )
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true))
                .arg(filter_arg()),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-api").arg(Arg::new("url").long("url").required(true)),
                ),
        )
}
