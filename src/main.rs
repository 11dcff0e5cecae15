// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use caixa::backend::HttpBackend;
use caixa::models::Side;
use caixa::session::{NoticeLevel, Session};
use caixa::{cli, commands, config, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let matches = cli::build_cli().get_matches();

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::settings::handle(&config::config_path()?, sub);
    }
    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    let cfg = config::load()?;
    let mut session = Session::new(HttpBackend::new(&cfg)?);
    // failures are already recorded as notices; stale tables still render
    let _ = session.start();

    let res = match name {
        "income" => commands::entries::handle(&mut session, Side::Income, sub),
        "expense" => commands::entries::handle(&mut session, Side::Expense, sub),
        "card" => commands::cards::handle(&mut session, sub),
        "card-tx" => commands::card_transactions::handle(&mut session, sub),
        "dashboard" => commands::dashboard::handle(&mut session, sub),
        "params" => commands::params::handle(&mut session, sub),
        "export" => commands::exporter::handle(&mut session, sub),
        _ => Ok(()),
    };

    for notice in session.drain_notices() {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }
    res
}
