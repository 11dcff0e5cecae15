// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use super::required;
use crate::backend::Backend;
use crate::models::{ParamKind, Side};
use crate::session::Session;
use crate::utils::pretty_table;

fn side_arg(sub: &ArgMatches) -> Result<Side> {
    let raw = required::<String>(sub, "side")?;
    Side::parse(raw).with_context(|| format!("Unknown side '{}' (use income|expense)", raw))
}

pub fn handle<B: Backend>(session: &mut Session<B>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let side = side_arg(sub)?;
            let mut rows = Vec::new();
            for param in ParamKind::ALL {
                for item in session.store().params(side, param) {
                    rows.push(vec![param.to_string(), item.name.clone()]);
                }
            }
            println!("{}", pretty_table(&["List", "Name"], rows));
        }
        Some(("add", sub)) => {
            let side = side_arg(sub)?;
            let raw = required::<String>(sub, "kind")?;
            let param = ParamKind::parse(raw).with_context(|| {
                format!("Unknown list '{}' (use categories|accounts|payment-methods)", raw)
            })?;
            let name = required::<String>(sub, "name")?.trim();
            if name.is_empty() {
                bail!("Name cannot be empty");
            }
            session.add_param(side, param, name)?;
            println!("Added '{}' to {} {}", name, side, param);
        }
        _ => {}
    }
    Ok(())
}
