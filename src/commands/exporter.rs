// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use serde::Serialize;

use super::{apply_filter_args, card_transactions, cards, entries, required};
use crate::backend::Backend;
use crate::models::{EntityKind, Side};
use crate::session::Session;

/// Writes the filtered rows of one table. The CSV columns match the list view.
pub fn handle<B: Backend>(session: &mut Session<B>, m: &ArgMatches) -> Result<()> {
    let raw = required::<String>(m, "table")?;
    let table = EntityKind::parse(raw).with_context(|| {
        format!("Unknown table '{}' (use incomes|expenses|cards|card-transactions)", raw)
    })?;
    let fmt = required::<String>(m, "format")?.to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = required::<String>(m, "out")?;
    apply_filter_args(session, table, m)?;

    let count = match table {
        EntityKind::Income | EntityKind::Expense => {
            let side = if table == EntityKind::Income { Side::Income } else { Side::Expense };
            let rows = session.visible_entries(side);
            write(&fmt, out, &rows, &entries::HEADERS, entries::table_rows(&rows))?
        }
        EntityKind::Card => {
            let rollup = session.card_rollup();
            let visible = session.visible_cards();
            let rows = cards::card_rows(&visible, &rollup);
            write(&fmt, out, &rows, &cards::HEADERS, cards::table_rows(&rows))?
        }
        EntityKind::CardTransaction => {
            let rows = session.visible_card_transactions();
            write(
                &fmt,
                out,
                &rows,
                &card_transactions::HEADERS,
                card_transactions::table_rows(&rows),
            )?
        }
    };
    println!("Exported {} {} to {}", count, table, out);
    Ok(())
}

fn write<T: Serialize>(
    fmt: &str,
    out: &str,
    items: &[T],
    headers: &[&str],
    records: Vec<Vec<String>>,
) -> Result<usize> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(headers)?;
            for r in &records {
                wtr.write_record(r)?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(items)?)
                .with_context(|| format!("Write {}", out))?;
        }
    }
    Ok(items.len())
}
