// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::{apply_filter_args, delete_ids, required, select_for_edit};
use crate::backend::Backend;
use crate::models::{Entry, EntryDraft, Side};
use crate::session::Session;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub const HEADERS: [&str; 10] = [
    "ID",
    "Due",
    "Paid",
    "Description",
    "Category",
    "Account",
    "Method",
    "Amount",
    "Inst.",
    "Notes",
];

/// Handles `income …` and `expense …`.
pub fn handle<B: Backend>(session: &mut Session<B>, side: Side, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, side, sub)?,
        Some(("add", sub)) => add(session, side, sub)?,
        Some(("edit", sub)) => edit(session, side, sub)?,
        Some(("pay", sub)) => pay(session, side, sub)?,
        Some(("rm", sub)) => {
            delete_ids(session, side.kind(), sub)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn table_rows(entries: &[&Entry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                fmt_opt(e.due_date),
                fmt_opt(e.payment_date),
                e.description.clone().unwrap_or_default(),
                e.category.clone().unwrap_or_default(),
                e.account.clone().unwrap_or_default(),
                e.payment_method.clone().unwrap_or_default(),
                fmt_money(&e.amount()),
                fmt_opt(e.installments),
                e.notes.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn list<B: Backend>(session: &mut Session<B>, side: Side, sub: &ArgMatches) -> Result<()> {
    apply_filter_args(session, side.kind(), sub)?;
    let rows = session.visible_entries(side);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        println!("{}", pretty_table(&HEADERS, table_rows(&rows)));
    }
    Ok(())
}

/// Copies every field given on the command line onto the draft.
fn apply_overrides(draft: &mut EntryDraft, sub: &ArgMatches) -> Result<()> {
    if let Some(s) = sub.get_one::<String>("due_date") {
        draft.due_date = parse_date(s)?;
    }
    if let Some(s) = sub.get_one::<String>("payment_date") {
        draft.payment_date = Some(parse_date(s)?);
    }
    if let Some(s) = sub.get_one::<String>("description") {
        draft.description = s.trim().to_string();
    }
    if let Some(s) = sub.get_one::<String>("amount") {
        draft.amount_total = parse_decimal(s)?;
    }
    if let Some(s) = sub.get_one::<String>("category") {
        draft.category = Some(s.to_string());
    }
    if let Some(s) = sub.get_one::<String>("account") {
        draft.account = Some(s.to_string());
    }
    if let Some(s) = sub.get_one::<String>("payment_method") {
        draft.payment_method = Some(s.to_string());
    }
    if let Some(n) = sub.get_one::<u32>("installments") {
        draft.installments = (*n).max(1);
    }
    if let Some(s) = sub.get_one::<String>("notes") {
        draft.notes = Some(s.to_string());
    }
    Ok(())
}

fn add<B: Backend>(session: &mut Session<B>, side: Side, sub: &ArgMatches) -> Result<()> {
    let due = parse_date(required::<String>(sub, "due_date")?)?;
    let description = required::<String>(sub, "description")?.trim().to_string();
    let amount = parse_decimal(required::<String>(sub, "amount")?)?;
    let mut draft = EntryDraft::new(due, description, amount);
    apply_overrides(&mut draft, sub)?;
    session.create_entry(side, &draft)?;
    println!(
        "Recorded {} '{}' of {} due {}",
        side,
        draft.description,
        fmt_money(&draft.amount_total),
        draft.due_date
    );
    Ok(())
}

fn edit<B: Backend>(session: &mut Session<B>, side: Side, sub: &ArgMatches) -> Result<()> {
    let id = select_for_edit(session, side.kind(), *required::<i64>(sub, "id")?)?;
    let current = session
        .find_entry(side, id)
        .with_context(|| format!("No {} with id {}", side, id))?;
    let mut draft = match EntryDraft::from_entry(current) {
        Some(d) => d,
        None => {
            let due = sub
                .get_one::<String>("due_date")
                .with_context(|| format!("{} {} has no due date; pass --due-date", side, id))?;
            EntryDraft::new(
                parse_date(due)?,
                current.description.clone().unwrap_or_default(),
                current.amount(),
            )
        }
    };
    apply_overrides(&mut draft, sub)?;
    session.update_entry(side, id, &draft)?;
    println!("Updated {} {}", side, id);
    Ok(())
}

fn pay<B: Backend>(session: &mut Session<B>, side: Side, sub: &ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    let date = sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?;
    session.set_payment_date(side, id, date)?;
    match date {
        Some(d) => println!("Marked {} {} paid on {}", side, id, d),
        None => println!("Marked {} {} unpaid", side, id),
    }
    Ok(())
}
