// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{apply_filter_args, delete_ids, required, select_for_edit};
use crate::backend::Backend;
use crate::cards::CardRollup;
use crate::models::{Card, CardDraft, CardStatus, EntityKind};
use crate::session::Session;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, parse_decimal, pretty_table};

pub const HEADERS: [&str; 8] = [
    "ID", "Name", "Closing", "Due", "Limit", "Spend", "Available", "Status",
];

/// A card joined with its usage figures.
#[derive(Debug, Serialize)]
pub struct CardRow<'a> {
    #[serde(flatten)]
    pub card: &'a Card,
    pub spend: Decimal,
    pub available: Decimal,
}

pub fn card_rows<'a>(cards: &[&'a Card], rollup: &CardRollup) -> Vec<CardRow<'a>> {
    cards
        .iter()
        .map(|&card| {
            let usage = rollup.get(card.id);
            CardRow {
                card,
                spend: usage.map(|u| u.spend).unwrap_or(Decimal::ZERO),
                available: usage.map(|u| u.available).unwrap_or_else(|| card.limit()),
            }
        })
        .collect()
}

pub fn table_rows(rows: &[CardRow<'_>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.card.id.to_string(),
                r.card.display_name(),
                fmt_opt(r.card.closing_day),
                fmt_opt(r.card.due_day),
                fmt_money(&r.card.limit()),
                fmt_money(&r.spend),
                fmt_money(&r.available),
                r.card.status.to_string(),
            ]
        })
        .collect()
}

pub fn handle<B: Backend>(session: &mut Session<B>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("add", sub)) => add(session, sub)?,
        Some(("edit", sub)) => edit(session, sub)?,
        Some(("rm", sub)) => {
            delete_ids(session, EntityKind::Card, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn list<B: Backend>(session: &mut Session<B>, sub: &ArgMatches) -> Result<()> {
    apply_filter_args(session, EntityKind::Card, sub)?;
    let rollup = session.card_rollup();
    let cards = session.visible_cards();
    let rows = card_rows(&cards, &rollup);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        println!("{}", pretty_table(&HEADERS, table_rows(&rows)));
        println!("Total spend: {}", fmt_money(&rollup.total_spend()));
    }
    Ok(())
}

fn apply_overrides(draft: &mut CardDraft, sub: &ArgMatches) -> Result<()> {
    if let Some(s) = sub.get_one::<String>("name") {
        let name = s.trim();
        if name.is_empty() {
            bail!("Card name cannot be empty");
        }
        draft.name = name.to_string();
    }
    if let Some(d) = sub.get_one::<u8>("closing_day") {
        draft.closing_day = *d;
    }
    if let Some(d) = sub.get_one::<u8>("due_day") {
        draft.due_day = *d;
    }
    if let Some(s) = sub.get_one::<String>("limit") {
        draft.limit_total = Some(parse_decimal(s)?);
    }
    if let Some(s) = sub.get_one::<String>("annual_fee") {
        draft.annual_fee = Some(parse_decimal(s)?);
    }
    if let Some(s) = sub.get_one::<String>("status") {
        draft.status = CardStatus::from(s.clone());
    }
    Ok(())
}

fn add<B: Backend>(session: &mut Session<B>, sub: &ArgMatches) -> Result<()> {
    let mut draft = CardDraft {
        name: String::new(),
        closing_day: *required::<u8>(sub, "closing_day")?,
        due_day: *required::<u8>(sub, "due_day")?,
        limit_total: None,
        annual_fee: None,
        status: CardStatus::Active,
    };
    required::<String>(sub, "name")?;
    apply_overrides(&mut draft, sub)?;
    session.create_card(&draft)?;
    println!("Added card '{}'", draft.name);
    Ok(())
}

fn edit<B: Backend>(session: &mut Session<B>, sub: &ArgMatches) -> Result<()> {
    let id = select_for_edit(session, EntityKind::Card, *required::<i64>(sub, "id")?)?;
    let mut draft = session
        .find_card(id)
        .map(CardDraft::from_card)
        .with_context(|| format!("No card with id {}", id))?;
    apply_overrides(&mut draft, sub)?;
    session.update_card(id, &draft)?;
    println!("Updated card {}", id);
    Ok(())
}
