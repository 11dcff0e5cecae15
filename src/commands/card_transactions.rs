// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use clap::ArgMatches;

use super::{apply_filter_args, delete_ids, required};
use crate::backend::Backend;
use crate::cards::CardTransactionRow;
use crate::models::{CardTransactionDraft, EntityKind};
use crate::session::Session;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub const HEADERS: [&str; 8] = [
    "ID", "Card", "Purchase", "Due", "Description", "Category", "Inst.", "Amount",
];

pub fn table_rows(rows: &[CardTransactionRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            let t = &r.transaction;
            let installment = match (t.installment_n, t.installments) {
                (Some(n), Some(of)) => format!("{}/{}", n, of),
                (n, _) => fmt_opt(n),
            };
            vec![
                t.id.to_string(),
                r.card_label(),
                fmt_opt(t.purchase_date),
                fmt_opt(t.due_date),
                t.description.clone().unwrap_or_default(),
                t.category.clone().unwrap_or_default(),
                installment,
                fmt_money(&t.spend_amount()),
            ]
        })
        .collect()
}

pub fn handle<B: Backend>(session: &mut Session<B>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(session, sub)?,
        Some(("add", sub)) => add(session, sub)?,
        Some(("rm", sub)) => {
            delete_ids(session, EntityKind::CardTransaction, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn list<B: Backend>(session: &mut Session<B>, sub: &ArgMatches) -> Result<()> {
    apply_filter_args(session, EntityKind::CardTransaction, sub)?;
    let rows = session.visible_card_transactions();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        println!("{}", pretty_table(&HEADERS, table_rows(&rows)));
    }
    Ok(())
}

fn add<B: Backend>(session: &mut Session<B>, sub: &ArgMatches) -> Result<()> {
    let card_id = *required::<i64>(sub, "card_id")?;
    if !session.store().contains(EntityKind::Card, card_id) {
        bail!("No card with id {}", card_id);
    }
    let purchase = parse_date(required::<String>(sub, "purchase_date")?)?;
    let description = required::<String>(sub, "description")?.trim().to_string();
    let amount = parse_decimal(required::<String>(sub, "amount")?)?;
    let installments = sub.get_one::<u32>("installments").copied().unwrap_or(1);

    let mut draft = CardTransactionDraft::new(card_id, purchase, description, amount, installments);
    if let Some(s) = sub.get_one::<String>("due_date") {
        draft = draft.with_due_date(parse_date(s)?);
    }
    draft.category = sub.get_one::<String>("category").cloned();
    session.create_card_transaction(&draft)?;
    println!(
        "Recorded '{}' on card {}: {} x {}",
        draft.description,
        card_id,
        draft.installments,
        fmt_money(&draft.amount_installment)
    );
    Ok(())
}
