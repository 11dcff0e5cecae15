// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod card_transactions;
pub mod cards;
pub mod dashboard;
pub mod entries;
pub mod exporter;
pub mod params;
pub mod settings;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::backend::Backend;
use crate::models::EntityKind;
use crate::session::Session;
use crate::utils::parse_filter;

pub(crate) fn required<'a, T>(m: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    m.get_one::<T>(id)
        .with_context(|| format!("Missing --{}", id.replace('_', "-")))
}

/// Installs every `--filter KEY=VALUE` on the table's filter set.
pub fn apply_filter_args<B: Backend>(
    session: &mut Session<B>,
    table: EntityKind,
    m: &ArgMatches,
) -> Result<()> {
    if let Some(raw) = m.get_many::<String>("filter") {
        for f in raw {
            let (key, value) = parse_filter(f)?;
            session.set_filter(table, &key, &value);
        }
    }
    Ok(())
}

/// Checks each `--id` and deletes the batch. Outcome notices come from the session.
pub fn delete_ids<B: Backend>(
    session: &mut Session<B>,
    table: EntityKind,
    m: &ArgMatches,
) -> Result<usize> {
    let ids: Vec<i64> = m
        .get_many::<i64>("id")
        .map(|v| v.copied().collect())
        .unwrap_or_default();
    for id in ids {
        session.set_selected(table, id, true);
    }
    Ok(session.delete_selected(table)?)
}

/// Marks `id` as the only selected row and resolves it as the edit target.
pub fn select_for_edit<B: Backend>(
    session: &mut Session<B>,
    table: EntityKind,
    id: i64,
) -> Result<i64> {
    for other in session.selection().selected_ids(table).to_vec() {
        session.set_selected(table, other, false);
    }
    session.set_selected(table, id, true);
    Ok(session.edit_target(table)?)
}
