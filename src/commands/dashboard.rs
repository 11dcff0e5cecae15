// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;
use serde::Serialize;

use crate::backend::Backend;
use crate::cards::CardRollup;
use crate::period::{DashboardSummary, MonthlySeries, Period};
use crate::session::Session;
use crate::utils::{fmt_money, pretty_table};

#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub years: Vec<i32>,
    pub period: &'a Period,
    pub summary: DashboardSummary,
    pub series: MonthlySeries,
    pub cards: CardRollup,
}

/// `--year`/`--month` replace the matching side of the current selection.
pub fn apply_period_args<B: Backend>(session: &mut Session<B>, m: &ArgMatches) {
    let mut period = session.period().clone();
    if let Some(years) = m.get_many::<i32>("year") {
        period.set_years(years.copied());
    }
    if let Some(months) = m.get_many::<u32>("month") {
        period.set_months(months.copied());
    }
    session.set_period(period);
}

pub fn view<B: Backend>(session: &Session<B>) -> DashboardView<'_> {
    DashboardView {
        years: session.year_options(),
        period: session.period(),
        summary: session.dashboard(),
        series: session.monthly_series(),
        cards: session.card_rollup(),
    }
}

pub fn handle<B: Backend>(session: &mut Session<B>, m: &ArgMatches) -> Result<()> {
    apply_period_args(session, m);
    let v = view(session);
    if m.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }
    if m.get_flag("jsonl") {
        println!("{}", serde_json::to_string(&v)?);
        return Ok(());
    }

    let s = &v.summary;
    let selected: Vec<String> = v.period.years().iter().map(|y| y.to_string()).collect();
    println!("Years: {}", selected.join(", "));
    println!(
        "{}",
        pretty_table(
            &["Figure", "Income", "Expense", "Balance"],
            vec![
                vec![
                    "Cash (paid)".into(),
                    fmt_money(&s.paid.income),
                    fmt_money(&s.paid.expense),
                    fmt_money(&s.cash_balance),
                ],
                vec![
                    "Period".into(),
                    fmt_money(&s.period.income),
                    fmt_money(&s.period.expense),
                    fmt_money(&s.period_balance),
                ],
                vec![
                    "Annual".into(),
                    fmt_money(&s.annual.income),
                    fmt_money(&s.annual.expense),
                    fmt_money(&s.annual_balance),
                ],
            ],
        )
    );

    let rows: Vec<Vec<String>> = v
        .series
        .labels
        .iter()
        .zip(v.series.incomes.iter().zip(&v.series.expenses))
        .map(|(label, (inc, exp))| {
            vec![label.to_string(), fmt_money(inc), fmt_money(exp), fmt_money(&(*inc - *exp))]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));

    if !v.cards.is_empty() {
        let rows: Vec<Vec<String>> = v
            .cards
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    fmt_money(&c.limit),
                    fmt_money(&c.spend),
                    fmt_money(&c.available),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Card", "Limit", "Spend", "Available"], rows));
    }
    Ok(())
}
