// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Entry;

pub const MONTH_LABELS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

pub const ALL_MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

pub fn month_label(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_LABELS.get(idx).copied()
}

/// Dashboard selection: years × months, matched against due dates.
/// An empty side selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    years: BTreeSet<i32>,
    months: BTreeSet<u32>,
}

impl Default for Period {
    /// No year yet, every month.
    fn default() -> Self {
        Self {
            years: BTreeSet::new(),
            months: ALL_MONTHS.into_iter().collect(),
        }
    }
}

impl Period {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        months: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().filter(|m| (1..=12).contains(m)).collect(),
        }
    }

    pub fn whole_years(years: impl IntoIterator<Item = i32>) -> Self {
        Self::new(years, ALL_MONTHS)
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn months(&self) -> &BTreeSet<u32> {
        &self.months
    }

    pub fn set_year(&mut self, year: i32, selected: bool) {
        if selected {
            self.years.insert(year);
        } else {
            self.years.remove(&year);
        }
    }

    pub fn set_month(&mut self, month: u32, selected: bool) {
        if !(1..=12).contains(&month) {
            return;
        }
        if selected {
            self.months.insert(month);
        } else {
            self.months.remove(&month);
        }
    }

    pub fn set_years(&mut self, years: impl IntoIterator<Item = i32>) {
        self.years = years.into_iter().collect();
    }

    pub fn set_months(&mut self, months: impl IntoIterator<Item = u32>) {
        self.months = months.into_iter().filter(|m| (1..=12).contains(m)).collect();
    }

    /// Drops years that no longer occur in the data. If nothing is left,
    /// falls back to `current_year` when available, else the latest year.
    pub fn reconcile_years(&mut self, available: &[i32], current_year: i32) {
        self.years.retain(|y| available.contains(y));
        if self.years.is_empty() {
            if available.contains(&current_year) {
                self.years.insert(current_year);
            } else if let Some(last) = available.iter().max() {
                self.years.insert(*last);
            }
        }
    }

    fn covers(&self, entry: &Entry) -> bool {
        match entry.due_year_month() {
            Some((y, m)) => self.years.contains(&y) && self.months.contains(&m),
            None => false,
        }
    }

    fn covers_year(&self, entry: &Entry) -> bool {
        match entry.due_year_month() {
            Some((y, _)) => self.years.contains(&y),
            None => false,
        }
    }

    /// Months to chart: the selection ascending, or all twelve if none.
    pub fn chart_months(&self) -> Vec<u32> {
        if self.months.is_empty() {
            ALL_MONTHS.to_vec()
        } else {
            self.months.iter().copied().collect()
        }
    }
}

/// Distinct due-date years across both sides, ascending. Never empty:
/// with no dated records the current year stands in.
pub fn available_years(incomes: &[Entry], expenses: &[Entry], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = incomes
        .iter()
        .chain(expenses)
        .filter_map(|e| e.due_year_month().map(|(y, _)| y))
        .collect();
    if years.is_empty() {
        years.insert(current_year);
    }
    years.into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Lifetime paid income minus paid expense; ignores the selection.
    pub cash_balance: Decimal,
    /// Due within selected years and months.
    pub period_balance: Decimal,
    /// Due within selected years, any month.
    pub annual_balance: Decimal,
    pub paid: Totals,
    pub period: Totals,
    pub annual: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    pub months: Vec<u32>,
    pub labels: Vec<&'static str>,
    pub incomes: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
}

impl MonthlySeries {
    pub fn totals(&self) -> Totals {
        Totals {
            income: self.incomes.iter().copied().sum(),
            expense: self.expenses.iter().copied().sum(),
        }
    }
}

fn sum<'a>(entries: impl Iterator<Item = &'a Entry>) -> Decimal {
    entries.map(Entry::amount).sum()
}

fn buckets(entries: &[Entry], period: &Period) -> [Decimal; 12] {
    let mut out = [Decimal::ZERO; 12];
    for e in entries.iter().filter(|e| period.covers(e)) {
        if let Some((_, m)) = e.due_year_month() {
            out[(m - 1) as usize] += e.amount();
        }
    }
    out
}

pub fn monthly_series(incomes: &[Entry], expenses: &[Entry], period: &Period) -> MonthlySeries {
    let inc = buckets(incomes, period);
    let exp = buckets(expenses, period);
    let months = period.chart_months();
    MonthlySeries {
        labels: months.iter().filter_map(|m| month_label(*m)).collect(),
        incomes: months.iter().map(|m| inc[(m - 1) as usize]).collect(),
        expenses: months.iter().map(|m| exp[(m - 1) as usize]).collect(),
        months,
    }
}

pub fn dashboard_summary(incomes: &[Entry], expenses: &[Entry], period: &Period) -> DashboardSummary {
    let paid = Totals {
        income: sum(incomes.iter().filter(|e| e.is_paid())),
        expense: sum(expenses.iter().filter(|e| e.is_paid())),
    };
    let in_period = Totals {
        income: sum(incomes.iter().filter(|e| period.covers(e))),
        expense: sum(expenses.iter().filter(|e| period.covers(e))),
    };
    let annual = Totals {
        income: sum(incomes.iter().filter(|e| period.covers_year(e))),
        expense: sum(expenses.iter().filter(|e| period.covers_year(e))),
    };
    DashboardSummary {
        cash_balance: paid.balance(),
        period_balance: in_period.balance(),
        annual_balance: annual.balance(),
        paid,
        period: in_period,
        annual,
    }
}
