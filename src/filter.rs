// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Multi-field table filters.
//!
//! A filter set maps keys to raw input values. The key suffix picks the
//! comparator: `_from` / `_to` compare the field's string form
//! lexicographically (ISO dates order correctly), `_min` compares numerically,
//! `installment_n` is a case-sensitive substring match, and every other key
//! is a case-insensitive substring match. Blank values impose no constraint.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Card, CardTransaction, EntityKind, Entry};

/// Anything a table row can be filtered on, addressed by field name.
/// Absent fields return `None`.
pub trait Filterable {
    fn field(&self, name: &str) -> Option<String>;
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn field(&self, name: &str) -> Option<String> {
        (**self).field(name)
    }
}

fn text(v: &Option<String>) -> Option<String> {
    v.clone()
}

fn show<T: ToString>(v: &Option<T>) -> Option<String> {
    v.as_ref().map(ToString::to_string)
}

fn amount(v: &Option<Decimal>) -> Option<String> {
    v.map(|d| d.normalize().to_string())
}

impl Filterable for Entry {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "due_date" => show(&self.due_date),
            "payment_date" => show(&self.payment_date),
            "description" => text(&self.description),
            "category" => text(&self.category),
            "account" => text(&self.account),
            "payment_method" => text(&self.payment_method),
            "amount_total" => amount(&self.amount_total),
            "installments" => show(&self.installments),
            "notes" => text(&self.notes),
            _ => None,
        }
    }
}

impl Filterable for Card {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "name" => text(&self.name),
            "closing_day" => show(&self.closing_day),
            "due_day" => show(&self.due_day),
            "limit_total" => amount(&self.limit_total),
            "annual_fee" => amount(&self.annual_fee),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

impl Filterable for CardTransaction {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "credit_card_id" => Some(self.credit_card_id.to_string()),
            "purchase_date" => show(&self.purchase_date),
            "due_date" => show(&self.due_date),
            "description" => text(&self.description),
            "category" => text(&self.category),
            "installment_n" => show(&self.installment_n),
            "installments" => show(&self.installments),
            "amount_installment" => amount(&self.amount_installment),
            "amount_total" => amount(&self.amount_total),
            "amount" => amount(&self.amount),
            _ => None,
        }
    }
}

/// How a filter input constrains its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    DateFrom,
    DateTo,
    NumberMin,
}

impl FilterKind {
    pub fn key(self, field: &str) -> String {
        match self {
            FilterKind::Text => field.to_string(),
            FilterKind::DateFrom => format!("{field}_from"),
            FilterKind::DateTo => format!("{field}_to"),
            FilterKind::NumberMin => format!("{field}_min"),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "text" => Some(FilterKind::Text),
            "date-from" => Some(FilterKind::DateFrom),
            "date-to" => Some(FilterKind::DateTo),
            "number-min" => Some(FilterKind::NumberMin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// An empty value removes the key.
    pub fn set(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.0.remove(key);
        } else {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    pub fn set_input(&mut self, field: &str, kind: FilterKind, value: &str) {
        self.set(&kind.key(field), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut f = Filters::new();
        for (k, v) in iter {
            f.set(&k.into(), &v.into());
        }
        f
    }
}

enum Predicate<'a> {
    From { field: &'a str, bound: &'a str },
    To { field: &'a str, bound: &'a str },
    Min { field: &'a str, min: Decimal },
    Contains { field: &'a str, needle: &'a str },
    ContainsFolded { field: &'a str, needle: String },
}

fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

fn compile(filters: &Filters) -> Vec<Predicate<'_>> {
    let mut out = Vec::with_capacity(filters.len());
    for (key, raw) in filters.iter() {
        if raw.is_empty() {
            continue;
        }
        if let Some(field) = key.strip_suffix("_from") {
            out.push(Predicate::From { field, bound: raw });
        } else if let Some(field) = key.strip_suffix("_to") {
            out.push(Predicate::To { field, bound: raw });
        } else if let Some(field) = key.strip_suffix("_min") {
            // non-numeric bound: no constraint
            if let Some(min) = parse_number(raw) {
                out.push(Predicate::Min { field, min });
            }
        } else if key == "installment_n" {
            out.push(Predicate::Contains {
                field: key,
                needle: raw,
            });
        } else {
            out.push(Predicate::ContainsFolded {
                field: key,
                needle: raw.to_lowercase(),
            });
        }
    }
    out
}

fn matches<T: Filterable + ?Sized>(item: &T, preds: &[Predicate<'_>]) -> bool {
    preds.iter().all(|p| match p {
        Predicate::From { field, bound } => match item.field(field) {
            Some(v) if !v.is_empty() => v.as_str() >= *bound,
            _ => false,
        },
        Predicate::To { field, bound } => match item.field(field) {
            Some(v) if !v.is_empty() => v.as_str() <= *bound,
            _ => false,
        },
        Predicate::Min { field, min } => {
            let v = item
                .field(field)
                .and_then(|v| parse_number(&v))
                .unwrap_or(Decimal::ZERO);
            v >= *min
        }
        Predicate::Contains { field, needle } => {
            item.field(field).unwrap_or_default().contains(needle)
        }
        Predicate::ContainsFolded { field, needle } => item
            .field(field)
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle.as_str()),
    })
}

/// Rows of `items` passing every active filter, in input order.
pub fn apply<'a, T: Filterable>(items: &'a [T], filters: &Filters) -> Vec<&'a T> {
    let preds = compile(filters);
    items.iter().filter(|item| matches(*item, &preds)).collect()
}

/// Like [`apply`], but each row is first projected through `mapper` (to add
/// derived display fields) and the projections are returned. The cached rows
/// are only borrowed.
pub fn apply_mapped<T, V, F>(items: &[T], filters: &Filters, mapper: F) -> Vec<V>
where
    V: Filterable,
    F: Fn(&T) -> V,
{
    let preds = compile(filters);
    items
        .iter()
        .map(mapper)
        .filter(|view| matches(view, &preds))
        .collect()
}

/// Filter state per table; survives reloads because it is keyed by table and
/// field name, not by row identity.
#[derive(Debug, Clone, Default)]
pub struct FilterBook {
    tables: BTreeMap<EntityKind, Filters>,
}

static NO_FILTERS: Filters = Filters(BTreeMap::new());

impl FilterBook {
    pub fn get(&self, table: EntityKind) -> &Filters {
        self.tables.get(&table).unwrap_or(&NO_FILTERS)
    }

    pub fn get_mut(&mut self, table: EntityKind) -> &mut Filters {
        self.tables.entry(table).or_default()
    }

    pub fn clear(&mut self, table: EntityKind) {
        self.tables.remove(&table);
    }
}
