// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Card id given to purchases whose card reference is missing or unreadable.
/// Matches no card, so the purchase counts as a dangling reference.
pub const UNKNOWN_CARD: i64 = -1;

/// `YYYY-MM-DD`, also taken from the front of a timestamp.
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Blank, null or unreadable dates decode as `None` instead of failing the list.
fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => parse_loose_date(&s),
        _ => None,
    })
}

fn unknown_card() -> i64 {
    UNKNOWN_CARD
}

fn lenient_card_id<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .unwrap_or(UNKNOWN_CARD))
}

/// The four cached collections. Doubles as the table key for filters and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Income,
    Expense,
    Card,
    CardTransaction,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Income,
        EntityKind::Expense,
        EntityKind::Card,
        EntityKind::CardTransaction,
    ];

    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Income => "income",
            EntityKind::Expense => "expense",
            EntityKind::Card => "card",
            EntityKind::CardTransaction => "card transaction",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Income => "incomes",
            EntityKind::Expense => "expenses",
            EntityKind::Card => "cards",
            EntityKind::CardTransaction => "card transactions",
        }
    }

    /// Collections that must be refetched after a successful mutation of this kind.
    /// Card transactions mirror into expenses server-side; deleting a card
    /// changes which transactions still resolve.
    pub fn reload_set(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Income => &[EntityKind::Income],
            EntityKind::Expense => &[EntityKind::Expense],
            EntityKind::Card => &[EntityKind::Card, EntityKind::CardTransaction],
            EntityKind::CardTransaction => &[EntityKind::CardTransaction, EntityKind::Expense],
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" | "receita" | "receitas" => Some(EntityKind::Income),
            "expense" | "expenses" | "despesa" | "despesas" => Some(EntityKind::Expense),
            "card" | "cards" | "cartao" | "cartoes" => Some(EntityKind::Card),
            "card-tx" | "card-transaction" | "card-transactions" | "transacoes-cartao" => {
                Some(EntityKind::CardTransaction)
            }
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Income or expense side of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Income,
    Expense,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Income, Side::Expense];

    pub fn kind(self) -> EntityKind {
        match self {
            Side::Income => EntityKind::Income,
            Side::Expense => EntityKind::Expense,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match EntityKind::parse(s)? {
            EntityKind::Income => Some(Side::Income),
            EntityKind::Expense => Some(Side::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().singular())
    }
}

/// Lookup lists maintained per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    Categories,
    Accounts,
    PaymentMethods,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [
        ParamKind::Categories,
        ParamKind::Accounts,
        ParamKind::PaymentMethods,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "categories" | "category" => Some(ParamKind::Categories),
            "accounts" | "account" => Some(ParamKind::Accounts),
            "payment-methods" | "payment-method" | "payment_methods" => {
                Some(ParamKind::PaymentMethods)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamKind::Categories => "categories",
            ParamKind::Accounts => "accounts",
            ParamKind::PaymentMethods => "payment methods",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// Income and expense records share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub amount_total: Option<Decimal>,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub type Income = Entry;
pub type Expense = Entry;

impl Entry {
    pub fn amount(&self) -> Decimal {
        self.amount_total.unwrap_or(Decimal::ZERO)
    }

    pub fn is_paid(&self) -> bool {
        self.payment_date.is_some()
    }

    /// (year, month) of the due date; `None` keeps the record out of period math.
    pub fn due_year_month(&self) -> Option<(i32, u32)> {
        self.due_date.map(|d| (d.year(), d.month()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CardStatus {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl From<String> for CardStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ativo" | "active" => CardStatus::Active,
            "inativo" | "inactive" => CardStatus::Inactive,
            _ => CardStatus::Other(s),
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardStatus::Active => f.write_str("ativo"),
            CardStatus::Inactive => f.write_str("inativo"),
            CardStatus::Other(s) => f.write_str(s),
        }
    }
}

impl Serialize for CardStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CardStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(CardStatus::from)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    #[serde(default, alias = "cartao")]
    pub name: Option<String>,
    #[serde(default)]
    pub closing_day: Option<u8>,
    #[serde(default)]
    pub due_day: Option<u8>,
    #[serde(default, alias = "limit_value")]
    pub limit_total: Option<Decimal>,
    #[serde(default)]
    pub annual_fee: Option<Decimal>,
    #[serde(default)]
    pub status: CardStatus,
}

impl Card {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("#{}", self.id),
        }
    }

    /// Absent limit counts as zero, never as unlimited.
    pub fn limit(&self) -> Decimal {
        self.limit_total.unwrap_or(Decimal::ZERO)
    }
}

/// One installment of a card purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTransaction {
    pub id: i64,
    #[serde(alias = "card_id", default = "unknown_card", deserialize_with = "lenient_card_id")]
    pub credit_card_id: i64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub installment_n: Option<u32>,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub amount_installment: Option<Decimal>,
    #[serde(default)]
    pub amount_total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl CardTransaction {
    /// First present of installment amount, total, then the legacy `amount`.
    pub fn spend_amount(&self) -> Decimal {
        self.amount_installment
            .or(self.amount_total)
            .or(self.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// A freshly fetched collection, replacing its cache slot wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Incomes(Vec<Entry>),
    Expenses(Vec<Entry>),
    Cards(Vec<Card>),
    CardTransactions(Vec<CardTransaction>),
}

impl Collection {
    pub fn kind(&self) -> EntityKind {
        match self {
            Collection::Incomes(_) => EntityKind::Income,
            Collection::Expenses(_) => EntityKind::Expense,
            Collection::Cards(_) => EntityKind::Card,
            Collection::CardTransactions(_) => EntityKind::CardTransaction,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Incomes(v) | Collection::Expenses(v) => v.len(),
            Collection::Cards(v) => v.len(),
            Collection::CardTransactions(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDraft {
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub amount_total: Decimal,
    pub installments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EntryDraft {
    pub fn new(due_date: NaiveDate, description: impl Into<String>, amount_total: Decimal) -> Self {
        Self {
            due_date,
            payment_date: None,
            description: description.into(),
            category: None,
            account: None,
            payment_method: None,
            amount_total,
            installments: 1,
            notes: None,
        }
    }

    /// Prefill from a cached record, as the edit form does. `None` when the
    /// record lacks a due date, which a draft requires.
    pub fn from_entry(e: &Entry) -> Option<Self> {
        Some(Self {
            due_date: e.due_date?,
            payment_date: e.payment_date,
            description: e.description.clone().unwrap_or_default(),
            category: e.category.clone(),
            account: e.account.clone(),
            payment_method: e.payment_method.clone(),
            amount_total: e.amount(),
            installments: e.installments.filter(|n| *n > 0).unwrap_or(1),
            notes: e.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardDraft {
    pub name: String,
    pub closing_day: u8,
    pub due_day: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_fee: Option<Decimal>,
    pub status: CardStatus,
}

impl CardDraft {
    pub fn from_card(c: &Card) -> Self {
        Self {
            name: c.name.clone().unwrap_or_default(),
            closing_day: c.closing_day.unwrap_or(1),
            due_day: c.due_day.unwrap_or(1),
            limit_total: c.limit_total,
            annual_fee: c.annual_fee,
            status: c.status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardTransactionDraft {
    pub credit_card_id: i64,
    pub purchase_date: NaiveDate,
    pub due_date: NaiveDate,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub installment_n: u32,
    pub installments: u32,
    pub amount_installment: Decimal,
    pub amount_total: Decimal,
}

impl CardTransactionDraft {
    /// Splits the total evenly; zero installments counts as one. Due date
    /// starts at the purchase date.
    pub fn new(
        credit_card_id: i64,
        purchase_date: NaiveDate,
        description: impl Into<String>,
        amount_total: Decimal,
        installments: u32,
    ) -> Self {
        let installments = installments.max(1);
        Self {
            credit_card_id,
            purchase_date,
            due_date: purchase_date,
            description: description.into(),
            category: None,
            installment_n: 1,
            installments,
            amount_installment: amount_total / Decimal::from(installments),
            amount_total,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }
}
