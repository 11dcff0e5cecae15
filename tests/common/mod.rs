// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use caixa::backend::Backend;
use caixa::error::BackendError;
use caixa::models::{
    Card, CardTransaction, Collection, EntityKind, Entry, ParamItem, ParamKind, Side,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn entry(id: i64, due: &str, amount: &str, paid: Option<&str>) -> Entry {
    Entry {
        id,
        due_date: Some(date(due)),
        payment_date: paid.map(date),
        description: Some(format!("entry {}", id)),
        category: None,
        account: None,
        payment_method: None,
        amount_total: Some(dec(amount)),
        installments: Some(1),
        notes: None,
    }
}

pub fn described(mut e: Entry, description: &str) -> Entry {
    e.description = Some(description.to_string());
    e
}

pub fn card(id: i64, name: &str, limit: Option<&str>) -> Card {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "closing_day": 5,
        "due_day": 12,
        "limit_total": limit,
        "status": "ativo",
    }))
    .unwrap()
}

pub fn card_tx(id: i64, card_id: i64, installment: &str) -> CardTransaction {
    serde_json::from_value(json!({
        "id": id,
        "credit_card_id": card_id,
        "purchase_date": "2025-02-10",
        "due_date": "2025-03-12",
        "description": format!("purchase {}", id),
        "installment_n": 1,
        "installments": 1,
        "amount_installment": installment,
        "amount_total": installment,
    }))
    .unwrap()
}

#[derive(Default)]
struct State {
    incomes: Vec<Entry>,
    expenses: Vec<Entry>,
    cards: Vec<Card>,
    card_transactions: Vec<CardTransaction>,
    params: BTreeMap<(Side, ParamKind), Vec<ParamItem>>,
    fail_fetch: HashSet<EntityKind>,
    fail_delete: HashSet<i64>,
    fail_mutations: bool,
    calls: Vec<String>,
    bodies: Vec<Value>,
    next_id: i64,
}

/// In-memory stand-in for the REST API. Records every call; failures are scripted.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

fn scripted(status: u16) -> BackendError {
    BackendError::Status {
        status,
        detail: "scripted failure".into(),
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.lock().next_id = 1000;
        fake
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_incomes(self, v: Vec<Entry>) -> Self {
        self.lock().incomes = v;
        self
    }

    pub fn with_expenses(self, v: Vec<Entry>) -> Self {
        self.lock().expenses = v;
        self
    }

    pub fn with_cards(self, v: Vec<Card>) -> Self {
        self.lock().cards = v;
        self
    }

    pub fn with_card_transactions(self, v: Vec<CardTransaction>) -> Self {
        self.lock().card_transactions = v;
        self
    }

    pub fn with_param(self, side: Side, param: ParamKind, names: &[&str]) -> Self {
        let items = names
            .iter()
            .enumerate()
            .map(|(i, n)| ParamItem {
                id: Some(i as i64 + 1),
                name: n.to_string(),
            })
            .collect();
        self.lock().params.insert((side, param), items);
        self
    }

    pub fn set_fail_fetch(&self, kind: EntityKind, fail: bool) {
        let mut st = self.lock();
        if fail {
            st.fail_fetch.insert(kind);
        } else {
            st.fail_fetch.remove(&kind);
        }
    }

    pub fn fail_delete_of(&self, id: i64) {
        self.lock().fail_delete.insert(id);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.lock().fail_mutations = fail;
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn expenses(&self) -> Vec<Entry> {
        self.lock().expenses.clone()
    }

    pub fn incomes(&self) -> Vec<Entry> {
        self.lock().incomes.clone()
    }

    /// Payload of the most recent create or update.
    pub fn last_body(&self) -> Option<Value> {
        self.lock().bodies.last().cloned()
    }
}

fn with_id(body: &Value, id: i64) -> Value {
    let mut body = body.clone();
    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".into(), json!(id));
    }
    body
}

fn codec(e: serde_json::Error) -> BackendError {
    BackendError::Codec(e)
}

impl Backend for FakeBackend {
    fn fetch(&self, kind: EntityKind) -> Result<Collection, BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("fetch:{}", kind));
        if st.fail_fetch.contains(&kind) {
            return Err(scripted(503));
        }
        Ok(match kind {
            EntityKind::Income => Collection::Incomes(st.incomes.clone()),
            EntityKind::Expense => Collection::Expenses(st.expenses.clone()),
            EntityKind::Card => Collection::Cards(st.cards.clone()),
            EntityKind::CardTransaction => {
                Collection::CardTransactions(st.card_transactions.clone())
            }
        })
    }

    fn fetch_params(&self, side: Side, param: ParamKind) -> Result<Vec<ParamItem>, BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("params:{}:{}", side, param));
        Ok(st.params.get(&(side, param)).cloned().unwrap_or_default())
    }

    fn create(&self, kind: EntityKind, body: &Value) -> Result<(), BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("create:{}", kind));
        st.bodies.push(body.clone());
        if st.fail_mutations {
            return Err(scripted(500));
        }
        st.next_id += 1;
        let id = st.next_id;
        let body = with_id(body, id);
        match kind {
            EntityKind::Income => st.incomes.push(serde_json::from_value(body).map_err(codec)?),
            EntityKind::Expense => st.expenses.push(serde_json::from_value(body).map_err(codec)?),
            EntityKind::Card => st.cards.push(serde_json::from_value(body).map_err(codec)?),
            EntityKind::CardTransaction => {
                let trx: CardTransaction = serde_json::from_value(body).map_err(codec)?;
                // purchases are mirrored into expenses server-side
                st.next_id += 1;
                let mirror = Entry {
                    id: st.next_id,
                    due_date: trx.due_date,
                    payment_date: None,
                    description: trx.description.clone(),
                    category: trx.category.clone(),
                    account: None,
                    payment_method: Some("cartao".into()),
                    amount_total: trx.amount_installment,
                    installments: trx.installments,
                    notes: None,
                };
                st.expenses.push(mirror);
                st.card_transactions.push(trx);
            }
        }
        Ok(())
    }

    fn update(&self, kind: EntityKind, id: i64, body: &Value) -> Result<(), BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("update:{}:{}", kind, id));
        st.bodies.push(body.clone());
        if st.fail_mutations {
            return Err(scripted(500));
        }
        let body = with_id(body, id);
        let found = match kind {
            EntityKind::Income | EntityKind::Expense => {
                let next: Entry = serde_json::from_value(body).map_err(codec)?;
                let list = if kind == EntityKind::Income {
                    &mut st.incomes
                } else {
                    &mut st.expenses
                };
                list.iter_mut().find(|e| e.id == id).map(|e| *e = next).is_some()
            }
            EntityKind::Card => {
                let next: Card = serde_json::from_value(body).map_err(codec)?;
                st.cards.iter_mut().find(|c| c.id == id).map(|c| *c = next).is_some()
            }
            EntityKind::CardTransaction => {
                let next: CardTransaction = serde_json::from_value(body).map_err(codec)?;
                st.card_transactions
                    .iter_mut()
                    .find(|t| t.id == id)
                    .map(|t| *t = next)
                    .is_some()
            }
        };
        if found { Ok(()) } else { Err(scripted(404)) }
    }

    fn delete(&self, kind: EntityKind, id: i64) -> Result<(), BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("delete:{}:{}", kind, id));
        if st.fail_delete.contains(&id) || st.fail_mutations {
            return Err(scripted(500));
        }
        let removed = match kind {
            EntityKind::Income => {
                let n = st.incomes.len();
                st.incomes.retain(|e| e.id != id);
                n - st.incomes.len()
            }
            EntityKind::Expense => {
                let n = st.expenses.len();
                st.expenses.retain(|e| e.id != id);
                n - st.expenses.len()
            }
            EntityKind::Card => {
                let n = st.cards.len();
                st.cards.retain(|c| c.id != id);
                n - st.cards.len()
            }
            EntityKind::CardTransaction => {
                let n = st.card_transactions.len();
                st.card_transactions.retain(|t| t.id != id);
                n - st.card_transactions.len()
            }
        };
        if removed == 1 { Ok(()) } else { Err(scripted(404)) }
    }

    fn patch_payment(
        &self,
        side: Side,
        id: i64,
        payment_date: Option<NaiveDate>,
    ) -> Result<(), BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("patch:{}:{}", side, id));
        if st.fail_mutations {
            return Err(scripted(500));
        }
        let list = match side {
            Side::Income => &mut st.incomes,
            Side::Expense => &mut st.expenses,
        };
        match list.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.payment_date = payment_date;
                Ok(())
            }
            None => Err(scripted(404)),
        }
    }

    fn create_param(&self, side: Side, param: ParamKind, name: &str) -> Result<(), BackendError> {
        let mut st = self.lock();
        st.calls.push(format!("create-param:{}:{}", side, param));
        if st.fail_mutations {
            return Err(scripted(500));
        }
        st.next_id += 1;
        let id = st.next_id;
        st.params.entry((side, param)).or_default().push(ParamItem {
            id: Some(id),
            name: name.to_string(),
        });
        Ok(())
    }
}
