// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::thread;

use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::{BackendError, Error};
use crate::models::{
    Card, CardTransaction, Collection, EntityKind, Entry, ParamItem, ParamKind, Side,
};

/// Cached copies of every backend collection. Loads replace a slot wholesale
/// or not at all.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    incomes: Vec<Entry>,
    expenses: Vec<Entry>,
    cards: Vec<Card>,
    card_transactions: Vec<CardTransaction>,
    params: BTreeMap<(Side, ParamKind), Vec<ParamItem>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches `kind` and replaces its slot. On failure the previous
    /// collection is kept and the error returned.
    pub fn load<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        kind: EntityKind,
    ) -> Result<usize, Error> {
        match backend.fetch(kind) {
            Ok(collection) => Ok(self.replace(kind, collection)),
            Err(source) => {
                warn!(%kind, error = %source, "load failed; keeping cached copy");
                Err(Error::Load { kind, source })
            }
        }
    }

    /// Fetches several kinds concurrently, then applies each result in the
    /// order given.
    pub fn load_many<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        kinds: &[EntityKind],
    ) -> Vec<(EntityKind, Result<usize, Error>)> {
        let fetched: Vec<(EntityKind, Result<Collection, BackendError>)> = thread::scope(|scope| {
            let pending: Vec<_> = kinds
                .iter()
                .map(|&kind| (kind, scope.spawn(move || backend.fetch(kind))))
                .collect();
            pending
                .into_iter()
                .map(|(kind, handle)| (kind, handle.join().unwrap_or(Err(BackendError::Aborted))))
                .collect()
        });
        fetched
            .into_iter()
            .map(|(kind, res)| {
                let out = match res {
                    Ok(collection) => Ok(self.replace(kind, collection)),
                    Err(source) => {
                        warn!(%kind, error = %source, "load failed; keeping cached copy");
                        Err(Error::Load { kind, source })
                    }
                };
                (kind, out)
            })
            .collect()
    }

    /// All three lookup lists of a side, fetched together; all or nothing.
    pub fn load_params<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        side: Side,
    ) -> Result<(), Error> {
        let fetched: Vec<(ParamKind, Result<Vec<ParamItem>, BackendError>)> =
            thread::scope(|scope| {
                let pending: Vec<_> = ParamKind::ALL
                    .iter()
                    .map(|&param| (param, scope.spawn(move || backend.fetch_params(side, param))))
                    .collect();
                pending
                    .into_iter()
                    .map(|(param, handle)| {
                        (param, handle.join().unwrap_or(Err(BackendError::Aborted)))
                    })
                    .collect()
            });
        let mut lists = Vec::with_capacity(fetched.len());
        for (param, res) in fetched {
            match res {
                Ok(items) => lists.push((param, items)),
                Err(source) => {
                    warn!(%side, %param, error = %source, "parameter load failed");
                    return Err(Error::ParamLoad { side, source });
                }
            }
        }
        for (param, items) in lists {
            self.params.insert((side, param), items);
        }
        info!(%side, "parameters loaded");
        Ok(())
    }

    /// Installs a fetched collection. A collection of a different kind than
    /// `kind` is still stored in its own slot.
    pub fn replace(&mut self, kind: EntityKind, collection: Collection) -> usize {
        let n = collection.len();
        if collection.kind() != kind {
            warn!(requested = %kind, got = %collection.kind(), "backend answered another collection");
        }
        match collection {
            Collection::Incomes(v) => self.incomes = v,
            Collection::Expenses(v) => self.expenses = v,
            Collection::Cards(v) => self.cards = v,
            Collection::CardTransactions(v) => self.card_transactions = v,
        }
        info!(kind = %kind, count = n, "collection loaded");
        n
    }

    pub fn incomes(&self) -> &[Entry] {
        &self.incomes
    }

    pub fn expenses(&self) -> &[Entry] {
        &self.expenses
    }

    pub fn entries(&self, side: Side) -> &[Entry] {
        match side {
            Side::Income => &self.incomes,
            Side::Expense => &self.expenses,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_transactions(&self) -> &[CardTransaction] {
        &self.card_transactions
    }

    pub fn params(&self, side: Side, param: ParamKind) -> &[ParamItem] {
        self.params
            .get(&(side, param))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Income => self.incomes.len(),
            EntityKind::Expense => self.expenses.len(),
            EntityKind::Card => self.cards.len(),
            EntityKind::CardTransaction => self.card_transactions.len(),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: i64) -> bool {
        match kind {
            EntityKind::Income => self.incomes.iter().any(|e| e.id == id),
            EntityKind::Expense => self.expenses.iter().any(|e| e.id == id),
            EntityKind::Card => self.cards.iter().any(|c| c.id == id),
            EntityKind::CardTransaction => self.card_transactions.iter().any(|t| t.id == id),
        }
    }
}
