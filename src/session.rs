// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-session context: cached collections, table filters, row selection,
//! dashboard period, and the mutation flows that keep them consistent.
//!
//! Every mutation goes to the backend first; on success the affected
//! collections are reloaded in full and a [`StoreEvent`] is published.
//! Derived views (filtered rows, dashboard figures, card rollup) are computed
//! on demand from the cache. Failures never escape unreported: each one is
//! returned to the caller and also recorded as a [`Notice`].

use std::thread;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::backend::Backend;
use crate::cards::{self, CardRollup, CardTransactionRow};
use crate::error::{Action, BackendError, Error};
use crate::filter::{self, FilterBook, FilterKind, Filters};
use crate::models::{
    Card, CardDraft, CardTransaction, CardTransactionDraft, EntityKind, Entry, EntryDraft,
    ParamKind, Side,
};
use crate::period::{self, DashboardSummary, MonthlySeries, Period};
use crate::selection::{SelectionController, SelectionState};
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message produced at an operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Reloaded { kind: EntityKind, count: usize },
    LoadFailed { kind: EntityKind },
    ParamsReloaded { side: Side },
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

pub struct Session<B: Backend> {
    backend: B,
    store: EntityStore,
    filters: FilterBook,
    selection: SelectionController,
    period: Period,
    current_year: i32,
    notices: Vec<Notice>,
    listeners: Vec<Listener>,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_current_year(backend, chrono::Local::now().year())
    }

    /// `current_year` seeds the default dashboard year.
    pub fn with_current_year(backend: B, current_year: i32) -> Self {
        Self {
            backend,
            store: EntityStore::new(),
            filters: FilterBook::default(),
            selection: SelectionController::default(),
            period: Period::default(),
            current_year,
            notices: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Observers are told about every reload; they pull derived views from the session.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn publish(&mut self, event: StoreEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "notice"),
            NoticeLevel::Error => warn!(message = %notice.message, "notice"),
        }
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ---------- loading ----------

    /// Initial load: lookup lists for both sides, then every collection.
    /// Each failure is reported and returned; the rest still loads.
    pub fn start(&mut self) -> Vec<Error> {
        let mut errors = Vec::new();
        for side in Side::BOTH {
            if let Err(e) = self.reload_params(side) {
                errors.push(e);
            }
        }
        let results = self.store.load_many(&self.backend, &EntityKind::ALL);
        for (kind, res) in results {
            if let Err(e) = self.after_load(kind, res) {
                errors.push(e);
            }
        }
        errors
    }

    pub fn reload(&mut self, kind: EntityKind) -> Result<usize, Error> {
        let res = self.store.load(&self.backend, kind);
        self.after_load(kind, res)
    }

    /// Reloads in order; every kind is attempted, the first error is returned.
    pub fn reload_many(&mut self, kinds: &[EntityKind]) -> Result<(), Error> {
        let mut first = None;
        for kind in kinds {
            if let Err(e) = self.reload(*kind) {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn after_load(&mut self, kind: EntityKind, res: Result<usize, Error>) -> Result<usize, Error> {
        // ids may be gone and rows hidden either way
        self.selection.clear(kind);
        match res {
            Ok(count) => {
                if matches!(kind, EntityKind::Income | EntityKind::Expense) {
                    self.reconcile_years();
                }
                self.publish(StoreEvent::Reloaded { kind, count });
                Ok(count)
            }
            Err(e) => {
                self.notify(Notice::error(format!(
                    "Could not load {kind}. Check your connection."
                )));
                self.publish(StoreEvent::LoadFailed { kind });
                Err(e)
            }
        }
    }

    pub fn reload_params(&mut self, side: Side) -> Result<(), Error> {
        match self.store.load_params(&self.backend, side) {
            Ok(()) => {
                self.publish(StoreEvent::ParamsReloaded { side });
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(format!("Could not load {side} parameters.")));
                Err(e)
            }
        }
    }

    // ---------- filters ----------

    pub fn filters(&self, table: EntityKind) -> &Filters {
        self.filters.get(table)
    }

    pub fn set_filter(&mut self, table: EntityKind, key: &str, value: &str) {
        self.filters.get_mut(table).set(key, value);
    }

    /// A typed input box: `kind` decides the key suffix.
    pub fn set_filter_input(
        &mut self,
        table: EntityKind,
        field: &str,
        kind: FilterKind,
        value: &str,
    ) {
        self.filters.get_mut(table).set_input(field, kind, value);
    }

    pub fn clear_filters(&mut self, table: EntityKind) {
        self.filters.clear(table);
    }

    pub fn visible_entries(&self, side: Side) -> Vec<&Entry> {
        filter::apply(self.store.entries(side), self.filters.get(side.kind()))
    }

    pub fn visible_cards(&self) -> Vec<&Card> {
        filter::apply(self.store.cards(), self.filters.get(EntityKind::Card))
    }

    pub fn visible_card_transactions(&self) -> Vec<CardTransactionRow> {
        filter::apply_mapped(
            self.store.card_transactions(),
            self.filters.get(EntityKind::CardTransaction),
            cards::with_card_names(self.store.cards()),
        )
    }

    pub fn visible_ids(&self, table: EntityKind) -> Vec<i64> {
        match table {
            EntityKind::Income | EntityKind::Expense => {
                let side = if table == EntityKind::Income {
                    Side::Income
                } else {
                    Side::Expense
                };
                self.visible_entries(side).iter().map(|e| e.id).collect()
            }
            EntityKind::Card => self.visible_cards().iter().map(|c| c.id).collect(),
            EntityKind::CardTransaction => self
                .visible_card_transactions()
                .iter()
                .map(|r| r.transaction.id)
                .collect(),
        }
    }

    // ---------- selection ----------

    pub fn set_selected(&mut self, table: EntityKind, id: i64, selected: bool) {
        self.selection.set_selected(table, id, selected);
    }

    pub fn select_all_visible(&mut self, table: EntityKind, selected: bool) {
        let visible = self.visible_ids(table);
        self.selection.select_all(table, &visible, selected);
    }

    pub fn selection_state(&self, table: EntityKind) -> SelectionState {
        self.selection.state(table)
    }

    /// The one row an edit applies to.
    pub fn edit_target(&self, table: EntityKind) -> Result<i64, Error> {
        match self.selection.state(table) {
            SelectionState::Single(id) => Ok(id),
            SelectionState::Empty => Err(Error::Selection(format!(
                "Select one {} to edit.",
                table.singular()
            ))),
            SelectionState::Multiple(_) => Err(Error::Selection(format!(
                "Select only 1 {} to edit.",
                table.singular()
            ))),
        }
    }

    // ---------- dashboard ----------

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn toggle_year(&mut self, year: i32, selected: bool) {
        self.period.set_year(year, selected);
    }

    pub fn toggle_month(&mut self, month: u32, selected: bool) {
        self.period.set_month(month, selected);
    }

    pub fn year_options(&self) -> Vec<i32> {
        period::available_years(self.store.incomes(), self.store.expenses(), self.current_year)
    }

    fn reconcile_years(&mut self) {
        let years = self.year_options();
        self.period.reconcile_years(&years, self.current_year);
    }

    pub fn dashboard(&self) -> DashboardSummary {
        period::dashboard_summary(self.store.incomes(), self.store.expenses(), &self.period)
    }

    pub fn monthly_series(&self) -> MonthlySeries {
        period::monthly_series(self.store.incomes(), self.store.expenses(), &self.period)
    }

    pub fn card_rollup(&self) -> CardRollup {
        cards::rollup(self.store.cards(), self.store.card_transactions())
    }

    // ---------- mutations ----------

    fn mutate<F>(&mut self, kind: EntityKind, action: Action, call: F) -> Result<(), Error>
    where
        F: FnOnce(&B) -> Result<(), BackendError>,
    {
        if let Err(source) = call(&self.backend) {
            error!(%kind, %action, error = %source, "mutation failed");
            self.notify(Notice::error(format!(
                "Could not {action} {}.",
                kind.singular()
            )));
            return Err(Error::Mutation {
                kind,
                action,
                source,
            });
        }
        info!(%kind, %action, "mutation applied");
        self.reload_many(kind.reload_set())
    }

    pub fn create_entry(&mut self, side: Side, draft: &EntryDraft) -> Result<(), Error> {
        let kind = side.kind();
        self.mutate(kind, Action::Create, |b| {
            b.create(kind, &serde_json::to_value(draft)?)
        })
    }

    pub fn update_entry(&mut self, side: Side, id: i64, draft: &EntryDraft) -> Result<(), Error> {
        let kind = side.kind();
        self.mutate(kind, Action::Update, |b| {
            b.update(kind, id, &serde_json::to_value(draft)?)
        })
    }

    /// `None` marks the record unpaid again.
    pub fn set_payment_date(
        &mut self,
        side: Side,
        id: i64,
        payment_date: Option<NaiveDate>,
    ) -> Result<(), Error> {
        self.mutate(side.kind(), Action::Patch, |b| {
            b.patch_payment(side, id, payment_date)
        })
    }

    pub fn create_card(&mut self, draft: &CardDraft) -> Result<(), Error> {
        self.mutate(EntityKind::Card, Action::Create, |b| {
            b.create(EntityKind::Card, &serde_json::to_value(draft)?)
        })
    }

    pub fn update_card(&mut self, id: i64, draft: &CardDraft) -> Result<(), Error> {
        self.mutate(EntityKind::Card, Action::Update, |b| {
            b.update(EntityKind::Card, id, &serde_json::to_value(draft)?)
        })
    }

    /// The backend mirrors the purchase into expenses, so both are reloaded.
    pub fn create_card_transaction(&mut self, draft: &CardTransactionDraft) -> Result<(), Error> {
        self.mutate(EntityKind::CardTransaction, Action::Create, |b| {
            b.create(EntityKind::CardTransaction, &serde_json::to_value(draft)?)
        })
    }

    pub fn add_param(&mut self, side: Side, param: ParamKind, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if let Err(source) = self.backend.create_param(side, param, name) {
            error!(%side, %param, error = %source, "parameter create failed");
            self.notify(Notice::error("Could not save parameter."));
            return Err(Error::Mutation {
                kind: side.kind(),
                action: Action::Create,
                source,
            });
        }
        self.reload_params(side)
    }

    /// Deletes every selected row of `table` with all calls in flight at once.
    /// Whatever succeeded is resynced by a reload even when some calls fail;
    /// a failing batch yields a single notice. Returns how many were deleted.
    pub fn delete_selected(&mut self, table: EntityKind) -> Result<usize, Error> {
        let ids = self.selection.selected_ids(table).to_vec();
        if ids.is_empty() {
            return Ok(0);
        }
        let backend = &self.backend;
        let outcomes: Vec<(i64, Result<(), BackendError>)> = thread::scope(|scope| {
            let pending: Vec<_> = ids
                .iter()
                .map(|&id| (id, scope.spawn(move || backend.delete(table, id))))
                .collect();
            pending
                .into_iter()
                .map(|(id, handle)| (id, handle.join().unwrap_or(Err(BackendError::Aborted))))
                .collect()
        });

        let mut failed = Vec::new();
        for (id, res) in outcomes {
            if let Err(e) = res {
                error!(kind = %table, id, error = %e, "delete failed");
                failed.push(id);
            }
        }
        let total = ids.len();
        let deleted = total - failed.len();

        let reload = self.reload_many(table.reload_set());
        self.selection.clear(table);

        if !failed.is_empty() {
            self.notify(Notice::error(format!(
                "Could not delete {} of {total} {table}.",
                failed.len()
            )));
            return Err(Error::PartialBatch {
                kind: table,
                failed,
                deleted,
                total,
            });
        }
        reload?;
        self.notify(Notice::info(format!("{deleted} {table} deleted.")));
        Ok(deleted)
    }

    pub fn find_entry(&self, side: Side, id: i64) -> Option<&Entry> {
        self.store.entries(side).iter().find(|e| e.id == id)
    }

    pub fn find_card(&self, id: i64) -> Option<&Card> {
        self.store.cards().iter().find(|c| c.id == id)
    }

    pub fn find_card_transaction(&self, id: i64) -> Option<&CardTransaction> {
        self.store.card_transactions().iter().find(|t| t.id == id)
    }
}
