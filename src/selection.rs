// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::models::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Single(i64),
    Multiple(usize),
}

/// Checked row ids per table, in the order they were checked.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    tables: BTreeMap<EntityKind, Vec<i64>>,
}

impl SelectionController {
    pub fn set_selected(&mut self, table: EntityKind, id: i64, selected: bool) {
        let ids = self.tables.entry(table).or_default();
        if selected {
            if !ids.contains(&id) {
                ids.push(id);
            }
        } else {
            ids.retain(|x| *x != id);
        }
    }

    /// Header checkbox: toggles only the rows currently visible.
    pub fn select_all(&mut self, table: EntityKind, visible: &[i64], selected: bool) {
        for id in visible {
            self.set_selected(table, *id, selected);
        }
    }

    pub fn selected_ids(&self, table: EntityKind) -> &[i64] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, table: EntityKind, id: i64) -> bool {
        self.selected_ids(table).contains(&id)
    }

    pub fn count(&self, table: EntityKind) -> usize {
        self.selected_ids(table).len()
    }

    pub fn state(&self, table: EntityKind) -> SelectionState {
        match self.selected_ids(table) {
            [] => SelectionState::Empty,
            [id] => SelectionState::Single(*id),
            ids => SelectionState::Multiple(ids.len()),
        }
    }

    pub fn can_edit(&self, table: EntityKind) -> bool {
        self.count(table) == 1
    }

    pub fn can_delete(&self, table: EntityKind) -> bool {
        self.count(table) >= 1
    }

    pub fn clear(&mut self, table: EntityKind) {
        self.tables.remove(&table);
    }
}
