// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caixa::models::EntityKind;
use caixa::selection::{SelectionController, SelectionState};

#[test]
fn states_follow_the_number_of_checked_rows() {
    let mut sel = SelectionController::default();
    assert_eq!(sel.state(EntityKind::Card), SelectionState::Empty);
    assert!(!sel.can_edit(EntityKind::Card));
    assert!(!sel.can_delete(EntityKind::Card));

    sel.set_selected(EntityKind::Card, 4, true);
    assert_eq!(sel.state(EntityKind::Card), SelectionState::Single(4));
    assert!(sel.can_edit(EntityKind::Card));
    assert!(sel.can_delete(EntityKind::Card));

    sel.set_selected(EntityKind::Card, 9, true);
    assert_eq!(sel.state(EntityKind::Card), SelectionState::Multiple(2));
    assert!(!sel.can_edit(EntityKind::Card));
    assert!(sel.can_delete(EntityKind::Card));

    sel.set_selected(EntityKind::Card, 4, false);
    assert_eq!(sel.state(EntityKind::Card), SelectionState::Single(9));
}

#[test]
fn checking_twice_keeps_one_entry_in_order() {
    let mut sel = SelectionController::default();
    sel.set_selected(EntityKind::Expense, 3, true);
    sel.set_selected(EntityKind::Expense, 1, true);
    sel.set_selected(EntityKind::Expense, 3, true);
    assert_eq!(sel.selected_ids(EntityKind::Expense), &[3, 1]);
    assert_eq!(sel.count(EntityKind::Expense), 2);
}

#[test]
fn select_all_only_touches_given_rows() {
    let mut sel = SelectionController::default();
    sel.set_selected(EntityKind::Income, 7, true);
    sel.select_all(EntityKind::Income, &[1, 2], true);
    assert_eq!(sel.selected_ids(EntityKind::Income), &[7, 1, 2]);
    sel.select_all(EntityKind::Income, &[1, 2], false);
    assert_eq!(sel.selected_ids(EntityKind::Income), &[7]);
}

#[test]
fn tables_are_independent() {
    let mut sel = SelectionController::default();
    sel.set_selected(EntityKind::Income, 1, true);
    sel.set_selected(EntityKind::CardTransaction, 1, true);
    sel.clear(EntityKind::Income);
    assert_eq!(sel.state(EntityKind::Income), SelectionState::Empty);
    assert!(sel.is_selected(EntityKind::CardTransaction, 1));
}
