// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use caixa::cards::rollup;
use caixa::models::{Card, CardStatus, CardTransaction, CardTransactionDraft, UNKNOWN_CARD};
use common::{card, card_tx, date, dec};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn installment_split_counts_one_installment_as_spend() {
    let draft = CardTransactionDraft::new(1, date("2025-03-01"), "TV", dec("1200"), 3);
    assert_eq!(draft.amount_installment, dec("400"));
    assert_eq!(draft.installment_n, 1);
    assert_eq!(draft.due_date, date("2025-03-01"));

    let stored: CardTransaction = serde_json::from_value(json!({
        "id": 5,
        "credit_card_id": 1,
        "amount_total": "1200",
        "installments": 3,
        "amount_installment": "400",
    }))
    .unwrap();
    let r = rollup(&[card(1, "Visa", Some("3000"))], &[stored]);
    let usage = r.get(1).unwrap();
    assert_eq!(usage.spend, dec("400"));
    assert_eq!(usage.available, dec("2600"));
}

#[test]
fn zero_installments_count_as_one() {
    let draft = CardTransactionDraft::new(1, date("2025-03-01"), "Book", dec("80"), 0);
    assert_eq!(draft.installments, 1);
    assert_eq!(draft.amount_installment, dec("80"));
    let later = draft.with_due_date(date("2025-04-10"));
    assert_eq!(later.due_date, date("2025-04-10"));
}

#[test]
fn card_without_transactions_has_full_limit_available() {
    let r = rollup(&[card(1, "Visa", Some("5000"))], &[]);
    assert_eq!(r.get(1).unwrap().spend, Decimal::ZERO);
    assert_eq!(r.get(1).unwrap().available, dec("5000"));
}

#[test]
fn dangling_transactions_are_ignored() {
    let cards = [card(1, "Visa", Some("1000"))];
    let r = rollup(&cards, &[card_tx(1, 1, "100"), card_tx(2, 42, "900")]);
    assert_eq!(r.len(), 1);
    assert_eq!(r.get(1).unwrap().spend, dec("100"));
    assert!(r.get(42).is_none());
    assert_eq!(r.total_spend(), dec("100"));
}

#[test]
fn available_never_goes_negative_and_missing_limit_is_zero() {
    let cards = vec![card(1, "Over", Some("100")), card(2, "NoLimit", None)];
    let txs = vec![card_tx(1, 1, "250"), card_tx(2, 2, "10")];
    let r = rollup(&cards, &txs);
    assert_eq!(r.get(1).unwrap().available, Decimal::ZERO);
    assert_eq!(r.get(2).unwrap().limit, Decimal::ZERO);
    assert_eq!(r.get(2).unwrap().available, Decimal::ZERO);
    let order: Vec<i64> = r.iter().map(|u| u.card_id).collect();
    assert_eq!(order, vec![1, 2]);
}

#[test]
fn spend_falls_back_through_amount_fields() {
    let mut t = card_tx(1, 1, "30");
    t.amount_installment = None;
    t.amount_total = Some(dec("90"));
    assert_eq!(t.spend_amount(), dec("90"));
    t.amount_total = None;
    t.amount = Some(dec("7"));
    assert_eq!(t.spend_amount(), dec("7"));
    t.amount = None;
    assert_eq!(t.spend_amount(), Decimal::ZERO);
}

#[test]
fn card_payload_aliases_and_defaults() {
    let c: Card = serde_json::from_value(json!({
        "id": 3,
        "cartao": "Elo",
        "limit_value": 1500.0,
        "status": null,
    }))
    .unwrap();
    assert_eq!(c.display_name(), "Elo");
    assert_eq!(c.limit(), dec("1500"));
    assert_eq!(c.status, CardStatus::Active);

    let nameless: Card = serde_json::from_value(json!({"id": 8, "status": "inativo"})).unwrap();
    assert_eq!(nameless.display_name(), "#8");
    assert_eq!(nameless.status, CardStatus::Inactive);
    assert_eq!(serde_json::to_value(&nameless.status).unwrap(), json!("inativo"));

    let t: CardTransaction =
        serde_json::from_value(json!({"id": 1, "card_id": 3, "amount": 12})).unwrap();
    assert_eq!(t.credit_card_id, 3);
    assert_eq!(t.spend_amount(), dec("12"));
}

#[test]
fn purchase_without_a_card_reference_is_dangling() {
    let rows: Vec<CardTransaction> = serde_json::from_value(json!([
        {"id": 1, "credit_card_id": null, "amount_installment": "50"},
        {"id": 2, "amount_installment": "20"},
        {"id": 3, "credit_card_id": "1", "amount_installment": "30",
         "purchase_date": "2025-02-01T12:00:00", "due_date": ""},
    ]))
    .unwrap();
    assert_eq!(rows[0].credit_card_id, UNKNOWN_CARD);
    assert_eq!(rows[1].credit_card_id, UNKNOWN_CARD);
    assert_eq!(rows[2].credit_card_id, 1);
    assert_eq!(rows[2].purchase_date, Some(date("2025-02-01")));
    assert_eq!(rows[2].due_date, None);

    let r = rollup(&[card(1, "Visa", Some("100"))], &rows);
    assert_eq!(r.get(1).unwrap().spend, dec("30"));
    assert_eq!(r.total_spend(), dec("30"));
}
