// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use caixa::cli;
use caixa::commands::{card_transactions, cards, dashboard, entries, params};
use caixa::models::{CardStatus, EntityKind, ParamKind, Side};
use caixa::session::Session;
use common::{FakeBackend, card, dec, entry};

fn started(backend: FakeBackend) -> Session<FakeBackend> {
    let mut s = Session::with_current_year(backend, 2025);
    assert!(s.start().is_empty());
    s.drain_notices();
    s
}

fn dispatch(session: &mut Session<FakeBackend>, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["caixa"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("income", m)) => entries::handle(session, Side::Income, m),
        Some(("expense", m)) => entries::handle(session, Side::Expense, m),
        Some(("card", m)) => cards::handle(session, m),
        Some(("card-tx", m)) => card_transactions::handle(session, m),
        Some(("dashboard", m)) => dashboard::handle(session, m),
        Some(("params", m)) => params::handle(session, m),
        _ => panic!("command not parsed"),
    }
}

#[test]
fn expense_add_sends_draft_and_reloads() {
    let mut s = started(FakeBackend::new());
    dispatch(
        &mut s,
        &[
            "expense",
            "add",
            "--due-date",
            "2025-06-10",
            "--description",
            " Internet ",
            "--amount",
            "99.90",
            "--category",
            "Casa",
        ],
    )
    .unwrap();

    let body = s.backend().last_body().unwrap();
    assert_eq!(body["description"], "Internet");
    assert_eq!(body["amount_total"], "99.90");
    assert_eq!(body["installments"], 1);
    assert_eq!(body["category"], "Casa");
    assert_eq!(s.store().expenses().len(), 1);
    assert_eq!(s.store().expenses()[0].amount(), dec("99.90"));
}

#[test]
fn add_rejects_bad_date_without_calling_backend() {
    let mut s = started(FakeBackend::new());
    s.backend().clear_calls();
    let res = dispatch(
        &mut s,
        &["income", "add", "--due-date", "10/06/2025", "--description", "x", "--amount", "1"],
    );
    assert!(res.is_err());
    assert!(s.backend().calls().is_empty());
}

#[test]
fn income_edit_keeps_untouched_fields() {
    let mut seeded = entry(5, "2025-02-01", "2500", None);
    seeded.account = Some("Itaú".into());
    let mut s = started(FakeBackend::new().with_incomes(vec![seeded]));

    dispatch(&mut s, &["income", "edit", "--id", "5", "--amount", "2600"]).unwrap();

    let updated = s.find_entry(Side::Income, 5).unwrap();
    assert_eq!(updated.amount(), dec("2600"));
    assert_eq!(updated.account.as_deref(), Some("Itaú"));
    assert_eq!(updated.description.as_deref(), Some("entry 5"));
    assert_eq!(s.backend().count_calls("update:incomes:5"), 1);
}

#[test]
fn edit_of_unknown_id_fails() {
    let mut s = started(FakeBackend::new());
    assert!(dispatch(&mut s, &["income", "edit", "--id", "77", "--amount", "1"]).is_err());
}

#[test]
fn pay_sets_and_clears_the_payment_date() {
    let mut s = started(FakeBackend::new().with_expenses(vec![entry(3, "2025-03-01", "50", None)]));
    dispatch(&mut s, &["expense", "pay", "--id", "3", "--date", "2025-03-02"]).unwrap();
    assert!(s.find_entry(Side::Expense, 3).unwrap().is_paid());
    dispatch(&mut s, &["expense", "pay", "--id", "3"]).unwrap();
    assert!(!s.find_entry(Side::Expense, 3).unwrap().is_paid());
}

#[test]
fn rm_deletes_every_given_id() {
    let backend = FakeBackend::new().with_incomes(vec![
        entry(1, "2025-01-01", "1", None),
        entry(2, "2025-01-02", "2", None),
        entry(3, "2025-01-03", "3", None),
    ]);
    let mut s = started(backend);
    dispatch(&mut s, &["income", "rm", "--id", "1", "3"]).unwrap();
    let left: Vec<i64> = s.store().incomes().iter().map(|e| e.id).collect();
    assert_eq!(left, vec![2]);
    assert_eq!(s.drain_notices()[0].message, "2 incomes deleted.");
}

#[test]
fn rm_reports_partial_failure_as_error() {
    let backend = FakeBackend::new().with_incomes(vec![
        entry(1, "2025-01-01", "1", None),
        entry(2, "2025-01-02", "2", None),
    ]);
    backend.fail_delete_of(1);
    let mut s = started(backend);
    assert!(dispatch(&mut s, &["income", "rm", "--id", "1", "--id", "2"]).is_err());
    assert_eq!(s.store().incomes().len(), 1);
    assert_eq!(s.drain_notices().len(), 1);
}

#[test]
fn card_add_and_edit() {
    let mut s = started(FakeBackend::new());
    dispatch(
        &mut s,
        &[
            "card", "add", "--name", "Inter", "--closing-day", "3", "--due-day", "10", "--limit",
            "4000",
        ],
    )
    .unwrap();
    let id = s.store().cards()[0].id;
    assert_eq!(s.store().cards()[0].limit(), dec("4000"));

    let id_arg = id.to_string();
    dispatch(&mut s, &["card", "edit", "--id", &id_arg, "--status", "inativo"]).unwrap();
    let edited = s.find_card(id).unwrap();
    assert_eq!(edited.status, CardStatus::Inactive);
    assert_eq!(edited.name.as_deref(), Some("Inter"));
    assert_eq!(edited.closing_day, Some(3));
}

#[test]
fn card_day_out_of_range_is_rejected_by_the_parser() {
    let res = cli::build_cli().try_get_matches_from([
        "caixa", "card", "add", "--name", "X", "--closing-day", "32", "--due-day", "1",
    ]);
    assert!(res.is_err());
}

#[test]
fn card_purchase_requires_a_known_card() {
    let mut s = started(FakeBackend::new().with_cards(vec![card(1, "Visa", Some("900"))]));
    let add = |card_id: &str| {
        vec![
            "card-tx".to_string(),
            "add".into(),
            "--card-id".into(),
            card_id.into(),
            "--purchase-date".into(),
            "2025-05-01".into(),
            "--description".into(),
            "Phone".into(),
            "--amount".into(),
            "900".into(),
            "--installments".into(),
            "3".into(),
        ]
    };
    let unknown = add("2");
    let unknown: Vec<&str> = unknown.iter().map(String::as_str).collect();
    assert!(dispatch(&mut s, &unknown).is_err());

    let known = add("1");
    let known: Vec<&str> = known.iter().map(String::as_str).collect();
    dispatch(&mut s, &known).unwrap();
    assert_eq!(s.store().card_transactions()[0].amount_installment, Some(dec("300")));
    assert_eq!(s.card_rollup().get(1).unwrap().available, dec("600"));
    assert_eq!(s.store().expenses().len(), 1);
}

#[test]
fn list_installs_filters_on_the_table() {
    let mut s = started(FakeBackend::new().with_incomes(vec![entry(1, "2025-01-01", "5", None)]));
    dispatch(&mut s, &["income", "list", "--filter", "due_date_from=2025-01-01", "--json"])
        .unwrap();
    assert_eq!(s.filters(EntityKind::Income).get("due_date_from"), Some("2025-01-01"));
    assert!(dispatch(&mut s, &["income", "list", "--filter", "nonsense"]).is_err());
}

#[test]
fn card_list_filters_by_name() {
    let mut s = started(FakeBackend::new().with_cards(vec![
        card(1, "Nubank", Some("1000")),
        card(2, "Visa Gold", Some("5000")),
    ]));
    dispatch(&mut s, &["card", "list", "-f", "name=visa", "--json"]).unwrap();
    assert_eq!(s.filters(EntityKind::Card).get("name"), Some("visa"));
    let ids: Vec<i64> = s.visible_cards().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn dashboard_args_replace_the_period() {
    let backend = FakeBackend::new()
        .with_incomes(vec![entry(1, "2024-03-10", "1000", Some("2024-03-12"))])
        .with_expenses(vec![entry(2, "2024-03-05", "400", None)]);
    let mut s = started(backend);
    dispatch(&mut s, &["dashboard", "--year", "2024", "--month", "3", "--json"]).unwrap();
    assert_eq!(s.period().months().iter().copied().collect::<Vec<_>>(), vec![3]);
    let view = dashboard::view(&s);
    assert_eq!(view.summary.period_balance, dec("600"));
    assert_eq!(view.years, vec![2024]);
}

#[test]
fn params_add_goes_through_the_session() {
    let mut s = started(FakeBackend::new());
    dispatch(
        &mut s,
        &["params", "add", "--side", "receita", "--kind", "accounts", "--name", "Nubank"],
    )
    .unwrap();
    assert_eq!(s.store().params(Side::Income, ParamKind::Accounts)[0].name, "Nubank");
    assert!(dispatch(&mut s, &["params", "add", "--side", "x", "--kind", "accounts", "--name", "y"])
        .is_err());
}
