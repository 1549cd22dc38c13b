// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, tx};
use finsys::cli::build_cli;
use finsys::commands::{admin, dashboard, financier, transactions, users};
use finsys::models::{Channel, Currency, Role, Status, TransactionUpdate, User};

fn sub<'a>(m: &'a clap::ArgMatches, path: &[&str]) -> &'a clap::ArgMatches {
    path.iter().fold(m, |acc, name| {
        acc.subcommand_matches(name)
            .unwrap_or_else(|| panic!("missing subcommand {}", name))
    })
}

fn user(id: &str, name: &str, surname: &str) -> User {
    serde_json::from_value(serde_json::json!({
        "id": id, "name": name, "surname": surname, "email": "", "role": "user"
    }))
    .unwrap()
}

#[test]
fn tx_add_builds_a_draft() {
    let m = build_cli().get_matches_from([
        "finsys", "tx", "add", "--date", "2025-03-04", "--amount", "60", "--currency", "$",
        "--channel", "entrees", "--motif", "Offrande", "--yes",
    ]);
    let draft = transactions::draft_from_matches(sub(&m, &["tx", "add"])).unwrap();
    assert_eq!(draft.date, chrono::NaiveDate::from_ymd_opt(2025, 3, 4));
    assert_eq!(draft.amount, Some(dec("60")));
    assert_eq!(draft.currency, Some(Currency::Usd));
    assert_eq!(draft.channel, Some(Channel::Entrees));
    let new = draft.validate().unwrap();
    assert_eq!(new.motif, "Offrande");
}

#[test]
fn tx_add_rejects_garbage_amount() {
    let m = build_cli().get_matches_from([
        "finsys", "tx", "add", "--amount", "abc", "--currency", "FC", "--channel", "Sorties",
        "--motif", "x",
    ]);
    assert!(transactions::draft_from_matches(sub(&m, &["tx", "add"])).is_err());
}

#[test]
fn tx_add_requires_fields_at_parse_time() {
    let res = build_cli().try_get_matches_from(["finsys", "tx", "add", "--amount", "5"]);
    assert!(res.is_err());
}

#[test]
fn list_filter_narrows_and_limits() {
    let data = vec![
        tx("1", "10", "USD", "Entrées", "approved"),
        tx("2", "20", "USD", "Sorties", "pending"),
        tx("3", "30", "FC", "Entrées", "pending"),
        tx("4", "40", "FC", "Entrées", "approved"),
    ];
    let m = build_cli().get_matches_from([
        "finsys", "tx", "list", "--channel", "entrees", "--status", "Approved",
    ]);
    let filter = transactions::ListFilter::from_matches(sub(&m, &["tx", "list"]));
    let ids: Vec<_> = filter.apply(&data).into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec!["1", "4"]);

    let m = build_cli().get_matches_from(["finsys", "tx", "list", "--limit", "2"]);
    let filter = transactions::ListFilter::from_matches(sub(&m, &["tx", "list"]));
    assert_eq!(filter.apply(&data).len(), 2);
}

#[test]
fn admin_update_keeps_unset_fields() {
    let current = TransactionUpdate::from_existing(&tx("9", "15", "USD", "Sorties", "pending"))
        .unwrap();
    let m = build_cli().get_matches_from([
        "finsys", "admin", "tx", "update", "9", "--amount", "17.5", "--motif", "Bus",
    ]);
    let next = admin::merge_update(current.clone(), sub(&m, &["admin", "tx", "update"])).unwrap();
    assert_eq!(next.amount, dec("17.5"));
    assert_eq!(next.motif, "Bus");
    assert_eq!(next.currency, current.currency);
    assert_eq!(next.channel, Channel::Sorties);
    assert_eq!(next.date, current.date);
}

#[test]
fn admin_update_rejects_unknown_channel() {
    let current = TransactionUpdate::from_existing(&tx("9", "15", "USD", "Sorties", "pending"))
        .unwrap();
    let m = build_cli().get_matches_from([
        "finsys", "admin", "tx", "update", "9", "--channel", "transfer",
    ]);
    assert!(admin::merge_update(current, sub(&m, &["admin", "tx", "update"])).is_err());
}

#[test]
fn user_patch_only_carries_given_fields() {
    let m = build_cli().get_matches_from([
        "finsys", "admin", "users", "update", "5", "--role", "Vice President",
    ]);
    let patch = users::update_from_matches(sub(&m, &["admin", "users", "update"]));
    assert_eq!(patch.role, Some(Role::VicePresident));
    assert!(patch.name.is_none());
    assert!(!patch.is_empty());

    let m = build_cli().get_matches_from(["finsys", "admin", "users", "update", "5"]);
    assert!(users::update_from_matches(sub(&m, &["admin", "users", "update"])).is_empty());
}

#[test]
fn dashboard_counts_approved_and_reports_pending() {
    let data = vec![
        tx("1", "100", "USD", "Entrées", "approved"),
        tx("2", "40", "USD", "Sorties", "approved"),
        tx("3", "500", "USD", "Sorties", "pending"),
    ];
    let summary = dashboard::summarize(&data, 2);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.recent.len(), 2);
    let usd = summary
        .cards
        .iter()
        .find(|c| c.currency == Currency::Usd)
        .unwrap();
    assert_eq!(usd.disponible, dec("60"));
    let fc = summary
        .cards
        .iter()
        .find(|c| c.currency == Currency::Fc)
        .unwrap();
    assert_eq!(fc.disponible, dec("0"));
}

#[test]
fn financier_report_ranks_and_truncates() {
    let mut data = vec![
        tx("1", "10", "USD", "Entrées", "approved"),
        tx("2", "10", "USD", "Entrées", "approved"),
        tx("3", "10", "FC", "Entrées", "approved"),
        tx("4", "10", "FC", "Sorties", "declined"),
    ];
    data[2].user_id = Some("u2".to_string());
    data[3].user_id = Some("u3".to_string());
    let people = vec![user("u1", "Ana", "Mbala"), user("u2", "Joel", "Kasa")];

    let report = financier::build_report(data, &people, 1);
    assert_eq!(report.contributors.len(), 1);
    assert_eq!(report.contributors[0].name, "Ana Mbala");
    assert_eq!(report.contributors[0].approved_count, 2);
    assert_eq!(report.transactions.len(), 4);
    assert!(report
        .transactions
        .iter()
        .any(|t| t.status == Status::Declined));
    assert_eq!(financier::owner_name(&report.transactions[3], &people), "u3");
}

#[test]
fn admin_update_rejects_non_positive_amount() {
    let current = TransactionUpdate::from_existing(&tx("9", "15", "USD", "Sorties", "pending"))
        .unwrap();
    for amount in ["--amount=-50", "--amount=0"] {
        let m = build_cli().get_matches_from(["finsys", "admin", "tx", "update", "9", amount]);
        assert!(admin::merge_update(current.clone(), sub(&m, &["admin", "tx", "update"])).is_err());
    }
}

#[test]
fn admin_update_rejects_blank_motif() {
    let current = TransactionUpdate::from_existing(&tx("9", "15", "USD", "Sorties", "pending"))
        .unwrap();
    for motif in ["", "   "] {
        let m = build_cli().get_matches_from([
            "finsys", "admin", "tx", "update", "9", "--motif", motif,
        ]);
        assert!(admin::merge_update(current.clone(), sub(&m, &["admin", "tx", "update"])).is_err());
    }
}
