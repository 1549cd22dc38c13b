// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, tx, FakeBackend};
use finsys::api::{ReviewAction, SubmitReceipt};
use finsys::balance::approved_net_by_currency;
use finsys::error::ApiError;
use finsys::models::{Channel, Currency, Status, TransactionUpdate};
use finsys::workflow::{
    submit, ListScope, SubmissionState, TransactionDraft, TransactionList,
};

fn draft(channel: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        date: chrono::NaiveDate::from_ymd_opt(2025, 3, 14),
        amount: Some(dec(amount)),
        currency: Some(Currency::Usd),
        channel: Some(Channel::parse(channel)),
        motif: "Offrande".to_string(),
        file: None,
    }
}

#[test]
fn sortie_goes_pending_and_stays_out_of_the_balance() {
    let backend = FakeBackend::new(vec![tx("1", "100", "$", "Entrées", "Approved")]);
    let submission = submit(&backend, &draft("Sorties", "40")).unwrap();
    assert_eq!(submission.state, SubmissionState::Pending);

    let mine = TransactionList::load(&backend, ListScope::Mine("u1".into())).unwrap();
    assert_eq!(mine.items().len(), 2);
    assert_eq!(approved_net_by_currency(mine.items())[&Currency::Usd], dec("100"));

    let mut queue = TransactionList::load(&backend, ListScope::Pending).unwrap();
    let id = queue.items()[0].id.clone();
    queue.review(&backend, &id, ReviewAction::Approve).unwrap();
    assert!(queue.items().is_empty());

    let mine = TransactionList::load(&backend, ListScope::Mine("u1".into())).unwrap();
    assert_eq!(approved_net_by_currency(mine.items())[&Currency::Usd], dec("60"));
}

#[test]
fn entree_is_approved_immediately() {
    let backend = FakeBackend::new(Vec::new());
    let submission = submit(&backend, &draft("entrees", "10")).unwrap();
    assert_eq!(submission.state, SubmissionState::Approved);
    assert_eq!(submission.message(), "Transaction added successfully!");
}

#[test]
fn sortie_accepted_outright_is_approved() {
    let mut backend = FakeBackend::new(Vec::new());
    backend.sorties_status = 201;
    let submission = submit(&backend, &draft("Sorties", "10")).unwrap();
    assert_eq!(submission.state, SubmissionState::Approved);
}

#[test]
fn body_status_wins_over_http_status() {
    let receipt = SubmitReceipt::from_body(201, r#"{"id": 9, "status": "Pending"}"#);
    assert_eq!(receipt.reported_status, Some(Status::Pending));
    assert_eq!(receipt.transaction.as_ref().map(|t| t.id.as_str()), Some("9"));
    assert_eq!(
        SubmissionState::after_submit(&Channel::Entrees, &receipt),
        SubmissionState::Pending
    );

    let bare = SubmitReceipt::from_body(202, "Accepted");
    assert_eq!(bare.reported_status, None);
    assert!(bare.transaction.is_none());
    assert_eq!(
        SubmissionState::after_submit(&Channel::Sorties, &bare),
        SubmissionState::Pending
    );
}

#[test]
fn invalid_draft_never_reaches_the_backend() {
    let backend = FakeBackend::new(Vec::new());
    let mut d = draft("Sorties", "10");
    d.motif = "   ".into();
    assert!(matches!(submit(&backend, &d), Err(ApiError::Validation(_))));

    let mut d = draft("Sorties", "10");
    d.amount = None;
    assert!(matches!(submit(&backend, &d), Err(ApiError::Validation(_))));

    let d = draft("Virement", "10");
    assert!(matches!(submit(&backend, &d), Err(ApiError::Validation(_))));

    let d = draft("Sorties", "0");
    assert!(matches!(submit(&backend, &d), Err(ApiError::Validation(_))));

    assert_eq!(backend.calls_named("create"), 0);
}

#[test]
fn failed_submission_keeps_the_draft_for_retry() {
    let backend = FakeBackend::new(Vec::new());
    backend.fail_create.set(true);
    let d = draft("Sorties", "10");
    assert!(submit(&backend, &d).is_err());
    assert!(backend.store.borrow().is_empty());

    backend.fail_create.set(false);
    let retried = submit(&backend, &d).unwrap();
    assert_eq!(retried.state, SubmissionState::Pending);
    assert_eq!(backend.store.borrow().len(), 1);
}

#[test]
fn review_only_from_pending() {
    assert_eq!(
        SubmissionState::Pending.review(ReviewAction::Decline).unwrap(),
        SubmissionState::Declined
    );
    for done in [SubmissionState::Approved, SubmissionState::Declined, SubmissionState::Draft] {
        assert!(matches!(
            done.review(ReviewAction::Approve),
            Err(ApiError::InvalidTransition { .. })
        ));
    }
    assert!(SubmissionState::Approved.is_terminal());
    assert!(!SubmissionState::Pending.is_terminal());
}

#[test]
fn reviewing_an_approved_item_is_refused_locally() {
    let backend = FakeBackend::new(vec![tx("1", "5", "$", "Sorties", "Approved")]);
    let mut all = TransactionList::load(&backend, ListScope::All).unwrap();
    let err = all.review(&backend, "1", ReviewAction::Decline).unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition { .. }));
    assert_eq!(backend.calls_named("review"), 0);
}

#[test]
fn delete_removes_from_list_and_aggregate() {
    let backend = FakeBackend::new(vec![
        tx("1", "100", "$", "Entrées", "Approved"),
        tx("2", "30", "$", "Entrées", "Approved"),
    ]);
    let mut all = TransactionList::load(&backend, ListScope::All).unwrap();
    all.delete(&backend, "2").unwrap();
    assert!(all.get("2").is_none());
    assert_eq!(approved_net_by_currency(all.items())[&Currency::Usd], dec("100"));
}

#[test]
fn failed_mutation_still_refetches_authoritative_list() {
    let backend = FakeBackend::new(vec![tx("1", "10", "$", "Sorties", "Pending")]);
    let mut queue = TransactionList::load(&backend, ListScope::Pending).unwrap();
    backend.fail_mutations.set(true);

    let before = backend.calls_named("fetch:pending");
    assert!(queue.review(&backend, "1", ReviewAction::Approve).is_err());
    assert_eq!(backend.calls_named("fetch:pending"), before + 1);
    // The backend still has it pending, so the re-fetch brings it back.
    assert_eq!(queue.items().len(), 1);
}

#[test]
fn failed_refetch_keeps_the_optimistic_copy() {
    let backend = FakeBackend::new(vec![
        tx("1", "10", "$", "Sorties", "Pending"),
        tx("2", "10", "$", "Sorties", "Pending"),
    ]);
    let mut queue = TransactionList::load(&backend, ListScope::Pending).unwrap();
    backend.fail_fetch.set(true);
    queue.review(&backend, "1", ReviewAction::Decline).unwrap();
    assert_eq!(queue.items().len(), 1);
    assert_eq!(queue.items()[0].id, "2");
}

#[test]
fn update_is_reconciled_with_backend() {
    let backend = FakeBackend::new(vec![tx("1", "10", "$", "Entrées", "Approved")]);
    let mut all = TransactionList::load(&backend, ListScope::All).unwrap();
    let mut patch = TransactionUpdate::from_existing(all.get("1").unwrap()).unwrap();
    patch.amount = dec("25");
    patch.currency = Currency::Fc;
    all.update(&backend, "1", &patch).unwrap();
    let stored = all.get("1").unwrap();
    assert_eq!(stored.amount, dec("25"));
    assert_eq!(stored.currency, Currency::Fc);
    assert_eq!(backend.calls_named("fetch:all"), 2);
}

#[test]
fn lists_come_back_newest_first() {
    let mut old = tx("1", "1", "$", "Entrées", "Approved");
    old.date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1);
    let mut new = tx("2", "1", "$", "Entrées", "Approved");
    new.date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1);
    let backend = FakeBackend::new(vec![old, new]);
    let all = TransactionList::load(&backend, ListScope::All).unwrap();
    assert_eq!(all.items()[0].id, "2");
}
