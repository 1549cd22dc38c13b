// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction submission and review.
//!
//! A draft becomes `Pending` or `Approved` on submit; only an admin review
//! moves `Pending` on to `Approved` or `Declined`. Lists shown to the user are
//! always reconciled against the backend after a mutation.

use crate::api::{Backend, ReviewAction, SubmitReceipt};
use crate::error::ApiError;
use crate::models::{
    Channel, Currency, NewTransaction, Status, Transaction, TransactionUpdate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Draft,
    Pending,
    Approved,
    Declined,
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Draft => "draft",
            SubmissionState::Pending => "pending",
            SubmissionState::Approved => "approved",
            SubmissionState::Declined => "declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Approved | SubmissionState::Declined)
    }

    /// State reached once the backend accepted a submission.
    pub fn after_submit(channel: &Channel, receipt: &SubmitReceipt) -> SubmissionState {
        match &receipt.reported_status {
            Some(Status::Approved) => return SubmissionState::Approved,
            Some(Status::Declined) => return SubmissionState::Declined,
            Some(Status::Pending) => return SubmissionState::Pending,
            _ => {}
        }
        match channel {
            Channel::Sorties if receipt.is_pending_acceptance() => SubmissionState::Pending,
            _ => SubmissionState::Approved,
        }
    }

    pub fn review(self, action: ReviewAction) -> Result<SubmissionState, ApiError> {
        match self {
            SubmissionState::Pending => Ok(match action {
                ReviewAction::Approve => SubmissionState::Approved,
                ReviewAction::Decline => SubmissionState::Declined,
            }),
            other => Err(ApiError::InvalidTransition {
                action: action.segment(),
                state: other.as_str(),
            }),
        }
    }
}

impl From<&Status> for SubmissionState {
    fn from(s: &Status) -> Self {
        match s {
            Status::Approved => SubmissionState::Approved,
            Status::Declined => SubmissionState::Declined,
            Status::Pending | Status::Unknown(_) => SubmissionState::Pending,
        }
    }
}

/// Form input for a new transaction. Every field except `file` is required.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub channel: Option<Channel>,
    pub motif: String,
    pub file: Option<PathBuf>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<NewTransaction, ApiError> {
        let required = || ApiError::Validation("Please fill out all required fields.".to_string());
        let date = self.date.ok_or_else(required)?;
        let amount = self.amount.ok_or_else(required)?;
        let currency = self
            .currency
            .clone()
            .filter(|c| !matches!(c, Currency::Other(s) if s.is_empty()))
            .ok_or_else(required)?;
        let channel = self.channel.clone().ok_or_else(required)?;
        let motif = self.motif.trim();
        check_fields(amount, &channel, motif)?;
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ApiError::Validation(format!(
                    "Attachment {} does not exist.",
                    path.display()
                )));
            }
        }
        Ok(NewTransaction {
            date,
            amount,
            currency,
            channel,
            motif: motif.to_string(),
            file: self.file.clone(),
        })
    }
}

/// Checks shared by new submissions and admin edits.
fn check_fields(amount: Decimal, channel: &Channel, motif: &str) -> Result<(), ApiError> {
    if motif.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please fill out all required fields.".to_string(),
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Amount must be greater than zero.".to_string(),
        ));
    }
    if !channel.is_known() {
        return Err(ApiError::Validation(format!(
            "Unknown channel '{}': use Entrées or Sorties.",
            channel
        )));
    }
    Ok(())
}

/// An edit must leave the record as valid as a fresh submission.
pub fn validate_update(update: &TransactionUpdate) -> Result<(), ApiError> {
    check_fields(update.amount, &update.channel, &update.motif)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub state: SubmissionState,
    pub receipt: SubmitReceipt,
}

impl Submission {
    pub fn message(&self) -> &'static str {
        match self.state {
            SubmissionState::Pending => {
                "Sortie request sent successfully! Awaiting Admin approval. It will appear once approved."
            }
            SubmissionState::Declined => "Transaction was declined.",
            _ => "Transaction added successfully!",
        }
    }
}

/// Validate and post a draft. The draft is borrowed, so after a failure it is
/// still there to retry and nothing about it was recorded locally.
pub fn submit<B: Backend + ?Sized>(
    backend: &B,
    draft: &TransactionDraft,
) -> Result<Submission, ApiError> {
    let tx = draft.validate()?;
    let receipt = backend.create_transaction(&tx).map_err(|e| {
        tracing::warn!(error = %e, "submission failed; draft kept");
        e
    })?;
    let state = SubmissionState::after_submit(&tx.channel, &receipt);
    tracing::info!(
        http_status = receipt.http_status,
        state = state.as_str(),
        channel = %tx.channel,
        "transaction submitted"
    );
    Ok(Submission { state, receipt })
}

/// Which slice of the backend a list mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Mine(String),
    All,
    Pending,
}

/// A locally held list that is re-fetched after every mutation, whether the
/// mutation succeeded or not. The backend copy always wins.
#[derive(Debug, Clone)]
pub struct TransactionList {
    scope: ListScope,
    items: Vec<Transaction>,
}

impl TransactionList {
    pub fn load<B: Backend + ?Sized>(backend: &B, scope: ListScope) -> Result<Self, ApiError> {
        let items = fetch(backend, &scope)?;
        Ok(TransactionList { scope, items })
    }

    pub fn items(&self) -> &[Transaction] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Transaction> {
        self.items
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> Result<(), ApiError> {
        self.items = fetch(backend, &self.scope)?;
        Ok(())
    }

    /// Approve or decline: the item leaves a pending list either way.
    pub fn review<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: &str,
        action: ReviewAction,
    ) -> Result<(), ApiError> {
        if let Some(tx) = self.get(id) {
            SubmissionState::from(&tx.status).review(action)?;
        }
        match self.scope {
            ListScope::Pending => self.items.retain(|t| t.id != id),
            _ => {
                let next = match action {
                    ReviewAction::Approve => Status::Approved,
                    ReviewAction::Decline => Status::Declined,
                };
                if let Some(tx) = self.items.iter_mut().find(|t| t.id == id) {
                    tx.status = next;
                }
            }
        }
        let outcome = backend.review_transaction(id, action);
        self.settle(backend);
        outcome
    }

    pub fn delete<B: Backend + ?Sized>(&mut self, backend: &B, id: &str) -> Result<(), ApiError> {
        self.items.retain(|t| t.id != id);
        let outcome = backend.delete_transaction(id);
        self.settle(backend);
        outcome
    }

    pub fn update<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<(), ApiError> {
        if let Some(tx) = self.items.iter_mut().find(|t| t.id == id) {
            update.apply_to(tx);
        }
        let outcome = backend.update_transaction(id, update);
        self.settle(backend);
        outcome
    }

    fn settle<B: Backend + ?Sized>(&mut self, backend: &B) {
        if let Err(e) = self.refresh(backend) {
            tracing::warn!(error = %e, "re-fetch after mutation failed; showing local copy");
        }
    }
}

fn fetch<B: Backend + ?Sized>(backend: &B, scope: &ListScope) -> Result<Vec<Transaction>, ApiError> {
    let mut items = match scope {
        ListScope::Mine(user_id) => backend.user_transactions(user_id)?,
        ListScope::All => backend.all_transactions()?,
        ListScope::Pending => backend.pending_transactions()?,
    };
    crate::models::sort_newest_first(&mut items);
    Ok(items)
}
