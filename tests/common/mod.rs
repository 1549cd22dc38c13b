// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use finsys::api::{Backend, ReviewAction, SubmitReceipt};
use finsys::error::ApiError;
use finsys::models::{
    Channel, Currency, NewTransaction, Status, Transaction, TransactionUpdate, User, UserUpdate,
};
use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn tx(id: &str, amount: &str, ccy: &str, channel: &str, status: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
        amount: dec(amount),
        currency: Currency::parse(ccy),
        channel: Channel::parse(channel),
        motif: format!("motif {}", id),
        status: Status::parse(status),
        user_id: Some("u1".to_string()),
        file: None,
        user: None,
    }
}

/// In-memory stand-in for the REST backend.
pub struct FakeBackend {
    pub store: RefCell<Vec<Transaction>>,
    pub users: Vec<User>,
    pub calls: RefCell<Vec<String>>,
    /// HTTP status answered to `POST /transactions` for sorties.
    pub sorties_status: u16,
    pub fail_create: Cell<bool>,
    pub fail_mutations: Cell<bool>,
    pub fail_fetch: Cell<bool>,
    next_id: Cell<u32>,
}

impl FakeBackend {
    pub fn new(store: Vec<Transaction>) -> Self {
        FakeBackend {
            store: RefCell::new(store),
            users: Vec::new(),
            calls: RefCell::new(Vec::new()),
            sorties_status: 202,
            fail_create: Cell::new(false),
            fail_mutations: Cell::new(false),
            fail_fetch: Cell::new(false),
            next_id: Cell::new(100),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    pub fn calls_named(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn fetch(&self, keep: impl Fn(&Transaction) -> bool) -> Result<Vec<Transaction>, ApiError> {
        if self.fail_fetch.get() {
            return Err(ApiError::Server {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.store.borrow().iter().filter(|t| keep(t)).cloned().collect())
    }

    fn mutation_guard(&self) -> Result<(), ApiError> {
        if self.fail_mutations.get() {
            return Err(ApiError::Server {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
        self.record(format!("fetch:user:{}", user_id));
        self.fetch(|t| t.user_id.as_deref() == Some(user_id))
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.record("fetch:all");
        self.fetch(|_| true)
    }

    fn pending_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.record("fetch:pending");
        self.fetch(|t| t.status == Status::Pending)
    }

    fn transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        self.record(format!("fetch:item:{}", id));
        self.store
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 404,
                message: "not found".to_string(),
            })
    }

    fn create_transaction(&self, new: &NewTransaction) -> Result<SubmitReceipt, ApiError> {
        self.record("create");
        if self.fail_create.get() {
            return Err(ApiError::Server {
                status: 500,
                message: "database offline".to_string(),
            });
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let (http_status, status) = match new.channel {
            Channel::Sorties if self.sorties_status == 202 => (202, Status::Pending),
            _ => (201, Status::Approved),
        };
        self.store.borrow_mut().push(Transaction {
            id: id.to_string(),
            date: Some(new.date),
            amount: new.amount,
            currency: new.currency.clone(),
            channel: new.channel.clone(),
            motif: new.motif.clone(),
            status,
            user_id: Some("u1".to_string()),
            file: None,
            user: None,
        });
        Ok(SubmitReceipt {
            http_status,
            reported_status: None,
            transaction: None,
        })
    }

    fn update_transaction(&self, id: &str, update: &TransactionUpdate) -> Result<(), ApiError> {
        self.record(format!("update:{}", id));
        self.mutation_guard()?;
        if let Some(t) = self.store.borrow_mut().iter_mut().find(|t| t.id == id) {
            update.apply_to(t);
        }
        Ok(())
    }

    fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete:{}", id));
        self.mutation_guard()?;
        self.store.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }

    fn review_transaction(&self, id: &str, action: ReviewAction) -> Result<(), ApiError> {
        self.record(format!("review:{}:{}", id, action.segment()));
        self.mutation_guard()?;
        if let Some(t) = self.store.borrow_mut().iter_mut().find(|t| t.id == id) {
            t.status = match action {
                ReviewAction::Approve => Status::Approved,
                ReviewAction::Decline => Status::Declined,
            };
        }
        Ok(())
    }

    fn users(&self) -> Result<Vec<User>, ApiError> {
        self.record("fetch:users");
        Ok(self.users.clone())
    }

    fn update_user(&self, id: &str, _update: &UserUpdate) -> Result<(), ApiError> {
        self.record(format!("update-user:{}", id));
        self.mutation_guard()
    }

    fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete-user:{}", id));
        self.mutation_guard()
    }
}
