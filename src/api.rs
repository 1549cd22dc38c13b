// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{classify_status, server_message, ApiError};
use crate::models::{
    LoginRequest, LoginResponse, NewTransaction, Registration, Status, Transaction,
    TransactionUpdate, User, UserUpdate,
};
use crate::session::Session;
use crate::utils::http_client;
use reqwest::blocking::{multipart::Form, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Admin decision on a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Decline,
}

impl ReviewAction {
    pub fn segment(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Decline => "decline",
        }
    }
}

/// What the backend said when a new transaction was posted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReceipt {
    pub http_status: u16,
    /// Status field from the response body, when it had one.
    pub reported_status: Option<Status>,
    pub transaction: Option<Transaction>,
}

impl SubmitReceipt {
    /// 202: the backend took the request but it still needs approval.
    pub fn is_pending_acceptance(&self) -> bool {
        self.http_status == 202
    }

    pub fn from_body(http_status: u16, body: &str) -> SubmitReceipt {
        let value: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let reported_status = value
            .as_ref()
            .and_then(|v| v.get("status").or_else(|| v.get("Status")))
            .and_then(|s| s.as_str())
            .map(Status::parse);
        let transaction = value
            .filter(|v| v.get("id").is_some() || v.get("Id").is_some())
            .and_then(|v| serde_json::from_value::<Transaction>(v).ok());
        SubmitReceipt {
            http_status,
            reported_status,
            transaction,
        }
    }
}

/// Session-bound operations against the FinSys backend.
pub trait Backend {
    fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError>;
    fn all_transactions(&self) -> Result<Vec<Transaction>, ApiError>;
    fn pending_transactions(&self) -> Result<Vec<Transaction>, ApiError>;
    fn transaction(&self, id: &str) -> Result<Transaction, ApiError>;
    fn create_transaction(&self, tx: &NewTransaction) -> Result<SubmitReceipt, ApiError>;
    fn update_transaction(&self, id: &str, update: &TransactionUpdate) -> Result<(), ApiError>;
    fn delete_transaction(&self, id: &str) -> Result<(), ApiError>;
    fn review_transaction(&self, id: &str, action: ReviewAction) -> Result<(), ApiError>;
    fn users(&self) -> Result<Vec<User>, ApiError>;
    fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), ApiError>;
    fn delete_user(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy)]
enum Access {
    User,
    Admin,
}

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<ApiClient, ApiError> {
        Ok(ApiClient {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_session(mut self, session: Option<&Session>) -> ApiClient {
        self.token = session.map(|s| s.token.clone());
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authed(&self, rb: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => Ok(rb.bearer_auth(token)),
            None => Err(ApiError::Unauthenticated),
        }
    }

    fn send(&self, rb: RequestBuilder, access: Access) -> Result<Response, ApiError> {
        let req = rb.build()?;
        tracing::debug!(method = %req.method(), url = %req.url(), "backend request");
        let resp = self.http.execute(req)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let url = resp.url().to_string();
        let body = resp.text().unwrap_or_default();
        tracing::warn!(status = status.as_u16(), url = %url, "backend refused request");
        Err(classify_status(
            status.as_u16(),
            &body,
            matches!(access, Access::Admin),
        ))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, access: Access) -> Result<T, ApiError> {
        let rb = self.authed(self.http.get(self.url(path)))?;
        let body = self.send(rb, access)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn expect_status(resp: Response, accepted: &[u16]) -> Result<(), ApiError> {
        let status = resp.status().as_u16();
        if accepted.contains(&status) {
            Ok(())
        } else {
            Err(ApiError::Server {
                status,
                message: format!(
                    "unexpected response: {}",
                    server_message(&resp.text().unwrap_or_default())
                ),
            })
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let rb = self
            .http
            .post(self.url("Auth/login"))
            .json(&LoginRequest { email, password });
        let resp = self.http.execute(rb.build()?)?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "login refused");
            let message = if body.trim().is_empty() {
                "Login failed. Check credentials.".to_string()
            } else {
                server_message(&body)
            };
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub fn register(&self, reg: &Registration) -> Result<User, ApiError> {
        let mut form = Form::new()
            .text("name", reg.name.clone())
            .text("surname", reg.surname.clone())
            .text("email", reg.email.clone())
            .text("address", reg.address.clone().unwrap_or_default())
            .text("password", reg.password.clone());
        if let Some(dob) = reg.dob {
            form = form.text("dob", format!("{}T00:00:00.000Z", dob.format("%Y-%m-%d")));
        }
        if let Some(photo) = &reg.photo {
            form = form.file("photo", photo).map_err(|e| {
                ApiError::Validation(format!("cannot attach {}: {}", photo.display(), e))
            })?;
        }
        let rb = self.http.post(self.url("Auth/register")).multipart(form);
        let body = self.send(rb, Access::User)?.text()?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| User {
            email: reg.email.clone(),
            name: reg.name.clone(),
            surname: reg.surname.clone(),
            ..User::default()
        }))
    }
}

impl Backend for ApiClient {
    fn user_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
        self.get_json(&format!("transactions/user/{}", user_id), Access::User)
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("transactions/all", Access::Admin)
    }

    fn pending_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("transactions/pending", Access::Admin)
    }

    fn transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        self.get_json(&format!("transactions/item/{}", id), Access::Admin)
    }

    fn create_transaction(&self, tx: &NewTransaction) -> Result<SubmitReceipt, ApiError> {
        let mut form = Form::new()
            .text("Date", tx.date.format("%Y-%m-%d").to_string())
            .text("Amount", tx.amount.to_string())
            .text("Currency", tx.currency.code().to_string())
            .text("Channel", tx.channel.label().to_string())
            .text("Motif", tx.motif.clone());
        if let Some(path) = &tx.file {
            form = form.file("File", path).map_err(|e| {
                ApiError::Validation(format!("cannot attach {}: {}", path.display(), e))
            })?;
        }
        let rb = self.authed(self.http.post(self.url("transactions")).multipart(form))?;
        let resp = self.send(rb, Access::User)?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(SubmitReceipt::from_body(status, &body))
    }

    fn update_transaction(&self, id: &str, update: &TransactionUpdate) -> Result<(), ApiError> {
        let rb = self.authed(
            self.http
                .patch(self.url(&format!("transactions/item/{}", id)))
                .json(update),
        )?;
        Self::expect_status(self.send(rb, Access::Admin)?, &[200, 204])
    }

    fn delete_transaction(&self, id: &str) -> Result<(), ApiError> {
        let rb = self.authed(
            self.http
                .delete(self.url(&format!("transactions/item/{}", id))),
        )?;
        Self::expect_status(self.send(rb, Access::Admin)?, &[200, 202, 204])
    }

    fn review_transaction(&self, id: &str, action: ReviewAction) -> Result<(), ApiError> {
        let path = format!("transactions/item/{}/{}", id, action.segment());
        let rb = self.authed(self.http.put(self.url(&path)))?;
        self.send(rb, Access::Admin)?;
        Ok(())
    }

    fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("users/all", Access::Admin)
    }

    fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), ApiError> {
        let rb = self.authed(
            self.http
                .patch(self.url(&format!("users/{}", id)))
                .json(update),
        )?;
        Self::expect_status(self.send(rb, Access::Admin)?, &[200, 204])
    }

    fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let rb = self.authed(self.http.delete(self.url(&format!("users/{}", id))))?;
        Self::expect_status(self.send(rb, Access::Admin)?, &[200, 202, 204])
    }
}
