// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the backend client and the submission workflow.
///
/// None of these are fatal: the caller reports them and the user re-runs the
/// command to retry.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not logged in or session expired; run `finsys auth login`")]
    Unauthenticated,

    #[error("Access Denied (HTTP {status})")]
    Forbidden { status: u16 },

    #[error("{0}")]
    Validation(String),

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot {action} a transaction that is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl ApiError {
    /// Missing or expired credentials; the session should be torn down.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }
}

/// Pull a human readable message out of an error response body.
///
/// The backend is not consistent: sometimes `message`, sometimes `Message`,
/// sometimes `details`, sometimes a bare string.
pub fn server_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "Message", "details", "title", "error"] {
            if let Some(s) = v.get(key).and_then(|m| m.as_str()) {
                return s.to_string();
            }
        }
        if let Some(s) = v.as_str() {
            return s.to_string();
        }
    }
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// A 401 on an admin-only endpoint means the caller is logged in but lacks the
/// role, so it reads as Access Denied rather than an expired session.
pub fn classify_status(status: u16, body: &str, admin_only: bool) -> ApiError {
    match status {
        401 if !admin_only => ApiError::Unauthenticated,
        401 | 403 => ApiError::Forbidden { status },
        _ => ApiError::Server {
            status,
            message: server_message(body),
        },
    }
}
