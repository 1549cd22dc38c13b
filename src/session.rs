// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ApiError;
use crate::models::{LoginResponse, Role};
use std::fmt;

/// An authenticated session: created by a successful login, destroyed by
/// logout or when the backend rejects the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub email: Option<String>,
}

impl Session {
    /// Decode a login response into a session. This is the one place role
    /// strings are normalised.
    pub fn establish(resp: LoginResponse, email: &str) -> Result<Session, ApiError> {
        let missing = || ApiError::Validation("Login data missing required fields.".to_string());
        if !resp.success {
            return Err(missing());
        }
        let user = resp.user.ok_or_else(missing)?;
        let token = resp.token.filter(|t| !t.trim().is_empty()).ok_or_else(missing)?;
        let user_id = user.id.ok_or_else(missing)?;
        let role = user.role.as_deref().map(Role::parse).ok_or_else(missing)?;
        let email = user
            .email
            .filter(|e| !e.is_empty())
            .or_else(|| Some(email.to_string()).filter(|e| !e.is_empty()));
        tracing::info!(user_id = %user_id, role = %role, "session established");
        Ok(Session {
            token,
            user_id,
            role,
            email,
        })
    }

    /// Rebuild a session from stored columns.
    pub fn restore(token: String, user_id: String, role: &str, email: Option<String>) -> Session {
        Session {
            token,
            user_id,
            role: Role::parse(role),
            email,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty() && !self.user_id.is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or("User")
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("email", &self.email)
            .finish()
    }
}
