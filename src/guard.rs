// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Role-based routing: which view may render for which session, and where a
//! refused navigation lands instead.

use crate::models::Role;
use crate::session::Session;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    SignUp,
    Dashboard,
    Transactions,
    FinancierTransactions,
    AdminTransactions,
    AdminRequests,
    AdminUsers,
    AdminTransactionEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredAccess {
    AnyAuthenticated,
    AdminOnly,
    FinancierGroup,
    /// Admin or financier group: reporting over every user's transactions.
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    Redirect(View),
}

impl View {
    /// `None` for public views.
    pub fn required_access(&self) -> Option<RequiredAccess> {
        match self {
            View::Login | View::SignUp => None,
            View::Dashboard | View::Transactions => Some(RequiredAccess::AnyAuthenticated),
            View::FinancierTransactions => Some(RequiredAccess::FinancierGroup),
            View::AdminTransactions
            | View::AdminRequests
            | View::AdminUsers
            | View::AdminTransactionEdit => Some(RequiredAccess::AdminOnly),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/",
            View::SignUp => "/signup",
            View::Dashboard => "/dashboard",
            View::Transactions => "/transactions",
            View::FinancierTransactions => "/financier/transactions",
            View::AdminTransactions => "/admin/transactions",
            View::AdminRequests => "/admin/requests",
            View::AdminUsers => "/admin/users",
            View::AdminTransactionEdit => "/admin/transactions/edit",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub fn authorize(session: Option<&Session>, required: RequiredAccess) -> Decision {
    let Some(session) = session.filter(|s| s.is_valid()) else {
        return Decision::Redirect(View::Login);
    };
    let role = session.role;
    match required {
        RequiredAccess::AdminOnly if !role.is_admin() => Decision::Redirect(View::Dashboard),
        RequiredAccess::FinancierGroup if !role.is_financier_group() => {
            Decision::Redirect(View::Dashboard)
        }
        RequiredAccess::Staff if !(role.is_admin() || role.is_financier_group()) => {
            Decision::Redirect(View::Dashboard)
        }
        RequiredAccess::AnyAuthenticated if role.is_financier_group() => {
            Decision::Redirect(View::FinancierTransactions)
        }
        _ => Decision::Render,
    }
}

pub fn check(session: Option<&Session>, view: View) -> Decision {
    match view.required_access() {
        None => Decision::Render,
        Some(required) => authorize(session, required),
    }
}

/// Where a session lands right after logging in.
pub fn landing_view(role: Role) -> View {
    if role.is_financier_group() {
        View::FinancierTransactions
    } else if role.is_admin() {
        View::AdminTransactions
    } else {
        View::Dashboard
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub requested: View,
    pub view: View,
    /// Every view the navigation bounced through, in order, excluding the
    /// final one.
    pub redirects: Vec<View>,
}

impl Resolution {
    pub fn was_redirected(&self) -> bool {
        self.view != self.requested
    }
}

const MAX_REDIRECTS: usize = 4;

/// Follow redirects until a view renders. A chain that does not settle ends
/// at the login view.
pub fn resolve(session: Option<&Session>, requested: View) -> Resolution {
    let mut view = requested;
    let mut redirects = Vec::new();
    for _ in 0..MAX_REDIRECTS {
        match check(session, view) {
            Decision::Render => {
                return Resolution {
                    requested,
                    view,
                    redirects,
                };
            }
            Decision::Redirect(next) => {
                tracing::debug!(from = %view, to = %next, "guard redirect");
                redirects.push(view);
                view = next;
            }
        }
    }
    tracing::warn!(requested = %requested, "redirect chain did not settle");
    Resolution {
        requested,
        view: View::Login,
        redirects,
    }
}
