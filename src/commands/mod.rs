// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod admin;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod exporter;
pub mod financier;
pub mod transactions;
pub mod users;

use anyhow::{bail, Result};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::guard::{self, View};
use crate::session::Session;

/// Everything a command needs: the local store, the current session and a
/// client bound to it.
pub struct Ctx<'a> {
    pub conn: &'a Connection,
    pub session: Option<Session>,
    pub api: ApiClient,
}

impl Ctx<'_> {
    pub fn session(&self) -> Result<&Session> {
        match self.session.as_ref() {
            Some(s) => Ok(s),
            None => Err(ApiError::Unauthenticated.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub jsonl: bool,
}

impl Output {
    pub fn from_matches(m: &clap::ArgMatches) -> Output {
        Output {
            json: flag(m, "json"),
            jsonl: flag(m, "jsonl"),
        }
    }
}

/// `get_flag` panics on ids a subcommand does not define; this does not.
pub fn flag(m: &clap::ArgMatches, id: &str) -> bool {
    m.try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// Run the guard for `requested` and return the view that actually renders.
/// Landing back on the login view is an authentication failure.
pub fn navigate(ctx: &Ctx, requested: View) -> Result<View> {
    let res = guard::resolve(ctx.session.as_ref(), requested);
    if res.view == View::Login && requested != View::Login {
        return Err(ApiError::Unauthenticated.into());
    }
    if res.was_redirected() {
        eprintln!("Redirected: {} -> {}", requested, res.view);
    }
    Ok(res.view)
}

/// Like [`navigate`], for commands that change data: a redirect means the
/// action is refused rather than replaced by another view.
pub fn require(ctx: &Ctx, view: View) -> Result<()> {
    let landed = navigate(ctx, view)?;
    if landed != view {
        bail!("Access Denied: {} is not available for your role", view);
    }
    Ok(())
}

pub fn render(ctx: &Ctx, view: View, out: Output) -> Result<()> {
    match view {
        View::Dashboard => dashboard::show(ctx, out),
        View::Transactions => transactions::show(ctx, &transactions::ListFilter::default(), out),
        View::FinancierTransactions => financier::show(ctx, 3, out),
        View::AdminTransactions | View::AdminTransactionEdit => admin::show_all(ctx, out),
        View::AdminRequests => admin::show_pending(ctx, out),
        View::AdminUsers => users::show(ctx, out),
        View::Login | View::SignUp => {
            println!("Run `finsys auth login` or `finsys auth register`.");
            Ok(())
        }
    }
}

/// Drop the stored session when `err` shows the backend no longer accepts
/// it. Returns whether a session was actually removed.
pub fn clear_session_on_auth_failure(conn: &Connection, err: &anyhow::Error) -> Result<bool> {
    let auth_failed = err
        .chain()
        .any(|e| e.downcast_ref::<ApiError>().is_some_and(ApiError::is_auth_failure));
    if !auth_failed {
        return Ok(false);
    }
    crate::db::clear_session(conn)
}

pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
