// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::Path;

use super::financier::{fetch_users_lenient, owner_name};
use super::Ctx;
use crate::error::ApiError;
use crate::guard::{authorize, Decision, RequiredAccess, View};
use crate::models::{Channel, Transaction, User};
use crate::workflow::{ListScope, TransactionList};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ctx, sub),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub user: String,
    pub date: String,
    pub amount: String,
    pub currency: String,
    pub channel: String,
    pub motif: String,
    pub status: String,
}

pub fn export_rows(txs: &[Transaction], users: &[User], channel: Option<&Channel>) -> Vec<ExportRow> {
    txs.iter()
        .filter(|t| channel.is_none_or(|c| &t.channel == c))
        .map(|t| ExportRow {
            id: t.id.clone(),
            user: owner_name(t, users),
            date: t.date_label(),
            amount: format!("{:.2}", t.amount),
            currency: t.currency.to_string(),
            channel: t.channel.to_string(),
            motif: t.motif.clone(),
            status: t.status.to_string(),
        })
        .collect()
}

/// Write rows as `csv` or `json`. An unknown format is rejected before the
/// output file is created.
pub fn write_rows(rows: &[ExportRow], format: &str, out: &Path) -> Result<()> {
    match format.to_lowercase().as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out.display()))?;
            for row in rows {
                wtr.serialize(row)?;
            }
            if rows.is_empty() {
                wtr.write_record([
                    "id", "user", "date", "amount", "currency", "channel", "motif", "status",
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)
                .with_context(|| format!("Cannot write {}", out.display()))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}

fn export_transactions(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    let format = sub.get_one::<String>("format").unwrap();
    let out = Path::new(sub.get_one::<String>("out").unwrap());
    let channel = sub.get_one::<String>("channel").map(|s| Channel::parse(s));
    let scope = sub
        .get_one::<String>("scope")
        .map(|s| s.as_str())
        .unwrap_or("mine");

    let (list, users) = if scope == "all" {
        match authorize(ctx.session.as_ref(), RequiredAccess::Staff) {
            Decision::Render => {}
            Decision::Redirect(View::Login) => return Err(ApiError::Unauthenticated.into()),
            Decision::Redirect(_) => {
                bail!("Access Denied: exporting every transaction requires an admin or financier role")
            }
        }
        let list = TransactionList::load(&ctx.api, ListScope::All)
            .context("Fetching all transactions failed")?;
        (list, fetch_users_lenient(&ctx.api))
    } else {
        let session = ctx.session()?;
        let list = TransactionList::load(&ctx.api, ListScope::Mine(session.user_id.clone()))
            .context("Fetching transactions failed")?;
        (list, Vec::new())
    };

    let rows = export_rows(list.items(), &users, channel.as_ref());
    write_rows(&rows, format, out)?;
    println!("Exported {} transaction(s) to {}", rows.len(), out.display());
    Ok(())
}
