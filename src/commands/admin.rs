// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use super::financier::{fetch_users_lenient, owner_name, print_ledger};
use super::{confirm, flag, navigate, render, require, Ctx, Output};
use crate::api::{Backend, ReviewAction};
use crate::guard::View;
use crate::models::{Channel, Currency, TransactionUpdate};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::workflow::{validate_update, ListScope, TransactionList};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("tx", sub)) => handle_tx(ctx, sub)?,
        Some(("users", sub)) => super::users::handle(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn handle_tx(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => view_or_redirect(ctx, View::AdminTransactions, sub)?,
        Some(("pending", sub)) => view_or_redirect(ctx, View::AdminRequests, sub)?,
        Some(("show", sub)) => show_one(ctx, sub)?,
        Some(("approve", sub)) => review(ctx, sub, ReviewAction::Approve)?,
        Some(("decline", sub)) => review(ctx, sub, ReviewAction::Decline)?,
        Some(("update", sub)) => update(ctx, sub)?,
        Some(("delete", sub)) => delete(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn view_or_redirect(ctx: &Ctx, view: View, sub: &clap::ArgMatches) -> Result<()> {
    let landed = navigate(ctx, view)?;
    render(ctx, landed, Output::from_matches(sub))
}

pub fn show_all(ctx: &Ctx, out: Output) -> Result<()> {
    let list = TransactionList::load(&ctx.api, ListScope::All)
        .context("Failed to fetch data")?;
    if maybe_print_json(out.json, out.jsonl, &list.items())? {
        return Ok(());
    }
    let users = fetch_users_lenient(&ctx.api);
    print_ledger(list.items(), &users);
    Ok(())
}

pub fn show_pending(ctx: &Ctx, out: Output) -> Result<()> {
    let list = TransactionList::load(&ctx.api, ListScope::Pending)
        .context("Failed to fetch pending requests")?;
    if maybe_print_json(out.json, out.jsonl, &list.items())? {
        return Ok(());
    }
    if list.items().is_empty() {
        println!("No pending requests.");
        return Ok(());
    }
    let users = fetch_users_lenient(&ctx.api);
    print_ledger(list.items(), &users);
    Ok(())
}

fn show_one(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::AdminTransactionEdit)?;
    let id = sub.get_one::<String>("id").unwrap();
    let tx = ctx
        .api
        .transaction(id)
        .with_context(|| format!("Failed to load transaction {}", id))?;
    let out = Output::from_matches(sub);
    if maybe_print_json(out.json, out.jsonl, &tx)? {
        return Ok(());
    }
    let rows = vec![
        vec!["ID".to_string(), tx.id.clone()],
        vec!["User".to_string(), owner_name(&tx, &[])],
        vec!["Date".to_string(), tx.date_label()],
        vec!["Amount".to_string(), format!("{:.2}", tx.amount)],
        vec!["Currency".to_string(), tx.currency.to_string()],
        vec!["Channel".to_string(), tx.channel.to_string()],
        vec!["Motif".to_string(), tx.motif.clone()],
        vec!["Status".to_string(), tx.status.to_string()],
        vec!["File".to_string(), tx.file.clone().unwrap_or_default()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn review(ctx: &Ctx, sub: &clap::ArgMatches, action: ReviewAction) -> Result<()> {
    require(ctx, View::AdminRequests)?;
    let id = sub.get_one::<String>("id").unwrap();
    let mut queue = TransactionList::load(&ctx.api, ListScope::Pending)
        .context("Failed to fetch pending requests")?;
    queue
        .review(&ctx.api, id, action)
        .with_context(|| format!("Failed to {} transaction {}", action.segment(), id))?;
    println!(
        "Transaction {} {}. {} request(s) still pending.",
        id,
        match action {
            ReviewAction::Approve => "approved",
            ReviewAction::Decline => "declined",
        },
        queue.items().len()
    );
    Ok(())
}

/// Fields not given on the command line keep their current values. The
/// merged record is checked like a new submission before it is sent.
pub fn merge_update(
    current: TransactionUpdate,
    sub: &clap::ArgMatches,
) -> Result<TransactionUpdate> {
    let mut next = current;
    if let Some(s) = sub.get_one::<String>("date") {
        next.date = parse_date(s)?;
    }
    if let Some(s) = sub.get_one::<String>("amount") {
        next.amount = parse_decimal(s)?;
    }
    if let Some(s) = sub.get_one::<String>("currency") {
        next.currency = Currency::parse(s);
    }
    if let Some(s) = sub.get_one::<String>("channel") {
        next.channel = Channel::parse(s);
    }
    if let Some(s) = sub.get_one::<String>("motif") {
        next.motif = s.trim().to_string();
    }
    validate_update(&next)?;
    Ok(next)
}

fn update(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::AdminTransactionEdit)?;
    let id = sub.get_one::<String>("id").unwrap();
    let mut list = TransactionList::load(&ctx.api, ListScope::All)
        .context("Failed to fetch data")?;
    let mut current = match list.get(id) {
        Some(tx) => tx.clone(),
        None => ctx
            .api
            .transaction(id)
            .with_context(|| format!("Failed to load transaction {}", id))?,
    };
    if current.date.is_none() {
        if let Some(d) = sub.get_one::<String>("date") {
            current.date = Some(parse_date(d)?);
        }
    }
    let base = TransactionUpdate::from_existing(&current)
        .with_context(|| format!("Transaction {} has no date; pass --date", id))?;
    let next = merge_update(base, sub)?;
    list.update(&ctx.api, id, &next)
        .with_context(|| format!("Error updating transaction {}", id))?;
    println!("Transaction updated successfully!");
    Ok(())
}

fn delete(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::AdminTransactions)?;
    let id = sub.get_one::<String>("id").unwrap();
    if !confirm(&format!("Delete transaction {}?", id), flag(sub, "yes"))? {
        println!("Cancelled.");
        return Ok(());
    }
    let mut list = TransactionList::load(&ctx.api, ListScope::All)
        .context("Failed to fetch data")?;
    list.delete(&ctx.api, id)
        .with_context(|| format!("Error deleting transaction {}", id))?;
    println!(
        "Transaction deleted successfully! {} transaction(s) remain.",
        list.items().len()
    );
    Ok(())
}
