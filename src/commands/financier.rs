// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use serde::Serialize;

use super::dashboard::{balance_cards, print_cards, BalanceCard};
use super::{navigate, render, Ctx, Output};
use crate::api::Backend;
use crate::balance::{channel_totals, is_approved, rank_contributors, with_house_currencies, Contributor};
use crate::guard::View;
use crate::models::{Transaction, User};
use crate::utils::{maybe_print_json, pretty_table};
use crate::workflow::{ListScope, TransactionList};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let top = m.get_one::<usize>("top").copied().unwrap_or(3);
    let out = Output::from_matches(m);
    match navigate(ctx, View::FinancierTransactions)? {
        View::FinancierTransactions => show(ctx, top, out),
        other => render(ctx, other, out),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancierReport {
    pub cards: Vec<BalanceCard>,
    pub contributors: Vec<Contributor>,
    pub transactions: Vec<Transaction>,
}

pub fn build_report(transactions: Vec<Transaction>, users: &[User], top: usize) -> FinancierReport {
    let cards = balance_cards(with_house_currencies(channel_totals(
        &transactions,
        is_approved,
    )));
    let mut contributors = rank_contributors(&transactions, users);
    contributors.truncate(top);
    FinancierReport {
        cards,
        contributors,
        transactions,
    }
}

/// User names are decoration: if the user list cannot be fetched the report
/// falls back to ids.
pub fn fetch_users_lenient(backend: &dyn Backend) -> Vec<User> {
    match backend.users() {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch users; showing ids");
            Vec::new()
        }
    }
}

pub fn owner_name(tx: &Transaction, users: &[User]) -> String {
    tx.user_id
        .as_deref()
        .and_then(|uid| users.iter().find(|u| u.id == uid))
        .map(|u| u.full_name())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| tx.owner_label())
}

pub fn print_ledger(txs: &[Transaction], users: &[User]) {
    let rows = txs
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                owner_name(t, users),
                t.date_label(),
                format!("{:.2}", t.amount),
                t.currency.to_string(),
                t.channel.to_string(),
                t.motif.clone(),
                t.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "User", "Date", "Amount", "CCY", "Channel", "Motif", "Status"],
            rows
        )
    );
}

pub fn show(ctx: &Ctx, top: usize, out: Output) -> Result<()> {
    let list = TransactionList::load(&ctx.api, ListScope::All)
        .context("Fetching all transactions failed")?;
    let users = fetch_users_lenient(&ctx.api);
    let report = build_report(list.into_items(), &users, top);
    if maybe_print_json(out.json, out.jsonl, &report)? {
        return Ok(());
    }
    println!("Montant disponible (approved only)");
    print_cards(&report.cards);
    if !report.contributors.is_empty() {
        let rows = report
            .contributors
            .iter()
            .enumerate()
            .map(|(i, c)| vec![(i + 1).to_string(), c.name.clone(), c.approved_count.to_string()])
            .collect();
        println!("{}", pretty_table(&["#", "User", "Approved"], rows));
    }
    print_ledger(&report.transactions, &users);
    Ok(())
}
