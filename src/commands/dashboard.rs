// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{navigate, render, Ctx, Output};
use crate::balance::{channel_totals, is_approved, with_house_currencies, ChannelTotals};
use crate::guard::View;
use crate::models::{Currency, Status, Transaction};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::workflow::{ListScope, TransactionList};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    let view = navigate(ctx, View::Dashboard)?;
    render(ctx, view, Output::from_matches(m))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceCard {
    pub currency: Currency,
    pub entrees: Decimal,
    pub sorties: Decimal,
    pub disponible: Decimal,
}

pub fn balance_cards(totals: BTreeMap<Currency, ChannelTotals>) -> Vec<BalanceCard> {
    totals
        .into_iter()
        .map(|(currency, t)| BalanceCard {
            currency,
            entrees: t.entrees,
            sorties: t.sorties,
            disponible: t.net(),
        })
        .collect()
}

pub fn print_cards(cards: &[BalanceCard]) {
    let rows = cards
        .iter()
        .map(|c| {
            vec![
                c.currency.to_string(),
                fmt_money(&c.entrees, &c.currency),
                fmt_money(&c.sorties, &c.currency),
                fmt_money(&c.disponible, &c.currency),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["CCY", "Entrées", "Sorties", "Montant disponible"], rows)
    );
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub cards: Vec<BalanceCard>,
    pub pending: usize,
    pub recent: Vec<Transaction>,
}

/// Cards only count approved transactions; pending sorties are reported
/// separately until an admin acts on them.
pub fn summarize(transactions: &[Transaction], recent: usize) -> DashboardSummary {
    let cards = balance_cards(with_house_currencies(channel_totals(
        transactions,
        is_approved,
    )));
    let pending = transactions
        .iter()
        .filter(|t| t.status == Status::Pending)
        .count();
    DashboardSummary {
        cards,
        pending,
        recent: transactions.iter().take(recent).cloned().collect(),
    }
}

pub fn show(ctx: &Ctx, out: Output) -> Result<()> {
    let session = ctx.session()?;
    let list = TransactionList::load(&ctx.api, ListScope::Mine(session.user_id.clone()))
        .context("Fetching transactions failed")?;
    let summary = summarize(list.items(), 5);
    if maybe_print_json(out.json, out.jsonl, &summary)? {
        return Ok(());
    }
    println!("{}", session.display_name());
    print_cards(&summary.cards);
    if summary.pending > 0 {
        println!("{} transaction(s) awaiting approval.", summary.pending);
    }
    super::transactions::print_table(&summary.recent);
    Ok(())
}
