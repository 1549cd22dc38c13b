// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{confirm, flag, navigate, render, require, Ctx, Output};
use crate::guard::View;
use crate::models::{Channel, Currency, Status, Transaction};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::workflow::{submit, ListScope, TransactionDraft, TransactionList};

pub fn handle(ctx: &Ctx, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let view = navigate(ctx, View::Transactions)?;
            let out = Output::from_matches(sub);
            if view == View::Transactions {
                show(ctx, &ListFilter::from_matches(sub), out)?;
            } else {
                render(ctx, view, out)?;
            }
        }
        Some(("add", sub)) => add(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub channel: Option<Channel>,
    pub status: Option<Status>,
    pub limit: Option<usize>,
}

impl ListFilter {
    pub fn from_matches(sub: &clap::ArgMatches) -> ListFilter {
        ListFilter {
            channel: sub.get_one::<String>("channel").map(|s| Channel::parse(s)),
            status: sub.get_one::<String>("status").map(|s| Status::parse(s)),
            limit: sub.get_one::<usize>("limit").copied(),
        }
    }

    pub fn apply(&self, txs: &[Transaction]) -> Vec<Transaction> {
        txs.iter()
            .filter(|t| self.channel.as_ref().is_none_or(|c| &t.channel == c))
            .filter(|t| self.status.as_ref().is_none_or(|s| &t.status == s))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

pub fn print_table(txs: &[Transaction]) {
    let rows = txs
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
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
            &["ID", "Date", "Amount", "CCY", "Channel", "Motif", "Status"],
            rows
        )
    );
}

pub fn show(ctx: &Ctx, filter: &ListFilter, out: Output) -> Result<()> {
    let session = ctx.session()?;
    let list = TransactionList::load(&ctx.api, ListScope::Mine(session.user_id.clone()))
        .context("Fetching transactions failed")?;
    let data = filter.apply(list.items());
    if maybe_print_json(out.json, out.jsonl, &data)? {
        return Ok(());
    }
    if filter.channel.is_some() {
        print_table(&data);
        return Ok(());
    }
    for channel in [Channel::Entrees, Channel::Sorties] {
        let part: Vec<Transaction> = data
            .iter()
            .filter(|t| t.channel == channel)
            .cloned()
            .collect();
        println!("{}", channel);
        if part.is_empty() {
            println!("No {} yet.", channel);
        } else {
            print_table(&part);
        }
    }
    Ok(())
}

/// Turn `tx add` arguments into a draft. Parsing problems are reported here;
/// missing fields are left for `TransactionDraft::validate`.
pub fn draft_from_matches(sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => Some(parse_decimal(s)?),
        None => None,
    };
    Ok(TransactionDraft {
        date: Some(date),
        amount,
        currency: sub.get_one::<String>("currency").map(|s| Currency::parse(s)),
        channel: sub.get_one::<String>("channel").map(|s| Channel::parse(s)),
        motif: sub
            .get_one::<String>("motif")
            .cloned()
            .unwrap_or_default(),
        file: sub.get_one::<String>("file").map(PathBuf::from),
    })
}

fn add(ctx: &Ctx, sub: &clap::ArgMatches) -> Result<()> {
    require(ctx, View::Dashboard)?;
    let draft = draft_from_matches(sub)?;
    let tx = draft.validate()?;
    let prompt = format!(
        "Add {} {:.2} {} on {} for '{}'?",
        tx.channel, tx.amount, tx.currency, tx.date, tx.motif
    );
    if !confirm(&prompt, flag(sub, "yes"))? {
        println!("Cancelled.");
        return Ok(());
    }
    let submission =
        submit(&ctx.api, &draft).context("An error occurred while adding the transaction")?;
    println!("{}", submission.message());
    Ok(())
}
