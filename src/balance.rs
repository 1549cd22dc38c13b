// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Channel, Currency, Status, Transaction, User};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Entrées and sorties for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelTotals {
    pub entrees: Decimal,
    pub sorties: Decimal,
}

impl ChannelTotals {
    /// Montant disponible.
    pub fn net(&self) -> Decimal {
        self.entrees - self.sorties
    }
}

pub fn is_approved(tx: &Transaction) -> bool {
    tx.status == Status::Approved
}

/// Per-currency entrées/sorties over the transactions `keep` accepts.
/// Transactions on any other channel are skipped and do not even open a
/// currency bucket.
pub fn channel_totals<'a, I, P>(transactions: I, mut keep: P) -> BTreeMap<Currency, ChannelTotals>
where
    I: IntoIterator<Item = &'a Transaction>,
    P: FnMut(&Transaction) -> bool,
{
    let mut out: BTreeMap<Currency, ChannelTotals> = BTreeMap::new();
    for tx in transactions {
        if !tx.channel.is_known() || !keep(tx) {
            continue;
        }
        // Sign comes from the channel, never from the stored amount.
        let amount = tx.amount.abs();
        let slot = out.entry(tx.currency.clone()).or_default();
        let total = match tx.channel {
            Channel::Entrees => &mut slot.entrees,
            Channel::Sorties => &mut slot.sorties,
            Channel::Other(_) => continue,
        };
        match total.checked_add(amount) {
            Some(sum) => *total = sum,
            None => tracing::warn!(
                id = %tx.id,
                currency = %tx.currency,
                amount = %amount,
                "amount overflows the running total; transaction skipped"
            ),
        }
    }
    out
}

/// Net balance per currency: entrées added, sorties subtracted.
pub fn net_by_currency<'a, I, P>(transactions: I, keep: P) -> BTreeMap<Currency, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
    P: FnMut(&Transaction) -> bool,
{
    channel_totals(transactions, keep)
        .into_iter()
        .map(|(ccy, t)| (ccy, t.net()))
        .collect()
}

pub fn approved_net_by_currency(transactions: &[Transaction]) -> BTreeMap<Currency, Decimal> {
    net_by_currency(transactions, is_approved)
}

/// Make sure the house currencies always show up on a card, even at zero.
pub fn with_house_currencies(
    mut totals: BTreeMap<Currency, ChannelTotals>,
) -> BTreeMap<Currency, ChannelTotals> {
    for ccy in [Currency::Usd, Currency::Fc] {
        totals.entry(ccy).or_default();
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub user_id: String,
    pub name: String,
    pub approved_count: usize,
}

/// Users ranked by number of approved transactions, most active first.
pub fn rank_contributors(transactions: &[Transaction], users: &[User]) -> Vec<Contributor> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tx in transactions.iter().filter(|t| is_approved(t)) {
        if let Some(uid) = tx.user_id.as_deref() {
            *counts.entry(uid).or_default() += 1;
        }
    }
    let mut ranked: Vec<Contributor> = counts
        .into_iter()
        .map(|(uid, approved_count)| {
            let name = users
                .iter()
                .find(|u| u.id == uid)
                .map(|u| u.full_name())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| uid.to_string());
            Contributor {
                user_id: uid.to_string(),
                name,
                approved_count,
            }
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.approved_count
            .cmp(&a.approved_count)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranked
}
