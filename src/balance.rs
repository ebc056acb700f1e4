use std::collections::HashMap;

use crate::money::round_currency;
use crate::schemas::{Item, Payer, PayerId};

/// Signed net amount per payer. Positive means the payer still owes
/// money into the settlement, negative means they are owed.
pub type NetBalance = HashMap<PayerId, f64>;

/// Reduce the item list to one net balance per payer: each selected
/// participant picks up an equal share of the price, and the payer who
/// fronted the money gets the full price subtracted. Balances are
/// rounded to cents once, here.
///
/// An item with no selected participants credits nobody but still
/// debits whoever fronted it. References to payers outside `payers`
/// (stale membership keys, dangling `paid_by`) are silently skipped.
pub fn compute_net_balances(payers: &[Payer], items: &[Item]) -> NetBalance {
    let mut net: NetBalance = payers.iter().map(|payer| (payer.id, 0.0)).collect();

    for item in items {
        let participants: Vec<PayerId> = item
            .split_with
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| *id)
            .collect();

        if !participants.is_empty() {
            let share = item.price / participants.len() as f64;
            for id in participants {
                if let Some(balance) = net.get_mut(&id) {
                    *balance += share;
                }
            }
        }

        if let Some(payer) = item.paid_by {
            if let Some(balance) = net.get_mut(&payer) {
                *balance -= item.price;
            }
        }
    }

    for balance in net.values_mut() {
        *balance = round_currency(*balance);
    }
    net
}

/// Single-payer view of the same per-item rule: the sum of this payer's
/// shares minus the prices they fronted. Agrees with the payer's entry
/// in `compute_net_balances` for the same items.
pub fn amount_owed_by(payer: PayerId, items: &[Item]) -> f64 {
    let mut total = 0.0;
    for item in items {
        if item.split_with.get(&payer).copied().unwrap_or(false) {
            let share_count = item.split_with.values().filter(|selected| **selected).count();
            if share_count > 0 {
                total += item.price / share_count as f64;
            }
        }
        if item.paid_by == Some(payer) {
            total -= item.price;
        }
    }
    round_currency(total)
}
