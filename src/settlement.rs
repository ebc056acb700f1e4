use crate::balance::NetBalance;
use crate::money::{format_amount, round_currency, SETTLE_EPSILON};
use crate::schemas::{Payer, PayerId, SlipRecord, Transfer, TransferInstruction};

/// Derive the settling transfers for a balance snapshot.
///
/// Greedy two-cursor walk: debtors sorted by descending balance,
/// creditors by ascending balance, always matching the largest debt
/// against the largest credit and emitting `min` of the two. Cursors
/// advance once a working balance is within `SETTLE_EPSILON` of zero,
/// which absorbs floating-point residue. Equal balances are ordered by
/// payer id, so the plan is stable for a given snapshot.
///
/// This is the classic debt-settlement heuristic, not the theoretical
/// minimum number of transfers (that problem is NP-hard in general).
pub fn compute_transfers(net_balances: &NetBalance) -> Vec<Transfer> {
    let mut debtors: Vec<(PayerId, f64)> = net_balances
        .iter()
        .filter(|(_, balance)| **balance > 0.0)
        .map(|(id, balance)| (*id, *balance))
        .collect();
    let mut creditors: Vec<(PayerId, f64)> = net_balances
        .iter()
        .filter(|(_, balance)| **balance < 0.0)
        .map(|(id, balance)| (*id, *balance))
        .collect();

    debtors.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    creditors.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(-creditors[j].1);

        if amount > 0.0 {
            transfers.push(Transfer {
                from: debtors[i].0,
                to: creditors[j].0,
                amount: round_currency(amount),
            });
            debtors[i].1 -= amount;
            creditors[j].1 += amount;
        }

        if debtors[i].1 <= SETTLE_EPSILON {
            i += 1;
        }
        if creditors[j].1 >= -SETTLE_EPSILON {
            j += 1;
        }
    }
    transfers
}

/// Resolve payer names for display and slip matching. Transfers whose
/// endpoints left the roster are dropped rather than shown with a
/// dangling id.
pub fn resolve_instructions(transfers: &[Transfer], payers: &[Payer]) -> Vec<TransferInstruction> {
    transfers
        .iter()
        .filter_map(|transfer| {
            let from = payers.iter().find(|payer| payer.id == transfer.from)?;
            let to = payers.iter().find(|payer| payer.id == transfer.to)?;
            Some(TransferInstruction {
                from: from.name.clone(),
                to: to.name.clone(),
                amount: transfer.amount,
            })
        })
        .collect()
}

/// True when the candidate triple corresponds to a planned transfer:
/// both names equal and the amount within one cent.
pub fn is_settling_transfer(
    transfers: &[TransferInstruction],
    from: &str,
    to: &str,
    amount: f64,
) -> bool {
    transfers.iter().any(|transfer| {
        transfer.from == from && transfer.to == to && (transfer.amount - amount).abs() < SETTLE_EPSILON
    })
}

/// True when a verified historical slip carries exactly this triple.
/// Unlike the live check this compares amounts exactly after formatting
/// to cents: confirmed records already store rounded values, so a
/// tolerance band would only let near-misses through.
pub fn matches_confirmed_slip(
    history: &[SlipRecord],
    issuer: &str,
    receiver: &str,
    amount: f64,
) -> bool {
    history.iter().any(|slip| {
        slip.verified
            && slip.issuer_name.as_deref() == Some(issuer)
            && slip.receiver_name.as_deref() == Some(receiver)
            && slip.amount.map(format_amount) == Some(format_amount(amount))
    })
}
