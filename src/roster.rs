//! Snapshot editing. Every operation takes the current state by value
//! and returns the next snapshot; callers that keep the old value keep
//! a usable, unchanged bill.

use std::collections::HashSet;

use crate::schemas::{BillState, Item, Payer, PayerId};

/// Add a payer. Every existing item gains an unselected membership
/// entry for them.
pub fn with_payer(mut state: BillState, payer: Payer) -> BillState {
    for item in &mut state.items {
        item.split_with.entry(payer.id).or_insert(false);
    }
    state.payers.push(payer);
    state
}

/// Remove a payer. The cascade: their membership entries disappear and
/// items they fronted become unassigned.
pub fn without_payer(mut state: BillState, id: PayerId) -> BillState {
    state.payers.retain(|payer| payer.id != id);
    for item in &mut state.items {
        item.split_with.remove(&id);
        if item.paid_by == Some(id) {
            item.paid_by = None;
        }
    }
    state
}

/// Rename a payer. Items join on the id, so nothing else changes.
pub fn renamed_payer(mut state: BillState, id: PayerId, name: String) -> BillState {
    if let Some(payer) = state.payers.iter_mut().find(|payer| payer.id == id) {
        payer.name = name;
    }
    state
}

/// Append a fresh item: no payer assigned yet and every current payer
/// unselected. Such an item contributes nothing to balances until it is
/// filled in.
pub fn with_item(mut state: BillState, name: String, price: f64) -> BillState {
    let split_with = state.payers.iter().map(|payer| (payer.id, false)).collect();
    state.items.push(Item {
        name,
        price,
        paid_by: None,
        split_with,
    });
    state
}

/// Drop the item at `index`; out-of-range indexes are ignored.
pub fn without_item(mut state: BillState, index: usize) -> BillState {
    if index < state.items.len() {
        state.items.remove(index);
    }
    state
}

/// Reconcile client-supplied snapshots with their own roster: stale
/// membership keys and dangling `paid_by` references are dropped,
/// missing payers default to unselected.
pub fn normalized(mut state: BillState) -> BillState {
    let ids: HashSet<PayerId> = state.payers.iter().map(|payer| payer.id).collect();
    for item in &mut state.items {
        item.split_with.retain(|id, _| ids.contains(id));
        for id in &ids {
            item.split_with.entry(*id).or_insert(false);
        }
        if let Some(payer) = item.paid_by {
            if !ids.contains(&payer) {
                item.paid_by = None;
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, payer};

    fn dinner_for_two() -> (Payer, Payer, BillState) {
        let alice = payer("Alice");
        let bob = payer("Bob");
        let state = BillState {
            payers: vec![alice.clone(), bob.clone()],
            items: vec![item(
                "dinner",
                100.0,
                Some(alice.id),
                &[(alice.id, true), (bob.id, true)],
            )],
        };
        (alice, bob, state)
    }

    #[test]
    fn new_payers_join_every_item_unselected() {
        let (_, _, state) = dinner_for_two();
        let carol = payer("Carol");

        let state = with_payer(state, carol.clone());
        assert_eq!(state.payers.len(), 3);
        assert_eq!(state.items[0].split_with[&carol.id], false);
    }

    #[test]
    fn removing_a_payer_cascades_to_memberships_and_paid_by() {
        let (alice, bob, state) = dinner_for_two();

        let state = without_payer(state, alice.id);
        assert_eq!(state.payers, vec![bob.clone()]);
        assert_eq!(state.items[0].paid_by, None);
        assert!(!state.items[0].split_with.contains_key(&alice.id));
        assert!(state.items[0].split_with.contains_key(&bob.id));
    }

    #[test]
    fn removing_an_unknown_payer_changes_nothing() {
        let (_, _, state) = dinner_for_two();
        let before = state.clone();

        assert_eq!(without_payer(state, payer("Ghost").id), before);
    }

    #[test]
    fn renaming_touches_only_the_display_name() {
        let (alice, _, state) = dinner_for_two();

        let state = renamed_payer(state, alice.id, "Alicia".to_string());
        assert_eq!(state.payers[0].name, "Alicia");
        assert_eq!(state.items[0].paid_by, Some(alice.id));
        assert!(state.items[0].split_with[&alice.id]);
    }

    #[test]
    fn fresh_items_start_unassigned_and_unselected() {
        let (_, _, state) = dinner_for_two();

        let state = with_item(state, "dessert".to_string(), 24.0);
        let dessert = &state.items[1];
        assert_eq!(dessert.paid_by, None);
        assert_eq!(dessert.split_with.len(), 2);
        assert!(dessert.split_with.values().all(|selected| !selected));
    }

    #[test]
    fn out_of_range_item_removal_is_ignored() {
        let (_, _, state) = dinner_for_two();

        let state = without_item(state, 5);
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn normalization_repairs_membership_drift() {
        let (alice, bob, mut state) = dinner_for_two();
        let ghost = payer("Ghost");
        state.items[0].split_with.insert(ghost.id, true);
        state.items[0].split_with.remove(&bob.id);
        state.items[0].paid_by = Some(ghost.id);

        let state = normalized(state);
        let item = &state.items[0];
        assert!(!item.split_with.contains_key(&ghost.id));
        assert_eq!(item.split_with[&bob.id], false);
        assert!(item.split_with[&alice.id]);
        assert_eq!(item.paid_by, None);
    }
}
