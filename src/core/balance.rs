//! Balance calculation.
//!
//! Positive balance = participant is owed money; negative = participant owes.
//! Balances are a pure function of the transaction log and are never stored.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::core::models::{Participant, ParticipantId, Transaction};
use crate::core::money::{allocate, round_money};

/// Per-participant effect of a single transaction, payer first, then one
/// entry per split in split order.
///
/// For EXPENSE and TRANSFER the payer is credited with the amount and every
/// beneficiary debited with its share; INCOME is the mirror image. The entries
/// sum to zero whenever the total split weight is positive.
pub fn transaction_deltas(tx: &Transaction) -> Vec<(ParticipantId, Decimal)> {
    let sign = if tx.kind.credits_payer() { Decimal::ONE } else { Decimal::NEGATIVE_ONE };
    let amount = round_money(tx.amount);

    let mut deltas = Vec::with_capacity(tx.splits.len() + 1);
    deltas.push((tx.payer_id, sign * amount));

    let weights: Vec<u32> = tx.splits.iter().map(|s| s.weight).collect();
    if tx.total_weight() > 0 {
        for (split, share) in tx.splits.iter().zip(allocate(amount, &weights)) {
            deltas.push((split.participant_id, -sign * share));
        }
    }
    deltas
}

/// Computes the balance of every participant from `transactions`.
///
/// The caller is responsible for scoping: pass only the active, unsettled
/// transactions of one scope. Payers and split participants outside
/// `participants` are skipped; their share is dropped rather than spread over
/// the others.
pub fn calculate_balances(transactions: &[&Transaction], participants: &[Participant]) -> BTreeMap<ParticipantId, Decimal> {
    let known: HashSet<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut balances: BTreeMap<ParticipantId, Decimal> = participants.iter().map(|p| (p.id, Decimal::ZERO)).collect();

    for tx in transactions {
        for (participant_id, delta) in transaction_deltas(tx) {
            if !known.contains(&participant_id) {
                debug!("Skipping share of unknown participant {} in transaction {}", participant_id, tx.id);
                continue;
            }
            if let Some(balance) = balances.get_mut(&participant_id) {
                *balance += delta;
            }
        }
    }

    balances.into_iter().map(|(id, balance)| (id, round_money(balance))).collect()
}

/// Whether anyone still owes or is owed at least one cent. Uses the same
/// threshold as the settlement planner.
pub fn has_outstanding_balances(balances: &BTreeMap<ParticipantId, Decimal>) -> bool {
    balances.values().any(|b| !round_money(*b).is_zero())
}
