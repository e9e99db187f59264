//! Debt simplification.
//!
//! Greedy two-pointer matching of the largest debtor with the largest
//! creditor. Not globally optimal, but it needs at most `n - 1` transfers and
//! is fully deterministic: equal magnitudes are ordered by ascending
//! participant id.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, error};

use crate::core::errors::LedgerError;
use crate::core::models::{ParticipantId, Transfer};
use crate::core::money::{TOLERANCE, round_money};

fn by_magnitude(a: &(ParticipantId, Decimal), b: &(ParticipantId, Decimal)) -> std::cmp::Ordering {
    b.1.cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Produces the transfers that bring every balance in `balances` to zero.
///
/// Fails with [`LedgerError::Consistency`] when the balances do not sum to
/// zero, i.e. one side still holds more than a cent after the other side is
/// exhausted.
pub fn plan_settlement(balances: &BTreeMap<ParticipantId, Decimal>) -> Result<Vec<Transfer>, LedgerError> {
    // Balances are cent-exact, so a single cent is a real debt and takes part.
    let rounded: Vec<(ParticipantId, Decimal)> = balances
        .iter()
        .map(|(id, balance)| (*id, round_money(*balance)))
        .filter(|(_, balance)| !balance.is_zero())
        .collect();
    let mut debtors: Vec<(ParticipantId, Decimal)> = rounded
        .iter()
        .filter(|(_, balance)| balance.is_sign_negative())
        .map(|(id, balance)| (*id, balance.abs()))
        .collect();
    let mut creditors: Vec<(ParticipantId, Decimal)> = rounded
        .iter()
        .filter(|(_, balance)| balance.is_sign_positive())
        .copied()
        .collect();

    debtors.sort_by(by_magnitude);
    creditors.sort_by(by_magnitude);

    let mut transfers = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let amount = round_money(debtors[d].1.min(creditors[c].1));
        transfers.push(Transfer {
            from_id: debtors[d].0,
            to_id: creditors[c].0,
            amount,
        });

        debtors[d].1 -= amount;
        creditors[c].1 -= amount;

        if debtors[d].1 < TOLERANCE {
            d += 1;
        }
        if creditors[c].1 < TOLERANCE {
            c += 1;
        }
    }

    let residual = debtors[d..]
        .iter()
        .chain(creditors[c..].iter())
        .find(|(_, remainder)| *remainder > TOLERANCE);
    if let Some((participant_id, remainder)) = residual {
        error!(
            "Settlement plan left {} unmatched for participant {}; balances do not sum to zero",
            remainder, participant_id
        );
        return Err(LedgerError::Consistency(format!(
            "participant {} keeps an unmatched remainder of {}",
            participant_id,
            round_money(*remainder)
        )));
    }

    debug!("Planned {} transfers for {} balances", transfers.len(), balances.len());
    Ok(transfers)
}
