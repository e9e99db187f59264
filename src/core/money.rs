//! Decimal helpers shared by the balance calculator and the settlement planner.
//!
//! Rounding rule: every amount leaving the ledger is rounded half away from
//! zero to two decimal places and rescaled so it always carries exactly two
//! fractional digits ("30" becomes "30.00").

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Balances and remainders at or below one cent are treated as settled.
pub const TOLERANCE: Decimal = dec!(0.01);

pub const MONEY_SCALE: u32 = 2;

pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// True when `value` has no more than two significant fractional digits.
pub fn has_cent_precision(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Splits `amount` into one share per weight so that the shares sum exactly to
/// the (rounded) amount.
///
/// Each share is first truncated to whole cents; the cents lost that way are
/// handed out one at a time to the shares with the largest truncated
/// remainder, earlier weights winning ties. A zero total weight yields all-zero
/// shares.
pub fn allocate(amount: Decimal, weights: &[u32]) -> Vec<Decimal> {
    let total_weight: i128 = weights.iter().map(|w| i128::from(*w)).sum();
    if total_weight == 0 {
        return vec![Decimal::ZERO; weights.len()];
    }

    let amount = round_money(amount);
    let negative = amount.is_sign_negative();
    let cents = (amount.abs() * dec!(100)).to_i128().unwrap_or_default();

    let mut shares: Vec<(i128, i128)> = weights
        .iter()
        .map(|w| {
            let exact = cents * i128::from(*w);
            (exact / total_weight, exact % total_weight)
        })
        .collect();

    let assigned: i128 = shares.iter().map(|(base, _)| base).sum();
    let mut leftover = cents - assigned;

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|a, b| shares[*b].1.cmp(&shares[*a].1).then(a.cmp(b)));
    for idx in order {
        if leftover == 0 {
            break;
        }
        shares[idx].0 += 1;
        leftover -= 1;
    }

    shares
        .into_iter()
        .map(|(share_cents, _)| {
            let share = Decimal::from_i128_with_scale(share_cents, MONEY_SCALE);
            if negative { -share } else { share }
        })
        .collect()
}
