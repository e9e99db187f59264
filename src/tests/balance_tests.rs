use super::*;
use crate::core::balance::{calculate_balances, has_outstanding_balances, transaction_deltas};
use crate::core::models::{Split, TransactionType, TrashState};
use crate::core::money::allocate;
use crate::core::scope::{Scope, select_settleable};
use rust_decimal_macros::dec;

#[test]
fn test_even_expense_split() {
    let participants = sample_participants(&[1, 2, 3]);
    let tx = sample_transaction(
        1,
        TransactionType::Expense,
        dec!(90.00),
        ParticipantId(1),
        vec![Split::new(ParticipantId(1), 1), Split::new(ParticipantId(2), 1), Split::new(ParticipantId(3), 1)],
    );

    let balances = calculate_balances(&[&tx], &participants);

    assert_eq!(balances[&ParticipantId(1)], dec!(60.00));
    assert_eq!(balances[&ParticipantId(2)], dec!(-30.00));
    assert_eq!(balances[&ParticipantId(3)], dec!(-30.00));
    assert_eq!(balances[&ParticipantId(1)].to_string(), "60.00");
}

#[test]
fn test_income_reverses_signs() {
    let participants = sample_participants(&[1, 2]);
    let tx = sample_transaction(
        1,
        TransactionType::Income,
        dec!(50.00),
        ParticipantId(1),
        vec![Split::new(ParticipantId(1), 1), Split::new(ParticipantId(2), 1)],
    );

    let balances = calculate_balances(&[&tx], &participants);

    assert_eq!(balances[&ParticipantId(1)], dec!(-25.00));
    assert_eq!(balances[&ParticipantId(2)], dec!(25.00));
}

#[test]
fn test_transfer_moves_debt() {
    let participants = sample_participants(&[1, 2]);
    let tx = sample_transaction(
        1,
        TransactionType::Transfer,
        dec!(30.00),
        ParticipantId(2),
        vec![Split::new(ParticipantId(1), 1)],
    );

    let balances = calculate_balances(&[&tx], &participants);

    assert_eq!(balances[&ParticipantId(2)], dec!(30.00));
    assert_eq!(balances[&ParticipantId(1)], dec!(-30.00));
}

#[test]
fn test_weighted_split_keeps_cents_exact() {
    let participants = sample_participants(&[1, 2, 3]);
    let tx = sample_transaction(
        1,
        TransactionType::Expense,
        dec!(100.00),
        ParticipantId(1),
        vec![Split::new(ParticipantId(1), 1), Split::new(ParticipantId(2), 1), Split::new(ParticipantId(3), 1)],
    );

    let balances = calculate_balances(&[&tx], &participants);
    let total: Decimal = balances.values().copied().sum();

    assert_eq!(total, Decimal::ZERO);
    assert_eq!(balances[&ParticipantId(1)], dec!(66.66));
    assert_eq!(balances[&ParticipantId(2)], dec!(-33.33));
    assert_eq!(balances[&ParticipantId(3)], dec!(-33.33));
}

#[test]
fn test_allocate_gives_leftover_cents_to_largest_remainder() {
    assert_eq!(allocate(dec!(10.00), &[1, 1, 1]), vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
    assert_eq!(allocate(dec!(0.05), &[1, 2]), vec![dec!(0.02), dec!(0.03)]);
    assert_eq!(allocate(dec!(7.00), &[0, 0]), vec![Decimal::ZERO, Decimal::ZERO]);
}

#[test]
fn test_unknown_participant_is_skipped() {
    let participants = sample_participants(&[1, 2]);
    let tx = sample_transaction(
        1,
        TransactionType::Expense,
        dec!(90.00),
        ParticipantId(1),
        vec![Split::new(ParticipantId(1), 1), Split::new(ParticipantId(2), 1), Split::new(ParticipantId(9), 1)],
    );

    let balances = calculate_balances(&[&tx], &participants);

    assert_eq!(balances.len(), 2);
    assert!(!balances.contains_key(&ParticipantId(9)));
    assert_eq!(balances[&ParticipantId(1)], dec!(60.00));
    assert_eq!(balances[&ParticipantId(2)], dec!(-30.00));
}

#[test]
fn test_participants_without_transactions_are_zero() {
    let participants = sample_participants(&[1, 2, 3]);
    let balances = calculate_balances(&[], &participants);

    assert_eq!(balances.len(), 3);
    assert!(balances.values().all(|b| b.is_zero()));
    assert!(!has_outstanding_balances(&balances));
}

#[test]
fn test_one_cent_counts_as_outstanding() {
    let balances = std::collections::BTreeMap::from([(ParticipantId(1), dec!(0.01)), (ParticipantId(2), dec!(-0.01))]);
    assert!(has_outstanding_balances(&balances));

    let dust = std::collections::BTreeMap::from([(ParticipantId(1), dec!(0.004)), (ParticipantId(2), dec!(-0.004))]);
    assert!(!has_outstanding_balances(&dust));
}

#[test]
fn test_deltas_list_payer_first() {
    let tx = sample_transaction(
        1,
        TransactionType::Expense,
        dec!(20.00),
        ParticipantId(3),
        vec![Split::new(ParticipantId(1), 1), Split::new(ParticipantId(2), 3)],
    );

    let deltas = transaction_deltas(&tx);

    assert_eq!(
        deltas,
        vec![
            (ParticipantId(3), dec!(20.00)),
            (ParticipantId(1), dec!(-5.00)),
            (ParticipantId(2), dec!(-15.00)),
        ]
    );
}

#[test]
fn test_select_settleable_applies_scope_and_state() {
    let base = |id| {
        sample_transaction(
            id,
            TransactionType::Expense,
            dec!(10.00),
            ParticipantId(1),
            vec![Split::new(ParticipantId(2), 1)],
        )
    };
    let global = base(1);
    let tagged = Transaction {
        activity_id: Some(ActivityId(7)),
        ..base(2)
    };
    let trashed = Transaction {
        trash: TrashState::Trashed { at: chrono::Utc::now() },
        ..base(3)
    };
    let settled = Transaction {
        settlement_session_id: Some(crate::core::models::SessionId(1)),
        ..base(4)
    };
    let pool = [global, tagged, trashed, settled];

    let global_ids: Vec<_> = select_settleable(&pool, Scope::Global).iter().map(|tx| tx.id).collect();
    let activity_ids: Vec<_> = select_settleable(&pool, Scope::Activity(ActivityId(7)))
        .iter()
        .map(|tx| tx.id)
        .collect();

    assert_eq!(global_ids, vec![pool[0].id]);
    assert_eq!(activity_ids, vec![pool[1].id]);
}
