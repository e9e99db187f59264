use super::*;
use crate::core::errors::{ErrorKind, LedgerError};
use crate::core::models::{BulkTransactionUpdate, TransactionId, TransactionView, TrashState};
use crate::core::scope::Scope;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_create_transaction() {
    let service = create_test_service();
    let (p1, p2, p3) = seed_trio(&service).await;

    let tx = service
        .create_transaction(
            TransactionDraft {
                time: Some("19:30".to_string()),
                category: Some("Food".to_string()),
                ..draft(dec!(90.00), p1, &[p1, p2, p3])
            },
            p1,
        )
        .await
        .unwrap();

    assert_eq!(tx.amount, dec!(90.00));
    assert_eq!(tx.revision, 1);
    assert_eq!(tx.trash, TrashState::Active);
    assert!(!tx.is_settled());
    assert_eq!(service.get_transaction(tx.id).await.unwrap(), tx);

    let json = serde_json::to_value(&tx).unwrap();
    assert_eq!(json["type"], "EXPENSE");
    assert_eq!(json["amount"], "90.00");
    assert!(json["deleted_at"].is_null());
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;

    for amount in [dec!(0), dec!(-5.00), dec!(10.001), dec!(1000000.01)] {
        let err = service
            .create_transaction(draft(amount, p1, &[p2]), p1)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(ref field, _) if field == "amount"), "{amount}");
    }
}

#[tokio::test]
async fn test_invalid_splits_are_rejected() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;

    let empty = draft(dec!(10.00), p1, &[]);
    let zero_weight = TransactionDraft {
        splits: vec![Split::new(p2, 0)],
        ..draft(dec!(10.00), p1, &[])
    };
    let duplicate = draft(dec!(10.00), p1, &[p2, p2]);

    for bad in [empty, zero_weight, duplicate] {
        let err = service.create_transaction(bad, p1).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSplit(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let err = service
        .create_transaction(draft(dec!(10.00), p1, &[ParticipantId(99)]), p1)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::ParticipantNotFound(ParticipantId(99)));
}

#[tokio::test]
async fn test_malformed_fields_are_rejected() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;

    let bad_time = TransactionDraft {
        time: Some("7pm".to_string()),
        ..draft(dec!(10.00), p1, &[p2])
    };
    let blank = TransactionDraft {
        description: "   ".to_string(),
        ..draft(dec!(10.00), p1, &[p2])
    };
    let unknown_activity = TransactionDraft {
        activity_id: Some(ActivityId(5)),
        ..draft(dec!(10.00), p1, &[p2])
    };

    assert_eq!(
        service.create_transaction(bad_time, p1).await.unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(service.create_transaction(blank, p1).await.unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(
        service.create_transaction(unknown_activity, p1).await.unwrap_err(),
        LedgerError::ActivityNotFound(ActivityId(5))
    );
}

#[tokio::test]
async fn test_soft_delete_and_restore() {
    let service = create_test_service();
    let (p1, p2, p3) = seed_trio(&service).await;
    let tx = record(&service, draft(dec!(90.00), p1, &[p1, p2, p3])).await;

    let trashed = service.soft_delete_transaction(tx.id, p1).await.unwrap();
    assert!(trashed.trash.is_trashed());
    assert!(!service.has_outstanding_balances(Scope::Global).await.unwrap());
    assert!(service.list_transactions(Scope::Global, TransactionView::Unsettled).await.unwrap().is_empty());
    assert_eq!(
        service.list_transactions(Scope::Global, TransactionView::Trashed).await.unwrap().len(),
        1
    );

    // Trashing again changes nothing
    let again = service.soft_delete_transaction(tx.id, p1).await.unwrap();
    assert_eq!(again.revision, trashed.revision);

    service.restore_transaction(tx.id, p1).await.unwrap();
    let balances = service.get_balances(Scope::Global).await.unwrap();
    assert_eq!(balances[0].balance, dec!(60.00));
    assert_eq!(balances[1].balance, dec!(-30.00));

    let err = service.restore_transaction(tx.id, p1).await.unwrap_err();
    assert_eq!(err, LedgerError::TransactionNotTrashed(tx.id));
}

#[tokio::test]
async fn test_permanent_delete_needs_trash_first() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;
    let tx = record(&service, draft(dec!(25.00), p1, &[p2])).await;

    let err = service.permanent_delete_transaction(tx.id, p1).await.unwrap_err();
    assert_eq!(err, LedgerError::TransactionNotTrashed(tx.id));

    service.soft_delete_transaction(tx.id, p1).await.unwrap();
    service.permanent_delete_transaction(tx.id, p1).await.unwrap();

    let err = service.get_transaction(tx.id).await.unwrap_err();
    assert_eq!(err, LedgerError::TransactionNotFound(tx.id));
}

#[tokio::test]
async fn test_update_transaction() {
    let service = create_test_service();
    let (p1, p2, p3) = seed_trio(&service).await;
    let tx = record(&service, draft(dec!(30.00), p1, &[p2])).await;

    let updated = service
        .update_transaction(tx.id, draft(dec!(45.00), p3, &[p1, p2]), p1)
        .await
        .unwrap();

    assert_eq!(updated.id, tx.id);
    assert_eq!(updated.payer_id, p3);
    assert_eq!(updated.revision, tx.revision + 1);
    assert_eq!(updated.created_at, tx.created_at);

    let balances = service.get_balances(Scope::Global).await.unwrap();
    let amounts: Vec<Decimal> = balances.iter().map(|b| b.balance).collect();
    assert_eq!(amounts, vec![dec!(-22.50), dec!(-22.50), dec!(45.00)]);

    service.soft_delete_transaction(tx.id, p1).await.unwrap();
    let err = service
        .update_transaction(tx.id, draft(dec!(10.00), p1, &[p2]), p1)
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::TransactionTrashed(tx.id));
}

#[tokio::test]
async fn test_moving_transaction_between_scopes() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;
    let trip = create_activity(&service, "Ski week", p1).await;
    let tx = record(&service, draft(dec!(30.00), p1, &[p2])).await;

    service
        .update_transaction(
            tx.id,
            TransactionDraft {
                activity_id: Some(trip),
                ..draft(dec!(30.00), p1, &[p2])
            },
            p1,
        )
        .await
        .unwrap();

    assert!(!service.has_outstanding_balances(Scope::Global).await.unwrap());
    assert!(service.has_outstanding_balances(Scope::Activity(trip)).await.unwrap());
    assert_eq!(
        service
            .list_transactions(Scope::Activity(trip), TransactionView::Unsettled)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_bulk_update_skips_locked_and_missing() {
    let service = create_test_service();
    let (p1, p2, p3) = seed_trio(&service).await;
    let trip = create_activity(&service, "Camping", p1).await;
    let settled = record(&service, draft(dec!(10.00), p1, &[p2])).await;
    service.commit_settlement(Scope::Global, p1, None).await.unwrap();
    let open = record(&service, draft(dec!(20.00), p1, &[p2])).await;
    let trashed = record(&service, draft(dec!(30.00), p1, &[p2])).await;
    service.soft_delete_transaction(trashed.id, p1).await.unwrap();

    let updated = service
        .bulk_update_transactions(
            BulkTransactionUpdate {
                transaction_ids: vec![settled.id, open.id, trashed.id, TransactionId(404)],
                activity_id: Some(trip),
                clear_activity: false,
                splits: Some(vec![Split::new(p2, 1), Split::new(p3, 1)]),
            },
            p1,
        )
        .await
        .unwrap();

    assert_eq!(updated, 1);
    let moved = service.get_transaction(open.id).await.unwrap();
    assert_eq!(moved.activity_id, Some(trip));
    assert_eq!(moved.splits.len(), 2);
    assert_eq!(service.get_transaction(settled.id).await.unwrap().activity_id, None);

    let back = service
        .bulk_update_transactions(
            BulkTransactionUpdate {
                transaction_ids: vec![open.id],
                clear_activity: true,
                ..Default::default()
            },
            p1,
        )
        .await
        .unwrap();
    assert_eq!(back, 1);
    assert_eq!(service.get_transaction(open.id).await.unwrap().activity_id, None);
}

#[tokio::test]
async fn test_bulk_update_needs_a_change() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;
    let tx = record(&service, draft(dec!(20.00), p1, &[p2])).await;

    let err = service
        .bulk_update_transactions(
            BulkTransactionUpdate {
                transaction_ids: vec![tx.id],
                ..Default::default()
            },
            p1,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_listing_is_ordered_by_date() {
    let service = create_test_service();
    let (p1, p2, _) = seed_trio(&service).await;
    let later = record(
        &service,
        TransactionDraft {
            date: chrono::NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
            ..draft(dec!(5.00), p1, &[p2])
        },
    )
    .await;
    let earlier = record(&service, draft(dec!(6.00), p1, &[p2])).await;

    let listed = service
        .list_transactions(Scope::Global, TransactionView::Unsettled)
        .await
        .unwrap();
    let ids: Vec<TransactionId> = listed.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let service = create_test_service();
    add_participant(&service, "Alice").await;

    let err = service
        .add_participant(NewParticipant {
            name: "Other Alice".to_string(),
            email: Some("alice@example.com".to_string()),
            is_group_member: false,
            has_login: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::DuplicateEmail("alice@example.com".to_string()));

    let err = service
        .add_participant(NewParticipant {
            name: "Dave".to_string(),
            email: Some("not-an-email".to_string()),
            is_group_member: true,
            has_login: false,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
