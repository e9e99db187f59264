use crate::api::handlers::api_routes;
use crate::core::models::{AppLog, Participant, SettlementSession, Transaction, Transfer};
use crate::core::services::ParticipantBalance;
use axum::{Router, http::StatusCode};
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_server() -> TestServer {
    let service = Arc::new(super::create_test_service());
    let app = Router::new().nest("/api", api_routes(service));
    TestServer::new(app).expect("Could not create test server.")
}

async fn create_participant(server: &TestServer, name: &str) -> Participant {
    let response = server
        .post("/api/participants")
        .json(&json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Participant>()
}

#[tokio::test]
async fn test_settle_up_over_http() {
    let server = test_server();
    let alice = create_participant(&server, "Alice").await;
    let bob = create_participant(&server, "Bob").await;
    let carol = create_participant(&server, "Carol").await;

    let response = server
        .post("/api/transactions")
        .json(&json!({
            "date": "2024-06-01",
            "description": "Dinner",
            "amount": "90.00",
            "type": "EXPENSE",
            "payer_id": alice.id,
            "splits": [
                { "participant_id": alice.id, "weight": 1 },
                { "participant_id": bob.id, "weight": 1 },
                { "participant_id": carol.id, "weight": 1 }
            ],
            "actor_id": alice.id
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let tx = response.json::<Transaction>();

    let balances = server.get("/api/balances").await.json::<Vec<ParticipantBalance>>();
    assert_eq!(balances[0].balance, dec!(60.00));

    let plan = server.get("/api/settlements/suggest").await.json::<Vec<Transfer>>();
    assert_eq!(plan.len(), 2);

    let response = server
        .post("/api/settlements/commit")
        .json(&json!({ "description": "June", "actor_id": alice.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let session = response.json::<SettlementSession>();
    let raw = response.json::<Value>();
    assert_eq!(raw["status"], "ACTIVE");

    let history = server.get("/api/settlements/history").await.json::<Value>();
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["total_amount"], "60.00");

    let undo = server
        .post(&format!("/api/settlements/{}/undo", session.id))
        .json(&json!({ "actor_id": bob.id }))
        .await
        .json::<Value>();
    assert_eq!(undo["restored_count"], 1);

    let reopened = server.get(&format!("/api/transactions/{}", tx.id)).await.json::<Value>();
    assert!(reopened["settlement_session_id"].is_null());
}

#[tokio::test]
async fn test_error_status_codes() {
    let server = test_server();
    let alice = create_participant(&server, "Alice").await;

    let response = server.get("/api/transactions/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "not_found");

    let response = server
        .post("/api/settlements/commit")
        .json(&json!({ "actor_id": alice.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/participants")
        .json(&json!({ "name": "Alice again", "email": "alice@example.com" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = server.get("/api/balances").add_query_param("activity_id", 12).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trash_round_trip_over_http() {
    let server = test_server();
    let alice = create_participant(&server, "Alice").await;
    let bob = create_participant(&server, "Bob").await;
    let tx = server
        .post("/api/transactions")
        .json(&json!({
            "date": "2024-06-02",
            "description": "Taxi",
            "amount": "18.40",
            "payer_id": bob.id,
            "splits": [{ "participant_id": alice.id, "weight": 1 }],
            "actor_id": bob.id
        }))
        .await
        .json::<Transaction>();

    let response = server
        .delete(&format!("/api/transactions/{}", tx.id))
        .add_query_param("actor_id", bob.id)
        .await;
    response.assert_status_ok();
    assert!(!response.json::<Value>()["deleted_at"].is_null());

    let trashed = server
        .get("/api/transactions")
        .add_query_param("view", "trashed")
        .await
        .json::<Vec<Transaction>>();
    assert_eq!(trashed.len(), 1);

    server
        .delete(&format!("/api/transactions/{}/permanent", tx.id))
        .add_query_param("actor_id", bob.id)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/transactions/{}", tx.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_audit_log_filters_over_http() {
    let server = test_server();
    let alice = create_participant(&server, "Alice").await;
    create_participant(&server, "Bob").await;
    server
        .post("/api/activities")
        .json(&json!({ "name": "Ski trip", "created_by_id": alice.id }))
        .await
        .assert_status(StatusCode::CREATED);

    let added = server
        .get("/api/logs")
        .add_query_param("action", "participant_added")
        .await
        .json::<Vec<AppLog>>();
    assert_eq!(added.len(), 2);
    assert!(added.iter().all(|l| l.action == "participant_added"));

    let by_alice = server
        .get("/api/logs")
        .add_query_param("actor_id", alice.id)
        .await
        .json::<Vec<AppLog>>();
    assert_eq!(by_alice.len(), 1);
    assert_eq!(by_alice[0].action, "activity_created");

    let everything = server.get("/api/logs").await.json::<Vec<AppLog>>();
    assert_eq!(everything.len(), 3);
}
