//! Tests for the HTTP action handler.

mod common;

use axum::Json;
use axum::extract::State;
use common::router;
use congo_server::{ResponseType, handle_action};
use std::sync::Arc;

#[tokio::test]
async fn test_handle_action_routes_json() {
    let (_db, router) = router();
    let body = r#"{"communicationType":"requestBeginNewMatch","playerOneName":"ann","playerTwoName":"bob"}"#;

    let Json(update) = handle_action(State(Arc::new(router)), body.to_string()).await;

    assert_eq!(update.communication_type, ResponseType::BeginNewMatch);
    assert_eq!(update.match_id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_malformed_body_is_unsupported() {
    let (_db, router) = router();

    let Json(update) = handle_action(State(Arc::new(router)), "{not json".to_string()).await;

    assert_eq!(update.communication_type, ResponseType::ErrorUnsupportedAction);
    assert_eq!(update.error_code, Some(101));
    assert!(update.status_message.unwrap().starts_with("Malformed action"));
}

#[tokio::test]
async fn test_move_over_http() {
    let (_db, router) = router();
    let router = Arc::new(router);
    let begin = r#"{"communicationType":"requestBeginNewMatch","playerOneName":"ann","playerTwoName":"bob"}"#;
    let Json(started) = handle_action(State(Arc::clone(&router)), begin.to_string()).await;
    let match_id = started.match_id.expect("match id");

    let body = format!(
        r#"{{"communicationType":"requestMoves","matchID":"{match_id}","playerName":"ann","pieceID":"P4","desiredMoves":[38,31]}}"#
    );
    let Json(update) = handle_action(State(router), body).await;

    assert_eq!(update.communication_type, ResponseType::UpdateBoard);
    assert_eq!(update.whose_turn.as_deref(), Some("bob"));
    assert_eq!(update.piece_id.as_deref(), Some("P4"));
}

#[tokio::test]
async fn test_out_of_range_coordinates_are_invalid_moves() {
    let (_db, router) = router();
    let router = Arc::new(router);
    let begin = r#"{"communicationType":"requestBeginNewMatch","playerOneName":"ann","playerTwoName":"bob"}"#;
    let Json(started) = handle_action(State(Arc::clone(&router)), begin.to_string()).await;
    let match_id = started.match_id.expect("match id");

    let body = format!(
        r#"{{"communicationType":"requestMoves","matchID":"{match_id}","playerName":"ann","desiredMoves":[-1,300]}}"#
    );
    let Json(update) = handle_action(State(router), body).await;

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(update.error_code, Some(102));
    assert_eq!(update.whose_turn.as_deref(), Some("ann"));
}
