//! Tests for move attempts routed through the action router.

mod common;

use common::{Script, ScriptedEngine, at, move_action, router, router_with, start};
use congo_server::{ActionType, Board, CongoRules, MatchStatus, ResponseType, RulesEngine};
use std::sync::Arc;

const INITIAL: [&str; 7] = [
    "gmelecz", "ppppppp", ".......", ".......", ".......", "PPPPPPP", "GMELECZ",
];

#[test]
fn test_legal_move_updates_board_and_passes_turn() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::UpdateBoard);
    assert_eq!(update.whose_turn.as_deref(), Some("bob"));
    assert_eq!(update.error_code, None);
    assert_eq!(update.match_id.as_deref(), Some(match_id.as_str()));
    assert_eq!(update.player_name.as_deref(), Some("ann"));
    assert_eq!(update.piece_id.as_deref(), Some("piece"));
    let board = update.updated_board.expect("board");
    assert_eq!(board.0[4], "...P...");
    assert_eq!(board.0[5], "PPP.PPP");
}

#[test]
fn test_players_alternate() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let first = router.route(move_action(&match_id, "ann", vec![at(5, 0), at(4, 0)]));
    assert_eq!(first.communication_type, ResponseType::UpdateBoard);
    let second = router.route(move_action(&match_id, "bob", vec![at(1, 0), at(2, 0)]));
    assert_eq!(second.communication_type, ResponseType::UpdateBoard);
    assert_eq!(second.whose_turn.as_deref(), Some("ann"));

    let state = router.matches().snapshot(&match_id).unwrap();
    assert_eq!(*state.moves_played(), 2);
}

#[test]
fn test_illegal_move_leaves_board_and_turn() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(2, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(update.error_code, Some(102));
    assert_eq!(update.whose_turn.as_deref(), Some("ann"));
    let board = update.updated_board.expect("board");
    assert_eq!(board.0, INITIAL.map(String::from).to_vec());
}

#[test]
fn test_engine_refusal_restores_scribbled_board() {
    let engine = Arc::new(ScriptedEngine::new(Script::Illegal));
    let (_db, router) = router_with(engine.clone());
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(engine.calls(), 1);
    let state = router.matches().snapshot(&match_id).unwrap();
    assert_eq!(state.board().rows(), INITIAL.map(String::from).to_vec());
    assert_eq!(state.whose_turn(), "ann");
}

#[test]
fn test_out_of_turn_is_rejected() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "bob", vec![at(1, 3), at(2, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(update.status_message.as_deref(), Some("It is not this player's turn"));
    assert_eq!(update.whose_turn.as_deref(), Some("ann"));
}

#[test]
fn test_moving_opponent_piece_is_rejected() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(1, 3), at(2, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(update.error_code, Some(102));
}

#[test]
fn test_stranger_is_rejected() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "eve", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(
        update.status_message.as_deref(),
        Some("The player is not a participant of this match")
    );
}

#[test]
fn test_single_coordinate_is_rejected() {
    let (_db, router) = router();
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
}

#[test]
fn test_lion_capture_ends_match() {
    let engine = Arc::new(ScriptedEngine::new(Script::LegalCapturesLion));
    let (_db, router) = router_with(engine);
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::EndMatch);
    assert_eq!(update.winner_name.as_deref(), Some("ann"));
    assert_eq!(update.loser_name.as_deref(), Some("bob"));
    assert_eq!(update.end_condition.as_deref(), Some("lionCaptured"));
    assert_eq!(update.message.as_deref(), Some("Lion is captured, Game is Over!"));
    assert!(update.match_end_time.is_some());
    assert!(update.updated_board.is_some());

    // The finished match no longer accepts moves.
    let after = router.route(move_action(&match_id, "bob", vec![at(1, 3), at(2, 3)]));
    assert_eq!(after.communication_type, ResponseType::ErrorMatchNotFound);
    assert_eq!(after.error_code, Some(103));
}

#[test]
fn test_engine_fault_is_infrastructure_error() {
    let engine = Arc::new(ScriptedEngine::new(Script::Fault));
    let (_db, router) = router_with(engine);
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInfrastructure);
    assert_eq!(update.error_code, Some(106));
    let state = router.matches().snapshot(&match_id).unwrap();
    assert_eq!(state.board().rows(), INITIAL.map(String::from).to_vec());
}

#[test]
fn test_unknown_match() {
    let (_db, router) = router();

    let update = router.route(move_action("999", "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorMatchNotFound);
    assert_eq!(update.error_code, Some(103));
    assert_eq!(update.match_id.as_deref(), Some("999"));
}

#[test]
fn test_missing_match_id() {
    let (_db, router) = router();
    let mut action = move_action("1", "ann", vec![at(5, 3), at(4, 3)]);
    action.match_id = None;
    assert_eq!(action.communication_type, ActionType::RequestMoves);

    let update = router.route(action);

    assert_eq!(update.communication_type, ResponseType::ErrorMatchNotFound);
}

#[test]
fn test_capture_without_winner_restores_match() {
    let engine = Arc::new(ScriptedEngine::new(Script::VanishingCapture));
    let (_db, router) = router_with(engine.clone());
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInfrastructure);
    assert_eq!(update.error_code, Some(106));
    assert_eq!(engine.calls(), 1);
    let state = router.matches().snapshot(&match_id).unwrap();
    assert_eq!(state.board().rows(), INITIAL.map(String::from).to_vec());
    assert_eq!(state.whose_turn(), "ann");
    assert_eq!(*state.moves_played(), 0);
    assert_eq!(*state.status(), MatchStatus::InProgress);
}

fn lion_out_of_castle() -> Board {
    let mut board = CongoRules::new().initialize();
    let lion = board.set(at(0, 3), None);
    board.set(at(3, 3), lion);
    board
}

#[test]
fn test_opposing_lion_outside_castle_blocks_move() {
    let board = lion_out_of_castle();
    let expected = board.rows();
    let engine = Arc::new(ScriptedEngine::new(Script::Legal).with_initial(board));
    let (_db, router) = router_with(engine.clone());
    let match_id = start(&router, "ann", "bob");

    let update = router.route(move_action(&match_id, "ann", vec![at(5, 3), at(4, 3)]));

    assert_eq!(update.communication_type, ResponseType::ErrorInvalidMove);
    assert_eq!(update.error_code, Some(102));
    assert_eq!(
        update.status_message.as_deref(),
        Some("The opposing lion is not in its castle")
    );
    assert_eq!(update.whose_turn.as_deref(), Some("ann"));
    assert_eq!(engine.calls(), 0);
    let state = router.matches().snapshot(&match_id).unwrap();
    assert_eq!(state.board().rows(), expected);
    assert_eq!(*state.moves_played(), 0);
}
