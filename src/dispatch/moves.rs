//! Single move attempts.

use crate::congo::{Board, Coordinate, RulesEngine, RulesError, Side};
use derive_more::Display;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    /// Fewer than two coordinates were given.
    #[display("A move needs an origin and a destination")]
    IncompleteMove,
    /// The requesting player is not in the match.
    #[display("The player is not a participant of this match")]
    NotAParticipant,
    /// The requesting player is not on turn.
    #[display("It is not this player's turn")]
    OutOfTurn,
    /// The origin square does not hold the mover's piece.
    #[display("The origin square does not hold one of the player's pieces")]
    NotOwnPiece,
    /// The opposing lion was not in its castle before the move.
    #[display("The opposing lion is not in its castle")]
    LionNotInCastle,
    /// The rules engine refused the move.
    #[display("The rules do not allow this move")]
    Illegal,
}

/// Classification of a move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Board mutated, match continues.
    Accepted,
    /// Board mutated, match is over.
    AcceptedTerminal,
    /// Board unchanged.
    Rejected(Rejection),
}

/// Runs one move attempt against a board through the rules engine.
#[derive(Debug, Clone)]
pub struct MoveProcessor {
    engine: Arc<dyn RulesEngine>,
}

impl MoveProcessor {
    /// Creates a processor backed by `engine`.
    pub fn new(engine: Arc<dyn RulesEngine>) -> Self {
        Self { engine }
    }

    /// The rules engine in use.
    pub fn engine(&self) -> &dyn RulesEngine {
        self.engine.as_ref()
    }

    /// Attempts `moves` for `mover` on `board`.
    ///
    /// The board is restored to its prior contents on every path that does
    /// not return an accepted outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the engine faults.
    #[instrument(skip(self, board), fields(moves = ?moves))]
    pub fn process(
        &self,
        board: &mut Board,
        mover: Side,
        moves: &[Coordinate],
    ) -> Result<MoveOutcome, RulesError> {
        let [origin, .., landing] = moves else {
            debug!("Move list too short");
            return Ok(MoveOutcome::Rejected(Rejection::IncompleteMove));
        };
        let (origin, landing) = (*origin, *landing);

        if self.engine.find_active_player(board, origin) != Some(mover) {
            debug!(%origin, "Origin does not hold the mover's piece");
            return Ok(MoveOutcome::Rejected(Rejection::NotOwnPiece));
        }

        // TODO: confirm with the game designers whether a missing opposing
        // lion should gate the attempt or end the match outright.
        if !self.engine.lion_in_castle(board, origin) {
            warn!(%origin, "Precondition failed: opposing lion not in castle");
            return Ok(MoveOutcome::Rejected(Rejection::LionNotInCastle));
        }

        let before = board.clone();
        let applied = match self.engine.process_move(moves, board) {
            Ok(applied) => applied,
            Err(e) => {
                *board = before;
                return Err(e);
            }
        };

        if !applied {
            *board = before;
            debug!("Rules engine rejected move");
            return Ok(MoveOutcome::Rejected(Rejection::Illegal));
        }

        if self.engine.lion_in_castle(board, landing) {
            info!(%origin, %landing, "Move accepted");
            Ok(MoveOutcome::Accepted)
        } else {
            info!(%origin, %landing, "Move accepted, opposing lion captured");
            Ok(MoveOutcome::AcceptedTerminal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congo::{CongoRules, Piece, PieceKind};

    fn at(row: usize, col: usize) -> Coordinate {
        Coordinate::from_row_col(row, col).unwrap()
    }

    fn processor() -> MoveProcessor {
        MoveProcessor::new(Arc::new(CongoRules))
    }

    #[test]
    fn test_accepted() {
        let p = processor();
        let mut board = p.engine().initialize();
        let outcome = p.process(&mut board, Side::PlayerOne, &[at(5, 3), at(4, 3)]).unwrap();
        assert_eq!(outcome, MoveOutcome::Accepted);
    }

    #[test]
    fn test_rejected_leaves_board() {
        let p = processor();
        let mut board = p.engine().initialize();
        let before = board.clone();
        let outcome = p.process(&mut board, Side::PlayerOne, &[at(5, 3), at(2, 3)]).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(Rejection::Illegal));
        assert_eq!(board, before);
    }

    #[test]
    fn test_cannot_move_opponent_piece() {
        let p = processor();
        let mut board = p.engine().initialize();
        let outcome = p.process(&mut board, Side::PlayerOne, &[at(1, 3), at(2, 3)]).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(Rejection::NotOwnPiece));
    }

    #[test]
    fn test_incomplete_move() {
        let p = processor();
        let mut board = p.engine().initialize();
        let outcome = p.process(&mut board, Side::PlayerOne, &[at(5, 3)]).unwrap();
        assert_eq!(outcome, MoveOutcome::Rejected(Rejection::IncompleteMove));
    }

    #[test]
    fn test_lion_capture_is_terminal() {
        let p = processor();
        let mut board = Board::empty();
        board.set(at(6, 3), Some(Piece::new(Side::PlayerOne, PieceKind::Lion)));
        board.set(at(0, 3), Some(Piece::new(Side::PlayerTwo, PieceKind::Lion)));
        let outcome = p.process(&mut board, Side::PlayerOne, &[at(6, 3), at(0, 3)]).unwrap();
        assert_eq!(outcome, MoveOutcome::AcceptedTerminal);
    }
}
