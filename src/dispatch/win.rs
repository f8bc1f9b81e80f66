//! Winner detection after a terminal move.

use crate::congo::{Board, Coordinate, RulesEngine};
use crate::matches::Participants;
use tracing::{error, info, instrument};

/// Decides who won a match that a move just ended.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinDetector;

impl WinDetector {
    /// Returns the winner's name.
    ///
    /// `landing` is the square the terminal move finished on; its owner is the
    /// side whose opponent lost the lion. `None` means the detector was called
    /// for a move that did not end the match.
    #[instrument(skip(engine, board, participants))]
    pub fn detect(
        engine: &dyn RulesEngine,
        board: &Board,
        landing: Coordinate,
        participants: &Participants,
    ) -> Option<String> {
        match engine.find_active_player(board, landing) {
            Some(side) => {
                let winner = participants.name(side).to_string();
                info!(?side, %winner, "Winner determined");
                Some(winner)
            }
            None => {
                error!(%landing, "Win detection found no piece on the landing square");
                None
            }
        }
    }
}
