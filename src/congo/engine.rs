//! Boundary to the move-legality engine.

use super::{Board, BoardSnapshot, Coordinate, Side};
use derive_more::{Display, Error};

/// Board rules consulted by the move processor.
///
/// Implementations must leave the board untouched whenever
/// [`process_move`](RulesEngine::process_move) does not return `Ok(true)`.
pub trait RulesEngine: Send + Sync + std::fmt::Debug {
    /// Returns a board in the starting position.
    fn initialize(&self) -> Board;

    /// Returns the serializable snapshot of a board.
    fn snapshot(&self, board: &Board) -> BoardSnapshot;

    /// Whether the lion opposing the owner of the piece at `coordinate`
    /// still sits in its castle.
    fn lion_in_castle(&self, board: &Board, coordinate: Coordinate) -> bool;

    /// Owner of the piece at `coordinate`.
    fn find_active_player(&self, board: &Board, coordinate: Coordinate) -> Option<Side>;

    /// Applies `moves` to `board`.
    ///
    /// Returns `Ok(true)` if the move was legal and the board mutated,
    /// `Ok(false)` if it was rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the engine cannot evaluate the move.
    fn process_move(&self, moves: &[Coordinate], board: &mut Board) -> Result<bool, RulesError>;
}

/// Engine fault, distinct from an illegal move.
#[derive(Debug, Clone, Display, Error)]
#[display("Rules engine error: {} at {}:{}", message, file, line)]
pub struct RulesError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RulesError {
    /// Creates a new rules error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
