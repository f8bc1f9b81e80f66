//! Congo board, pieces and rules.

mod engine;
mod rules;
mod types;

pub use engine::{RulesEngine, RulesError};
pub use rules::CongoRules;
pub use types::{
    BOARD_SIZE, Board, BoardSnapshot, Coordinate, Piece, PieceKind, RIVER_ROW, SQUARE_COUNT, Side,
};
