//! Core domain types for Congo.

use serde::{Deserialize, Deserializer, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 7;

/// Number of squares on the board.
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Row holding the river.
pub const RIVER_ROW: usize = 3;

/// One of the two sides of a match.
///
/// Player one starts on row 6 and moves toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// The side that moves first.
    PlayerOne,
    /// The side that moves second.
    PlayerTwo,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::PlayerOne => Side::PlayerTwo,
            Side::PlayerTwo => Side::PlayerOne,
        }
    }

    /// Row delta of one step forward.
    pub fn forward(self) -> isize {
        match self {
            Side::PlayerOne => -1,
            Side::PlayerTwo => 1,
        }
    }

    /// Row this side promotes on.
    pub fn far_row(self) -> usize {
        match self {
            Side::PlayerOne => 0,
            Side::PlayerTwo => BOARD_SIZE - 1,
        }
    }

    /// Whether `coordinate` lies across the river from this side.
    pub fn is_past_river(self, coordinate: Coordinate) -> bool {
        match self {
            Side::PlayerOne => coordinate.row() < RIVER_ROW,
            Side::PlayerTwo => coordinate.row() > RIVER_ROW,
        }
    }

    /// Whether `coordinate` lies inside this side's castle.
    pub fn castle_contains(self, coordinate: Coordinate) -> bool {
        let rows = match self {
            Side::PlayerOne => 4..=6,
            Side::PlayerTwo => 0..=2,
        };
        coordinate.is_on_board() && rows.contains(&coordinate.row()) && (2..=4).contains(&coordinate.col())
    }
}

/// A square index on the board, `0..49` in row-major order.
///
/// Any integer deserializes. Values outside `0..=255` collapse to index 255,
/// which is off the board like every other index from 49 up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Coordinate(u8);

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(Self(u8::try_from(raw).unwrap_or(u8::MAX)))
    }
}

impl Coordinate {
    /// Wraps a raw square index. Out-of-range indices are representable
    /// so that client input can be rejected by the rules engine.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Builds a coordinate from a row and column, `None` if off the board.
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then(|| Self((row * BOARD_SIZE + col) as u8))
    }

    /// Raw square index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Row of the square (0 is player two's back rank).
    pub fn row(self) -> usize {
        self.index() / BOARD_SIZE
    }

    /// Column of the square.
    pub fn col(self) -> usize {
        self.index() % BOARD_SIZE
    }

    /// Whether the index names a real square.
    pub fn is_on_board(self) -> bool {
        self.index() < SQUARE_COUNT
    }

    /// Whether the square is on the river.
    pub fn is_on_river(self) -> bool {
        self.row() == RIVER_ROW
    }

    /// Returns the square displaced by the given row and column deltas.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        let row = self.row().checked_add_signed(d_row)?;
        let col = self.col().checked_add_signed(d_col)?;
        Self::from_row_col(row, col)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of Congo pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    /// Must stay in its castle; losing it loses the match.
    Lion,
    /// Moves like a chess knight.
    Zebra,
    /// Moves one or two squares orthogonally, jumping.
    Elephant,
    /// Steps without capturing or jumps exactly two squares.
    Giraffe,
    /// Steps, or slides along and toward the river.
    Crocodile,
    /// Steps forward; may retreat once past the river.
    Pawn,
    /// Promoted pawn.
    Superpawn,
    /// Steps without capturing, captures by jumping.
    Monkey,
}

impl PieceKind {
    /// Single-letter symbol used in board snapshots.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Lion => 'L',
            PieceKind::Zebra => 'Z',
            PieceKind::Elephant => 'E',
            PieceKind::Giraffe => 'G',
            PieceKind::Crocodile => 'C',
            PieceKind::Pawn => 'P',
            PieceKind::Superpawn => 'S',
            PieceKind::Monkey => 'M',
        }
    }
}

/// A piece owned by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owner of the piece.
    pub side: Side,
    /// What the piece is.
    pub kind: PieceKind,
}

impl Piece {
    /// Creates a new piece.
    pub fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// Symbol in snapshots: upper case for player one, lower case for player two.
    pub fn symbol(self) -> char {
        match self.side {
            Side::PlayerOne => self.kind.symbol(),
            Side::PlayerTwo => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// 7x7 Congo board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order; always `SQUARE_COUNT` long.
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// Creates a board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// Gets the piece on a square, `None` if empty or off the board.
    pub fn get(&self, coordinate: Coordinate) -> Option<Piece> {
        self.squares.get(coordinate.index()).copied().flatten()
    }

    /// Places or clears a square, returning what was there before.
    /// Off-board coordinates are ignored.
    pub fn set(&mut self, coordinate: Coordinate, piece: Option<Piece>) -> Option<Piece> {
        match self.squares.get_mut(coordinate.index()) {
            Some(square) => std::mem::replace(square, piece),
            None => None,
        }
    }

    /// Whether a square is on the board and empty.
    pub fn is_empty(&self, coordinate: Coordinate) -> bool {
        coordinate.is_on_board() && self.get(coordinate).is_none()
    }

    /// Iterates over occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, square)| square.map(|piece| (Coordinate::new(index as u8), piece)))
    }

    /// Finds the lion of `side`, if it is still on the board.
    pub fn find_lion(&self, side: Side) -> Option<Coordinate> {
        self.pieces()
            .find(|(_, piece)| piece.side == side && piece.kind == PieceKind::Lion)
            .map(|(coordinate, _)| coordinate)
    }

    /// Renders the board as one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.squares
            .chunks(BOARD_SIZE)
            .map(|row| {
                row.iter()
                    .map(|square| square.map_or('.', Piece::symbol))
                    .collect()
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Serializable snapshot of a board, one string of seven symbols per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(pub Vec<String>);
