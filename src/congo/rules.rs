//! Reference Congo rules.

use super::{
    BOARD_SIZE, Board, BoardSnapshot, Coordinate, Piece, PieceKind, RIVER_ROW, RulesEngine,
    RulesError, Side,
};
use tracing::{debug, instrument};

/// Back rank, from column 0.
const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Giraffe,
    PieceKind::Monkey,
    PieceKind::Elephant,
    PieceKind::Lion,
    PieceKind::Elephant,
    PieceKind::Crocodile,
    PieceKind::Zebra,
];

/// Standard Congo rules without drowning.
#[derive(Debug, Clone, Copy, Default)]
pub struct CongoRules;

impl CongoRules {
    /// Creates the rules engine.
    pub fn new() -> Self {
        Self
    }
}

/// Displacement between two squares.
#[derive(Debug, Clone, Copy)]
struct Delta {
    row: isize,
    col: isize,
}

impl Delta {
    fn between(from: Coordinate, to: Coordinate) -> Self {
        Self {
            row: to.row() as isize - from.row() as isize,
            col: to.col() as isize - from.col() as isize,
        }
    }

    fn is_step(self) -> bool {
        self.row.abs().max(self.col.abs()) == 1
    }

    fn is_straight_or_diagonal(self) -> bool {
        (self.row == 0) != (self.col == 0) || (self.row != 0 && self.row.abs() == self.col.abs())
    }

    fn distance(self) -> isize {
        self.row.abs().max(self.col.abs())
    }
}

/// Squares strictly between `from` and `to` on a straight or diagonal line are empty.
fn path_clear(board: &Board, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    if !delta.is_straight_or_diagonal() {
        return false;
    }
    let (d_row, d_col) = (delta.row.signum(), delta.col.signum());
    (1..delta.distance()).all(|i| {
        from.offset(d_row * i, d_col * i)
            .is_some_and(|square| board.is_empty(square))
    })
}

/// Target is on the board and not held by `side`.
fn open_to(board: &Board, side: Side, to: Coordinate) -> bool {
    to.is_on_board() && board.get(to).is_none_or(|piece| piece.side != side)
}

fn lion_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    if delta.is_step() {
        return piece.side.castle_contains(to) && open_to(board, piece.side, to);
    }
    let facing_lion = board
        .get(to)
        .is_some_and(|target| target.side != piece.side && target.kind == PieceKind::Lion);
    facing_lion && (delta.col == 0 || delta.row.abs() == delta.col.abs()) && path_clear(board, from, to)
}

fn zebra_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    matches!((delta.row.abs(), delta.col.abs()), (1, 2) | (2, 1)) && open_to(board, piece.side, to)
}

fn elephant_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    let orthogonal = (delta.row == 0) != (delta.col == 0);
    orthogonal && delta.distance() <= 2 && open_to(board, piece.side, to)
}

fn giraffe_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    if delta.is_step() {
        return board.is_empty(to);
    }
    delta.is_straight_or_diagonal() && delta.distance() == 2 && open_to(board, piece.side, to)
}

fn crocodile_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    if !open_to(board, piece.side, to) {
        return false;
    }
    if delta.is_step() {
        return true;
    }
    if from.is_on_river() && delta.row == 0 {
        return path_clear(board, from, to);
    }
    if !from.is_on_river() && delta.col == 0 {
        let toward_river = (RIVER_ROW as isize - from.row() as isize).signum();
        let overshoots = (to.row() as isize - RIVER_ROW as isize).signum() == toward_river;
        return delta.row.signum() == toward_river && !overshoots && path_clear(board, from, to);
    }
    false
}

fn pawn_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    let forward = piece.side.forward();
    if delta.row == forward && delta.col.abs() <= 1 {
        return open_to(board, piece.side, to);
    }
    let retreat = delta.col == 0 && (delta.row == -forward || delta.row == -2 * forward);
    retreat && piece.side.is_past_river(from) && board.is_empty(to) && path_clear(board, from, to)
}

fn superpawn_move(board: &Board, piece: Piece, from: Coordinate, to: Coordinate) -> bool {
    let delta = Delta::between(from, to);
    let forward = piece.side.forward();
    let advance = delta.row == forward && delta.col.abs() <= 1;
    let sideways = delta.row == 0 && delta.col.abs() == 1;
    if advance || sideways {
        return open_to(board, piece.side, to);
    }
    let backward = delta.row == -forward || delta.row == -2 * forward;
    let line = delta.col == 0 || delta.row.abs() == delta.col.abs();
    backward && line && board.is_empty(to) && path_clear(board, from, to)
}

/// Validates a monkey move on `board`, which already has the monkey lifted
/// off `moves[0]`. Captured pieces are removed from `board` as the chain runs.
fn monkey_move(board: &mut Board, side: Side, moves: &[Coordinate]) -> bool {
    let hops = &moves[1..];
    if let [to] = hops {
        if Delta::between(moves[0], *to).is_step() {
            return board.is_empty(*to);
        }
    }
    for (i, pair) in moves.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let delta = Delta::between(from, to);
        let is_jump = matches!(delta.row.abs(), 0 | 2)
            && matches!(delta.col.abs(), 0 | 2)
            && delta.distance() == 2;
        if !is_jump || !board.is_empty(to) {
            return false;
        }
        let Some(over) = from.offset(delta.row / 2, delta.col / 2) else {
            return false;
        };
        match board.get(over) {
            Some(victim) if victim.side != side => {
                board.set(over, None);
                if victim.kind == PieceKind::Lion && i + 1 != hops.len() {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

impl RulesEngine for CongoRules {
    #[instrument(skip(self))]
    fn initialize(&self) -> Board {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.into_iter().enumerate() {
            let place = |board: &mut Board, row: usize, piece: Piece| {
                if let Some(square) = Coordinate::from_row_col(row, col) {
                    board.set(square, Some(piece));
                }
            };
            place(&mut board, 0, Piece::new(Side::PlayerTwo, kind));
            place(&mut board, 1, Piece::new(Side::PlayerTwo, PieceKind::Pawn));
            place(&mut board, BOARD_SIZE - 2, Piece::new(Side::PlayerOne, PieceKind::Pawn));
            place(&mut board, BOARD_SIZE - 1, Piece::new(Side::PlayerOne, kind));
        }
        debug!("Initialized starting position");
        board
    }

    fn snapshot(&self, board: &Board) -> BoardSnapshot {
        BoardSnapshot(board.rows())
    }

    #[instrument(skip(self, board))]
    fn lion_in_castle(&self, board: &Board, coordinate: Coordinate) -> bool {
        let Some(owner) = self.find_active_player(board, coordinate) else {
            debug!("No piece on coordinate");
            return false;
        };
        let opponent = owner.opponent();
        let in_castle = board
            .find_lion(opponent)
            .is_some_and(|lion| opponent.castle_contains(lion));
        debug!(?opponent, in_castle, "Checked lion");
        in_castle
    }

    fn find_active_player(&self, board: &Board, coordinate: Coordinate) -> Option<Side> {
        board.get(coordinate).map(|piece| piece.side)
    }

    #[instrument(skip(self, board), fields(moves = ?moves))]
    fn process_move(&self, moves: &[Coordinate], board: &mut Board) -> Result<bool, RulesError> {
        let [from, .., to] = moves else {
            debug!("Move needs an origin and a destination");
            return Ok(false);
        };
        let (from, to) = (*from, *to);
        if moves.iter().any(|square| !square.is_on_board()) {
            debug!("Coordinate off the board");
            return Ok(false);
        }
        let Some(piece) = board.get(from) else {
            debug!(%from, "No piece to move");
            return Ok(false);
        };

        let mut next = board.clone();
        next.set(from, None);

        let legal = match piece.kind {
            PieceKind::Monkey => monkey_move(&mut next, piece.side, moves),
            _ if moves.len() != 2 => false,
            PieceKind::Lion => lion_move(board, piece, from, to),
            PieceKind::Zebra => zebra_move(board, piece, from, to),
            PieceKind::Elephant => elephant_move(board, piece, from, to),
            PieceKind::Giraffe => giraffe_move(board, piece, from, to),
            PieceKind::Crocodile => crocodile_move(board, piece, from, to),
            PieceKind::Pawn => pawn_move(board, piece, from, to),
            PieceKind::Superpawn => superpawn_move(board, piece, from, to),
        };
        if !legal {
            debug!(kind = ?piece.kind, %from, %to, "Illegal move");
            return Ok(false);
        }

        let landed = if piece.kind == PieceKind::Pawn && to.row() == piece.side.far_row() {
            Piece::new(piece.side, PieceKind::Superpawn)
        } else {
            piece
        };
        next.set(to, Some(landed));
        *board = next;
        debug!(kind = ?landed.kind, %from, %to, "Move applied");
        Ok(true)
    }
}
