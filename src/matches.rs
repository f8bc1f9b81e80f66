//! Per-match state and its store.

use crate::congo::{Board, Side};
use derive_getters::Getters;
use derive_more::Display;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a match.
pub type MatchId = String;

/// The two registered players of a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Participants {
    player_one: String,
    player_two: String,
}

impl Participants {
    /// Creates the participant pair. Player one moves first.
    pub fn new(player_one: impl Into<String>, player_two: impl Into<String>) -> Self {
        Self {
            player_one: player_one.into(),
            player_two: player_two.into(),
        }
    }

    /// Name of the player on `side`.
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::PlayerOne => &self.player_one,
            Side::PlayerTwo => &self.player_two,
        }
    }

    /// Side played by `name`, compared by value.
    pub fn side_of(&self, name: &str) -> Option<Side> {
        if self.player_one == name {
            Some(Side::PlayerOne)
        } else if self.player_two == name {
            Some(Side::PlayerTwo)
        } else {
            None
        }
    }
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EndCondition {
    /// A lion was captured.
    #[display("lionCaptured")]
    LionCaptured,
    /// A participant quit.
    #[display("quit")]
    Quit,
}

/// Lifecycle of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// Moves are accepted.
    InProgress,
    /// Terminal; no further moves are processed.
    Ended {
        /// Winning player, if one was determined.
        winner: Option<String>,
        /// Why the match ended.
        condition: EndCondition,
    },
}

impl MatchStatus {
    /// Whether the match has ended.
    pub fn is_ended(&self) -> bool {
        matches!(self, MatchStatus::Ended { .. })
    }
}

/// Mutable state of one match. Only reachable through [`MatchStore::with_match`].
#[derive(Debug, Clone, Getters)]
pub struct MatchState {
    id: MatchId,
    board: Board,
    participants: Participants,
    turn: Side,
    status: MatchStatus,
    moves_played: u32,
}

impl MatchState {
    /// Creates a running match with player one on turn.
    #[instrument(skip(board))]
    pub fn new(id: MatchId, board: Board, participants: Participants) -> Self {
        Self {
            id,
            board,
            participants,
            turn: Side::PlayerOne,
            status: MatchStatus::InProgress,
            moves_played: 0,
        }
    }

    /// Mutable access to the board for the move processor.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Name of the player on turn.
    pub fn whose_turn(&self) -> &str {
        self.participants.name(self.turn)
    }

    /// Records an accepted move and hands the turn to `next`.
    pub fn pass_turn(&mut self, next: Side) {
        self.moves_played += 1;
        self.turn = next;
    }

    /// Ends the match.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn end(&mut self, condition: EndCondition, winner: Option<String>) {
        info!(?winner, %condition, moves = self.moves_played, "Match ended");
        self.status = MatchStatus::Ended { winner, condition };
    }
}

/// Failure to reach a match.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MatchError {
    /// No match has this id.
    #[display("Match {} not found", _0)]
    NotFound(MatchId),
    /// The match is over.
    #[display("Match {} has ended", _0)]
    Ended(MatchId),
    /// A thread panicked while holding the match lock.
    #[display("Match {} state is poisoned", _0)]
    Poisoned(MatchId),
}

impl std::error::Error for MatchError {}

/// Store of running matches.
///
/// Each match sits behind its own mutex, so moves on one match are
/// serialized while different matches proceed in parallel. The map lock is
/// only held to look up, insert or remove entries.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: RwLock<HashMap<MatchId, Arc<Mutex<MatchState>>>>,
    next_id: AtomicU64,
}

impl MatchStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating match store");
        Self::default()
    }

    /// Starts a match on `board` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Poisoned`] if the map lock is poisoned.
    #[instrument(skip(self, board))]
    pub fn create(&self, board: Board, participants: Participants) -> Result<MatchId, MatchError> {
        let id = (self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_string();
        let state = MatchState::new(id.clone(), board, participants);
        let mut matches = self
            .matches
            .write()
            .map_err(|_| MatchError::Poisoned(id.clone()))?;
        matches.insert(id.clone(), Arc::new(Mutex::new(state)));
        info!(match_id = %id, "Created match");
        Ok(id)
    }

    /// Runs `f` with exclusive access to a running match.
    ///
    /// The match lock is held for the whole of `f`. If `f` ends the match it
    /// is removed from the store afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the match does not exist, has ended, or its
    /// lock is poisoned.
    #[instrument(skip(self, f))]
    pub fn with_match<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut MatchState) -> R,
    ) -> Result<R, MatchError> {
        let entry = {
            let matches = self
                .matches
                .read()
                .map_err(|_| MatchError::Poisoned(id.to_string()))?;
            matches.get(id).cloned()
        };
        let Some(entry) = entry else {
            debug!(match_id = id, "Match not found");
            return Err(MatchError::NotFound(id.to_string()));
        };

        let (result, ended) = {
            let mut state = entry.lock().map_err(|_| {
                warn!(match_id = id, "Match lock poisoned");
                MatchError::Poisoned(id.to_string())
            })?;
            if state.status.is_ended() {
                debug!(match_id = id, "Match already ended");
                return Err(MatchError::Ended(id.to_string()));
            }
            let result = f(&mut state);
            (result, state.status.is_ended())
        };

        if ended {
            self.remove(id)?;
        }
        Ok(result)
    }

    /// Returns a copy of a match's state.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the match does not exist or a lock is poisoned.
    #[instrument(skip(self))]
    pub fn snapshot(&self, id: &str) -> Result<MatchState, MatchError> {
        let entry = {
            let matches = self
                .matches
                .read()
                .map_err(|_| MatchError::Poisoned(id.to_string()))?;
            matches.get(id).cloned()
        }
        .ok_or_else(|| MatchError::NotFound(id.to_string()))?;
        let state = entry
            .lock()
            .map_err(|_| MatchError::Poisoned(id.to_string()))?;
        Ok(state.clone())
    }

    /// Ids of all running matches.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<MatchId> {
        match self.matches.read() {
            Ok(matches) => matches.keys().cloned().collect(),
            Err(_) => {
                warn!("Match map lock poisoned");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    fn remove(&self, id: &str) -> Result<(), MatchError> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| MatchError::Poisoned(id.to_string()))?;
        matches.remove(id);
        info!(match_id = id, "Removed ended match");
        Ok(())
    }
}
