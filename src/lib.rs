//! Congo server library - turn-based Congo matches over a JSON action protocol
//!
//! Clients send [`Action`] messages and receive exactly one [`Update`] each.
//!
//! # Architecture
//!
//! - **Protocol**: wire types for actions and updates
//! - **Congo**: board model and the [`RulesEngine`] seam with [`CongoRules`]
//! - **Matches**: running matches, each behind its own lock
//! - **Dispatch**: routing, move processing, turn order, win detection, errors
//! - **Db**: accounts and invitations in SQLite
//! - **Server**: `POST /action` over HTTP
//!
//! # Example
//!
//! ```no_run
//! use congo_server::{ActionRouter, CongoRules, GameRepository, ResponseBuilder};
//! use std::sync::Arc;
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::open("congo.db".to_string())?;
//! let router = ActionRouter::new(
//!     Arc::new(repository),
//!     Arc::new(CongoRules::new()),
//!     ResponseBuilder::default(),
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
mod congo;
mod db;
mod dispatch;
mod matches;
mod protocol;
mod server;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Game rules
pub use congo::{
    BOARD_SIZE, Board, BoardSnapshot, CongoRules, Coordinate, Piece, PieceKind, RIVER_ROW,
    RulesEngine, RulesError, SQUARE_COUNT, Side,
};

// Crate-level exports - Persistence
pub use db::{
    DbError, DbErrorKind, GameRepository, Invitation, InvitationStatus, MIGRATIONS, Persistence,
    PersistenceError, User, required,
};

// Crate-level exports - Dispatch
pub use dispatch::{
    ActionRouter, ErrorKind, ErrorMapper, MappedError, MoveOutcome, MoveProcessor, MoveReport,
    Outcome, Rejection, ResponseBuilder, TurnScheduler, WinDetector,
};

// Crate-level exports - Matches
pub use matches::{
    EndCondition, MatchError, MatchId, MatchState, MatchStatus, MatchStore, Participants,
};

// Crate-level exports - Protocol
pub use protocol::{Action, ActionType, PROTOCOL_VERSION, ResponseType, Update};

// Crate-level exports - Transport
pub use server::{app, handle_action, serve};
