//! Storage collaborator consulted by the action router.

use crate::db::{DbError, Invitation};
use crate::protocol::Action;
use derive_more::Display;

/// Failure reported by a [`Persistence`] implementation.
#[derive(Debug, Clone, Display)]
pub enum PersistenceError {
    /// The account name is taken.
    #[display("User '{}' already exists", _0)]
    AlreadyExists(String),
    /// Name and email do not match a registered account.
    #[display("Invalid credentials for '{}'", _0)]
    InvalidCredentials(String),
    /// A named user does not exist.
    #[display("User '{}' not found", _0)]
    UnknownUser(String),
    /// No pending invitation between the two users.
    #[display("No pending invitation from '{}' to '{}'", from, to)]
    NoPendingInvitation {
        /// Inviting user.
        from: String,
        /// Invited user.
        to: String,
    },
    /// A user invited themselves.
    #[display("User '{}' cannot invite themselves", _0)]
    SelfInvitation(String),
    /// A field the operation needs was absent from the action.
    #[display("Missing field '{}'", _0)]
    MissingField(&'static str),
    /// The store itself failed.
    #[display("{}", _0)]
    Infra(DbError),
}

impl std::error::Error for PersistenceError {}

impl From<DbError> for PersistenceError {
    fn from(err: DbError) -> Self {
        Self::Infra(err)
    }
}

/// Returns a required string field of an action.
///
/// # Errors
///
/// Returns [`PersistenceError::MissingField`] if the field is absent or blank.
pub fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, PersistenceError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(PersistenceError::MissingField(field))
}

/// User accounts and invitations.
///
/// Calls are independent of match state and may block on storage.
pub trait Persistence: Send + Sync + std::fmt::Debug {
    /// Registers `userName` with `userEmail`.
    fn register_user(&self, action: &Action) -> Result<(), PersistenceError>;

    /// Removes the account `userName`.
    fn unregister_user(&self, action: &Action) -> Result<(), PersistenceError>;

    /// Checks `userName` and `userEmail`, returning the account name.
    fn attempt_login(&self, action: &Action) -> Result<String, PersistenceError>;

    /// Whether an account named `userName` exists.
    fn search_user(&self, action: &Action) -> Result<bool, PersistenceError>;

    /// Stores an invitation from `playerOneName` to `playerTwoName`.
    fn send_game_invitation(&self, action: &Action) -> Result<Invitation, PersistenceError>;

    /// Newest pending invitation addressed to `userName`.
    fn pending_invitation(&self, action: &Action) -> Result<Option<Invitation>, PersistenceError>;

    /// Resolves the newest pending invitation from `playerOneName` to
    /// `playerTwoName`.
    fn respond_to_invitation(
        &self,
        action: &Action,
        accepted: bool,
    ) -> Result<Invitation, PersistenceError>;
}
