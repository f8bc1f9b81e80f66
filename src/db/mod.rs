//! Persistence layer for user accounts and invitations.

mod error;
mod models;
mod persistence;
mod repository;
mod schema;

pub use error::{DbError, DbErrorKind};
pub use models::{Invitation, InvitationStatus, NewInvitation, NewUser, User};
pub use persistence::{Persistence, PersistenceError, required};
pub use repository::{GameRepository, MIGRATIONS};
