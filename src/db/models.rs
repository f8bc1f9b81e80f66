//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};

/// User account database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    user_name: String,
    user_email: String,
    created_at: NaiveDateTime,
}

/// Insertable user model for registering accounts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    user_name: String,
    user_email: String,
}

/// Invitation database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::invitations)]
pub struct Invitation {
    id: i32,
    from_user: String,
    to_user: String,
    sent_at: NaiveDateTime,
    status: String,
}

impl Invitation {
    /// Parses the stored status string.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn parse_status(&self) -> Result<InvitationStatus, DbError> {
        InvitationStatus::from_db_string(&self.status)
    }

    /// Send time in RFC 3339, interpreted as UTC.
    pub fn sent_at_rfc3339(&self) -> String {
        self.sent_at.and_utc().to_rfc3339()
    }
}

/// Insertable invitation model.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::invitations)]
pub struct NewInvitation {
    from_user: String,
    to_user: String,
    status: String,
}

/// State of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvitationStatus {
    /// Waiting for an answer.
    Pending,
    /// The invitee accepted.
    Accepted,
    /// The invitee declined.
    Declined,
}

impl InvitationStatus {
    /// Converts the status to the string stored in the database.
    #[instrument]
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Parses a status from the string stored in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid status.
    #[instrument(skip(s), fields(s = %s))]
    pub fn from_db_string(s: &str) -> Result<Self, DbError> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            _ => Err(DbError::new(
                DbErrorKind::Query,
                format!("Invalid invitation status: '{}'", s),
            )),
        }
    }
}
