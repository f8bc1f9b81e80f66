//! SQLite repository for user accounts and invitations.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, DbErrorKind, Invitation, InvitationStatus, NewInvitation, NewUser, Persistence,
    PersistenceError, User, required, schema,
};
use crate::protocol::Action;

/// Applied to every new connection. Requests run on parallel blocking
/// threads, each with its own connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for account and invitation operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a repository for the database at the given path without
    /// touching the schema.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repository = Self::new(db_path)?;
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Applies pending migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Establishes a database connection that waits on locks held by
    /// concurrent writers instead of failing.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(CONNECTION_PRAGMAS).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to configure '{}': {}", self.db_path, e),
            )
        })?;
        Ok(conn)
    }

    /// Creates a user account.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is taken or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_user(&self, user_name: &str, user_email: &str) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        let new_user = NewUser::new(user_name.to_string(), user_email.to_string());

        let user = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), user_name = %user.user_name(), "User created");
        Ok(user)
    }

    /// Gets a user by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, user_name: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::user_name.eq(user_name))
            .first::<User>(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "Looked up user");
        Ok(user)
    }

    /// Whether a user with this name exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn user_exists(&self, user_name: &str) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let exists = diesel::select(diesel::dsl::exists(
            schema::users::table.filter(schema::users::user_name.eq(user_name)),
        ))
        .get_result::<bool>(&mut conn)?;
        Ok(exists)
    }

    /// Deletes a user, returning whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_user(&self, user_name: &str) -> Result<bool, DbError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(
            schema::users::table.filter(schema::users::user_name.eq(user_name)),
        )
        .execute(&mut conn)?;
        info!(removed, "User delete finished");
        Ok(removed > 0)
    }

    /// Records a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn create_invitation(&self, from_user: &str, to_user: &str) -> Result<Invitation, DbError> {
        let mut conn = self.connection()?;
        let new_invitation = NewInvitation::new(
            from_user.to_string(),
            to_user.to_string(),
            InvitationStatus::Pending.to_db_string().to_string(),
        );

        let invitation = diesel::insert_into(schema::invitations::table)
            .values(&new_invitation)
            .returning(Invitation::as_returning())
            .get_result(&mut conn)?;

        info!(invitation_id = invitation.id(), "Invitation stored");
        Ok(invitation)
    }

    /// Newest pending invitation addressed to `to_user`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn latest_pending_invitation(&self, to_user: &str) -> Result<Option<Invitation>, DbError> {
        let mut conn = self.connection()?;
        let pending = InvitationStatus::Pending.to_db_string();

        let invitation = schema::invitations::table
            .filter(schema::invitations::to_user.eq(to_user))
            .filter(schema::invitations::status.eq(pending))
            .order((
                schema::invitations::sent_at.desc(),
                schema::invitations::id.desc(),
            ))
            .first::<Invitation>(&mut conn)
            .optional()?;

        debug!(found = invitation.is_some(), "Looked up pending invitation");
        Ok(invitation)
    }

    /// Sets the status of the newest pending invitation between two users.
    /// Returns `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn resolve_invitation(
        &self,
        from_user: &str,
        to_user: &str,
        status: InvitationStatus,
    ) -> Result<Option<Invitation>, DbError> {
        let mut conn = self.connection()?;
        let pending = InvitationStatus::Pending.to_db_string();

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let Some(invitation) = schema::invitations::table
                .filter(schema::invitations::from_user.eq(from_user))
                .filter(schema::invitations::to_user.eq(to_user))
                .filter(schema::invitations::status.eq(pending))
                .order((
                    schema::invitations::sent_at.desc(),
                    schema::invitations::id.desc(),
                ))
                .first::<Invitation>(conn)
                .optional()?
            else {
                debug!("No pending invitation to resolve");
                return Ok(None);
            };

            let resolved = diesel::update(schema::invitations::table.find(*invitation.id()))
                .set(schema::invitations::status.eq(status.to_db_string()))
                .returning(Invitation::as_returning())
                .get_result(conn)?;

            info!(invitation_id = resolved.id(), status = %resolved.status(), "Invitation resolved");
            Ok(Some(resolved))
        })
    }
}

impl Persistence for GameRepository {
    #[instrument(skip(self, action), fields(user_name = ?action.user_name))]
    fn register_user(&self, action: &Action) -> Result<(), PersistenceError> {
        let user_name = required(&action.user_name, "userName")?;
        let user_email = required(&action.user_email, "userEmail")?;
        match self.create_user(user_name, user_email) {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => {
                warn!(%user_name, "Registration conflict");
                Err(PersistenceError::AlreadyExists(user_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, action), fields(user_name = ?action.user_name))]
    fn unregister_user(&self, action: &Action) -> Result<(), PersistenceError> {
        let user_name = required(&action.user_name, "userName")?;
        if self.delete_user(user_name)? {
            Ok(())
        } else {
            Err(PersistenceError::UnknownUser(user_name.to_string()))
        }
    }

    #[instrument(skip(self, action), fields(user_name = ?action.user_name))]
    fn attempt_login(&self, action: &Action) -> Result<String, PersistenceError> {
        let user_name = required(&action.user_name, "userName")?;
        let user_email = required(&action.user_email, "userEmail")?;
        match self.get_user_by_name(user_name)? {
            Some(user) if user.user_email() == user_email => Ok(user.user_name().clone()),
            _ => {
                warn!(%user_name, "Login rejected");
                Err(PersistenceError::InvalidCredentials(user_name.to_string()))
            }
        }
    }

    #[instrument(skip(self, action), fields(user_name = ?action.user_name))]
    fn search_user(&self, action: &Action) -> Result<bool, PersistenceError> {
        let user_name = required(&action.user_name, "userName")?;
        Ok(self.user_exists(user_name)?)
    }

    #[instrument(skip(self, action), fields(from = ?action.player_one_name, to = ?action.player_two_name))]
    fn send_game_invitation(&self, action: &Action) -> Result<Invitation, PersistenceError> {
        let from = required(&action.player_one_name, "playerOneName")?;
        let to = required(&action.player_two_name, "playerTwoName")?;
        if from == to {
            warn!(%from, "Self invitation rejected");
            return Err(PersistenceError::SelfInvitation(from.to_string()));
        }
        for user_name in [from, to] {
            if !self.user_exists(user_name)? {
                return Err(PersistenceError::UnknownUser(user_name.to_string()));
            }
        }
        Ok(self.create_invitation(from, to)?)
    }

    #[instrument(skip(self, action), fields(user_name = ?action.user_name))]
    fn pending_invitation(&self, action: &Action) -> Result<Option<Invitation>, PersistenceError> {
        let user_name = required(&action.user_name, "userName")?;
        Ok(self.latest_pending_invitation(user_name)?)
    }

    #[instrument(skip(self, action), fields(from = ?action.player_one_name, to = ?action.player_two_name))]
    fn respond_to_invitation(
        &self,
        action: &Action,
        accepted: bool,
    ) -> Result<Invitation, PersistenceError> {
        let from = required(&action.player_one_name, "playerOneName")?;
        let to = required(&action.player_two_name, "playerTwoName")?;
        let status = if accepted {
            InvitationStatus::Accepted
        } else {
            InvitationStatus::Declined
        };
        self.resolve_invitation(from, to, status)?
            .ok_or_else(|| PersistenceError::NoPendingInvitation {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}
