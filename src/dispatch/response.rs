//! Assembly of outbound updates.

use super::{ErrorKind, ErrorMapper};
use crate::congo::BoardSnapshot;
use crate::protocol::{Action, ResponseType, Update};
use tracing::{debug, instrument};

/// Raw result of a move attempt, ready to be wrapped into an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    /// Board after the attempt.
    pub board: BoardSnapshot,
    /// Player on turn after the attempt.
    pub whose_turn: String,
    /// Winner, when the match ended.
    pub winner: Option<String>,
    /// Loser, when the match ended.
    pub loser: Option<String>,
    /// Why a move was rejected.
    pub detail: Option<String>,
}

/// Builds well-formed updates from actions and outcomes.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBuilder {
    version: u32,
}

impl ResponseBuilder {
    /// Creates a builder stamping `version` on every update.
    pub fn new(version: u32) -> Self {
        Self { version }
    }

    /// Protocol version stamped on updates.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Message sent for a response type.
    pub fn catalog_message(response_type: ResponseType) -> &'static str {
        let error = |kind| ErrorMapper::map(kind).message;
        match response_type {
            ResponseType::UpdateBoard => "The player's move was valid and the board has been updated",
            ResponseType::EndMatch => "Lion is captured, Game is Over!",
            ResponseType::BeginNewMatch => "A new match has begun.",
            ResponseType::RegistrationSuccess => "User account has been successfully created.",
            ResponseType::UnregistrationSuccess => "User account has been removed.",
            ResponseType::LoginSuccess => "User has successfully logged in.",
            ResponseType::LogoutSuccess => "User has successfully logged out.",
            ResponseType::SearchResult => "User search completed.",
            ResponseType::Invitation => "You have a pending invitation.",
            ResponseType::InvitationAccepted => "Invitation accepted, the match has begun.",
            ResponseType::InvitationDeclined => "Invitation declined.",
            ResponseType::InvitationSentStatus => "Invitation has been sent.",
            ResponseType::ErrorInvalidMove => error(ErrorKind::InvalidMove),
            ResponseType::ErrorMatchNotFound => error(ErrorKind::MatchNotFound),
            ResponseType::ErrorInvalidLogin => error(ErrorKind::LoginFailure),
            ResponseType::ErrorInvalidRegistration => error(ErrorKind::RegistrationConflict),
            ResponseType::ErrorInfrastructure => error(ErrorKind::InfraFailure),
            ResponseType::ErrorUnsupportedAction => error(ErrorKind::UnsupportedAction),
            ResponseType::ErrorMalformedAction => error(ErrorKind::MalformedAction),
            ResponseType::ErrorUserNotFound => error(ErrorKind::UserNotFound),
            ResponseType::ErrorInvitationNotFound => error(ErrorKind::InvitationNotFound),
        }
    }

    /// Creates an update of `response_type` with version, message and, for
    /// error types, the error code filled in.
    pub fn update(&self, response_type: ResponseType) -> Update {
        let mut update = Update::new(response_type, self.version);
        update.message = Some(Self::catalog_message(response_type).to_string());
        update.error_code = ErrorMapper::kind_of(response_type).map(|kind| ErrorMapper::map(kind).code);
        update
    }

    /// Like [`update`](Self::update), with the identity fields copied from `action`.
    pub fn reply(&self, action: &Action, response_type: ResponseType) -> Update {
        let mut update = self.update(response_type);
        update.match_id = action.match_id.clone();
        update.player_name = action.player_name.clone();
        update.piece_id = action.piece_id.clone();
        update
    }

    /// Wraps a move attempt into its final update.
    #[instrument(skip(self, action, report), fields(match_id = ?action.match_id))]
    pub fn wrap_up(&self, action: &Action, response_type: ResponseType, report: MoveReport) -> Update {
        let mut update = self.reply(action, response_type);
        update.updated_board = Some(report.board);
        update.whose_turn = Some(report.whose_turn);
        update.winner_name = report.winner;
        update.loser_name = report.loser;
        update.status_message = report.detail;
        debug!(whose_turn = ?update.whose_turn, winner = ?update.winner_name, "Wrapped up move response");
        update
    }

    /// Builds the error update for `kind`.
    #[instrument(skip(self, action), fields(communication_type = %action.communication_type))]
    pub fn error(&self, action: &Action, kind: ErrorKind, detail: &str) -> Update {
        let mut update = self.reply(action, ErrorMapper::map(kind).response_type);
        update.status_message = Some(detail.to_string());
        update
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new(crate::protocol::PROTOCOL_VERSION)
    }
}
