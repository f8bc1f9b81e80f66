//! Dispatch of actions to their handlers.

use super::{
    ErrorKind, MoveOutcome, MoveProcessor, MoveReport, Rejection, ResponseBuilder, TurnScheduler,
    WinDetector,
};
use crate::congo::RulesEngine;
use crate::db::{Invitation, Persistence, PersistenceError};
use crate::matches::{EndCondition, MatchError, MatchState, MatchStore, Participants};
use crate::protocol::{Action, ActionType, ResponseType, Update};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Result of a handler before it becomes an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation produced its payload.
    Success(T),
    /// The operation failed.
    Error {
        /// Semantic kind of the failure.
        kind: ErrorKind,
        /// Detail for logs and `statusMessage`.
        detail: String,
    },
    /// The action type is not served.
    Unsupported(String),
}

impl<T> Outcome<T> {
    fn error(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Outcome::Error {
            kind,
            detail: detail.into(),
        }
    }
}

impl<T> From<PersistenceError> for Outcome<T> {
    fn from(err: PersistenceError) -> Self {
        let kind = match &err {
            PersistenceError::AlreadyExists(_) => ErrorKind::RegistrationConflict,
            PersistenceError::InvalidCredentials(_) => ErrorKind::LoginFailure,
            PersistenceError::UnknownUser(_) => ErrorKind::UserNotFound,
            PersistenceError::NoPendingInvitation { .. } => ErrorKind::InvitationNotFound,
            PersistenceError::MissingField(_) | PersistenceError::SelfInvitation(_) => {
                ErrorKind::MalformedAction
            }
            PersistenceError::Infra(_) => ErrorKind::InfraFailure,
        };
        Outcome::error(kind, err.to_string())
    }
}

impl<T> From<MatchError> for Outcome<T> {
    fn from(err: MatchError) -> Self {
        let kind = match &err {
            MatchError::NotFound(_) | MatchError::Ended(_) => ErrorKind::MatchNotFound,
            MatchError::Poisoned(_) => ErrorKind::InfraFailure,
        };
        Outcome::error(kind, err.to_string())
    }
}

/// Turns each [`Action`] into exactly one [`Update`].
#[derive(Debug)]
pub struct ActionRouter {
    persistence: Arc<dyn Persistence>,
    moves: MoveProcessor,
    matches: MatchStore,
    builder: ResponseBuilder,
}

impl ActionRouter {
    /// Creates a router over the given collaborators.
    #[instrument(skip(persistence, engine))]
    pub fn new(
        persistence: Arc<dyn Persistence>,
        engine: Arc<dyn RulesEngine>,
        builder: ResponseBuilder,
    ) -> Self {
        info!(version = builder.version(), "Creating action router");
        Self {
            persistence,
            moves: MoveProcessor::new(engine),
            matches: MatchStore::new(),
            builder,
        }
    }

    /// Running matches.
    pub fn matches(&self) -> &MatchStore {
        &self.matches
    }

    /// Response builder in use.
    pub fn builder(&self) -> &ResponseBuilder {
        &self.builder
    }

    /// Handles one action.
    #[instrument(skip(self, action), fields(communication_type = %action.communication_type, match_id = ?action.match_id))]
    pub fn route(&self, action: Action) -> Update {
        debug!(?action, "Routing action");
        let outcome = match &action.communication_type {
            ActionType::RequestMoves => self.request_moves(&action),
            ActionType::RegisterUser => self.register_user(&action),
            ActionType::RequestBeginNewMatch => self.begin_new_match(&action),
            ActionType::Invitation => self.invitation(&action),
            ActionType::InvitationResponse => self.invitation_response(&action),
            ActionType::QuitMatch => self.quit_match(&action),
            ActionType::UnregisterUser => self.unregister_user(&action),
            ActionType::AttemptLogin => self.log_in(&action),
            ActionType::AttemptLogout => self.log_out(&action),
            ActionType::SearchUser => self.search_user(&action),
            ActionType::SendInvitation => self.send_invitation(&action),
            ActionType::Unknown(other) => Outcome::Unsupported(other.clone()),
        };

        match outcome {
            Outcome::Success(update) => {
                debug!(response = %update.communication_type, "Action handled");
                update
            }
            Outcome::Error { kind, detail } => {
                warn!(%kind, %detail, "Action failed");
                self.builder.error(&action, kind, &detail)
            }
            Outcome::Unsupported(other) => {
                error!(communication_type = %other, "Unsupported action type");
                self.builder.error(
                    &action,
                    ErrorKind::UnsupportedAction,
                    &format!("Unsupported communication type '{}'", other),
                )
            }
        }
    }

    /// Answers a request body that could not be parsed as an action.
    #[instrument(skip(self))]
    pub fn reject_malformed(&self, detail: &str) -> Update {
        error!(%detail, "Malformed action");
        let action = Action::new(ActionType::Unknown(String::new()));
        self.builder.error(&action, ErrorKind::UnsupportedAction, detail)
    }

    #[instrument(skip(self, action))]
    fn request_moves(&self, action: &Action) -> Outcome<Update> {
        let Some(match_id) = action.match_id.as_deref() else {
            return Outcome::error(ErrorKind::MatchNotFound, "Action has no matchID");
        };
        let Some(player) = action.player_name.as_deref() else {
            return Outcome::error(ErrorKind::MalformedAction, "Action has no playerName");
        };
        match self
            .matches
            .with_match(match_id, |state| self.play_move(state, action, player))
        {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        }
    }

    /// Runs a move attempt under the match lock and classifies it.
    fn play_move(&self, state: &mut MatchState, action: &Action, player: &str) -> Outcome<Update> {
        let mover = match state.participants().side_of(player) {
            Some(side) if side == *state.turn() => side,
            Some(_) => return self.reject_move(state, action, Rejection::OutOfTurn),
            None => return self.reject_move(state, action, Rejection::NotAParticipant),
        };

        let before = state.board().clone();
        let outcome = match self.moves.process(state.board_mut(), mover, &action.desired_moves) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "Rules engine fault");
                return Outcome::error(ErrorKind::InfraFailure, e.to_string());
            }
        };

        match outcome {
            MoveOutcome::Accepted => {
                let (next, _) = TurnScheduler::next(mover, state.participants());
                state.pass_turn(next);
                Outcome::Success(self.builder.wrap_up(
                    action,
                    ResponseType::UpdateBoard,
                    self.report(state, None),
                ))
            }
            MoveOutcome::AcceptedTerminal => {
                let landing = action.desired_moves.last().copied();
                let winner = landing.and_then(|landing| {
                    WinDetector::detect(self.moves.engine(), state.board(), landing, state.participants())
                });
                let Some(winner) = winner else {
                    *state.board_mut() = before;
                    return Outcome::error(ErrorKind::InfraFailure, "Match ended without a winner");
                };
                let (next, _) = TurnScheduler::next(mover, state.participants());
                state.pass_turn(next);
                state.end(EndCondition::LionCaptured, Some(winner.clone()));
                let loser = state.participants().name(mover.opponent()).to_string();
                let mut update = self.builder.wrap_up(
                    action,
                    ResponseType::EndMatch,
                    self.report(state, Some((winner, loser))),
                );
                update.end_condition = Some(EndCondition::LionCaptured.to_string());
                update.match_end_time = Some(Utc::now().to_rfc3339());
                Outcome::Success(update)
            }
            MoveOutcome::Rejected(rejection) => self.reject_move(state, action, rejection),
        }
    }

    fn reject_move(
        &self,
        state: &MatchState,
        action: &Action,
        rejection: Rejection,
    ) -> Outcome<Update> {
        warn!(%rejection, match_id = %state.id(), "Move rejected");
        let mut report = self.report(state, None);
        report.detail = Some(rejection.to_string());
        Outcome::Success(self.builder.wrap_up(action, ResponseType::ErrorInvalidMove, report))
    }

    fn report(&self, state: &MatchState, result: Option<(String, String)>) -> MoveReport {
        let (winner, loser) = result.unzip();
        MoveReport {
            board: self.moves.engine().snapshot(state.board()),
            whose_turn: state.whose_turn().to_string(),
            winner,
            loser,
            detail: None,
        }
    }

    /// Starts a match and fills the fields shared by match-creating responses.
    fn start_match(
        &self,
        response_type: ResponseType,
        participants: Participants,
    ) -> Outcome<Update> {
        if participants.player_one() == participants.player_two() {
            return Outcome::error(ErrorKind::MalformedAction, "A match needs two different players");
        }
        let board = self.moves.engine().initialize();
        let initial_board = self.moves.engine().snapshot(&board);
        let whose_turn = participants.player_one().clone();
        match self.matches.create(board, participants) {
            Ok(match_id) => {
                let mut update = self.builder.update(response_type);
                update.match_id = Some(match_id);
                update.initial_board = Some(initial_board);
                update.whose_turn = Some(whose_turn);
                Outcome::Success(update)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, action))]
    fn begin_new_match(&self, action: &Action) -> Outcome<Update> {
        let (Some(one), Some(two)) = (&action.player_one_name, &action.player_two_name) else {
            return Outcome::error(ErrorKind::MalformedAction, "Both player names are required");
        };
        self.start_match(ResponseType::BeginNewMatch, Participants::new(one, two))
    }

    #[instrument(skip(self, action))]
    fn quit_match(&self, action: &Action) -> Outcome<Update> {
        let Some(match_id) = action.match_id.as_deref() else {
            return Outcome::error(ErrorKind::MatchNotFound, "Action has no matchID");
        };
        let Some(player) = action.player_name.as_deref() else {
            return Outcome::error(ErrorKind::MalformedAction, "Action has no playerName");
        };
        let result = self.matches.with_match(match_id, |state| {
            let Some(side) = state.participants().side_of(player) else {
                return Outcome::error(ErrorKind::MalformedAction, "Player is not in this match");
            };
            let winner = state.participants().name(side.opponent()).to_string();
            state.end(EndCondition::Quit, Some(winner.clone()));

            let mut update = self.builder.reply(action, ResponseType::EndMatch);
            update.message = Some(format!("{} quit the match.", player));
            update.winner_name = Some(winner);
            update.loser_name = Some(player.to_string());
            update.end_condition = Some(EndCondition::Quit.to_string());
            update.match_end_time = Some(Utc::now().to_rfc3339());
            Outcome::Success(update)
        });
        result.unwrap_or_else(Outcome::from)
    }

    #[instrument(skip(self, action))]
    fn register_user(&self, action: &Action) -> Outcome<Update> {
        if let Err(e) = self.persistence.register_user(action) {
            return e.into();
        }
        info!(user_name = ?action.user_name, "User registered");
        let mut update = self.builder.update(ResponseType::RegistrationSuccess);
        update.user_email = action.user_email.clone();
        update.user_name = action.user_name.clone();
        Outcome::Success(update)
    }

    #[instrument(skip(self, action))]
    fn unregister_user(&self, action: &Action) -> Outcome<Update> {
        if let Err(e) = self.persistence.unregister_user(action) {
            return e.into();
        }
        let mut update = self.builder.update(ResponseType::UnregistrationSuccess);
        update.user_name = action.user_name.clone();
        Outcome::Success(update)
    }

    #[instrument(skip(self, action))]
    fn log_in(&self, action: &Action) -> Outcome<Update> {
        match self.persistence.attempt_login(action) {
            Ok(user_name) => {
                info!(%user_name, "User logged in");
                let mut update = self.builder.update(ResponseType::LoginSuccess);
                update.user_name = Some(user_name);
                update.user_email = action.user_email.clone();
                Outcome::Success(update)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, action))]
    fn log_out(&self, action: &Action) -> Outcome<Update> {
        let mut update = self.builder.update(ResponseType::LogoutSuccess);
        update.user_name = action.user_name.clone();
        Outcome::Success(update)
    }

    #[instrument(skip(self, action))]
    fn search_user(&self, action: &Action) -> Outcome<Update> {
        match self.persistence.search_user(action) {
            Ok(found) => {
                let mut update = self.builder.update(ResponseType::SearchResult);
                update.user_name = action.user_name.clone();
                update.user_found = Some(found);
                Outcome::Success(update)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, action))]
    fn send_invitation(&self, action: &Action) -> Outcome<Update> {
        let mut update = self.builder.update(ResponseType::InvitationSentStatus);
        match self.persistence.send_game_invitation(action) {
            Ok(invitation) => {
                fill_invitation(&mut update, &invitation);
                update.invitation_sent = Some(true);
                Outcome::Success(update)
            }
            Err(PersistenceError::UnknownUser(name)) => {
                warn!(%name, "Invitation to or from unknown user");
                update.invitation_sent = Some(false);
                update.message = Some("Invitation could not be sent.".to_string());
                update.status_message = Some(format!("User '{}' not found", name));
                Outcome::Success(update)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, action))]
    fn invitation(&self, action: &Action) -> Outcome<Update> {
        match self.persistence.pending_invitation(action) {
            Ok(pending) => {
                let mut update = self.builder.update(ResponseType::Invitation);
                update.user_name = action.user_name.clone();
                match pending {
                    Some(invitation) => fill_invitation(&mut update, &invitation),
                    None => update.message = Some("No pending invitations.".to_string()),
                }
                Outcome::Success(update)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, action))]
    fn invitation_response(&self, action: &Action) -> Outcome<Update> {
        let Some(accepted) = action.invitation_accepted else {
            return Outcome::error(ErrorKind::MalformedAction, "Action has no invitationAccepted");
        };
        let same_players =
            action.player_one_name.is_some() && action.player_one_name == action.player_two_name;
        if accepted && same_players {
            return Outcome::error(ErrorKind::MalformedAction, "A match needs two different players");
        }
        let invitation = match self.persistence.respond_to_invitation(action, accepted) {
            Ok(invitation) => invitation,
            Err(e) => return e.into(),
        };

        if !accepted {
            let mut update = self.builder.update(ResponseType::InvitationDeclined);
            fill_invitation(&mut update, &invitation);
            return Outcome::Success(update);
        }

        let participants = Participants::new(invitation.from_user(), invitation.to_user());
        let mut outcome = self.start_match(ResponseType::InvitationAccepted, participants);
        if let Outcome::Success(update) = &mut outcome {
            fill_invitation(update, &invitation);
        }
        outcome
    }
}

fn fill_invitation(update: &mut Update, invitation: &Invitation) {
    update.invitation_from = Some(invitation.from_user().clone());
    update.invitation_to = Some(invitation.to_user().clone());
    update.invitation_time = Some(invitation.sent_at_rfc3339());
}
