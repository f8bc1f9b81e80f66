//! Outbound responses.

use crate::congo::BoardSnapshot;
use serde::{Deserialize, Serialize};

/// Kind of response, sent as `communicationType`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ResponseType {
    /// A move was accepted and the match continues.
    UpdateBoard,
    /// The match is over.
    EndMatch,
    /// A match was created.
    BeginNewMatch,
    /// An account was created.
    RegistrationSuccess,
    /// An account was removed.
    UnregistrationSuccess,
    /// Credentials were accepted.
    LoginSuccess,
    /// The user logged out.
    LogoutSuccess,
    /// Result of a user lookup.
    SearchResult,
    /// Pending invitation for the user.
    Invitation,
    /// An invitation was accepted and its match created.
    InvitationAccepted,
    /// An invitation was declined.
    InvitationDeclined,
    /// Whether an invitation was delivered.
    InvitationSentStatus,
    /// The move was rejected.
    ErrorInvalidMove,
    /// No running match has the requested id.
    ErrorMatchNotFound,
    /// Credentials were rejected.
    ErrorInvalidLogin,
    /// The account already exists.
    ErrorInvalidRegistration,
    /// Storage or engine failure.
    ErrorInfrastructure,
    /// The `communicationType` is not served.
    ErrorUnsupportedAction,
    /// A required field was missing or inconsistent.
    ErrorMalformedAction,
    /// A named user does not exist.
    ErrorUserNotFound,
    /// No pending invitation matched.
    ErrorInvitationNotFound,
}

/// Server response. Fields that do not apply to the operation stay `None`
/// and are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    /// Response discriminator.
    pub communication_type: ResponseType,
    /// Protocol version.
    pub communication_version: u32,
    /// Match the response refers to.
    #[serde(rename = "matchID", default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    /// Player echoed from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// Piece echoed from the request.
    #[serde(rename = "pieceID", default, skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<String>,
    /// Board after the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_board: Option<BoardSnapshot>,
    /// Player allowed to move next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whose_turn: Option<String>,
    /// Human-readable outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Winner of an ended match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
    /// Loser of an ended match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loser_name: Option<String>,
    /// Numeric error code for error responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
    /// Whether a searched user exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_found: Option<bool>,
    /// Whether an invitation was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_sent: Option<bool>,
    /// Detail for failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Account name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Starting board of a new match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_board: Option<BoardSnapshot>,
    /// Inviting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_from: Option<String>,
    /// Invited user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_to: Option<String>,
    /// When the invitation was sent (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_time: Option<String>,
    /// How the match ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_condition: Option<String>,
    /// When the match ended (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_end_time: Option<String>,
}

impl Update {
    /// Creates an update with only the discriminator and version set.
    pub fn new(communication_type: ResponseType, communication_version: u32) -> Self {
        Self {
            communication_type,
            communication_version,
            match_id: None,
            player_name: None,
            piece_id: None,
            updated_board: None,
            whose_turn: None,
            message: None,
            winner_name: None,
            loser_name: None,
            error_code: None,
            user_found: None,
            invitation_sent: None,
            status_message: None,
            user_email: None,
            user_name: None,
            initial_board: None,
            invitation_from: None,
            invitation_to: None,
            invitation_time: None,
            end_condition: None,
            match_end_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let update = Update::new(ResponseType::LogoutSuccess, 0);
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"communicationType": "logoutSuccess", "communicationVersion": 0})
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(ResponseType::ErrorInvalidMove.to_string(), "errorInvalidMove");
        assert_eq!(
            serde_json::to_string(&ResponseType::UpdateBoard).unwrap(),
            "\"updateBoard\""
        );
        let mut update = Update::new(ResponseType::BeginNewMatch, 0);
        update.match_id = Some("3".to_string());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["matchID"], "3");
    }
}
