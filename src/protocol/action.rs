//! Inbound requests.

use crate::congo::Coordinate;
use serde::{Deserialize, Serialize};

/// Operation requested by a client, keyed by `communicationType`.
///
/// Strings outside the catalog become [`ActionType::Unknown`] so that they
/// can be answered rather than failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    /// Play a move in a running match.
    RequestMoves,
    /// Create a user account.
    RegisterUser,
    /// Start a match between two named players.
    RequestBeginNewMatch,
    /// Fetch the newest pending invitation.
    Invitation,
    /// Accept or decline an invitation.
    InvitationResponse,
    /// Abandon a running match.
    QuitMatch,
    /// Remove a user account.
    UnregisterUser,
    /// Log in.
    AttemptLogin,
    /// Log out.
    AttemptLogout,
    /// Look up a user by name.
    SearchUser,
    /// Invite another user to a match.
    SendInvitation,
    /// Anything else.
    Unknown(String),
}

impl ActionType {
    /// Parses a wire discriminator.
    pub fn parse(value: &str) -> Self {
        match value {
            "requestMoves" => Self::RequestMoves,
            "registerUser" => Self::RegisterUser,
            "requestBeginNewMatch" => Self::RequestBeginNewMatch,
            "invitation" => Self::Invitation,
            "invitationResponse" => Self::InvitationResponse,
            "quitMatch" => Self::QuitMatch,
            "unregisterUser" => Self::UnregisterUser,
            "attemptLogin" => Self::AttemptLogin,
            "attemptLogout" => Self::AttemptLogout,
            "searchUser" => Self::SearchUser,
            "sendInvitation" => Self::SendInvitation,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire discriminator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequestMoves => "requestMoves",
            Self::RegisterUser => "registerUser",
            Self::RequestBeginNewMatch => "requestBeginNewMatch",
            Self::Invitation => "invitation",
            Self::InvitationResponse => "invitationResponse",
            Self::QuitMatch => "quitMatch",
            Self::UnregisterUser => "unregisterUser",
            Self::AttemptLogin => "attemptLogin",
            Self::AttemptLogout => "attemptLogout",
            Self::SearchUser => "searchUser",
            Self::SendInvitation => "sendInvitation",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client request. Consumed exactly once by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Operation discriminator.
    pub communication_type: ActionType,
    /// Target match.
    #[serde(rename = "matchID", default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
    /// Player issuing the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// First participant (moves first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_one_name: Option<String>,
    /// Second participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_two_name: Option<String>,
    /// Client-side identifier of the moved piece.
    #[serde(rename = "pieceID", default, skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<String>,
    /// Origin followed by every landing square.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub desired_moves: Vec<Coordinate>,
    /// Account name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Answer to an invitation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_accepted: Option<bool>,
}

impl Action {
    /// Creates an action with only the discriminator set.
    pub fn new(communication_type: ActionType) -> Self {
        Self {
            communication_type,
            match_id: None,
            player_name: None,
            player_one_name: None,
            player_two_name: None,
            piece_id: None,
            desired_moves: Vec::new(),
            user_name: None,
            user_email: None,
            invitation_accepted: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_request() {
        let json = r#"{
            "communicationType": "requestMoves",
            "matchID": "7",
            "playerName": "ann",
            "pieceID": "P3",
            "desiredMoves": [35, 28]
        }"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action.communication_type, ActionType::RequestMoves);
        assert_eq!(action.match_id.as_deref(), Some("7"));
        assert_eq!(action.desired_moves, vec![Coordinate::new(35), Coordinate::new(28)]);
        assert_eq!(action.user_name, None);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let action: Action = serde_json::from_str(r#"{"communicationType": "danceParty"}"#).unwrap();
        assert_eq!(action.communication_type, ActionType::Unknown("danceParty".to_string()));
        assert_eq!(action.communication_type.as_str(), "danceParty");
    }

    #[test]
    fn test_discriminator_compared_by_value() {
        let owned = String::from("quit") + "Match";
        assert_eq!(ActionType::parse(&owned), ActionType::QuitMatch);
    }
}
