//! Error kinds and their wire codes.

use crate::protocol::ResponseType;
use tracing::instrument;

/// Semantic failure reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The `communicationType` is not served.
    UnsupportedAction,
    /// The move was rejected by the rules or the turn order.
    InvalidMove,
    /// No running match has the requested id.
    MatchNotFound,
    /// Credentials were rejected.
    LoginFailure,
    /// The account already exists.
    RegistrationConflict,
    /// Storage or engine failure.
    InfraFailure,
    /// A required field was missing or inconsistent.
    MalformedAction,
    /// A named user does not exist.
    UserNotFound,
    /// No pending invitation matched.
    InvitationNotFound,
}

/// Code and text sent for an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedError {
    /// Numeric error code.
    pub code: u16,
    /// Human-readable message.
    pub message: &'static str,
    /// Response discriminator.
    pub response_type: ResponseType,
}

/// Total mapping from [`ErrorKind`] to [`MappedError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapper;

impl ErrorMapper {
    /// Maps an error kind to its code, message and response type.
    #[instrument]
    pub fn map(kind: ErrorKind) -> MappedError {
        let (code, message, response_type) = match kind {
            ErrorKind::UnsupportedAction => (
                101,
                "Invalid action communication type.",
                ResponseType::ErrorUnsupportedAction,
            ),
            ErrorKind::InvalidMove => (
                102,
                "The requested move is not legal.",
                ResponseType::ErrorInvalidMove,
            ),
            ErrorKind::MatchNotFound => (
                103,
                "GameBoard not found! Unable to make move",
                ResponseType::ErrorMatchNotFound,
            ),
            ErrorKind::LoginFailure => (
                104,
                "The user name or email address is not recognized.",
                ResponseType::ErrorInvalidLogin,
            ),
            ErrorKind::RegistrationConflict => (
                105,
                "A user account with that name already exists.",
                ResponseType::ErrorInvalidRegistration,
            ),
            ErrorKind::InfraFailure => (
                106,
                "The server was unable to complete the request.",
                ResponseType::ErrorInfrastructure,
            ),
            ErrorKind::MalformedAction => (
                107,
                "The request is missing required fields.",
                ResponseType::ErrorMalformedAction,
            ),
            ErrorKind::UserNotFound => (
                108,
                "No user with that name exists.",
                ResponseType::ErrorUserNotFound,
            ),
            ErrorKind::InvitationNotFound => (
                109,
                "No pending invitation was found.",
                ResponseType::ErrorInvitationNotFound,
            ),
        };
        MappedError {
            code,
            message,
            response_type,
        }
    }

    /// Reverse lookup from an error response type.
    pub fn kind_of(response_type: ResponseType) -> Option<ErrorKind> {
        use strum::IntoEnumIterator;
        ErrorKind::iter().find(|kind| Self::map(*kind).response_type == response_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_invalid_move_code() {
        let mapped = ErrorMapper::map(ErrorKind::InvalidMove);
        assert_eq!(mapped.code, 102);
        assert_eq!(mapped.response_type, ResponseType::ErrorInvalidMove);
    }

    #[test]
    fn test_codes_and_types_are_distinct() {
        let mapped: Vec<_> = ErrorKind::iter().map(ErrorMapper::map).collect();
        let codes: HashSet<_> = mapped.iter().map(|m| m.code).collect();
        let types: HashSet<_> = mapped.iter().map(|m| m.response_type).collect();
        assert_eq!(codes.len(), mapped.len());
        assert_eq!(types.len(), mapped.len());
        assert!(mapped.iter().all(|m| !m.message.is_empty()));
    }

    #[test]
    fn test_kind_of_round_trips() {
        for kind in ErrorKind::iter() {
            assert_eq!(ErrorMapper::kind_of(ErrorMapper::map(kind).response_type), Some(kind));
        }
        assert_eq!(ErrorMapper::kind_of(ResponseType::UpdateBoard), None);
    }
}
