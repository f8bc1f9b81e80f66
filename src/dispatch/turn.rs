//! Turn alternation.

use crate::congo::Side;
use crate::matches::Participants;
use tracing::{debug, instrument};

/// Hands the turn to the other participant after an accepted move.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnScheduler;

impl TurnScheduler {
    /// Returns the side and name of the participant who moves next.
    #[instrument(skip(participants))]
    pub fn next<'a>(current: Side, participants: &'a Participants) -> (Side, &'a str) {
        let next = current.opponent();
        let name = participants.name(next);
        debug!(?next, player = name, "Turn passes");
        (next, name)
    }
}
