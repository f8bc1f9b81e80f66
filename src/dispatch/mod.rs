//! Action dispatch: routing, move processing and response construction.

mod error_mapper;
mod moves;
mod response;
mod router;
mod turn;
mod win;

pub use error_mapper::{ErrorKind, ErrorMapper, MappedError};
pub use moves::{MoveOutcome, MoveProcessor, Rejection};
pub use response::{MoveReport, ResponseBuilder};
pub use router::{ActionRouter, Outcome};
pub use turn::TurnScheduler;
pub use win::WinDetector;
