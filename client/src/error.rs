use thiserror::Error;

/// Errors surfaced by room and client operations.
///
/// None of these are fatal: a room that returns one is still usable.
#[derive(Error, Debug)]
pub enum RoomError {
    /// A DM-only operation was invoked in a room without a PM target
    #[error("{0} can only be used in a PM")]
    InvalidContext(&'static str),

    #[error("no such room: {0}")]
    UnknownRoom(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
