use thiserror::Error;

/// Protocol failures reported to clients as `{"error": ...}` frames.
/// All of them are locally recoverable; the connection stays open and
/// the client may retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Room does not exist.")]
    RoomNotFound,
    #[error("Player does not exist in room.")]
    PlayerNotFound,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("No player for this connection.")]
    NotJoined,
    #[error("This connection is already bound to a player.")]
    AlreadyBound,
    #[error("The guesser cannot submit a phrase.")]
    GuesserCannotSubmit,
}
