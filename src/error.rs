//! Error types for the chat server
//!
//! Defines application-level errors and room send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers startup failures and session-fatal errors. A session error
/// never escalates past the session that hit it.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal to the session, or to startup if the bind fails)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A room's command channel is gone (room actor stopped)
    #[error("room channel closed")]
    RoomClosed,

    /// No room names were given at startup
    #[error("no chat rooms configured")]
    NoRooms,
}

/// Room send errors
///
/// Occurs when posting a command to a room whose actor has stopped.
/// Room actors run for the process lifetime, so in practice this only
/// shows up in tests that drop a room.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the room channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}

impl From<SendError> for AppError {
    fn from(_: SendError) -> Self {
        AppError::RoomClosed
    }
}
