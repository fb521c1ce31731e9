use std::io;

use thiserror::Error;

/// Every failure a session can run into, from socket reads to payload decoding.
///
/// All of these are scoped to the session that produced them.
#[derive(Debug, Error)]
pub enum LodestoneError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A VarInt did not terminate within the maximum group count.
    #[error("malformed VarInt")]
    MalformedVarInt,

    /// The peer closed the stream in the middle of a frame.
    #[error("truncated frame")]
    TruncatedFrame,

    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: u64, max: u64 },

    /// A payload ended before a field could be read.
    #[error("payload too short: needed {needed} bytes, {remaining} remaining")]
    ShortPayload { needed: usize, remaining: usize },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid next phase requested in handshake: {0}")]
    InvalidNextPhase(u64),

    /// Anything that went wrong while interpreting a packet.
    #[error("handler failure: {0}")]
    HandlerFailure(String),

    #[error("write failure: {0}")]
    WriteFailure(io::Error),

    #[error("palette is full (capacity {capacity})")]
    PaletteFull { capacity: usize },

    /// The session's outbound queue is gone.
    #[error("session closed")]
    SessionClosed,
}

impl LodestoneError {
    /// True for errors that mean the peer simply went away.
    pub fn is_disconnect(&self) -> bool {
        match self {
            LodestoneError::TruncatedFrame | LodestoneError::SessionClosed => true,
            LodestoneError::Io(err) | LodestoneError::WriteFailure(err) => matches!(
                err.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
