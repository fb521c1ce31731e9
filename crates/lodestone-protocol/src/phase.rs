use lodestone_common::{LodestoneError, Result};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Protocol stage of a connection. The same packet ID means different things
/// in different phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ConnectionPhase {
    Init = 0,
    Status = 1,
    Login = 2,
    Play = 3,
    Closed = 4,
}

impl ConnectionPhase {
    /// Maps the `next state` field of a handshake.
    pub fn from_next_state(value: u64) -> Result<Self> {
        match value {
            1 => Ok(ConnectionPhase::Status),
            2 => Ok(ConnectionPhase::Login),
            other => Err(LodestoneError::InvalidNextPhase(other)),
        }
    }

    pub fn is_closed(self) -> bool {
        self == ConnectionPhase::Closed
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionPhase::Init,
            1 => ConnectionPhase::Status,
            2 => ConnectionPhase::Login,
            3 => ConnectionPhase::Play,
            _ => ConnectionPhase::Closed,
        }
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionPhase::Init => "init",
            ConnectionPhase::Status => "status",
            ConnectionPhase::Login => "login",
            ConnectionPhase::Play => "play",
            ConnectionPhase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Phase cell shared between a session's read loop (the only writer) and its
/// write loop. Only ever moves forward.
#[derive(Debug, Clone)]
pub struct SharedPhase(Arc<AtomicU8>);

impl SharedPhase {
    pub fn new(phase: ConnectionPhase) -> Self {
        Self(Arc::new(AtomicU8::new(phase as u8)))
    }

    pub fn get(&self) -> ConnectionPhase {
        ConnectionPhase::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves to `phase` unless the connection is already past it.
    /// Returns the phase that was current before the call.
    pub fn advance(&self, phase: ConnectionPhase) -> ConnectionPhase {
        ConnectionPhase::from_u8(self.0.fetch_max(phase as u8, Ordering::AcqRel))
    }

    pub fn is_closed(&self) -> bool {
        self.get().is_closed()
    }
}

impl Default for SharedPhase {
    fn default() -> Self {
        Self::new(ConnectionPhase::Init)
    }
}
