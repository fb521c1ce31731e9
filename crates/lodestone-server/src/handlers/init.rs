use crate::session::Session;
use lodestone_common::Result;
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::{Debug, Warning};
use lodestone_protocol::handshake::HandshakePacket;
use lodestone_protocol::{ConnectionPhase, Frame, ReadPacket, PROTOCOL_VERSION};

/// Handshake: moves the session to the requested phase.
pub fn handshake(session: &mut Session, frame: &Frame) -> Result<()> {
    let handshake = HandshakePacket::from_frame(frame)?;
    let next_phase = ConnectionPhase::from_next_state(handshake.next_state)?;
    log(
        format!(
            "{} connecting to {}:{} with protocol {}, next phase {}",
            session.addr(),
            handshake.server_address,
            handshake.server_port,
            handshake.protocol_version,
            next_phase
        ),
        Debug,
    );
    if handshake.protocol_version != PROTOCOL_VERSION as u64 && next_phase == ConnectionPhase::Login {
        log(
            format!(
                "{} uses protocol {}, expected {}",
                session.addr(),
                handshake.protocol_version,
                PROTOCOL_VERSION
            ),
            Warning,
        );
    }
    session.handle.advance(next_phase);
    Ok(())
}
