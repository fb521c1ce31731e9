//! Connection state machine: picks a handler by `(phase, packet id)`.

pub mod init;
pub mod login;
pub mod play;
pub mod status;

use crate::server::ServerContext;
use crate::session::Session;
use lodestone_common::{LodestoneError, Result};
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::Warning;
use lodestone_protocol::{ConnectionPhase, Frame};

/// Handles one inbound frame. Unknown keys are logged and skipped.
///
/// Errors other than a closed session come back as `HandlerFailure`, tagged
/// with the packet that caused them.
pub async fn dispatch(ctx: &ServerContext, session: &mut Session, frame: &Frame) -> Result<()> {
    use ConnectionPhase::*;

    let result = match (frame.phase, frame.packet_id) {
        (Init, 0x00) => init::handshake(session, frame),

        (Status, 0x00) => status::request(ctx, session).await,
        (Status, 0x01) => status::pong(session, frame),

        (Login, 0x00) => login::login_start(ctx, session, frame).await,

        (Play, 0x00) => play::teleport_confirm(session, frame),
        (Play, 0x02) => play::chat(ctx, session, frame).await,
        // Client settings, close window, plugin message, keepalive, abilities.
        (Play, 0x04 | 0x08 | 0x09 | 0x0B | 0x13) => {
            play::ignore(session, frame);
            Ok(())
        }
        (Play, 0x0D) => play::position(ctx, session, frame).await,
        (Play, 0x0E) => play::position_rotation(ctx, session, frame).await,
        (Play, 0x0F) => play::look(session, frame),

        (phase, packet_id) => {
            log(
                format!(
                    "{} unknown packet 0x{:02x} in {} phase ({} bytes)",
                    session.addr(),
                    packet_id,
                    phase,
                    frame.payload.len()
                ),
                Warning,
            );
            Ok(())
        }
    };

    result.map_err(|err| match err {
        LodestoneError::SessionClosed => err,
        other => LodestoneError::HandlerFailure(format!(
            "packet 0x{:02x} in {} phase: {}",
            frame.packet_id, frame.phase, other
        )),
    })
}
