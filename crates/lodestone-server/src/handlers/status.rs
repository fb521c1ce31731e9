use crate::server::ServerContext;
use crate::server_list;
use crate::session::Session;
use lodestone_common::Result;
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::Debug;
use lodestone_protocol::status::{PingPacket, StatusResponsePacket};
use lodestone_protocol::{ConnectionPhase, Frame, ReadPacket};
use rand::Rng;

/// Status request: server list document, then a ping. The session ends
/// after this exchange.
pub async fn request(ctx: &ServerContext, session: &mut Session) -> Result<()> {
    let response = server_list::build(&ctx.config, &ctx.registry).await?;
    session.handle.send(&StatusResponsePacket { response }).await?;

    let nonce = rand::thread_rng().gen_range(0..=i64::MAX);
    session.handle.send(&PingPacket { nonce }).await?;
    log(format!("{} sent ping {}", session.addr(), nonce), Debug);

    session.handle.advance(ConnectionPhase::Closed);
    Ok(())
}

pub fn pong(session: &mut Session, frame: &Frame) -> Result<()> {
    let pong = PingPacket::from_frame(frame)?;
    log(format!("{} pong {}", session.addr(), pong.nonce), Debug);
    Ok(())
}
