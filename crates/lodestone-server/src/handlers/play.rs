use crate::commands::{self, Command};
use crate::events::GameEvent;
use crate::server::ServerContext;
use crate::session::Session;
use lodestone_common::{Position, Result, Rotation};
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::{Debug, Info};
use lodestone_protocol::chat::{ChatComponent, ChatInputPacket, ChatMessagePacket};
use lodestone_protocol::player_movement::{
    PlayerLookPacket, PlayerPositionPacket, PlayerPositionRotationPacket, TeleportConfirmPacket,
};
use lodestone_protocol::spawn_player::SpawnPlayerPacket;
use lodestone_protocol::{Frame, ReadPacket, WritePacket};
use uuid::Uuid;

/// Teleport Confirm: acknowledges a Player Position And Look.
pub fn teleport_confirm(session: &mut Session, frame: &Frame) -> Result<()> {
    let confirm = TeleportConfirmPacket::from_frame(frame)?;
    log(
        format!("{} confirmed teleport {}", session.addr(), confirm.teleport_id),
        Debug,
    );
    Ok(())
}

/// Accepted packets with nothing to do.
pub fn ignore(session: &Session, frame: &Frame) {
    log(
        format!("{} ignoring packet 0x{:02x}", session.addr(), frame.packet_id),
        Debug,
    );
}

pub async fn chat(ctx: &ServerContext, session: &mut Session, frame: &Frame) -> Result<()> {
    let input = ChatInputPacket::from_frame(frame)?.message;
    if input.is_empty() {
        return Ok(());
    }
    if let Some(command) = commands::parse(&input) {
        log(format!("{} issued command: {}", session.name(), input), Info);
        return run_command(ctx, session, command).await;
    }

    let line = ChatComponent::bold(format!("[{}]", session.name()))
        .with_extra(ChatComponent::plain(format!(" {}", input)));
    ctx.registry
        .broadcast(&session.handle, ChatMessagePacket::new(&line).to_outbound())
        .await
}

async fn run_command(ctx: &ServerContext, session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::NewPlayer => {
            let spawn = SpawnPlayerPacket {
                entity_id: ctx.registry.allocate_entity_id() as u64,
                uuid: Uuid::new_v4(),
                position: session.position,
                rotation: session.rotation,
            };
            log(
                format!("{} spawned fake player {}", session.name(), spawn.uuid),
                Debug,
            );
            session.handle.send(&spawn).await
        }
        Command::Unknown(name) => {
            let reply = ChatComponent::plain(format!("Unknown command: /{}", name));
            session.handle.send(&ChatMessagePacket::new(&reply)).await
        }
    }
}

pub async fn position(ctx: &ServerContext, session: &mut Session, frame: &Frame) -> Result<()> {
    let packet = PlayerPositionPacket::from_frame(frame)?;
    let moved = session.move_to(Position::new(packet.x, packet.y, packet.z), packet.on_ground);
    announce_chunk_change(ctx, session, moved).await
}

pub async fn position_rotation(
    ctx: &ServerContext,
    session: &mut Session,
    frame: &Frame,
) -> Result<()> {
    let packet = PlayerPositionRotationPacket::from_frame(frame)?;
    let moved = session.move_to(Position::new(packet.x, packet.y, packet.z), packet.on_ground);
    session.look(
        Rotation {
            yaw: packet.yaw,
            pitch: packet.pitch,
        },
        packet.on_ground,
    );
    announce_chunk_change(ctx, session, moved).await
}

pub fn look(session: &mut Session, frame: &Frame) -> Result<()> {
    let packet = PlayerLookPacket::from_frame(frame)?;
    session.look(
        Rotation {
            yaw: packet.yaw,
            pitch: packet.pitch,
        },
        packet.on_ground,
    );
    Ok(())
}

async fn announce_chunk_change(
    ctx: &ServerContext,
    session: &Session,
    moved: Option<((i32, i32), (i32, i32))>,
) -> Result<()> {
    let Some((src, dst)) = moved else {
        return Ok(());
    };
    let event = GameEvent::ChunkChange {
        player: session.name(),
        src,
        dst,
    };
    for reply in ctx.events.fire(&event) {
        session.handle.send_outbound(reply).await?;
    }
    Ok(())
}
