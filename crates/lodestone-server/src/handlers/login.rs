use crate::events::GameEvent;
use crate::registry::Member;
use crate::server::ServerContext;
use crate::session::{spawn_keep_alive, PlayerIdentity, Session};
use lodestone_common::Result;
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::Info;
use lodestone_logger::systime;
use lodestone_protocol::chat::{ChatComponent, ChatMessagePacket};
use lodestone_protocol::chunk_data::ChunkDataPacket;
use lodestone_protocol::join_game::JoinGamePacket;
use lodestone_protocol::keep_alive::KeepAlivePacket;
use lodestone_protocol::login::{LoginStartPacket, LoginSuccessPacket};
use lodestone_protocol::player_abilities::PlayerAbilitiesPacket;
use lodestone_protocol::player_position_and_look::PlayerPositionAndLook;
use lodestone_protocol::{ConnectionPhase, Frame, ReadPacket, WritePacket};
use uuid::Uuid;

/// Login Start: assigns an identity, confirms the login and brings the player
/// into the world.
pub async fn login_start(ctx: &ServerContext, session: &mut Session, frame: &Frame) -> Result<()> {
    let login = LoginStartPacket::from_frame(frame)?;
    let identity = PlayerIdentity {
        name: login.username,
        uuid: Uuid::new_v4(),
    };
    log(
        format!("{} logged in as {} ({})", session.addr(), identity.name, identity.uuid),
        Info,
    );

    session
        .handle
        .send(&LoginSuccessPacket::new(identity.uuid, identity.name.clone()))
        .await?;
    session.handle.advance(ConnectionPhase::Play);
    session.identity = Some(identity);
    session.entity_id = ctx.registry.allocate_entity_id();

    enter_play(ctx, session).await
}

/// Everything a client needs before it can render the world, in order.
async fn enter_play(ctx: &ServerContext, session: &mut Session) -> Result<()> {
    let handle = session.handle.clone();
    let (name, uuid) = match &session.identity {
        Some(identity) => (identity.name.clone(), identity.uuid),
        None => (session.name(), Uuid::nil()),
    };

    handle
        .send(&JoinGamePacket::new(session.entity_id, ctx.config.max_players))
        .await?;
    handle.send(&PlayerAbilitiesPacket::flight()).await?;
    handle
        .send(&PlayerPositionAndLook::absolute(session.position, session.rotation, 0))
        .await?;

    let member = Member {
        entity_id: session.entity_id,
        uuid,
        name: name.clone(),
        handle: handle.clone(),
    };
    ctx.registry.join(member, welcome_message(&name)).await?;
    for reply in ctx.events.fire(&GameEvent::PlayerJoin {
        player: name,
        uuid,
    }) {
        handle.send_outbound(reply).await?;
    }

    send_spawn_region(ctx, session).await?;

    handle
        .send(&KeepAlivePacket::new(systime::unix_timestamp_millis()))
        .await?;
    spawn_keep_alive(handle, ctx.config.keep_alive_interval);
    Ok(())
}

/// Columns around the player's chunk: `radius` on the negative side,
/// `radius - 1` on the positive side.
async fn send_spawn_region(ctx: &ServerContext, session: &Session) -> Result<()> {
    let (center_x, center_z) = session.position.chunk();
    let radius = ctx.config.view_radius;
    for x in -radius..radius {
        for z in -radius..radius {
            let (chunk_x, chunk_z) = (center_x + x, center_z + z);
            let section = ctx.generator.generate_section(chunk_x, chunk_z)?;
            session
                .handle
                .send(&ChunkDataPacket::new(chunk_x, chunk_z, &section))
                .await?;
        }
    }
    Ok(())
}

pub fn welcome_message(name: &str) -> lodestone_protocol::OutboundPacket {
    let message = ChatComponent::bold("[Server]")
        .with_extra(ChatComponent::plain(" Welcome "))
        .with_extra(ChatComponent::bold(name))
        .with_extra(ChatComponent::plain(" to the game"));
    ChatMessagePacket::new(&message).to_outbound()
}
