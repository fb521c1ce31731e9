//! Gameplay events and the handlers registered for them.
//!
//! Handlers are plain functions keyed by [`EventTag`]. They are registered
//! while the server context is built and never change afterwards, so firing
//! needs no locking. A handler answers with packets for the player that
//! caused the event.

use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::Info;
use lodestone_protocol::chat::{ChatComponent, ChatMessagePacket};
use lodestone_protocol::{OutboundPacket, WritePacket};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    ChunkChange,
    PlayerJoin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A player crossed from chunk column `src` into `dst`.
    ChunkChange {
        player: String,
        src: (i32, i32),
        dst: (i32, i32),
    },
    PlayerJoin { player: String, uuid: Uuid },
}

impl GameEvent {
    pub fn tag(&self) -> EventTag {
        match self {
            GameEvent::ChunkChange { .. } => EventTag::ChunkChange,
            GameEvent::PlayerJoin { .. } => EventTag::PlayerJoin,
        }
    }
}

pub type EventHandler = Box<dyn Fn(&GameEvent) -> Vec<OutboundPacket> + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventTag, Vec<EventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with the server's built-in handlers.
    pub fn with_default_handlers() -> Self {
        let mut bus = Self::new();
        bus.on(EventTag::ChunkChange, announce_chunk_change);
        bus.on(EventTag::PlayerJoin, log_join);
        bus
    }

    pub fn on<F>(&mut self, tag: EventTag, handler: F)
    where
        F: Fn(&GameEvent) -> Vec<OutboundPacket> + Send + Sync + 'static,
    {
        self.handlers.entry(tag).or_default().push(Box::new(handler));
    }

    /// Runs every handler registered for the event's tag, in registration
    /// order, and collects their replies.
    pub fn fire(&self, event: &GameEvent) -> Vec<OutboundPacket> {
        self.handlers
            .get(&event.tag())
            .map(|handlers| handlers.iter().flat_map(|handler| handler(event)).collect())
            .unwrap_or_default()
    }

    pub fn handler_count(&self, tag: EventTag) -> usize {
        self.handlers.get(&tag).map_or(0, Vec::len)
    }
}

fn announce_chunk_change(event: &GameEvent) -> Vec<OutboundPacket> {
    let GameEvent::ChunkChange { player, src, dst } = event else {
        return Vec::new();
    };
    let message = ChatComponent::bold(format!("[{}]", player))
        .with_extra(ChatComponent::plain(" moved from chunk"))
        .with_extra(ChatComponent::bold(format!(" ({}, {}) ", src.0, src.1)))
        .with_extra(ChatComponent::plain("to chunk"))
        .with_extra(ChatComponent::bold(format!(" ({}, {})", dst.0, dst.1)));
    vec![ChatMessagePacket::new(&message).to_outbound()]
}

fn log_join(event: &GameEvent) -> Vec<OutboundPacket> {
    if let GameEvent::PlayerJoin { player, uuid } = event {
        log(format!("{} ({}) joined the game", player, uuid), Info);
    }
    Vec::new()
}
