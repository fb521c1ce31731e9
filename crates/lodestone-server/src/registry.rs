//! Players currently in game, and fan-out of packets to all of them.

use crate::session::SessionHandle;
use lodestone_common::Result;
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::Debug;
use lodestone_protocol::OutboundPacket;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// A joined player.
#[derive(Debug, Clone)]
pub struct Member {
    pub entity_id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub handle: SessionHandle,
}

#[derive(Debug, Clone)]
struct Entry {
    member: Member,
    relay: mpsc::UnboundedSender<OutboundPacket>,
}

/// Join list shared by every session.
///
/// The lock is never held across a send. Each member has a relay task that
/// owns the blocking send into its queue, so a broadcast only ever waits on
/// the queue of the session that started it.
#[derive(Debug)]
pub struct SessionRegistry {
    members: RwLock<Vec<Entry>>,
    next_entity_id: AtomicI32,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(Vec::new()),
            next_entity_id: AtomicI32::new(1),
        }
    }

    /// Allocates an entity ID, unique for the lifetime of the server.
    pub fn allocate_entity_id(&self) -> i32 {
        self.next_entity_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds a member and sends `announcement` to everyone who is joined at
    /// that moment, the new member included.
    pub async fn join(&self, member: Member, announcement: OutboundPacket) -> Result<()> {
        let origin = member.handle.id();
        let entry = Entry {
            relay: spawn_relay(member.handle.clone()),
            member,
        };
        let snapshot = {
            let mut members = self.members.write().await;
            members.push(entry);
            members.clone()
        };
        deliver(&snapshot, origin, announcement).await
    }

    /// Sends a packet to every joined member. The copy for `origin` is queued
    /// directly and waits for room; everyone else's goes through their relay.
    pub async fn broadcast(&self, origin: &SessionHandle, packet: OutboundPacket) -> Result<()> {
        let snapshot = self.members.read().await.clone();
        deliver(&snapshot, origin.id(), packet).await
    }

    /// Removes the member belonging to a session, if it ever joined. Its relay
    /// stops once the packets already handed to it are queued.
    pub async fn leave(&self, session_id: u64) -> Option<Member> {
        let mut members = self.members.write().await;
        let index = members
            .iter()
            .position(|entry| entry.member.handle.id() == session_id)?;
        Some(members.remove(index).member)
    }

    pub async fn count(&self) -> usize {
        self.members.read().await.len()
    }

    /// Name and UUID of every member, in join order.
    pub async fn sample(&self) -> Vec<(String, Uuid)> {
        self.members
            .read()
            .await
            .iter()
            .map(|entry| (entry.member.name.clone(), entry.member.uuid))
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards packets into a member's queue in the order they were handed over,
/// until the session closes or the member leaves.
fn spawn_relay(handle: SessionHandle) -> mpsc::UnboundedSender<OutboundPacket> {
    let (relay, mut pending) = mpsc::unbounded_channel::<OutboundPacket>();
    tokio::spawn(async move {
        while let Some(packet) = pending.recv().await {
            if let Err(err) = handle.send_outbound(packet).await {
                log(format!("Relay to {} stopped: {}", handle.addr(), err), Debug);
                break;
            }
        }
    });
    relay
}

async fn deliver(entries: &[Entry], origin: u64, packet: OutboundPacket) -> Result<()> {
    let mut own = None;
    for entry in entries {
        if entry.member.handle.id() == origin {
            own = Some(&entry.member.handle);
        } else if entry.relay.send(packet.clone()).is_err() {
            log(
                format!("Skipped broadcast to {}: session closed", entry.member.name),
                Debug,
            );
        }
    }
    match own {
        Some(handle) => handle.send_outbound(packet).await,
        None => Ok(()),
    }
}
