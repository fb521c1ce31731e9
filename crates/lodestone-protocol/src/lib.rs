//! Wire protocol: VarInts, packet framing, connection phases and packet layouts.

pub mod buffer;
pub mod chat;
pub mod chunk_data;
pub mod frame;
pub mod handshake;
pub mod join_game;
pub mod keep_alive;
pub mod login;
pub mod packet;
pub mod phase;
pub mod player_abilities;
pub mod player_movement;
pub mod player_position_and_look;
pub mod spawn_player;
pub mod status;
pub mod varint;

pub use buffer::PacketBuffer;
pub use frame::{Frame, FrameCodec, OutboundPacket};
pub use packet::{Packet, ReadPacket, WritePacket};
pub use phase::{ConnectionPhase, SharedPhase};

/// Protocol number of the game version whose packet layout is implemented here.
pub const PROTOCOL_VERSION: i32 = 340;
/// Human readable game version.
pub const VERSION_NAME: &str = "1.12.2";
