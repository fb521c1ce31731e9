use crate::buffer::PacketBuffer;
use crate::packet::{Packet, ReadPacket, WritePacket};
use lodestone_common::Result;
use serde::{Deserialize, Serialize};

/// JSON text component as understood by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatComponent {
    pub text: String,
    pub bold: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ChatComponent>,
}

impl ChatComponent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            extra: Vec::new(),
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn with_extra(mut self, component: ChatComponent) -> Self {
        self.extra.push(component);
        self
    }

    pub fn to_json(&self) -> String {
        // Serializing plain strings and bools cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Position byte for the regular chat box.
const CHAT_BOX: u8 = 0;

/// Chat Message (clientbound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessagePacket {
    pub json: String,
}

impl ChatMessagePacket {
    pub fn new(component: &ChatComponent) -> Self {
        Self {
            json: component.to_json(),
        }
    }
}

impl Packet for ChatMessagePacket {
    fn packet_id() -> u64 {
        0x0F
    }
}

impl WritePacket for ChatMessagePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_string(&self.json);
        buffer.write_u8(CHAT_BOX);
    }
}

/// Chat Message (serverbound): the raw text the player typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInputPacket {
    pub message: String,
}

impl Packet for ChatInputPacket {
    fn packet_id() -> u64 {
        0x02
    }
}

impl ReadPacket for ChatInputPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            message: buffer.read_string()?,
        })
    }
}

impl WritePacket for ChatInputPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) {
        buffer.write_string(&self.message);
    }
}
