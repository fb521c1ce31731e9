use futures::{SinkExt, StreamExt};
use lodestone_protocol::buffer::PacketBuffer;
use lodestone_protocol::handshake::HandshakePacket;
use lodestone_protocol::login::LoginStartPacket;
use lodestone_protocol::{Frame, FrameCodec, WritePacket, PROTOCOL_VERSION};
use lodestone_server::config::ServerConfig;
use lodestone_server::server;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of frames the server sends between Login Success and the first
/// Keep Alive: Join Game, Abilities, Position And Look, welcome, 8x8 chunks.
pub const PLAY_ENTRY_FRAMES: usize = 4 + 64;

/// Starts a server on a free loopback port.
pub async fn start_server() -> SocketAddr {
    let config = ServerConfig {
        addr: "127.0.0.1:0".to_owned(),
        favicon: "no-such-favicon.png".into(),
        ..ServerConfig::default()
    };
    server::start(config).await.unwrap()
}

pub struct TestClient {
    framed: Framed<TcpStream, FrameCodec>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        Self {
            framed: Framed::new(stream, FrameCodec::default()),
        }
    }

    pub async fn send<P: WritePacket>(&mut self, packet: &P) {
        self.framed.send(packet.to_outbound()).await.unwrap();
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.framed.get_mut().write_all(bytes).await.unwrap();
    }

    pub async fn handshake(&mut self, next_state: u64) {
        let handshake = HandshakePacket {
            protocol_version: PROTOCOL_VERSION as u64,
            server_address: "localhost".to_owned(),
            server_port: 25565,
            next_state,
        };
        self.send(&handshake).await;
    }

    pub async fn login(&mut self, username: &str) {
        self.handshake(2).await;
        self.send(&LoginStartPacket {
            username: username.to_owned(),
        })
        .await;
    }

    /// Logs in and reads everything up to and including the first Keep Alive.
    pub async fn login_and_settle(&mut self, username: &str) {
        self.login(username).await;
        for _ in 0..PLAY_ENTRY_FRAMES + 1 {
            self.next_frame().await;
        }
        assert_eq!(self.next_frame().await.packet_id, 0x1F);
    }

    pub async fn next_frame(&mut self) -> Frame {
        timeout(READ_TIMEOUT, self.framed.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .expect("undecodable frame")
    }

    /// Skips frames until one with the given ID arrives.
    pub async fn next_with_id(&mut self, packet_id: u64) -> Frame {
        loop {
            let frame = self.next_frame().await;
            if frame.packet_id == packet_id {
                return frame;
            }
        }
    }

    /// True once the server has closed the connection.
    pub async fn is_closed(&mut self) -> bool {
        match timeout(READ_TIMEOUT, self.framed.next()).await {
            Ok(None) | Ok(Some(Err(_))) => true,
            Ok(Some(Ok(_))) | Err(_) => false,
        }
    }
}

/// Text of a chat frame, with all its extras joined.
pub fn chat_text(frame: &Frame) -> String {
    assert_eq!(frame.packet_id, 0x0F);
    let json = frame.buffer().read_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let mut text = value["text"].as_str().unwrap_or_default().to_owned();
    if let Some(extra) = value["extra"].as_array() {
        for part in extra {
            text.push_str(part["text"].as_str().unwrap_or_default());
        }
    }
    text
}

pub fn read_json(frame: &Frame) -> serde_json::Value {
    let mut buffer: PacketBuffer = frame.buffer();
    serde_json::from_str(&buffer.read_string().unwrap()).unwrap()
}
