//! One connection: a read loop that decodes and dispatches frames, a write
//! loop that drains the bounded outbound queue, and a keepalive task once the
//! player is in game.

use crate::handlers;
use crate::server::ServerContext;
use futures::{SinkExt, StreamExt};
use lodestone_common::{LodestoneError, Position, Result, Rotation};
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::{Debug, Error, Info};
use lodestone_logger::systime;
use lodestone_protocol::keep_alive::KeepAlivePacket;
use lodestone_protocol::{ConnectionPhase, FrameCodec, OutboundPacket, SharedPhase, WritePacket};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval_at, Instant};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct SessionShared {
    id: u64,
    addr: SocketAddr,
    phase: SharedPhase,
    close_signal: CancellationToken,
    close_guard: AtomicBool,
}

/// Lifecycle side of a session: phase, close signal, identity of the
/// connection. Holds no queue sender, so owning one never keeps the outbound
/// queue open.
#[derive(Debug, Clone)]
pub struct SessionControl {
    shared: Arc<SessionShared>,
}

impl SessionControl {
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.shared.addr
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.shared.phase.get()
    }

    pub fn shared_phase(&self) -> SharedPhase {
        self.shared.phase.clone()
    }

    /// Moves the phase forward. Returns the previous phase.
    pub fn advance(&self, phase: ConnectionPhase) -> ConnectionPhase {
        self.shared.phase.advance(phase)
    }

    /// Fires the close signal. Only the first call does anything; returns
    /// whether this call was the one.
    ///
    /// Both loops stop at their next wait point and release their socket half,
    /// which closes the connection.
    pub fn close(&self) -> bool {
        if self.shared.close_guard.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.shared.phase.advance(ConnectionPhase::Closed);
        self.shared.close_signal.cancel();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.shared.close_signal.is_cancelled()
    }

    /// Resolves once the session has been closed.
    pub async fn closed(&self) {
        self.shared.close_signal.cancelled().await
    }
}

/// Cloneable sending end of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<OutboundPacket>,
    control: SessionControl,
}

impl SessionHandle {
    /// Creates the handle and the receiving end of its outbound queue.
    pub fn new(addr: SocketAddr, capacity: usize) -> (Self, mpsc::Receiver<OutboundPacket>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let shared = SessionShared {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            addr,
            phase: SharedPhase::default(),
            close_signal: CancellationToken::new(),
            close_guard: AtomicBool::new(false),
        };
        let control = SessionControl {
            shared: Arc::new(shared),
        };
        (Self { sender, control }, receiver)
    }

    pub fn control(&self) -> &SessionControl {
        &self.control
    }

    pub fn id(&self) -> u64 {
        self.control.id()
    }

    pub fn addr(&self) -> SocketAddr {
        self.control.addr()
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.control.phase()
    }

    pub fn advance(&self, phase: ConnectionPhase) -> ConnectionPhase {
        self.control.advance(phase)
    }

    pub fn close(&self) -> bool {
        self.control.close()
    }

    pub fn is_closed(&self) -> bool {
        self.control.is_closed()
    }

    pub async fn closed(&self) {
        self.control.closed().await
    }

    pub async fn send<P: WritePacket>(&self, packet: &P) -> Result<()> {
        self.send_outbound(packet.to_outbound()).await
    }

    /// Queues a packet for the write loop. Waits while the queue is full;
    /// gives up only when the session closes.
    pub async fn send_outbound(&self, packet: OutboundPacket) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.control.closed() => Err(LodestoneError::SessionClosed),
            sent = self.sender.send(packet) => sent.map_err(|_| LodestoneError::SessionClosed),
        }
    }
}

/// Who the player is, known once login completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub name: String,
    pub uuid: Uuid,
}

/// Per-connection state, owned by the read loop.
#[derive(Debug)]
pub struct Session {
    pub handle: SessionHandle,
    pub identity: Option<PlayerIdentity>,
    pub entity_id: i32,
    pub position: Position,
    pub rotation: Rotation,
    pub on_ground: bool,
}

impl Session {
    pub fn new(handle: SessionHandle, spawn: Position) -> Self {
        Self {
            handle,
            identity: None,
            entity_id: 0,
            position: spawn,
            rotation: Rotation::default(),
            on_ground: true,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.handle.addr()
    }

    /// Display name, or the remote address before login.
    pub fn name(&self) -> String {
        match &self.identity {
            Some(identity) => identity.name.clone(),
            None => self.addr().to_string(),
        }
    }

    /// Updates the position. Returns the previous and new chunk column when
    /// the move crosses a chunk boundary.
    pub fn move_to(
        &mut self,
        position: Position,
        on_ground: bool,
    ) -> Option<((i32, i32), (i32, i32))> {
        let from = self.position.chunk();
        self.position = position;
        self.on_ground = on_ground;
        let to = self.position.chunk();
        (from != to).then_some((from, to))
    }

    pub fn look(&mut self, rotation: Rotation, on_ground: bool) {
        self.rotation = rotation;
        self.on_ground = on_ground;
    }
}

/// Runs a freshly accepted connection until both loops are done.
pub async fn run(ctx: Arc<ServerContext>, socket: TcpStream, addr: SocketAddr) {
    if let Err(err) = socket.set_nodelay(true) {
        log(format!("{} could not disable Nagle: {}", addr, err), Debug);
    }
    let (reader, writer) = socket.into_split();
    let (handle, queue) = SessionHandle::new(addr, ctx.config.send_queue_capacity);
    let control = handle.control().clone();
    let session = Session::new(handle, ctx.config.spawn);

    let read_task = tokio::spawn(read_loop(Arc::clone(&ctx), session, reader));
    let write_task = tokio::spawn(write_loop(control.clone(), queue, writer));

    let read_result = read_task.await;
    // A Status session ends its read side on purpose and lets the write loop
    // flush on its own. Anything else takes the write loop down with it.
    if !control.phase().is_closed() {
        control.close();
    }
    let write_result = write_task.await;
    control.close();

    if ctx.registry.leave(control.id()).await.is_some() {
        log(format!("{} left the game", addr), Debug);
    }
    report(addr, "read", read_result);
    report(addr, "write", write_result);
    log(format!("{} disconnected", addr), Info);
}

fn report(addr: SocketAddr, side: &str, result: std::result::Result<Result<()>, JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) if err.is_disconnect() => {
            log(format!("{} {} loop ended: {}", addr, side, err), Debug)
        }
        Ok(Err(err)) => log(format!("{} {} loop failed: {}", addr, side, err), Error),
        Err(err) => log(format!("{} {} loop crashed: {}", addr, side, err), Error),
    }
}

/// Decodes frames and dispatches them until the peer goes away, the session
/// closes, or a handler fails.
pub async fn read_loop<R>(ctx: Arc<ServerContext>, mut session: Session, reader: R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let control = session.handle.control().clone();
    let mut frames = FramedRead::new(reader, FrameCodec::new(control.shared_phase()));

    loop {
        let next = tokio::select! {
            _ = control.closed() => return Ok(()),
            next = frames.next() => next,
        };
        let frame = match next {
            Some(Ok(frame)) => frame,
            None | Some(Err(LodestoneError::TruncatedFrame)) => return Ok(()),
            Some(Err(err)) => return Err(err),
        };
        if control.is_closed() {
            return Ok(());
        }

        log(
            format!(
                "{} received packet 0x{:02x} in {} phase ({} bytes)",
                control.addr(),
                frame.packet_id,
                frame.phase,
                frame.payload.len()
            ),
            Debug,
        );
        handlers::dispatch(&ctx, &mut session, &frame).await?;

        if control.phase().is_closed() {
            return Ok(());
        }
    }
}

/// Writes queued packets in order until the session closes or the queue is
/// finished. Once the phase is Closed, whatever is still queued is flushed
/// and the loop ends.
pub async fn write_loop<W>(
    control: SessionControl,
    mut queue: mpsc::Receiver<OutboundPacket>,
    writer: W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, FrameCodec::new(control.shared_phase()));
    let result = deliver(&control, &mut queue, &mut sink).await;
    control.close();
    if let Err(err) = sink.get_mut().shutdown().await {
        log(format!("{} shutdown failed: {}", control.addr(), err), Debug);
    }
    result
}

async fn deliver<W>(
    control: &SessionControl,
    queue: &mut mpsc::Receiver<OutboundPacket>,
    sink: &mut FramedWrite<W, FrameCodec>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let packet = tokio::select! {
            biased;
            _ = control.closed() => return Ok(()),
            packet = queue.recv() => match packet {
                Some(packet) => packet,
                None => return Ok(()),
            },
        };
        sink.send(packet).await.map_err(write_failure)?;

        if control.phase().is_closed() {
            if control.is_closed() {
                return Ok(());
            }
            while let Ok(packet) = queue.try_recv() {
                sink.send(packet).await.map_err(write_failure)?;
            }
            return Ok(());
        }
    }
}

fn write_failure(err: LodestoneError) -> LodestoneError {
    match err {
        LodestoneError::Io(err) => LodestoneError::WriteFailure(err),
        other => other,
    }
}

/// Sends a keepalive every `period` until the session closes.
pub fn spawn_keep_alive(handle: SessionHandle, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = handle.closed() => break,
                _ = ticker.tick() => {
                    let packet = KeepAlivePacket::new(systime::unix_timestamp_millis());
                    if handle.send(&packet).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use assert_matches::assert_matches;
    use lodestone_protocol::buffer::PacketBuffer;
    use lodestone_protocol::handshake::HandshakePacket;
    use lodestone_protocol::status::StatusRequestPacket;
    use lodestone_protocol::PROTOCOL_VERSION;
    use tokio::time::timeout;

    fn test_addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 50000))
    }

    fn frame_bytes(packets: &[OutboundPacket]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for packet in packets {
            packet.write_frame(&mut bytes);
        }
        bytes
    }

    fn numbered(id: u64) -> OutboundPacket {
        OutboundPacket::new(id, vec![id as u8; 3])
    }

    #[tokio::test]
    async fn test_full_queue_blocks_without_dropping() {
        let (handle, mut queue) = SessionHandle::new(test_addr(), 8);
        for id in 0..8 {
            handle.send_outbound(numbered(id)).await.unwrap();
        }

        let ninth = timeout(Duration::from_millis(50), handle.send_outbound(numbered(8))).await;
        assert!(ninth.is_err(), "send into a full queue should block");

        assert_eq!(queue.recv().await.unwrap().id(), 0);
        timeout(Duration::from_millis(50), handle.send_outbound(numbered(8)))
            .await
            .unwrap()
            .unwrap();

        for expected in 1..=8 {
            assert_eq!(queue.recv().await.unwrap().id(), expected);
        }
    }

    #[tokio::test]
    async fn test_blocked_send_released_by_close() {
        let (handle, _queue) = SessionHandle::new(test_addr(), 1);
        handle.send_outbound(numbered(0)).await.unwrap();

        let closer = handle.clone();
        let blocked = tokio::spawn(async move { handle.send_outbound(numbered(1)).await });
        tokio::task::yield_now().await;
        closer.close();

        assert_matches!(blocked.await.unwrap(), Err(LodestoneError::SessionClosed));
    }

    #[tokio::test]
    async fn test_close_fires_once() {
        let (handle, _queue) = SessionHandle::new(test_addr(), 8);
        let other = handle.clone();

        assert!(!handle.is_closed());
        assert!(handle.close());
        assert!(!other.close());
        assert!(other.is_closed());
        assert_eq!(other.phase(), ConnectionPhase::Closed);
        assert_matches!(
            other.send_outbound(numbered(1)).await,
            Err(LodestoneError::SessionClosed)
        );
    }

    #[tokio::test]
    async fn test_session_ids_are_unique() {
        let (a, _qa) = SessionHandle::new(test_addr(), 1);
        let (b, _qb) = SessionHandle::new(test_addr(), 1);
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_write_loop_preserves_order() {
        let (handle, queue) = SessionHandle::new(test_addr(), 8);
        let packets: Vec<OutboundPacket> = (0..3).map(numbered).collect();
        for packet in &packets {
            handle.send_outbound(packet.clone()).await.unwrap();
        }
        let control = handle.control().clone();
        drop(handle);

        let writer = tokio_test::io::Builder::new()
            .write(&frame_bytes(&packets))
            .build();
        write_loop(control, queue, writer).await.unwrap();
    }

    #[tokio::test]
    async fn test_write_loop_flushes_queue_after_closed_phase() {
        let (handle, queue) = SessionHandle::new(test_addr(), 8);
        let packets = vec![numbered(0), numbered(1)];
        for packet in &packets {
            handle.send_outbound(packet.clone()).await.unwrap();
        }
        handle.advance(ConnectionPhase::Closed);

        let writer = tokio_test::io::Builder::new()
            .write(&frame_bytes(&packets))
            .build();
        // The handle is still alive, so only the Closed phase can end the loop.
        write_loop(handle.control().clone(), queue, writer)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_write_loop_stops_on_close_without_draining() {
        let (handle, queue) = SessionHandle::new(test_addr(), 8);
        handle.send_outbound(numbered(0)).await.unwrap();
        handle.close();

        // No writes expected; the mock panics on any.
        let writer = tokio_test::io::Builder::new().build();
        write_loop(handle.control().clone(), queue, writer)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_write_loop_reports_socket_errors() {
        let (handle, queue) = SessionHandle::new(test_addr(), 8);
        handle.send_outbound(numbered(0)).await.unwrap();

        let writer = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let result = write_loop(handle.control().clone(), queue, writer).await;
        assert_matches!(result, Err(LodestoneError::WriteFailure(_)));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_keep_alive_ticks_until_closed() {
        let (handle, mut queue) = SessionHandle::new(test_addr(), 8);
        let task = spawn_keep_alive(handle.clone(), Duration::from_millis(20));

        for _ in 0..2 {
            let packet = timeout(Duration::from_secs(1), queue.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(packet.id(), 0x1F);
            let mut buffer = PacketBuffer::from_bytes(packet.payload().to_vec());
            assert!(buffer.read_i64().unwrap() > 1_500_000_000_000);
        }

        handle.close();
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_keep_alive_blocked_on_full_queue_stops_on_close() {
        let (handle, _queue) = SessionHandle::new(test_addr(), 1);
        handle.send_outbound(numbered(0)).await.unwrap();
        let task = spawn_keep_alive(handle.clone(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());
        handle.close();
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_read_loop_status_exchange() {
        let ctx = Arc::new(ServerContext::new(ServerConfig::default()));
        let (handle, mut queue) = SessionHandle::new(test_addr(), 8);
        let control = handle.control().clone();
        let session = Session::new(handle, ctx.config.spawn);

        let handshake = HandshakePacket {
            protocol_version: PROTOCOL_VERSION as u64,
            server_address: "localhost".to_owned(),
            server_port: 25565,
            next_state: 1,
        };
        let input = frame_bytes(&[handshake.to_outbound(), StatusRequestPacket.to_outbound()]);
        let reader = tokio_test::io::Builder::new().read(&input).build();

        read_loop(Arc::clone(&ctx), session, reader).await.unwrap();
        assert_eq!(control.phase(), ConnectionPhase::Closed);
        assert!(!control.is_closed());

        let response = queue.recv().await.unwrap();
        assert_eq!(response.id(), 0x00);
        let mut buffer = PacketBuffer::from_bytes(response.payload().to_vec());
        let json: serde_json::Value = serde_json::from_str(&buffer.read_string().unwrap()).unwrap();
        assert_eq!(json["version"]["protocol"], 340);

        let ping = queue.recv().await.unwrap();
        assert_eq!(ping.id(), 0x01);
        assert_eq!(ping.payload().len(), 8);
        // The read loop dropped its handle, so the queue is finished.
        assert!(queue.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_read_loop_ends_cleanly_mid_frame() {
        let ctx = Arc::new(ServerContext::new(ServerConfig::default()));
        let (handle, _queue) = SessionHandle::new(test_addr(), 8);
        let session = Session::new(handle, ctx.config.spawn);

        // Declares 5 bytes, delivers 2, then EOF.
        let reader = tokio_test::io::Builder::new().read(&[0x05, 0x00, 0x01]).build();
        read_loop(ctx, session, reader).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_loop_fails_on_malformed_varint() {
        let ctx = Arc::new(ServerContext::new(ServerConfig::default()));
        let (handle, _queue) = SessionHandle::new(test_addr(), 8);
        let session = Session::new(handle, ctx.config.spawn);

        let reader = tokio_test::io::Builder::new().read(&[0xFF; 11]).build();
        assert_matches!(
            read_loop(ctx, session, reader).await,
            Err(LodestoneError::MalformedVarInt)
        );
    }

    #[test]
    fn test_move_reports_chunk_crossing() {
        let (handle, _queue) = SessionHandle::new(test_addr(), 1);
        let mut session = Session::new(handle, Position::new(8.0, 4.0, 8.0));

        assert_eq!(session.move_to(Position::new(12.0, 5.0, 1.0), false), None);
        assert!(!session.on_ground);
        assert_eq!(
            session.move_to(Position::new(-0.5, 5.0, 17.0), true),
            Some(((0, 0), (-1, 1)))
        );
        assert_eq!(session.position, Position::new(-0.5, 5.0, 17.0));

        session.look(Rotation { yaw: 90.0, pitch: -10.0 }, false);
        assert_eq!(session.rotation, Rotation { yaw: 90.0, pitch: -10.0 });
        assert_eq!(session.position, Position::new(-0.5, 5.0, 17.0));
    }
}
