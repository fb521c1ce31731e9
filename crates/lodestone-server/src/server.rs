use crate::config::ServerConfig;
use crate::events::EventBus;
use crate::registry::SessionRegistry;
use crate::session;
use lodestone_common::Result;
use lodestone_logger::log::log;
use lodestone_logger::severity::LogSeverity::{Info, Warning};
use lodestone_world::{FlatGenerator, WorldGenerator};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Everything sessions share.
pub struct ServerContext {
    pub config: ServerConfig,
    pub registry: SessionRegistry,
    pub events: EventBus,
    pub generator: Box<dyn WorldGenerator>,
}

impl ServerContext {
    /// Flat world, default event handlers. Handlers are registered here,
    /// before any session exists.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: SessionRegistry::new(),
            events: EventBus::with_default_handlers(),
            generator: Box::new(FlatGenerator::default()),
        }
    }
}

/// Binds the configured address and serves connections until the process exits.
pub async fn run(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.addr).await?;
    log(format!("Listening on {}", listener.local_addr()?), Info);
    serve(listener, Arc::new(ServerContext::new(config))).await
}

/// Binds the configured address and serves in the background. Returns the
/// bound address, which differs from the configured one for port 0.
pub async fn start(config: ServerConfig) -> Result<SocketAddr> {
    let listener = TcpListener::bind(&config.addr).await?;
    let addr = listener.local_addr()?;
    log(format!("Listening on {}", addr), Info);
    tokio::spawn(serve(listener, Arc::new(ServerContext::new(config))));
    Ok(addr)
}

/// Accept loop. Each connection runs in its own task; nothing a session does
/// can stop this loop.
pub async fn serve(listener: TcpListener, ctx: Arc<ServerContext>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                log(format!("Failed to accept connection: {}", err), Warning);
                continue;
            }
        };
        log(format!("New connection from: {}", addr), Info);
        tokio::spawn(session::run(Arc::clone(&ctx), socket, addr));
    }
}
