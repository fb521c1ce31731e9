use clap::Parser;
use lodestone_common::Position;
use lodestone_logger::severity::LogSeverity;
use std::path::PathBuf;
use std::time::Duration;

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Address to listen on
    #[clap(long, default_value = "0.0.0.0:25565")]
    pub addr: String,
    /// Lowest severity that gets logged (debug, info, warning, error)
    #[clap(long, default_value = "info")]
    pub log_level: LogSeverity,
}

/// Runtime settings. Only the listen address and log level come from the
/// command line; the rest are fixed defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub log_level: LogSeverity,
    /// Server list description.
    pub motd: String,
    pub max_players: u8,
    /// PNG shown in the server list. Read on every status request, optional.
    pub favicon: PathBuf,
    pub keep_alive_interval: Duration,
    /// Chunk columns sent on each side of the spawn chunk.
    pub view_radius: i32,
    /// Outbound packets a session may queue before senders block.
    pub send_queue_capacity: usize,
    pub spawn: Position,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:25565".to_owned(),
            log_level: LogSeverity::Info,
            motd: "A Lodestone server".to_owned(),
            max_players: 8,
            favicon: PathBuf::from("favicon.png"),
            keep_alive_interval: Duration::from_secs(30),
            view_radius: 4,
            send_queue_capacity: 8,
            // Standing on the grass layer of the flat world.
            spawn: Position::new(0.0, 4.0, 0.0),
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            addr: args.addr,
            log_level: args.log_level,
            ..Self::default()
        }
    }
}
