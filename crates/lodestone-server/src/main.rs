use clap::Parser;
use lodestone_logger::log::{log, set_min_severity};
use lodestone_logger::severity::LogSeverity::{Fatal, Info};
use lodestone_server::config::{Args, ServerConfig};
use lodestone_server::server;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from(Args::parse());
    set_min_severity(config.log_level);
    log("Lodestone init".to_owned(), Info);

    if let Err(err) = server::run(config).await {
        log(format!("Server stopped: {}", err), Fatal);
        std::process::exit(1);
    }
}
