pub mod commands;
pub mod config;
pub mod events;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod server_list;
pub mod session;
