//! Server list (status) response document.

use crate::config::ServerConfig;
use crate::registry::SessionRegistry;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lodestone_common::{LodestoneError, Result};
use lodestone_protocol::{PROTOCOL_VERSION, VERSION_NAME};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub version: Version,
    pub players: Players,
    pub description: Description,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Version {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Serialize)]
pub struct Players {
    pub max: u8,
    pub online: usize,
    pub sample: Vec<PlayerSample>,
}

#[derive(Debug, Serialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct Description {
    pub text: String,
}

impl ServerStatus {
    pub fn new(config: &ServerConfig, sample: Vec<(String, Uuid)>, favicon: Option<String>) -> Self {
        Self {
            version: Version {
                name: VERSION_NAME.to_owned(),
                protocol: PROTOCOL_VERSION,
            },
            players: Players {
                max: config.max_players,
                online: sample.len(),
                sample: sample
                    .into_iter()
                    .map(|(name, uuid)| PlayerSample {
                        name,
                        id: uuid.hyphenated().to_string(),
                    })
                    .collect(),
            },
            description: Description {
                text: config.motd.clone(),
            },
            favicon,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| LodestoneError::HandlerFailure(err.to_string()))
    }
}

/// Builds the JSON document for a status request from the current registry.
pub async fn build(config: &ServerConfig, registry: &SessionRegistry) -> Result<String> {
    let favicon = load_favicon(&config.favicon).await;
    ServerStatus::new(config, registry.sample().await, favicon).to_json()
}

/// Reads the favicon as a data URI. A missing or unreadable file means no favicon.
pub async fn load_favicon(path: &Path) -> Option<String> {
    let raw = tokio::fs::read(path).await.ok()?;
    Some(favicon_data_uri(&raw))
}

pub fn favicon_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
