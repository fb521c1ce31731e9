use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, crate::error::LodestoneError>;

/// Width of a chunk column in blocks.
pub const CHUNK_WIDTH: f64 = 16.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Chunk column containing this position. Floors, so -0.5 lands in chunk -1.
    pub fn chunk(&self) -> (i32, i32) {
        (
            (self.x / CHUNK_WIDTH).floor() as i32,
            (self.z / CHUNK_WIDTH).floor() as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}
