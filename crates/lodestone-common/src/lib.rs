pub mod error;
pub mod types;

pub use error::LodestoneError;
pub use types::{Position, Result, Rotation};
