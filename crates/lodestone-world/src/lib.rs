//! Block kinds, palettes, chunk sections and the flat world generator.

pub mod bits;
pub mod block;
pub mod generator;
pub mod palette;
pub mod section;

pub use block::BlockKind;
pub use generator::{FlatGenerator, WorldGenerator};
pub use palette::Palette;
pub use section::ChunkSection;
