//! Grid raycasting engine.
//!
//! * [`map`] turns a text grid into a [`world::TileMap`] plus door cells.
//! * [`sim`] owns the player and door entities and advances them per tic.
//! * [`caster`] walks the grid with DDA, one ray per screen column.
//! * [`frame`] packs a tic's result for a [`renderer::Renderer`].

pub mod caster;
pub mod config;
pub mod frame;
pub mod map;
pub mod renderer;
pub mod sim;
pub mod world;

pub use config::{Config, ConfigError};
