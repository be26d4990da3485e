pub mod collision;
mod components;
mod systems;
mod tic;

pub use components::{InputCmd, InteractError, InteractionPrompt};
pub use systems::{door_animation, door_proximity, movement, player_input, toggle_door};
pub use tic::TicRunner;
