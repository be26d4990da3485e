use glam::IVec2;
use thiserror::Error;

/// One tic worth of player commands, filled by the host from whatever
/// input device it has.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32,    // –1 … +1  (back / forward)
    pub strafe: f32,     // –1 … +1  (left / right)
    pub turn: f32,       // –1 … +1  (left / right)
    pub look_yaw: f32,   // raw mouse delta, scaled by `mouse_sensitivity`
    pub look_pitch: f32, // raw mouse delta, positive = look down
    pub use_act: bool,   // edge-trigger
}

/// "Press E to open the door": the door the player could toggle now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionPrompt {
    pub door: IVec2,
}

/// Why an interact command did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InteractError {
    #[error("no door within reach")]
    NoDoor,

    /// Closing would shut the door on the player standing in it.
    #[error("door {0} is occupied, not closing")]
    Occupied(IVec2),
}
