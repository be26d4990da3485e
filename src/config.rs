//! Engine constants gathered in one place.
//!
//! `Config::default()` holds the stock game tuning; the
//! viewer binary overrides a few of them from the command line.

use std::f32::consts::FRAC_PI_2;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view must be between 0 and 180 degrees (exclusive), got {0}")]
    Fov(f32),
}

/// Every tunable the simulation, caster and frame builder read.
///
/// Distances are in **world units** unless the name says otherwise; one
/// grid cell is `tile_size` world units wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// World units per grid cell.
    pub tile_size: f32,
    /// Horizontal field of view (radians).
    pub fov: f32,
    /// Rays reaching this distance report "nothing to draw".
    pub max_depth: f32,

    /* movement, per tic ------------------------------------------------ */
    pub move_speed: f32,
    pub strafe_speed: f32,
    pub turn_speed: f32,
    /// Radians of yaw per unit of mouse delta.
    pub mouse_sensitivity: f32,
    /// Walk-cycle phase advance while moving forward/back.
    pub walk_step: f32,

    /* doors ------------------------------------------------------------ */
    /// `open_amount` change per tic.
    pub door_step: f32,
    /// Player must be strictly closer than this to a door centre.
    pub interaction_radius: f32,

    /* view offset ------------------------------------------------------ */
    pub bob_amplitude: f32,
    pub pitch_scale: f32,

    /// Fixed simulation rate used by `TicRunner::pump`.
    pub tic_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        let tile_size = 64.0;
        Self {
            tile_size,
            fov: FRAC_PI_2,
            max_depth: 2000.0,
            move_speed: 2.0,
            strafe_speed: 2.0,
            turn_speed: 0.05,
            mouse_sensitivity: 0.002,
            walk_step: 0.1,
            door_step: 0.05,
            interaction_radius: tile_size * 2.0,
            bob_amplitude: 0.05,
            pitch_scale: 0.5,
            tic_rate: 60,
        }
    }
}

impl Config {
    /// Same config with the field of view given in degrees.
    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    /// [`with_fov_degrees`](Self::with_fov_degrees) for untrusted input.
    /// The view wedge must stay narrower than a half turn: at 180° and
    /// above the fisheye cosine goes negative.
    pub fn try_with_fov_degrees(self, degrees: f32) -> Result<Self, ConfigError> {
        if degrees > 0.0 && degrees < 180.0 {
            Ok(self.with_fov_degrees(degrees))
        } else {
            Err(ConfigError::Fov(degrees))
        }
    }

    /// Grid cell containing world coordinate `v` on one axis.
    #[inline(always)]
    pub fn to_cell(&self, v: f32) -> i32 {
        (v / self.tile_size).floor() as i32
    }

    /// World coordinate of the centre of cell `c` on one axis.
    #[inline(always)]
    pub fn cell_centre(&self, c: i32) -> f32 {
        c as f32 * self.tile_size + self.tile_size * 0.5
    }
}
