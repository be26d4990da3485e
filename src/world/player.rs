use glam::Vec2;
use std::f32::consts::TAU;

/// Wrap any angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// The player: pose plus the motion intents written by input handling.
///
/// * `pos` is in world units (grid cell × `tile_size`).
/// * `angle` is the heading, 0 = +X, growing toward +Y (grid rows go down).
/// * `speed` / `strafe` are world units per tic, `turn` radians per tic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub pos: Vec2,
    pub angle: f32,
    pub pitch: f32,
    pub walk_cycle: f32,
    pub speed: f32,
    pub strafe: f32,
    pub turn: f32,
}

impl PlayerState {
    /// Standing still at `pos`, facing `angle`.
    pub fn at(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            angle: normalize_angle(angle),
            ..Self::default()
        }
    }

    /// Unit vector along the heading.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit vector along `angle + π/2`, the strafe axis.
    #[inline(always)]
    pub fn side(&self) -> Vec2 {
        self.forward().perp()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
