use glam::Vec2;

use super::dda::{RayHit, cast_ray};
use crate::config::Config;
use crate::world::CellQuery;

/// One screen column's ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub ray_angle: f32,
    pub hit: RayHit,
    /// `hit.distance × cos(ray_angle − view_angle)`.
    pub corrected: f32,
}

impl Column {
    /// Has a surface and lies inside `max_depth` after correction.
    #[inline]
    pub fn is_drawn(&self, max_depth: f32) -> bool {
        self.hit.is_surface() && self.corrected < max_depth
    }

    /// Projected wall height as a fraction of screen height
    /// (`tile_size / corrected`, 1.0 = fills the screen).
    #[inline]
    pub fn height_ratio(&self, tile_size: f32) -> f32 {
        tile_size / self.corrected
    }
}

/// Ray angle for column `i` of `width`, sweeping left to right across
/// `[view − fov/2, view + fov/2)`.
#[inline]
pub fn column_angle(view_angle: f32, i: usize, width: usize, fov: f32) -> f32 {
    view_angle - fov * 0.5 + i as f32 * (fov / width as f32)
}

/// Cast `width` rays from `origin` into `out` (cleared first), left to right.
pub fn cast_columns_into<G: CellQuery + ?Sized>(
    grid: &G,
    origin: Vec2,
    view_angle: f32,
    width: usize,
    cfg: &Config,
    out: &mut Vec<Column>,
) {
    out.clear();
    out.reserve(width);
    for i in 0..width {
        let ray_angle = column_angle(view_angle, i, width, cfg.fov);
        let hit = cast_ray(grid, origin, ray_angle, cfg);
        out.push(Column {
            ray_angle,
            hit,
            corrected: hit.distance * (ray_angle - view_angle).cos(),
        });
    }
}

/// Allocating form of [`cast_columns_into`].
pub fn cast_columns<G: CellQuery + ?Sized>(
    grid: &G,
    origin: Vec2,
    view_angle: f32,
    width: usize,
    cfg: &Config,
) -> Vec<Column> {
    let mut out = Vec::with_capacity(width);
    cast_columns_into(grid, origin, view_angle, width, cfg, &mut out);
    out
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
