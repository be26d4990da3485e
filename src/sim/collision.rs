//! Point-vs-grid collision.
//!
//! The player is a point.  A move is tested once, on its combined
//! destination: running diagonally into a corner stops both components
//! instead of sliding along the free axis.

use glam::Vec2;

use crate::world::CellQuery;

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,      // final XY
    pub blocked: bool,  // destination was rejected
}

/// `true` if world point `p` lies in a wall, a closed door, or off the grid.
#[inline]
pub fn is_blocking<G: CellQuery + ?Sized>(grid: &G, p: Vec2, tile_size: f32) -> bool {
    grid.is_blocking_cell((p / tile_size).floor().as_ivec2())
}

/// Move from `from` by `delta`, all or nothing.
pub fn try_move<G: CellQuery + ?Sized>(grid: &G, from: Vec2, delta: Vec2, tile_size: f32) -> MoveResult {
    if delta == Vec2::ZERO {
        return MoveResult {
            pos: from,
            blocked: false,
        };
    }
    let target = from + delta;
    if is_blocking(grid, target, tile_size) {
        MoveResult {
            pos: from,
            blocked: true,
        }
    } else {
        MoveResult {
            pos: target,
            blocked: false,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
