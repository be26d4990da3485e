mod door;
mod grid;
mod player;

use glam::IVec2;

pub use door::{Door, DoorRegistry, DoorState};
pub use grid::{TileKind, TileMap};
pub use player::{PlayerState, normalize_angle};

/// Cell-level view of the world used by the caster and by collision.
pub trait CellQuery {
    fn in_bounds(&self, cell: IVec2) -> bool;

    /// `Wall` for any cell outside the grid.
    fn tile_at(&self, cell: IVec2) -> TileKind;

    fn door_at(&self, cell: IVec2) -> Option<Door>;

    /// Wall, out-of-bounds, or a door whose `is_open` is false.
    ///
    /// A `Door` tile without a door record counts as solid.
    fn is_blocking_cell(&self, cell: IVec2) -> bool {
        match self.tile_at(cell) {
            TileKind::Empty => false,
            TileKind::Wall => true,
            TileKind::Door => self.door_at(cell).is_none_or(|d| d.blocks()),
        }
    }
}

/// Static grid + live door entities, borrowed together for one query pass.
#[derive(Clone, Copy)]
pub struct LevelView<'a> {
    pub map: &'a TileMap,
    pub doors: &'a DoorRegistry,
    pub entities: &'a hecs::World,
}

impl CellQuery for LevelView<'_> {
    #[inline]
    fn in_bounds(&self, cell: IVec2) -> bool {
        self.map.in_bounds(cell)
    }

    #[inline]
    fn tile_at(&self, cell: IVec2) -> TileKind {
        self.map.tile_at(cell)
    }

    #[inline]
    fn door_at(&self, cell: IVec2) -> Option<Door> {
        self.doors.door_at(self.entities, cell)
    }
}
