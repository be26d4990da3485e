//! Doors: per-cell dynamic state layered on top of the static `TileMap`.
//!
//! Every `Door` tile gets one entity carrying a [`Door`] component at load
//! time.  The registry maps cells to those entities and remembers the
//! load order, which is also the order proximity checks visit doors in.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use hecs::{Entity, World};

use super::grid::{TileKind, TileMap};

/// Animation phase derived from `(is_open, open_amount)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// One door.  `is_open` is the commanded target, `open_amount` the
/// animated value chasing it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    pub cell: IVec2,
    pub is_open: bool,
    pub open_amount: f32, // 0 = shut, 1 = fully open
}

impl Door {
    pub fn closed(cell: IVec2) -> Self {
        Self {
            cell,
            is_open: false,
            open_amount: 0.0,
        }
    }

    pub fn state(&self) -> DoorState {
        match (self.is_open, self.open_amount) {
            (true, a) if a >= 1.0 => DoorState::Open,
            (true, _) => DoorState::Opening,
            (false, a) if a <= 0.0 => DoorState::Closed,
            (false, _) => DoorState::Closing,
        }
    }

    /// Rays and movement are gated on the commanded state only: a door
    /// that was told to open is passable from the first tic, one told to
    /// close is solid immediately, whatever `open_amount` says.
    #[inline]
    pub fn blocks(&self) -> bool {
        !self.is_open
    }

    /// Flip the target.  Mid-animation this only reverses direction.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Move `open_amount` one `step` toward the target, clamped to `[0, 1]`.
    pub fn animate(&mut self, step: f32) {
        match self.state() {
            DoorState::Opening => self.open_amount = (self.open_amount + step).min(1.0),
            DoorState::Closing => self.open_amount = (self.open_amount - step).max(0.0),
            DoorState::Open | DoorState::Closed => {}
        }
    }

    /// Door centre in world units.
    pub fn centre(&self, tile_size: f32) -> Vec2 {
        (self.cell.as_vec2() + Vec2::splat(0.5)) * tile_size
    }
}

/// Cell → door entity lookup.
#[derive(Debug, Default)]
pub struct DoorRegistry {
    by_cell: HashMap<IVec2, Entity>,
    order: Vec<Entity>,
}

impl DoorRegistry {
    /// Spawn one closed door per `Door` tile of `map`, row-major.
    pub fn spawn_all(world: &mut World, map: &TileMap) -> Self {
        let mut reg = Self::default();
        for cell in map.cells_of(TileKind::Door) {
            let ent = world.spawn((Door::closed(cell),));
            reg.by_cell.insert(cell, ent);
            reg.order.push(ent);
        }
        reg
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn entity_at(&self, cell: IVec2) -> Option<Entity> {
        self.by_cell.get(&cell).copied()
    }

    /// Snapshot of the door at `cell`, `None` when the cell holds no door.
    pub fn door_at(&self, world: &World, cell: IVec2) -> Option<Door> {
        let ent = self.entity_at(cell)?;
        world.get::<&Door>(ent).ok().map(|d| *d)
    }

    /// Door entities in load order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.order.iter().copied()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
