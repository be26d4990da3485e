use glam::{IVec2, Vec2, ivec2};

/// What occupies one grid cell.
///
/// The discriminants double as the `wall_type` reported by the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    Empty = 0,
    Wall = 1,
    Door = 2,
}

/// Static tile grid (immutable after load).
///
/// Row-major, `width × height`.  The spawn marker has already been
/// replaced by an `Empty` tile; its cell is kept in `spawn`.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
    spawn: IVec2,
}

impl TileMap {
    /// Build from already validated parts (see `map::parse_map`).
    pub(crate) fn from_parts(width: i32, height: i32, tiles: Vec<TileKind>, spawn: IVec2) -> Self {
        debug_assert_eq!(tiles.len(), (width * height) as usize);
        Self {
            width,
            height,
            tiles,
            spawn,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Spawn cell (grid coordinates).
    #[inline]
    pub fn spawn_cell(&self) -> IVec2 {
        self.spawn
    }

    /// Spawn point in world units: centre of the spawn cell.
    pub fn spawn_point(&self, tile_size: f32) -> Vec2 {
        (self.spawn.as_vec2() + Vec2::splat(0.5)) * tile_size
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Tile at `cell`; anything outside the grid reads as `Wall`.
    #[inline]
    pub fn tile_at(&self, cell: IVec2) -> TileKind {
        if !self.in_bounds(cell) {
            return TileKind::Wall;
        }
        self.tiles[(cell.y * self.width + cell.x) as usize]
    }

    /// Every cell holding `kind`, row-major.
    pub fn cells_of(&self, kind: TileKind) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == kind)
            .map(|(i, _)| ivec2(i as i32 % self.width, i as i32 / self.width))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
