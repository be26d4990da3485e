//! Grid ray caster (Digital Differential Analysis).
//!
//! The ray is walked cell by cell: for each axis we know how far along
//! the ray the next grid line is (`side_dist`) and how far apart
//! consecutive lines are (`delta_dist = |1/dir|`).  Every iteration crosses
//! whichever line is nearer, so no cell the ray touches is skipped and no
//! cell is visited twice.
//!
//! All traversal maths runs in **grid units**; only the returned
//! distance is scaled back to world units.

use glam::{IVec2, Vec2, ivec2};

use crate::config::Config;
use crate::world::{CellQuery, TileKind, normalize_angle};

/// Surface a ray stopped on.  Discriminants are the classic wall codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WallType {
    /// Ray left the grid or ran past `max_depth`.
    None = 0,
    Wall = 1,
    Door = 2,
}

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Side {
    /// Crossed a vertical line (stepped along X).
    X = 0,
    /// Crossed a horizontal line (stepped along Y).
    Y = 1,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World units along the ray, before fisheye correction.
    pub distance: f32,
    pub wall_type: WallType,
    pub side: Side,
    /// Position along the hit face, `[0, 1)`.
    pub texture_u: f32,
    /// Cell that stopped the ray.
    pub cell: Option<IVec2>,
}

impl RayHit {
    fn exhausted(max_depth: f32, side: Side) -> Self {
        Self {
            distance: max_depth,
            wall_type: WallType::None,
            side,
            texture_u: 0.0,
            cell: None,
        }
    }

    /// `false` when there is nothing to shade.
    #[inline]
    pub fn is_surface(&self) -> bool {
        self.wall_type != WallType::None
    }
}

/// `|1/d|`, with an exactly-zero component mapped to +∞.
#[inline(always)]
fn inv_abs(d: f32) -> f32 {
    if d == 0.0 { f32::INFINITY } else { (1.0 / d).abs() }
}

/// First grid line along one axis: `(step, side_dist)`.
#[inline(always)]
fn axis_start(pos: f32, cell: i32, dir: f32, delta: f32) -> (i32, f32) {
    if delta.is_infinite() {
        // never crosses a line on this axis; avoid 0 × ∞
        return (if dir < 0.0 { -1 } else { 1 }, f32::INFINITY);
    }
    if dir < 0.0 {
        (-1, (pos - cell as f32) * delta)
    } else {
        (1, (cell as f32 + 1.0 - pos) * delta)
    }
}

/// Cast one ray from `origin` (world units) at `ray_angle`.
///
/// * Walls stop the ray with [`WallType::Wall`].
/// * Doors stop it with [`WallType::Door`] only while `is_open` is false;
///   the animated `open_amount` is never looked at.
/// * Leaving the grid, or travelling `max_depth`, yields
///   [`WallType::None`] at `distance == max_depth`.
pub fn cast_ray<G: CellQuery + ?Sized>(grid: &G, origin: Vec2, ray_angle: f32, cfg: &Config) -> RayHit {
    let dir = Vec2::from_angle(normalize_angle(ray_angle));
    let pos = origin / cfg.tile_size;
    let max_grid = cfg.max_depth / cfg.tile_size;

    let mut cell = pos.floor().as_ivec2();
    let delta = Vec2::new(inv_abs(dir.x), inv_abs(dir.y));
    let (step_x, mut side_x) = axis_start(pos.x, cell.x, dir.x, delta.x);
    let (step_y, mut side_y) = axis_start(pos.y, cell.y, dir.y, delta.y);
    let step = ivec2(step_x, step_y);

    loop {
        /* ---- cross the nearer grid line ---------------------------- */
        let (travelled, side) = if side_x < side_y {
            let t = side_x;
            side_x += delta.x;
            cell.x += step.x;
            (t, Side::X)
        } else {
            let t = side_y;
            side_y += delta.y;
            cell.y += step.y;
            (t, Side::Y)
        };

        if travelled >= max_grid || !grid.in_bounds(cell) {
            return RayHit::exhausted(cfg.max_depth, side);
        }

        /* ---- what's in the new cell? ------------------------------- */
        let wall_type = match grid.tile_at(cell) {
            TileKind::Empty => continue,
            TileKind::Wall => WallType::Wall,
            TileKind::Door if grid.is_blocking_cell(cell) => WallType::Door,
            TileKind::Door => continue,
        };

        /* ---- exact hit along the crossed axis ---------------------- */
        let dist = match side {
            Side::X => (cell.x as f32 - pos.x + (1 - step.x) as f32 * 0.5) / dir.x,
            Side::Y => (cell.y as f32 - pos.y + (1 - step.y) as f32 * 0.5) / dir.y,
        };
        let along = match side {
            Side::X => pos.y + dist * dir.y,
            Side::Y => pos.x + dist * dir.x,
        };
        let u = along.rem_euclid(1.0);

        return RayHit {
            distance: dist * cfg.tile_size,
            wall_type,
            side,
            texture_u: if u >= 1.0 { 0.0 } else { u },
            cell: Some(cell),
        };
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::parse_map;
    use crate::world::{DoorRegistry, LevelView, TileMap};
    use std::f32::consts::{FRAC_PI_2, PI};

    struct Fixture {
        map: TileMap,
        doors: DoorRegistry,
        ents: hecs::World,
    }

    impl Fixture {
        fn new(text: &str) -> Self {
            let map = parse_map(text).unwrap();
            let mut ents = hecs::World::new();
            let doors = DoorRegistry::spawn_all(&mut ents, &map);
            Self { map, doors, ents }
        }

        fn view(&self) -> LevelView<'_> {
            LevelView {
                map: &self.map,
                doors: &self.doors,
                entities: &self.ents,
            }
        }

        fn spawn(&self, cfg: &Config) -> Vec2 {
            self.map.spawn_point(cfg.tile_size)
        }
    }

    /// 8×6 room: interior x 1..=6, y 1..=4.
    const ROOM: &str = "
        1 1 1 1 1 1 1 1
        1 p 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 0 0 0 0 0 0 1
        1 1 1 1 1 1 1 1
    ";

    /// Reference: march in tiny fixed steps until a blocking cell.
    fn brute_force(grid: &LevelView<'_>, origin: Vec2, angle: f32, cfg: &Config) -> f32 {
        const STEP: f32 = 1e-3; // grid units
        let dir = Vec2::from_angle(angle);
        let p0 = origin / cfg.tile_size;
        for i in 1.. {
            let t = i as f32 * STEP;
            let cell = (p0 + dir * t).floor().as_ivec2();
            if !grid.in_bounds(cell) || grid.is_blocking_cell(cell) {
                return t * cfg.tile_size;
            }
        }
        unreachable!()
    }

    /*------------------------------------------------------------------*/
    /* Axis-aligned distances                                           */
    /*------------------------------------------------------------------*/
    #[test]
    fn axis_aligned_hits_are_exact() {
        let cfg = Config::default();
        let fx = Fixture::new(ROOM);
        let o = fx.spawn(&cfg); // (1.5, 1.5) cells

        // east wall is the x = 7 column: 5.5 cells away
        let east = cast_ray(&fx.view(), o, 0.0, &cfg);
        assert_eq!(east.wall_type, WallType::Wall);
        assert_eq!(east.side, Side::X);
        assert!((east.distance - 5.5 * cfg.tile_size).abs() < 1e-3, "{}", east.distance);

        // south wall is the y = 5 row: 3.5 cells away
        let south = cast_ray(&fx.view(), o, FRAC_PI_2, &cfg);
        assert_eq!(south.side, Side::Y);
        assert!((south.distance - 3.5 * cfg.tile_size).abs() < 1e-2, "{}", south.distance);

        // west / north walls are half a cell away
        let west = cast_ray(&fx.view(), o, PI, &cfg);
        assert!((west.distance - 0.5 * cfg.tile_size).abs() < 1e-2);
        let north = cast_ray(&fx.view(), o, -FRAC_PI_2, &cfg);
        assert!((north.distance - 0.5 * cfg.tile_size).abs() < 1e-2);
    }

    #[test]
    fn whole_tiles_scale_by_tile_size() {
        let cfg = Config::default();
        let fx = Fixture::new(ROOM);
        // stand exactly on the west edge of cell (1,1): east wall is 6 tiles away
        let o = Vec2::new(1.0, 1.5) * cfg.tile_size;
        let hit = cast_ray(&fx.view(), o, 0.0, &cfg);
        assert!((hit.distance - 6.0 * cfg.tile_size).abs() < 1e-3);
    }

    /*------------------------------------------------------------------*/
    /* Agreement with a brute-force marcher                             */
    /*------------------------------------------------------------------*/
    #[test]
    fn matches_brute_force_marcher() {
        let cfg = Config::default();
        let fx = Fixture::new(ROOM);
        let view = fx.view();
        let origin = Vec2::new(2.3, 2.7) * cfg.tile_size;

        for i in 0..24 {
            let angle = 0.11 + i as f32 * 0.26;
            let dda = cast_ray(&view, origin, angle, &cfg);
            let reference = brute_force(&view, origin, normalize_angle(angle), &cfg);
            assert_eq!(dda.wall_type, WallType::Wall);
            assert!(
                (dda.distance - reference).abs() < 0.2,
                "angle {angle}: dda {} vs brute {reference}",
                dda.distance
            );
        }
    }

    /*------------------------------------------------------------------*/
    /* Texture coordinate                                               */
    /*------------------------------------------------------------------*/
    #[test]
    fn texture_u_is_fraction_along_face() {
        let cfg = Config::default();
        let fx = Fixture::new(ROOM);
        let o = Vec2::new(1.5, 1.25) * cfg.tile_size;
        let hit = cast_ray(&fx.view(), o, 0.0, &cfg);
        assert!((hit.texture_u - 0.25).abs() < 1e-4, "{}", hit.texture_u);

        for i in 0..40 {
            let h = cast_ray(&fx.view(), o, i as f32 * 0.157, &cfg);
            assert!((0.0..1.0).contains(&h.texture_u));
        }
    }

    /*------------------------------------------------------------------*/
    /* Doors gate on is_open only                                       */
    /*------------------------------------------------------------------*/
    #[test]
    fn closed_door_stops_open_door_passes() {
        let cfg = Config::default();
        let fx = Fixture::new(
            "
            1 1 1 1 1 1
            1 p 2 0 0 1
            1 1 1 1 1 1
        ",
        );
        let o = fx.spawn(&cfg);

        let hit = cast_ray(&fx.view(), o, 0.0, &cfg);
        assert_eq!(hit.wall_type, WallType::Door);
        assert_eq!(hit.cell, Some(ivec2(2, 1)));
        assert!((hit.distance - 0.5 * cfg.tile_size).abs() < 1e-3);

        // commanded open, animation not started: already transparent
        let ent = fx.doors.entity_at(ivec2(2, 1)).unwrap();
        fx.ents.get::<&mut crate::world::Door>(ent).unwrap().is_open = true;

        let hit = cast_ray(&fx.view(), o, 0.0, &cfg);
        assert_eq!(hit.wall_type, WallType::Wall);
        assert_eq!(hit.cell, Some(ivec2(5, 1)));
        assert!((hit.distance - 3.5 * cfg.tile_size).abs() < 1e-3);
    }

    /*------------------------------------------------------------------*/
    /* Exhaustion                                                       */
    /*------------------------------------------------------------------*/
    #[test]
    fn leaving_the_grid_exhausts_the_ray() {
        let cfg = Config::default();
        // no border on the east side
        let fx = Fixture::new("1 1 1\np 0 0\n1 1 1");
        let hit = cast_ray(&fx.view(), fx.spawn(&cfg), 0.0, &cfg);
        assert!(!hit.is_surface());
        assert_eq!(hit.distance, cfg.max_depth);
        assert_eq!(hit.cell, None);
    }

    #[test]
    fn walls_beyond_max_depth_are_not_reported() {
        let cfg = Config {
            max_depth: 2.0 * 64.0,
            ..Config::default()
        };
        let fx = Fixture::new(ROOM);
        let hit = cast_ray(&fx.view(), fx.spawn(&cfg), 0.0, &cfg);
        assert_eq!(hit.wall_type, WallType::None);
        assert_eq!(hit.distance, cfg.max_depth);
    }
}
