//! Everything a renderer needs for one frame, and nothing it could use
//! to poke at the simulation.

use std::f32::consts::{PI, TAU};

use glam::{IVec2, Vec2};
use smallvec::SmallVec;

use crate::caster::{Column, cast_columns_into};
use crate::config::Config;
use crate::sim::{InteractionPrompt, TicRunner};
use crate::world::{Door, DoorState, PlayerState};

/// Door draw metadata.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorSprite {
    pub cell: IVec2,
    pub centre: Vec2,
    pub open_amount: f32,
    pub state: DoorState,
}

/// Camera pose: all a renderer learns about the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewPoint {
    pub pos: Vec2,
    pub angle: f32,
    pub pitch: f32,
}

impl From<&PlayerState> for ViewPoint {
    fn from(p: &PlayerState) -> Self {
        Self {
            pos: p.pos,
            angle: p.angle,
            pitch: p.pitch,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderPacket {
    /// One entry per screen column, left to right.
    pub columns: Vec<Column>,
    pub view: ViewPoint,
    /// Vertical view shift in normalised screen units (+ = up):
    /// walk bob plus pitch.
    pub view_offset: f32,
    /// Doors inside the view wedge and `max_depth`.
    pub doors: SmallVec<[DoorSprite; 4]>,
    pub prompt: Option<InteractionPrompt>,
    pub tile_size: f32,
    pub max_depth: f32,
}

impl RenderPacket {
    /// Refill from the current simulation state, reusing allocations.
    pub fn rebuild(&mut self, sim: &TicRunner, width: usize) {
        let cfg = sim.config();
        let player = sim.player();
        let view = ViewPoint::from(&player);

        cast_columns_into(&sim.level(), view.pos, view.angle, width, cfg, &mut self.columns);

        self.view = view;
        self.view_offset = view_offset(&player, cfg);
        self.doors.clear();
        self.doors.extend(
            sim.doors()
                .filter(|d| door_in_view(d, &view, cfg))
                .map(|d| DoorSprite {
                    cell: d.cell,
                    centre: d.centre(cfg.tile_size),
                    open_amount: d.open_amount,
                    state: d.state(),
                }),
        );
        self.prompt = sim.prompt();
        self.tile_size = cfg.tile_size;
        self.max_depth = cfg.max_depth;
    }
}

/// Build a fresh packet for a `width`-column view.
pub fn build_frame(sim: &TicRunner, width: usize) -> RenderPacket {
    let mut packet = RenderPacket::default();
    packet.rebuild(sim, width);
    packet
}

/// Walk bob (only while moving forward/back) plus vertical look.
pub fn view_offset(player: &PlayerState, cfg: &Config) -> f32 {
    let bob = if player.speed != 0.0 {
        player.walk_cycle.sin() * cfg.bob_amplitude
    } else {
        0.0
    };
    bob + player.pitch * cfg.pitch_scale
}

/// Wrap into `(-π, π]`.
#[inline]
fn wrap_pi(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}

/// Does the door's cell overlap the horizontal view wedge within
/// `max_depth`?  Assumes `fov < π`.
pub fn door_in_view(door: &Door, view: &ViewPoint, cfg: &Config) -> bool {
    let min = door.cell.as_vec2() * cfg.tile_size;
    let max = min + Vec2::splat(cfg.tile_size);
    let eye = view.pos;

    // standing in the doorway
    if eye.cmpge(min).all() && eye.cmple(max).all() {
        return true;
    }
    if eye.clamp(min, max).distance(eye) >= cfg.max_depth {
        return false;
    }

    // Seen from outside, a cell spans less than π, so measuring corners
    // from the direction of its centre gives one contiguous arc with no
    // ±π seam inside it.
    let to_centre = (min + max) * 0.5 - eye;
    let centre = to_centre.y.atan2(to_centre.x);
    let corners = [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        Vec2::new(max.x, max.y),
    ];

    let mut lo = PI;
    let mut hi = -PI;
    for c in corners {
        let rel = c - eye;
        let a = wrap_pi(rel.y.atan2(rel.x) - centre);
        lo = lo.min(a);
        hi = hi.max(a);
    }

    // two arcs meet when their mid-points are closer than the half widths
    let mid = wrap_pi(centre + (lo + hi) * 0.5 - view.angle);
    mid.abs() <= cfg.fov * 0.5 + (hi - lo) * 0.5
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::WallType;
    use crate::map::parse_map;
    use crate::sim::InputCmd;
    use glam::ivec2;

    /// Doors east (3,2) and west (0,2) of the spawn.
    const HALL: &str = "
        1 1 1 1 1
        1 0 0 0 1
        2 0 p 2 1
        1 0 0 0 1
        1 1 1 1 1
    ";

    fn eye(x: f32, y: f32, angle: f32) -> ViewPoint {
        ViewPoint {
            pos: Vec2::new(x, y),
            angle,
            pitch: 0.0,
        }
    }

    fn sim() -> TicRunner {
        TicRunner::new(parse_map(HALL).unwrap(), Config::default())
    }

    #[test]
    fn packet_carries_columns_in_order() {
        let sim = sim();
        let packet = build_frame(&sim, 16);
        assert_eq!(packet.columns.len(), 16);
        assert!(packet.columns.windows(2).all(|w| w[0].ray_angle < w[1].ray_angle));
        // centre column faces the east door
        assert_eq!(packet.columns[8].hit.wall_type, WallType::Door);
        assert_eq!(packet.tile_size, 64.0);
        assert_eq!(packet.max_depth, 2000.0);
        assert_eq!(packet.view.pos, Vec2::new(160.0, 160.0));
        assert_eq!(packet.view.angle, 0.0);
    }

    #[test]
    fn only_doors_in_the_wedge_are_listed() {
        let sim = sim();
        let packet = build_frame(&sim, 8);
        let cells: Vec<_> = packet.doors.iter().map(|d| d.cell).collect();
        assert_eq!(cells, vec![ivec2(3, 2)]);
        assert_eq!(packet.doors[0].state, DoorState::Closed);
        assert_eq!(packet.doors[0].centre, Vec2::new(224.0, 160.0));
    }

    #[test]
    fn door_behind_is_hidden_until_turned_to() {
        let cfg = Config::default();
        let door = Door::closed(ivec2(0, 2));
        let mut v = eye(160.0, 160.0, 0.0);
        assert!(!door_in_view(&door, &v, &cfg));
        v.angle = PI;
        assert!(door_in_view(&door, &v, &cfg));
        // just outside the wedge to the side
        v.angle = PI - 1.2;
        assert!(!door_in_view(&door, &v, &cfg));
    }

    #[test]
    fn door_across_the_rear_seam_with_near_corner_in_wedge() {
        let cfg = Config::default();
        let door = Door::closed(ivec2(0, 1));
        // corner (64, 128) sits at -0.724 rad relative to the view, the
        // rest of the cell wraps round behind the viewer
        let v = eye(60.0, 128.5, 0.6);
        assert!(door_in_view(&door, &v, &cfg));
        // turn a little further: that corner leaves the ±π/4 wedge
        let v = eye(60.0, 128.5, 0.8);
        assert!(!door_in_view(&door, &v, &cfg));
    }

    #[test]
    fn far_doors_are_culled() {
        let cfg = Config {
            max_depth: 50.0,
            ..Config::default()
        };
        let door = Door::closed(ivec2(3, 2));
        assert!(!door_in_view(&door, &eye(100.0, 160.0, 0.0), &cfg)); // 92 units to the near face
        assert!(door_in_view(&door, &eye(180.0, 160.0, 0.0), &cfg)); // 12 units
    }

    #[test]
    fn prompt_and_door_state_flow_through() {
        let mut sim = sim();
        sim.tick();
        sim.set_input(InputCmd {
            use_act: true,
            ..Default::default()
        });
        // toggled during the first tic, after that tic's animation step
        sim.run_tics(3);
        let packet = build_frame(&sim, 4);
        assert_eq!(packet.prompt, Some(InteractionPrompt { door: ivec2(3, 2) }));
        let east = packet.doors.iter().find(|d| d.cell == ivec2(3, 2)).unwrap();
        assert_eq!(east.state, DoorState::Opening);
        assert!((east.open_amount - 0.10).abs() < 1e-4);
    }

    #[test]
    fn view_offset_combines_bob_and_pitch() {
        let cfg = Config::default();
        let mut p = PlayerState::at(Vec2::ZERO, 0.0);
        p.pitch = 0.2;
        p.walk_cycle = 1.0;
        // standing still: no bob even with a stale phase
        assert!((view_offset(&p, &cfg) - 0.1).abs() < 1e-6);
        p.speed = 2.0;
        let expect = 1.0_f32.sin() * 0.05 + 0.1;
        assert!((view_offset(&p, &cfg) - expect).abs() < 1e-6);
    }
}
