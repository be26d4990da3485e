use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use hecs::{Entity, World};

use super::{InputCmd, InteractError};
use super::collision::{self, MoveResult};
use crate::config::Config;
use crate::world::{CellQuery, Door, DoorRegistry, PlayerState, normalize_angle};

/* ── Input ────────────────────────────────────────────────────────── */

/// Turn a command into per-tic intents.  Mouse look is applied at once,
/// the same way a pointer-move handler would between tics.
pub fn player_input(player: &mut PlayerState, cmd: &InputCmd, cfg: &Config) {
    player.speed = cmd.forward * cfg.move_speed;
    player.strafe = cmd.strafe * cfg.strafe_speed;
    player.turn = cmd.turn * cfg.turn_speed;

    if cmd.look_yaw != 0.0 {
        player.angle = normalize_angle(player.angle + cmd.look_yaw * cfg.mouse_sensitivity);
    }
    if cmd.look_pitch != 0.0 {
        player.pitch =
            (player.pitch - cmd.look_pitch * cfg.mouse_sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/* ── Movement ─────────────────────────────────────────────────────── */

/// Turn, then try the combined forward + strafe step.
pub fn movement<G: CellQuery + ?Sized>(player: &mut PlayerState, grid: &G, cfg: &Config) -> MoveResult {
    player.angle = normalize_angle(player.angle + player.turn);

    let delta = player.forward() * player.speed + player.side() * player.strafe;
    let res = collision::try_move(grid, player.pos, delta, cfg.tile_size);
    player.pos = res.pos;

    // view-bob phase, renderer only
    if player.speed != 0.0 {
        player.walk_cycle += cfg.walk_step;
    } else {
        player.walk_cycle = 0.0;
    }
    res
}

/* ── Doors ────────────────────────────────────────────────────────── */

/// Step every door's `open_amount` toward its target.
pub fn door_animation(world: &mut World, step: f32) {
    for (_, door) in world.query_mut::<&mut Door>() {
        door.animate(step);
    }
}

/// First door, in registry order, whose centre is strictly inside the
/// interaction radius.  Not necessarily the nearest one.
pub fn door_proximity(world: &World, doors: &DoorRegistry, pos: Vec2, cfg: &Config) -> Option<Entity> {
    doors.entities().find(|&ent| {
        world
            .get::<&Door>(ent)
            .is_ok_and(|d| d.centre(cfg.tile_size).distance(pos) < cfg.interaction_radius)
    })
}

/// Flip a door's target state.  Refuses to shut a door on the player
/// standing in its cell.  Returns the door after the toggle.
pub fn toggle_door(
    world: &mut World,
    ent: Entity,
    player: &PlayerState,
    cfg: &Config,
) -> Result<Door, InteractError> {
    let door = world
        .query_one_mut::<&mut Door>(ent)
        .map_err(|_| InteractError::NoDoor)?;
    if door.is_open && (player.pos / cfg.tile_size).floor().as_ivec2() == door.cell {
        return Err(InteractError::Occupied(door.cell));
    }
    door.toggle();
    log::debug!(
        "door {} -> {}",
        door.cell,
        if door.is_open { "open" } else { "closed" }
    );
    Ok(*door)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
