use super::{InputCmd, InteractError, InteractionPrompt, systems};
use crate::config::Config;
use crate::world::{Door, DoorRegistry, LevelView, PlayerState, TileMap};
use glam::{IVec2, Vec2};
use hecs::{Entity, World};
use std::time::{Duration, Instant};

/// Tics `pump` may run in one call before it gives up catching up.
const MAX_CATCH_UP: u32 = 8;

/// Owns the whole simulation and advances it one tic at a time.
///
/// Tic order is fixed: movement → door animation → proximity → interact.
/// Rays are cast afterwards from the finished state (`frame::build_frame`).
pub struct TicRunner {
    entities: World,
    map: TileMap,
    doors: DoorRegistry,
    player: PlayerState,
    active_door: Option<Entity>,
    pending_use: bool,
    cfg: Config,
    tics: u64,
    last: Instant,
    tic: Duration,
}

impl TicRunner {
    /// Spawn one entity per door cell and put the player on the spawn
    /// cell, facing +X.
    pub fn new(map: TileMap, cfg: Config) -> Self {
        let mut entities = World::new();
        let doors = DoorRegistry::spawn_all(&mut entities, &map);
        let player = PlayerState::at(map.spawn_point(cfg.tile_size), 0.0);
        log::info!(
            "simulation ready: {} door(s), player at {}",
            doors.len(),
            player.pos
        );
        Self {
            entities,
            map,
            doors,
            player,
            active_door: None,
            pending_use: false,
            cfg,
            tics: 0,
            last: Instant::now(),
            tic: Duration::from_secs_f64(1.0 / cfg.tic_rate.max(1) as f64),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[inline]
    pub fn player(&self) -> PlayerState {
        self.player
    }

    /// Tics run so far.
    #[inline]
    pub fn tics(&self) -> u64 {
        self.tics
    }

    /// Grid + doors as one [`CellQuery`](crate::world::CellQuery).
    #[inline]
    pub fn level(&self) -> LevelView<'_> {
        LevelView {
            map: &self.map,
            doors: &self.doors,
            entities: &self.entities,
        }
    }

    pub fn door_at(&self, cell: IVec2) -> Option<Door> {
        self.doors.door_at(&self.entities, cell)
    }

    /// Every door, in load order.
    pub fn doors(&self) -> impl Iterator<Item = Door> + '_ {
        self.doors
            .entities()
            .filter_map(|e| self.entities.get::<&Door>(e).ok().map(|d| *d))
    }

    /// Move the player, keeping intents.  Hosts use it for respawns.
    pub fn place_player(&mut self, pos: Vec2, angle: f32) {
        let intents = self.player;
        self.player = PlayerState {
            speed: intents.speed,
            strafe: intents.strafe,
            turn: intents.turn,
            ..PlayerState::at(pos, angle)
        };
    }

    /// Latch the host's command for the next tic.
    pub fn set_input(&mut self, cmd: InputCmd) {
        systems::player_input(&mut self.player, &cmd, &self.cfg);
        self.pending_use |= cmd.use_act;
    }

    /// Door the player may toggle right now, as of the last tic.
    pub fn prompt(&self) -> Option<InteractionPrompt> {
        let ent = self.active_door?;
        let door = self.entities.get::<&Door>(ent).ok()?;
        Some(InteractionPrompt { door: door.cell })
    }

    /// Toggle the active door.  Returns its new state, or why nothing
    /// happened.
    pub fn interact(&mut self) -> Result<Door, InteractError> {
        let ent = self.active_door.ok_or(InteractError::NoDoor)?;
        systems::toggle_door(&mut self.entities, ent, &self.player, &self.cfg)
    }

    /* ---------------------------------------------------------------- */
    /* fixed-order tic                                                  */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self) {
        let level = LevelView {
            map: &self.map,
            doors: &self.doors,
            entities: &self.entities,
        };
        systems::movement(&mut self.player, &level, &self.cfg);
        systems::door_animation(&mut self.entities, self.cfg.door_step);
        self.active_door =
            systems::door_proximity(&self.entities, &self.doors, self.player.pos, &self.cfg);

        if std::mem::take(&mut self.pending_use) {
            if let Err(e) = self.interact() {
                log::debug!("use ignored: {e}");
            }
        }

        self.tics += 1;
        log::trace!(
            "tic {}: pos {} angle {:.3} prompt {:?}",
            self.tics,
            self.player.pos,
            self.player.angle,
            self.prompt()
        );
    }

    /// Run exactly `n` tics.
    pub fn run_tics(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Run as many tics as wall-clock time since the last call allows.
    /// Returns how many ran.
    pub fn pump(&mut self) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= self.tic {
            if ran == MAX_CATCH_UP {
                // fell too far behind (debugger, window drag): drop the backlog
                self.last = Instant::now();
                break;
            }
            self.tick();
            self.last += self.tic;
            ran += 1;
        }
        ran
    }

    /// Restart wall-clock pacing from now.
    pub fn reset_clock(&mut self) {
        self.last = Instant::now();
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
