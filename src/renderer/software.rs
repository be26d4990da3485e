//! ---------------------------------------------------------------------------
//! Flat-shaded software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Each column is written top to bottom: ceiling, wall slice, floor.
//!   Every pixel of a drawn column is overwritten, so no Z-buffer.
//! ---------------------------------------------------------------------------

use crate::{
    caster::{Column, Side, WallType},
    frame::RenderPacket,
    renderer::{Renderer, Rgba},
};

const CLEAR: Rgba = 0xFF_20_20_20;
const CEILING: Rgba = 0xFF_38_38_40;
const FLOOR: Rgba = 0xFF_50_4C_48;
const WALL_X: Rgba = 0xFF_A0_A0_A0;
const WALL_Y: Rgba = 0xFF_78_78_78;
const DOOR: Rgba = 0xFF_8B_5A_2B;

/// Darkest a surface gets at `max_depth`.
const MIN_LIGHT: f32 = 0.25;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    /// The last finished frame, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR);
    }

    fn draw_column(&mut self, x: usize, column: &Column, packet: &RenderPacket) {
        if x >= self.width {
            return;
        }
        let h = self.height as f32;
        // + view_offset looks up, which pushes the horizon down
        let horizon = h * (0.5 + packet.view_offset);

        let (top, bot, colour) = if column.is_drawn(packet.max_depth) {
            let half = column.height_ratio(packet.tile_size) * h * 0.5;
            let light = 1.0 - (1.0 - MIN_LIGHT) * (column.corrected / packet.max_depth);
            (horizon - half, horizon + half, shade(surface_colour(column), light))
        } else {
            (horizon, horizon, CLEAR)
        };

        let y0 = top.clamp(0.0, h) as usize;
        let y1 = bot.clamp(0.0, h) as usize;
        for y in 0..self.height {
            self.scratch[y * self.width + x] = if y < y0 {
                CEILING
            } else if y < y1 {
                colour
            } else {
                FLOOR
            };
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── colour helpers ─────────────────────────────*/

fn surface_colour(column: &Column) -> Rgba {
    match (column.hit.wall_type, column.hit.side) {
        (WallType::Door, _) => DOOR,
        (_, Side::X) => WALL_X,
        (_, Side::Y) => WALL_Y,
    }
}

/// Scale the RGB channels by `light` (clamped to 0..=1), keep alpha.
fn shade(c: Rgba, light: f32) -> Rgba {
    let l = light.clamp(0.0, 1.0);
    let ch = |shift: u32| ((((c >> shift) & 0xFF) as f32 * l) as u32) << shift;
    (c & 0xFF_00_00_00) | ch(16) | ch(8) | ch(0)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        frame::build_frame,
        map::parse_map,
        renderer::RendererExt,
        sim::TicRunner,
    };

    /// Door 2.5 cells east of the spawn.
    const ROOM: &str = "
        1 1 1 1 1 1
        1 p 0 0 2 1
        1 1 1 1 1 1
    ";

    fn render(sim: &TicRunner, w: usize, h: usize) -> Vec<Rgba> {
        let packet = build_frame(sim, w);
        let mut sw = Software::default();
        let mut out = Vec::new();
        sw.draw_packet(&packet, h, |fb, fw, fh| {
            assert_eq!((fw, fh), (w, h));
            out.extend_from_slice(fb);
        });
        out
    }

    fn column(fb: &[Rgba], w: usize, x: usize) -> Vec<Rgba> {
        fb.iter().skip(x).step_by(w).copied().collect()
    }

    #[test]
    fn door_ahead_paints_brown_slice() {
        let sim = TicRunner::new(parse_map(ROOM).unwrap(), Config::default());
        let fb = render(&sim, 8, 40);
        let mid = column(&fb, 8, 4);

        assert_eq!(mid[0], CEILING);
        assert_eq!(mid[39], FLOOR);
        let px = mid[20];
        let (r, g, b) = ((px >> 16) & 0xFF, (px >> 8) & 0xFF, px & 0xFF);
        assert!(r > g && g > b, "not brown: {px:08x}");
    }

    #[test]
    fn exhausted_column_is_ceiling_and_floor_only() {
        let cfg = Config {
            max_depth: 20.0,
            ..Config::default()
        };
        let sim = TicRunner::new(parse_map(ROOM).unwrap(), cfg);
        let fb = render(&sim, 4, 10);
        for x in 0..4 {
            let col = column(&fb, 4, x);
            assert!(col[..5].iter().all(|&p| p == CEILING));
            assert!(col[5..].iter().all(|&p| p == FLOOR));
        }
    }

    #[test]
    fn view_offset_moves_the_horizon() {
        let cfg = Config {
            max_depth: 20.0,
            ..Config::default()
        };
        let sim = TicRunner::new(parse_map(ROOM).unwrap(), cfg);
        let mut packet = build_frame(&sim, 2);
        packet.view_offset = 0.25; // horizon at row 7.5

        let mut sw = Software::default();
        sw.draw_packet(&packet, 10, |_, _, _| {});
        let col = column(sw.pixels(), 2, 0);
        assert!(col[..7].iter().all(|&p| p == CEILING));
        assert!(col[7..].iter().all(|&p| p == FLOOR));
    }

    #[test]
    fn every_pixel_is_opaque_argb() {
        let sim = TicRunner::new(parse_map(ROOM).unwrap(), Config::default());
        let fb = render(&sim, 8, 20);
        assert!(fb.iter().all(|&p| p >> 24 == 0xFF));
    }

    #[test]
    fn shading_darkens_with_distance() {
        assert_eq!(shade(WALL_X, 1.0), WALL_X);
        assert_eq!(shade(0xFF_80_80_80, 0.5), 0xFF_40_40_40);
        assert_eq!(shade(DOOR, 0.0), 0xFF_00_00_00);
    }
}
