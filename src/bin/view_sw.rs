use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use raycast_rs::{
    Config,
    frame::{FrameHost, FrameLoop, Pacing, RenderPacket, StopHandle},
    map::{default_map, load_map},
    renderer::{RendererExt, Software},
    sim::{InputCmd, TicRunner},
};

const TITLE: &str = "Rust Raycaster";

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Map file; the built-in level when omitted
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Window width, one ray per column
    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 400)]
    height: usize,

    /// Horizontal field of view in degrees, below 180
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Target presentation rate
    #[arg(long, default_value_t = 60)]
    fps: usize,

    /// Run tics at this wall-clock rate instead of one per frame
    #[arg(long, value_name = "HZ")]
    tic_rate: Option<u32>,
}

/// minifb window + software renderer.
struct Viewer {
    win: Window,
    renderer: Software,
    height: usize,
    stop: StopHandle,
    last_mouse: Option<(f32, f32)>,
    prompt_shown: bool,

    /* benchmarking */
    frame_start: Instant,
    acc_time: Duration,
    acc_frames: usize,
    last_print: Instant,
}

impl Viewer {
    fn mouse_delta(&mut self) -> (f32, f32) {
        let pos = self.win.get_mouse_pos(MouseMode::Pass);
        let held = self.win.get_mouse_down(MouseButton::Left);
        let delta = match (held, self.last_mouse, pos) {
            (true, Some((x0, y0)), Some((x1, y1))) => (x1 - x0, y1 - y0),
            _ => (0.0, 0.0),
        };
        self.last_mouse = pos;
        delta
    }

    fn report(&mut self) {
        self.acc_time += self.frame_start.elapsed();
        self.acc_frames += 1;
        if self.last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
            println!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            self.acc_time = Duration::ZERO;
            self.acc_frames = 0;
            self.last_print = Instant::now();
        }
    }
}

impl FrameHost for Viewer {
    fn is_open(&self) -> bool {
        self.win.is_open()
    }

    fn poll_input(&mut self) -> InputCmd {
        self.frame_start = Instant::now();
        if self.win.is_key_down(Key::Escape) {
            self.stop.stop();
        }

        let mut cmd = InputCmd::default();

        /* movement --------------------------------------------------------- */
        if self.win.is_key_down(Key::Up) || self.win.is_key_down(Key::W) || self.win.is_key_down(Key::Z) {
            cmd.forward += 1.0;
        }
        if self.win.is_key_down(Key::Down) || self.win.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if self.win.is_key_down(Key::A) || self.win.is_key_down(Key::Q) {
            cmd.strafe -= 1.0;
        }
        if self.win.is_key_down(Key::D) {
            cmd.strafe += 1.0;
        }
        if self.win.is_key_down(Key::Left) {
            cmd.turn -= 1.0;
        }
        if self.win.is_key_down(Key::Right) {
            cmd.turn += 1.0;
        }

        /* mouse look while the left button is held ------------------------ */
        let (dx, dy) = self.mouse_delta();
        cmd.look_yaw = dx;
        cmd.look_pitch = dy;

        cmd.use_act = self.win.is_key_pressed(Key::E, KeyRepeat::No); // edge-trigger
        cmd
    }

    fn present(&mut self, packet: &RenderPacket) -> anyhow::Result<()> {
        let win = &mut self.win;
        let mut shown = Ok(());
        self.renderer
            .draw_packet(packet, self.height, |fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown?;

        let prompt = packet.prompt.is_some();
        if prompt != self.prompt_shown {
            self.prompt_shown = prompt;
            if prompt {
                self.win.set_title(&format!("{TITLE} - Press E to open the door"));
            } else {
                self.win.set_title(TITLE);
            }
        }

        self.report();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let map = match &opts.map {
        Some(path) => load_map(path)?,
        None => default_map()?,
    };

    let mut cfg = Config::default().try_with_fov_degrees(opts.fov)?;
    let pacing = match opts.tic_rate {
        Some(hz) => {
            cfg.tic_rate = hz;
            Pacing::FixedRate
        }
        None => Pacing::PerFrame,
    };

    let sim = TicRunner::new(map, cfg);
    let mut frames = FrameLoop::new(sim, opts.width, pacing);

    let mut win = Window::new(TITLE, opts.width, opts.height, WindowOptions::default())?;
    win.set_target_fps(opts.fps);

    let mut viewer = Viewer {
        win,
        renderer: Software::default(),
        height: opts.height,
        stop: frames.stop_handle(),
        last_mouse: None,
        prompt_shown: false,
        frame_start: Instant::now(),
        acc_time: Duration::ZERO,
        acc_frames: 0,
        last_print: Instant::now(),
    };

    let n = frames.run(&mut viewer)?;
    log::info!("{n} frame(s), {} tic(s)", frames.sim().tics());
    Ok(())
}
