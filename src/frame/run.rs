use std::{cell::Cell, rc::Rc};

use super::packet::RenderPacket;
use crate::sim::{InputCmd, TicRunner};

/// The host side of the loop: window, input device, presentation.
pub trait FrameHost {
    /// `false` once the host is torn down (window closed, ...).
    fn is_open(&self) -> bool;

    /// Sample the input device for the coming tic.
    fn poll_input(&mut self) -> InputCmd;

    /// Show a finished frame.  Called once per loop iteration.
    fn present(&mut self, packet: &RenderPacket) -> anyhow::Result<()>;
}

/// How tics relate to presented frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Exactly one tic per frame; the host's refresh sets the speed.
    #[default]
    PerFrame,
    /// Tics at `Config::tic_rate` of wall-clock time, however fast frames go.
    FixedRate,
}

/// Cancels a running [`FrameLoop`] from inside a host callback.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// input → tic(s) → rays → present, until stopped.
pub struct FrameLoop {
    sim: TicRunner,
    packet: RenderPacket,
    width: usize,
    pacing: Pacing,
    stop: StopHandle,
    frames: u64,
}

impl FrameLoop {
    /// `width` is the number of screen columns (rays per frame).
    pub fn new(sim: TicRunner, width: usize, pacing: Pacing) -> Self {
        Self {
            sim,
            packet: RenderPacket::default(),
            width,
            pacing,
            stop: StopHandle::default(),
            frames: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn sim(&self) -> &TicRunner {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut TicRunner {
        &mut self.sim
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Change the column count, e.g. after a window resize.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// One iteration: input, simulation, rays, present.
    pub fn frame<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> anyhow::Result<()> {
        let cmd = host.poll_input();
        self.sim.set_input(cmd);

        match self.pacing {
            Pacing::PerFrame => self.sim.tick(),
            Pacing::FixedRate => {
                self.sim.pump();
            }
        }

        self.packet.rebuild(&self.sim, self.width);
        host.present(&self.packet)?;
        self.frames += 1;
        Ok(())
    }

    /// Loop until the stop handle fires or the host closes.
    pub fn run<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> anyhow::Result<u64> {
        let start = self.frames;
        self.sim.reset_clock();
        while !self.stop.is_stopped() && host.is_open() {
            self.frame(host)?;
        }
        log::debug!(
            "frame loop stopped after {} frame(s), tic {}",
            self.frames - start,
            self.sim.tics()
        );
        Ok(self.frames - start)
    }

    /// Run at most `n` frames (fewer if stopped first).
    pub fn run_frames<H: FrameHost + ?Sized>(&mut self, n: u64, host: &mut H) -> anyhow::Result<u64> {
        let start = self.frames;
        while self.frames - start < n && !self.stop.is_stopped() && host.is_open() {
            self.frame(host)?;
        }
        Ok(self.frames - start)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
