// driver.rs - Fixed-interval loop: tick, unstick, publish the screen window

use std::time::Duration;

use anyhow::Result;
use conway::{FrameError, FrameSink, ScreenMessage, StuckReport, World, WorldError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::WindowConfig;

/// What one step did, for logging and the preview's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub generation: u64,
    pub live: usize,
    pub diversity: usize,
    pub pixels: usize,
    pub stuck: StuckReport,
}

pub struct Driver {
    world: World,
    window: WindowConfig,
}

impl Driver {
    /// Fails when the screen window does not fit inside the world.
    pub fn new(world: World, window: WindowConfig) -> Result<Self, WorldError> {
        world.get_screen_cells(window.origin_x, window.origin_y, window.cols, window.rows)?;
        Ok(Self { world, window })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn window(&self) -> WindowConfig {
        self.window
    }

    /// Sends the current window without advancing the simulation.
    pub fn publish<S: FrameSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        let WindowConfig { origin_x, origin_y, cols, rows } = self.window;
        let window = self.world.get_screen_cells(origin_x, origin_y, cols, rows)?;
        Ok(sink.send_window(&window)?)
    }

    /// One cycle: tick, stuck handling, then one frame to `sink`.
    pub fn step<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<StepReport> {
        self.world.tick();
        let stuck = self.world.handle_stuck();
        let pixels = self.publish(sink)?;
        Ok(StepReport {
            generation: self.world.generation(),
            live: self.world.live_count(),
            diversity: self.world.history_diversity_score(),
            pixels,
            stuck,
        })
    }

    /// Steps once per `period` until Ctrl-C or `max_frames` steps have run.
    /// Returns the number of steps run; a step whose frame failed to send
    /// still counts.
    pub async fn run<S: FrameSink + ?Sized>(
        &mut self,
        sink: &mut S,
        period: Duration,
        max_frames: Option<u64>,
    ) -> Result<u64> {
        sink.publish(&ScreenMessage::Clear)?;

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut frames = 0;
        while max_frames.is_none_or(|max| frames < max) {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(frames, "interrupted, stopping driver");
                    break;
                }
                _ = ticker.tick() => {}
            }

            match self.step(sink) {
                Ok(report) => {
                    if !report.stuck.is_quiet() {
                        info!(generation = report.generation, stuck = ?report.stuck, "intervened");
                    }
                    debug!(
                        generation = report.generation,
                        live = report.live,
                        diversity = report.diversity,
                        pixels = report.pixels,
                        "frame sent"
                    );
                }
                // A closed output ends the run; anything else only costs a frame
                Err(err) if matches!(err.downcast_ref::<FrameError>(), Some(FrameError::Io(_))) => {
                    return Err(err);
                }
                Err(err) => warn!(error = %err, "failed to send frame"),
            }
            frames += 1;
        }
        Ok(frames)
    }
}
