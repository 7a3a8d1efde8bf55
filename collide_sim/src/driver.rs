//! The driver loop: turns clock time and input events into `update(dt)`
//! calls and per-frame records.

use crate::config::DriverConfig;
use crate::error::HarnessError;
use crate::view::{self, Sprite};
use collide_core::{CollisionReport, Particle, Simulation};
use collide_env::{FrameClock, InputEvent, InputSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything observable about one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame number since the driver started
    pub index: u64,

    /// Driver clock time at the start of the frame (seconds)
    pub clock_secs: f64,

    /// Time step handed to the engine
    pub dt: f64,

    /// Playing state after this frame's input
    pub playing: bool,

    /// Input events applied this frame
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<InputEvent>,

    /// Engine state after the update
    pub collided: bool,
    pub particles: Vec<Particle>,
    pub sprites: Vec<Sprite>,

    /// Set on the frame whose update merged the pair
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collision: Option<CollisionReport>,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverSummary {
    pub frames: u64,
    pub collisions: u64,
    pub resets: u64,
    pub toggles: u64,

    /// Clock time when the loop stopped (seconds)
    pub clock_secs: f64,

    /// True if a `Quit` input ended the run
    pub quit: bool,
}

/// Owns a simulation and feeds it from a clock and an input source.
pub struct Driver<C: FrameClock, I: InputSource> {
    sim: Simulation,
    clock: Arc<C>,
    input: I,
    config: DriverConfig,
    playing: bool,
    last_sample: Duration,
    frame_index: u64,
    quit: bool,
}

impl<C: FrameClock, I: InputSource> Driver<C, I> {
    /// Creates a driver; the frame clock starts at the clock's current time.
    pub fn new(
        sim: Simulation,
        clock: Arc<C>,
        input: I,
        config: DriverConfig,
    ) -> Result<Self, HarnessError> {
        config.validate()?;
        let last_sample = clock.now();
        Ok(Self {
            sim,
            clock,
            playing: config.start_playing,
            input,
            config,
            last_sample,
            frame_index: 0,
            quit: false,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Runs one frame: input, clock sample, engine update, projection.
    ///
    /// The clock is sampled every frame whether or not the driver is playing,
    /// so time spent paused never reaches the engine.
    pub fn frame(&mut self) -> Result<FrameRecord, HarnessError> {
        let now = self.clock.now();
        let events = self.input.poll(now);

        for event in &events {
            match event {
                InputEvent::TogglePlay => {
                    self.playing = !self.playing;
                    info!(
                        "t={:.3}s {}",
                        now.as_secs_f64(),
                        if self.playing { "playing" } else { "paused" }
                    );
                }
                InputEvent::Reset => {
                    self.sim.reset();
                    self.last_sample = now;
                    info!("t={:.3}s reset", now.as_secs_f64());
                }
                InputEvent::Quit => {
                    self.quit = true;
                }
            }
        }

        let elapsed = now.saturating_sub(self.last_sample);
        self.last_sample = now;
        let dt = if self.playing {
            elapsed.as_secs_f64()
        } else {
            0.0
        };

        let collision = self.sim.update(dt)?;

        let particles = self.sim.particles().to_vec();
        let record = FrameRecord {
            index: self.frame_index,
            clock_secs: now.as_secs_f64(),
            dt,
            playing: self.playing,
            events,
            collided: self.sim.has_collided(),
            sprites: view::project(&particles, &self.config.viewport),
            particles,
            collision,
        };
        self.frame_index += 1;
        Ok(record)
    }

    /// Loops `frame()` until a quit input or the configured duration of clock
    /// time, sleeping one frame interval between frames.
    pub async fn run<F>(&mut self, mut on_frame: F) -> Result<DriverSummary, HarnessError>
    where
        F: FnMut(&FrameRecord),
    {
        let interval = self.config.frame_interval();
        let deadline = self.clock.now().saturating_add(self.config.max_duration());
        let report_every = u64::from(self.config.tick_rate_hz);
        let mut summary = DriverSummary::default();

        loop {
            let record = self.frame()?;

            summary.frames += 1;
            if record.collision.is_some() {
                summary.collisions += 1;
            }
            for event in &record.events {
                match event {
                    InputEvent::TogglePlay => summary.toggles += 1,
                    InputEvent::Reset => summary.resets += 1,
                    InputEvent::Quit => {}
                }
            }
            if record.index % report_every == 0 {
                debug!(
                    "  t={:.1}s | particles={} | playing={} | collided={}",
                    record.clock_secs,
                    record.particles.len(),
                    record.playing,
                    record.collided
                );
            }
            on_frame(&record);

            if self.quit || self.clock.now() >= deadline {
                break;
            }
            self.clock.sleep(interval).await;
        }

        summary.clock_secs = self.clock.now().as_secs_f64();
        summary.quit = self.quit;
        Ok(summary)
    }
}
