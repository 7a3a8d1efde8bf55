//! JSON exporter for driver runs.
//!
//! Writes frame records so runs can be replayed or plotted outside Rust.

use crate::driver::FrameRecord;
use collide_core::Particle;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Frame rate of the run
    pub tick_rate_hz: u32,

    /// Clock time of the last exported frame
    pub duration_sec: f64,

    /// Keep every n-th frame (frames carrying events or a merge are always kept)
    pub frame_stride: u64,

    pub frames: Vec<FrameRecord>,

    /// Final results
    pub passed: bool,
    pub collided: bool,
    pub final_particles: Vec<Particle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, tick_rate_hz: u32) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            tick_rate_hz,
            duration_sec: 0.0,
            frame_stride: 1,
            frames: Vec::new(),
            passed: false,
            collided: false,
            final_particles: Vec::new(),
            failure_reason: None,
        }
    }

    /// Keeps only every `stride`-th frame.
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.frame_stride = stride.max(1);
        self
    }

    /// Adds a frame, subject to the stride.
    pub fn add_frame(&mut self, frame: &FrameRecord) {
        let notable = !frame.events.is_empty() || frame.collision.is_some();
        if frame.index % self.frame_stride == 0 || notable {
            self.duration_sec = frame.clock_secs;
            self.frames.push(frame.clone());
        }
    }

    /// Finalizes the export.
    pub fn finalize(
        &mut self,
        passed: bool,
        collided: bool,
        final_particles: &[Particle],
        failure_reason: Option<String>,
    ) {
        self.passed = passed;
        self.collided = collided;
        self.final_particles = final_particles.to_vec();
        self.failure_reason = failure_reason;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
