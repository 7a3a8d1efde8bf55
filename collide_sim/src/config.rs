//! Driver and scenario configuration.

use crate::error::HarnessError;
use collide_core::{pair_from_slice, Particle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Presentation constants mapping world meters to screen pixels.
///
/// The engine never reads these; they only shape `view::project` output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Window size in pixels
    pub width: f32,
    pub height: f32,

    /// Horizontal scale (pixels per meter)
    pub pixels_per_meter: f32,

    /// Screen x of world position 0
    pub origin_x: f32,

    /// Screen y of the track the particles ride on
    pub baseline_y: f32,

    /// Sprite radius is `base_radius + mass`
    pub base_radius: f32,

    /// Sprites sit `lift * radius` above the baseline
    pub lift: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 240.0,
            pixels_per_meter: 10.0,
            origin_x: 50.0,
            baseline_y: 140.0,
            base_radius: 10.0,
            lift: 0.2,
        }
    }
}

/// Configuration for a driver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Frame rate limit in Hz
    pub tick_rate_hz: u32,

    /// Stop after this much clock time (seconds)
    pub max_duration_secs: f64,

    /// Whether the driver starts in the playing state
    pub start_playing: bool,

    /// Presentation mapping
    pub viewport: Viewport,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_duration_secs: 10.0,
            start_playing: true,
            viewport: Viewport::default(),
        }
    }
}

impl DriverConfig {
    /// Sets the tick rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Sets the maximum duration.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Sets whether the run starts playing.
    pub fn with_start_playing(mut self, playing: bool) -> Self {
        self.start_playing = playing;
        self
    }

    /// Checks ranges the driver loop depends on.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.tick_rate_hz == 0 {
            return Err(HarnessError::config("tick_rate_hz must be > 0"));
        }
        if !self.max_duration_secs.is_finite() || self.max_duration_secs < 0.0 {
            return Err(HarnessError::config(
                "max_duration_secs must be finite and >= 0",
            ));
        }
        if Duration::try_from_secs_f64(self.max_duration_secs).is_err() {
            return Err(HarnessError::config(format!(
                "max_duration_secs {} is out of range",
                self.max_duration_secs
            )));
        }
        if !(self.viewport.pixels_per_meter.is_finite() && self.viewport.pixels_per_meter > 0.0) {
            return Err(HarnessError::config("pixels_per_meter must be > 0"));
        }
        Ok(())
    }

    /// Time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }

    /// Total clock time a run may take. Saturates for values `validate`
    /// rejects.
    pub fn max_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_duration_secs).unwrap_or(Duration::MAX)
    }
}

/// A user-supplied scenario loaded from JSON.
///
/// ```json
/// { "name": "demo", "particles": [
///     { "mass": 5.0, "velocity": 10.0, "position": 0.0 },
///     { "mass": 2.0, "velocity": 0.0, "position": 20.0 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default = "default_scenario_name")]
    pub name: String,

    pub particles: Vec<Particle>,

    /// Optional input script (`event@seconds,...`)
    #[serde(default)]
    pub inputs: Option<String>,
}

fn default_scenario_name() -> String {
    "custom".to_string()
}

impl ScenarioFile {
    /// Reads and validates a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates scenario JSON.
    pub fn from_json(text: &str) -> Result<Self, HarnessError> {
        let file: ScenarioFile = serde_json::from_str(text)?;
        file.pair()?;
        Ok(file)
    }

    /// The initial pair (exactly two particles).
    pub fn pair(&self) -> Result<[Particle; 2], HarnessError> {
        Ok(pair_from_slice(&self.particles)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DriverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.viewport.pixels_per_meter, 10.0);
    }

    #[test]
    fn test_builder_and_validation() {
        let config = DriverConfig::default().with_tick_rate(0);
        assert!(config.validate().is_err());

        let config = DriverConfig::default().with_duration(-1.0);
        assert!(config.validate().is_err());

        // Finite but too long for a Duration
        let config = DriverConfig::default().with_duration(1e30);
        assert!(matches!(config.validate(), Err(HarnessError::Config(_))));
        assert_eq!(config.max_duration(), Duration::MAX);

        let config = DriverConfig::default().with_tick_rate(30).with_start_playing(false);
        assert!(config.validate().is_ok());
        assert!(!config.start_playing);
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_scenario_file_parses() {
        let file = ScenarioFile::from_json(
            r#"{"particles":[{"mass":5,"velocity":10,"position":0},{"mass":2,"velocity":0,"position":20}]}"#,
        )
        .unwrap();
        assert_eq!(file.name, "custom");
        assert!(file.inputs.is_none());
        let [left, right] = file.pair().unwrap();
        assert_eq!(left.mass(), 5.0);
        assert_eq!(right.position(), 20.0);
    }

    #[test]
    fn test_scenario_file_rejects_bad_input() {
        // Three particles
        let three = r#"{"particles":[
            {"mass":1,"velocity":0,"position":0},
            {"mass":1,"velocity":0,"position":1},
            {"mass":1,"velocity":0,"position":2}]}"#;
        assert!(matches!(
            ScenarioFile::from_json(three),
            Err(HarnessError::Sim(collide_core::SimError::ParticleCount(3)))
        ));

        // Zero mass
        let massless = r#"{"particles":[
            {"mass":0,"velocity":0,"position":0},
            {"mass":1,"velocity":0,"position":1}]}"#;
        assert!(matches!(
            ScenarioFile::from_json(massless),
            Err(HarnessError::Json(_))
        ));
    }
}
