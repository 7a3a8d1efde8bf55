//! Scenario runner - drives scenarios on a virtual clock and checks the
//! outcome against the oracle.

use crate::config::{DriverConfig, ScenarioFile};
use crate::context::SimContext;
use crate::driver::{Driver, DriverSummary, FrameRecord};
use crate::error::HarnessError;
use crate::exporter::SimExport;
use crate::input::{parse_events, ScriptedInput};
use crate::oracle::Oracle;
use crate::scenarios::{Expectation, ScenarioId, ScenarioSpec};

use collide_core::{CollisionReport, Particle, Simulation};
use collide_env::InputEvent;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Slack for float accumulation when comparing against the oracle.
const TIME_TOLERANCE: f64 = 1e-6;
const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total frames executed
    pub total_ticks: u64,

    /// Final driver clock time in seconds
    pub final_time_secs: f64,

    /// Number of particles at end
    pub final_particle_count: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Input events applied
    pub resets: u64,
    pub toggles: u64,

    /// Oracle contact time (continuous)
    pub predicted_contact_time: Option<f64>,

    /// Simulation time of the first merge
    pub collision_time: Option<f64>,

    /// Driver clock time of the frame that merged
    pub collision_clock_secs: Option<f64>,

    /// Velocity of the merged body
    pub merged_velocity: Option<f64>,

    /// |p_after - p_before| at the merge
    pub momentum_drift: f64,

    /// Kinetic energy lost at the merge
    pub energy_lost: f64,
}

/// What the runner saw while the driver ran.
#[derive(Debug, Default)]
struct Observations {
    merges: Vec<(f64, CollisionReport)>,
    resets: u64,
    merges_since_reset: u32,
    merged: bool,
    violations: Vec<String>,
}

impl Observations {
    fn record(&mut self, frame: &FrameRecord, initial: &[Particle; 2]) {
        let reset = frame.events.contains(&InputEvent::Reset);
        if reset {
            self.resets += 1;
            self.merges_since_reset = 0;
            self.merged = false;
            if frame.collision.is_none() && frame.particles.as_slice() != initial.as_slice() {
                self.violations.push(format!(
                    "frame {}: reset did not restore the initial pair",
                    frame.index
                ));
            }
        }

        if self.merged && frame.particles.len() != 1 {
            self.violations.push(format!(
                "frame {}: merged body split without a reset",
                frame.index
            ));
        }

        if let Some(report) = frame.collision {
            self.merges_since_reset += 1;
            self.merged = true;
            self.merges.push((frame.clock_secs, report));
            if self.merges_since_reset > 1 {
                self.violations
                    .push(format!("frame {}: second merge without a reset", frame.index));
            }
        }
    }
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Tick rate in Hz
    tick_rate_hz: u32,

    /// Maximum duration in seconds
    max_duration_secs: f64,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick_rate_hz: 60,
            max_duration_secs: 10.0,
        }
    }

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

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    /// Runs a built-in scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_scenario(scenario, None)
    }

    /// Runs the seeded random pair for this runner's seed.
    pub fn run_randomized(&self) -> ScenarioResult {
        self.run(ScenarioId::Randomized)
    }

    /// Runs a built-in scenario, recording frames into `export`.
    pub fn run_exported(&self, scenario: ScenarioId, export: &mut SimExport) -> ScenarioResult {
        self.run_scenario(scenario, Some(export))
    }

    fn run_scenario(&self, scenario: ScenarioId, export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        match scenario.spec(self.seed) {
            Ok(spec) => self.run_spec(scenario.name(), &spec, export),
            Err(e) => self.failed(scenario.name(), format!("invalid scenario setup: {}", e)),
        }
    }

    /// Builds a spec for a scenario file. Without a script the oracle
    /// decides between merge and no merge, and the duration is stretched so a
    /// predicted merge fits. A scripted file is only checked for invariants.
    pub fn spec_from_file(&self, file: &ScenarioFile) -> Result<ScenarioSpec, HarnessError> {
        let initial = file.pair()?;
        if let Some(script) = &file.inputs {
            return Ok(ScenarioSpec {
                initial,
                inputs: parse_events(script)?,
                expectation: Expectation::Invariants,
                duration_secs: None,
            });
        }
        let spec = match Oracle::new(initial).contact_time() {
            Some(t) => {
                let duration = self.max_duration_secs.max(t + 1.0);
                if Duration::try_from_secs_f64(duration).is_err() {
                    return Err(HarnessError::config(format!(
                        "predicted contact at t={}s is beyond the driver's clock range",
                        t
                    )));
                }
                ScenarioSpec {
                    initial,
                    inputs: Vec::new(),
                    expectation: Expectation::Merge,
                    duration_secs: Some(duration),
                }
            }
            None => ScenarioSpec {
                initial,
                inputs: Vec::new(),
                expectation: Expectation::NoMerge,
                duration_secs: None,
            },
        };
        Ok(spec)
    }

    /// Runs a scenario file.
    pub fn run_file(&self, file: &ScenarioFile, export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting scenario file: {} (seed={})", file.name, self.seed);
        match self.spec_from_file(file) {
            Ok(spec) => self.run_spec(&file.name, &spec, export),
            Err(e) => self.failed(&file.name, e.to_string()),
        }
    }

    /// Runs an explicit spec.
    pub fn run_spec(
        &self,
        name: &str,
        spec: &ScenarioSpec,
        mut export: Option<&mut SimExport>,
    ) -> ScenarioResult {
        let outcome = self.execute(spec, export.as_deref_mut());
        let (summary, obs, final_particles) = match outcome {
            Ok(v) => v,
            Err(e) => return self.failed(name, e.to_string()),
        };

        let oracle = Oracle::new(spec.initial);
        let mut metrics = ScenarioMetrics {
            resets: summary.resets,
            toggles: summary.toggles,
            predicted_contact_time: oracle.contact_time(),
            ..Default::default()
        };
        if let Some((clock_secs, report)) = obs.merges.first() {
            metrics.collision_time = Some(report.time);
            metrics.collision_clock_secs = Some(*clock_secs);
            metrics.merged_velocity = Some(report.merger.merged.velocity());
            metrics.momentum_drift = report.merger.momentum_drift();
            metrics.energy_lost = report.merger.energy_lost();
        }

        let verdict = self.evaluate(spec, &oracle, &obs, &final_particles);
        let passed = verdict.is_ok();
        let failure_reason = verdict.err();
        if let Some(reason) = &failure_reason {
            warn!("{} failed: {}", name, reason);
        } else {
            debug!("{} passed after {} frames", name, summary.frames);
        }

        if let Some(export) = export {
            export.finalize(
                passed,
                final_particles.len() == 1,
                &final_particles,
                failure_reason.clone(),
            );
        }

        ScenarioResult {
            scenario: name.to_string(),
            seed: self.seed,
            passed,
            total_ticks: summary.frames,
            final_time_secs: summary.clock_secs,
            final_particle_count: final_particles.len(),
            failure_reason,
            metrics,
        }
    }

    fn execute(
        &self,
        spec: &ScenarioSpec,
        mut export: Option<&mut SimExport>,
    ) -> Result<(DriverSummary, Observations, Vec<Particle>), HarnessError> {
        let clock = SimContext::shared(self.seed);
        let input = ScriptedInput::new(&spec.inputs)?;
        let sim = Simulation::new(spec.initial)?;
        let config = DriverConfig::default()
            .with_tick_rate(self.tick_rate_hz)
            .with_duration(spec.duration_secs.unwrap_or(self.max_duration_secs));
        let mut driver = Driver::new(sim, clock, input, config)?;

        let mut obs = Observations::default();
        let initial = spec.initial;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let summary = runtime.block_on(driver.run(|frame| {
            obs.record(frame, &initial);
            if let Some(export) = export.as_deref_mut() {
                export.add_frame(frame);
            }
        }))?;

        let final_particles = driver.simulation().particles().to_vec();
        Ok((summary, obs, final_particles))
    }

    fn evaluate(
        &self,
        spec: &ScenarioSpec,
        oracle: &Oracle,
        obs: &Observations,
        final_particles: &[Particle],
    ) -> Result<(), String> {
        if let Some(violation) = obs.violations.first() {
            return Err(violation.clone());
        }

        for (_, report) in &obs.merges {
            let m = &report.merger;
            if m.momentum_drift() > RELATIVE_TOLERANCE * (1.0 + m.momentum_before.abs()) {
                return Err(format!("momentum drift {:.3e} at merge", m.momentum_drift()));
            }
            if m.energy_lost() < -RELATIVE_TOLERANCE * (1.0 + m.kinetic_energy_before) {
                return Err(format!("kinetic energy grew by {:.3e}", -m.energy_lost()));
            }
        }

        match spec.expectation {
            Expectation::Merge => {
                if obs.merges.len() != 1 {
                    return Err(format!("expected 1 merge, saw {}", obs.merges.len()));
                }
                self.check_against_oracle(oracle, &obs.merges[0].1)?;
                if final_particles.len() != 1 {
                    return Err(format!("expected 1 particle, have {}", final_particles.len()));
                }
            }
            Expectation::NoMerge => {
                if !obs.merges.is_empty() {
                    return Err(format!("unexpected merge at t={:.4}s", obs.merges[0].1.time));
                }
                if final_particles.len() != 2 {
                    return Err(format!("expected 2 particles, have {}", final_particles.len()));
                }
            }
            Expectation::RestoreAfterReset => {
                let Some((_, first)) = obs.merges.first() else {
                    return Err("no merge before reset".to_string());
                };
                self.check_against_oracle(oracle, first)?;
                if obs.resets == 0 {
                    return Err("reset was never applied".to_string());
                }
                if final_particles != spec.initial.as_slice() {
                    return Err("final particles differ from the initial pair".to_string());
                }
            }
            Expectation::Invariants => {}
        }
        Ok(())
    }

    fn check_against_oracle(&self, oracle: &Oracle, report: &CollisionReport) -> Result<(), String> {
        let prediction = oracle
            .predict()
            .map_err(|e| format!("oracle failed: {}", e))?
            .ok_or_else(|| "merge happened but the oracle predicts none".to_string())?;

        let interval = 1.0 / self.tick_rate_hz as f64;
        let t = report.time;
        if t < prediction.contact_time - TIME_TOLERANCE
            || t > prediction.contact_time + interval + TIME_TOLERANCE
        {
            return Err(format!(
                "merge at t={:.6}s, oracle contact at t={:.6}s",
                t, prediction.contact_time
            ));
        }

        let merged = report.merger.merged;
        let expected = prediction.merged;
        if (merged.mass() - expected.mass()).abs() > RELATIVE_TOLERANCE * expected.mass() {
            return Err(format!("merged mass {} != {}", merged.mass(), expected.mass()));
        }
        let dv = (merged.velocity() - expected.velocity()).abs();
        if dv > RELATIVE_TOLERANCE * (1.0 + expected.velocity().abs()) {
            return Err(format!(
                "merged velocity {:.9} != oracle {:.9}",
                merged.velocity(),
                expected.velocity()
            ));
        }
        Ok(())
    }

    fn failed(&self, name: &str, reason: String) -> ScenarioResult {
        warn!("{} failed: {}", name, reason);
        ScenarioResult {
            scenario: name.to_string(),
            seed: self.seed,
            passed: false,
            total_ticks: 0,
            final_time_secs: 0.0,
            final_particle_count: 0,
            failure_reason: Some(reason),
            metrics: ScenarioMetrics::default(),
        }
    }
}
