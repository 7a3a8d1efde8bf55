//! Built-in scenarios for the deterministic driver.

use collide_core::{Particle, Result};
use collide_env::InputEvent;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Heavy fast body runs into a light resting one
    TwoBodyMerge,

    /// Merge, then reset back to the pair
    ResetAfterCollision,

    /// Two resting bodies never meet
    StationaryPair,

    /// Equal masses, opposite velocities: merged body stops
    HeadOn,

    /// Fast body catches a slower one moving the same way
    Chase,

    /// Bodies moving apart never meet
    Receding,

    /// Same velocity, constant gap
    EqualVelocity,

    /// Merge delayed by a pause in playback
    PauseResume,

    /// Seeded random approaching pair, checked against the oracle
    Randomized,
}

/// What a scenario run must show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly one merge matching the oracle
    Merge,
    /// The pair is still two bodies at the end
    NoMerge,
    /// A merge matching the oracle, then a reset restoring the pair exactly
    RestoreAfterReset,
    /// Outcome left to a user script; only the merge invariants are checked
    Invariants,
}

/// Concrete setup for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    pub initial: [Particle; 2],

    /// Timed input events `(seconds, event)`
    pub inputs: Vec<(f64, InputEvent)>,

    pub expectation: Expectation,

    /// Overrides the runner's duration when set
    pub duration_secs: Option<f64>,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::TwoBodyMerge,
            ScenarioId::ResetAfterCollision,
            ScenarioId::StationaryPair,
            ScenarioId::HeadOn,
            ScenarioId::Chase,
            ScenarioId::Receding,
            ScenarioId::EqualVelocity,
            ScenarioId::PauseResume,
            ScenarioId::Randomized,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::TwoBodyMerge => "two_body_merge",
            ScenarioId::ResetAfterCollision => "reset_after_collision",
            ScenarioId::StationaryPair => "stationary_pair",
            ScenarioId::HeadOn => "head_on",
            ScenarioId::Chase => "chase",
            ScenarioId::Receding => "receding",
            ScenarioId::EqualVelocity => "equal_velocity",
            ScenarioId::PauseResume => "pause_resume",
            ScenarioId::Randomized => "randomized",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::TwoBodyMerge => "m=5 v=10 hits m=2 at rest 20m away; merged v = 50/7",
            ScenarioId::ResetAfterCollision => "two_body_merge, then reset restores the original pair",
            ScenarioId::StationaryPair => "two bodies at rest 10m apart never collide",
            ScenarioId::HeadOn => "equal masses at +/-5 m/s meet at the origin and stop",
            ScenarioId::Chase => "m=3 at 4 m/s catches m=1 at 1 m/s",
            ScenarioId::Receding => "bodies moving apart never collide",
            ScenarioId::EqualVelocity => "same velocity keeps the gap constant",
            ScenarioId::PauseResume => "two_body_merge with playback paused from 0.5s to 1.5s",
            ScenarioId::Randomized => "seeded random approaching pair vs. the oracle, then reset",
        }
    }

    /// Builds the concrete setup. Only `Randomized` uses the seed.
    pub fn spec(&self, seed: u64) -> Result<ScenarioSpec> {
        let spec = match self {
            ScenarioId::TwoBodyMerge => ScenarioSpec {
                initial: [pt(5.0, 10.0, 0.0)?, pt(2.0, 0.0, 20.0)?],
                inputs: vec![],
                expectation: Expectation::Merge,
                duration_secs: Some(4.0),
            },
            ScenarioId::ResetAfterCollision => ScenarioSpec {
                initial: [pt(5.0, 10.0, 0.0)?, pt(2.0, 0.0, 20.0)?],
                inputs: vec![(3.0, InputEvent::Reset), (3.0, InputEvent::Quit)],
                expectation: Expectation::RestoreAfterReset,
                duration_secs: Some(4.0),
            },
            ScenarioId::StationaryPair => ScenarioSpec {
                initial: [pt(1.0, 0.0, 0.0)?, pt(1.0, 0.0, 10.0)?],
                inputs: vec![],
                expectation: Expectation::NoMerge,
                duration_secs: None,
            },
            ScenarioId::HeadOn => ScenarioSpec {
                initial: [pt(1.0, 5.0, -10.0)?, pt(1.0, -5.0, 10.0)?],
                inputs: vec![],
                expectation: Expectation::Merge,
                duration_secs: Some(4.0),
            },
            ScenarioId::Chase => ScenarioSpec {
                initial: [pt(3.0, 4.0, 0.0)?, pt(1.0, 1.0, 6.0)?],
                inputs: vec![],
                expectation: Expectation::Merge,
                duration_secs: Some(4.0),
            },
            ScenarioId::Receding => ScenarioSpec {
                initial: [pt(1.0, -2.0, 0.0)?, pt(1.0, 3.0, 5.0)?],
                inputs: vec![],
                expectation: Expectation::NoMerge,
                duration_secs: None,
            },
            ScenarioId::EqualVelocity => ScenarioSpec {
                initial: [pt(2.0, 3.0, 0.0)?, pt(5.0, 3.0, 4.0)?],
                inputs: vec![],
                expectation: Expectation::NoMerge,
                duration_secs: None,
            },
            ScenarioId::PauseResume => ScenarioSpec {
                initial: [pt(5.0, 10.0, 0.0)?, pt(2.0, 0.0, 20.0)?],
                inputs: vec![(0.5, InputEvent::TogglePlay), (1.5, InputEvent::TogglePlay)],
                expectation: Expectation::Merge,
                duration_secs: Some(5.0),
            },
            ScenarioId::Randomized => random_spec(seed)?,
        };
        Ok(spec)
    }

    /// Returns true if the scenario depends on the seed.
    pub fn is_seeded(&self) -> bool {
        matches!(self, ScenarioId::Randomized)
    }
}

fn pt(mass: f64, velocity: f64, position: f64) -> Result<Particle> {
    Particle::new(mass, velocity, position)
}

/// A random pair that always closes: the left body is faster than the
/// right one by at least 1 m/s, so contact happens within `gap` seconds.
fn random_spec(seed: u64) -> Result<ScenarioSpec> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mass = Uniform::new(0.1, 20.0);
    let gap = Uniform::new(1.0, 50.0);
    let m_left = mass.sample(&mut rng);
    let m_right = mass.sample(&mut rng);
    let z: f64 = rng.sample(StandardNormal);
    let v_right = 10.0 * z;
    let v_left = v_right + 1.0 + rng.gen::<f64>() * 20.0;
    let x_left: f64 = rng.gen_range(-50.0..50.0);
    let x_right = x_left + gap.sample(&mut rng);

    let contact = (x_right - x_left) / (v_left - v_right);
    let reset_at = contact + 0.5;

    Ok(ScenarioSpec {
        initial: [pt(m_left, v_left, x_left)?, pt(m_right, v_right, x_right)?],
        inputs: vec![(reset_at, InputEvent::Reset), (reset_at, InputEvent::Quit)],
        expectation: Expectation::RestoreAfterReset,
        duration_secs: Some(reset_at + 1.0),
    })
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "two_body_merge" | "twobodymerge" | "a" => Ok(ScenarioId::TwoBodyMerge),
            "reset_after_collision" | "resetaftercollision" | "b" => {
                Ok(ScenarioId::ResetAfterCollision)
            }
            "stationary_pair" | "stationarypair" | "c" => Ok(ScenarioId::StationaryPair),
            "head_on" | "headon" => Ok(ScenarioId::HeadOn),
            "chase" => Ok(ScenarioId::Chase),
            "receding" => Ok(ScenarioId::Receding),
            "equal_velocity" | "equalvelocity" => Ok(ScenarioId::EqualVelocity),
            "pause_resume" | "pauseresume" => Ok(ScenarioId::PauseResume),
            "randomized" | "random" => Ok(ScenarioId::Randomized),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
