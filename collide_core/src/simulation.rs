//! Lifecycle controller: owns the particle state and sequences
//! integrate → detect → resolve on every step.

use crate::detector;
use crate::error::{Result, SimError};
use crate::integrator;
use crate::particle::Particle;
use crate::resolver::{self, Merger};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Lifecycle phase of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Initial pair installed, zero or more steps applied, not yet merged
    Configured,
    /// The pair has merged into one body
    Collided,
}

/// Shape of the particle set.
///
/// Detection and resolution only exist for `TwoBody`; once `Merged` there is
/// no code path that can produce a second collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyState {
    /// Left (slot 0) and right (slot 1) bodies
    TwoBody([Particle; 2]),
    /// The single combined body
    Merged(Particle),
}

impl BodyState {
    /// Read-only ordered view of the current particles.
    pub fn particles(&self) -> &[Particle] {
        match self {
            BodyState::TwoBody(pair) => pair.as_slice(),
            BodyState::Merged(body) => std::slice::from_ref(body),
        }
    }

    fn particles_mut(&mut self) -> &mut [Particle] {
        match self {
            BodyState::TwoBody(pair) => pair.as_mut_slice(),
            BodyState::Merged(body) => std::slice::from_mut(body),
        }
    }
}

/// Record of the merge, stamped with when it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionReport {
    /// Simulation time (sum of dt since setup/reset) at the merging step
    pub time: f64,

    /// 1-based index of the step that merged the pair
    pub step: u64,

    /// Physics of the merge
    pub merger: Merger,
}

/// The one-dimensional two-body inelastic collision simulation.
///
/// # Example
///
/// ```
/// use collide_core::{Particle, Simulation};
///
/// let mut sim = Simulation::new([
///     Particle::new(5.0, 10.0, 0.0).unwrap(),
///     Particle::new(2.0, 0.0, 20.0).unwrap(),
/// ]).unwrap();
///
/// while !sim.has_collided() {
///     sim.update(1.0 / 60.0).unwrap();
/// }
/// assert_eq!(sim.particles().len(), 1);
/// assert_eq!(sim.particles()[0].mass(), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    /// Configuration restored by `reset`
    initial: [Particle; 2],

    /// Current particle set
    state: BodyState,

    /// Simulation time accumulated from `dt` values
    elapsed: f64,

    /// Number of accepted `update` calls
    steps: u64,

    /// Merge record since the last setup/reset
    collision: Option<CollisionReport>,
}

impl Simulation {
    /// Installs an initial configuration and enters `Configured`.
    ///
    /// Particles are re-validated so a hand-built array cannot slip past the
    /// mass invariant.
    pub fn new(initial: [Particle; 2]) -> Result<Self> {
        validate_pair(&initial)?;
        debug!(
            "Simulation configured: left(m={}, v={}, x={}) right(m={}, v={}, x={})",
            initial[0].mass(),
            initial[0].velocity(),
            initial[0].position(),
            initial[1].mass(),
            initial[1].velocity(),
            initial[1].position(),
        );
        Ok(Self {
            initial,
            state: BodyState::TwoBody(initial),
            elapsed: 0.0,
            steps: 0,
            collision: None,
        })
    }

    /// Replaces the scenario: new snapshot, fresh particles, not collided.
    ///
    /// On error the previous configuration is kept untouched.
    pub fn set_initial(&mut self, initial: [Particle; 2]) -> Result<()> {
        *self = Self::new(initial)?;
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Integrates first, then (while two bodies remain) tests for contact and
    /// merges. Returns the collision report on the step that merged.
    /// `dt == 0` changes nothing, not even a touching pair, and is not
    /// counted as a step.
    ///
    /// # Errors
    /// * `SimError::InvalidTimeStep` - `dt` negative or not finite, or the
    ///   accumulated time would overflow
    /// * `SimError::NonFinite` - a position or the merged velocity overflowed
    ///
    /// On error nothing changes.
    pub fn update(&mut self, dt: f64) -> Result<Option<CollisionReport>> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidTimeStep(dt));
        }
        if dt == 0.0 {
            return Ok(None);
        }
        let elapsed = self.elapsed + dt;
        if !elapsed.is_finite() {
            return Err(SimError::InvalidTimeStep(dt));
        }
        let steps = self.steps + 1;

        let mut next = self.state;
        integrator::advance(next.particles_mut(), dt)?;
        trace!("step {} t={:.6}", steps, elapsed);

        let merger = match &next {
            BodyState::TwoBody(pair) if detector::detect(pair).is_some() => {
                Some(resolver::resolve(&pair[0], &pair[1])?)
            }
            _ => None,
        };
        let report = merger.map(|merger| CollisionReport {
            time: elapsed,
            step: steps,
            merger,
        });
        if let Some(merger) = merger {
            next = BodyState::Merged(merger.merged);
        }

        self.state = next;
        self.elapsed = elapsed;
        self.steps = steps;
        if let Some(report) = report {
            info!(
                "Collision at t={:.4}s (step {}): m={} v={:.6} x={:.4}, energy lost {:.4}",
                report.time,
                report.step,
                report.merger.merged.mass(),
                report.merger.merged.velocity(),
                report.merger.merged.position(),
                report.merger.energy_lost(),
            );
            self.collision = Some(report);
        }
        Ok(report)
    }

    /// Restores the initial configuration from any state.
    pub fn reset(&mut self) {
        debug!("Simulation reset after {} steps", self.steps);
        self.state = BodyState::TwoBody(self.initial);
        self.elapsed = 0.0;
        self.steps = 0;
        self.collision = None;
    }

    /// Current particles, ordered; length 2 before the merge, 1 after.
    pub fn particles(&self) -> &[Particle] {
        self.state.particles()
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    pub fn initial(&self) -> &[Particle; 2] {
        &self.initial
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            BodyState::TwoBody(_) => Phase::Configured,
            BodyState::Merged(_) => Phase::Collided,
        }
    }

    pub fn has_collided(&self) -> bool {
        self.phase() == Phase::Collided
    }

    /// Simulation time since setup/reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Accepted steps since setup/reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The merge record, if the pair has merged since setup/reset.
    pub fn collision(&self) -> Option<&CollisionReport> {
        self.collision.as_ref()
    }

    /// Sum of m·v over current particles.
    pub fn total_momentum(&self) -> f64 {
        self.particles().iter().map(Particle::momentum).sum()
    }

    /// Sum of ½m·v² over current particles.
    pub fn total_kinetic_energy(&self) -> f64 {
        self.particles().iter().map(Particle::kinetic_energy).sum()
    }
}

fn validate_pair(pair: &[Particle; 2]) -> Result<()> {
    for p in pair {
        Particle::new(p.mass(), p.velocity(), p.position())?;
    }
    Ok(())
}
