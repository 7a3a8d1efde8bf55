//! Perfectly inelastic merge of two bodies.
//!
//! The merged body conserves:
//! - Total mass: m = m1 + m2
//! - Momentum: m·v = m1·v1 + m2·v2
//!
//! Its position is the midpoint of the two detected positions. Kinetic
//! energy is tracked for reporting only and never feeds into the velocity.

use crate::detector::Contact;
use crate::error::Result;
use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// Outcome of merging two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Merger {
    /// The single body that replaces the pair
    pub merged: Particle,

    /// Positions at which the pair was merged
    pub contact: Contact,

    /// m1·v1 + m2·v2
    pub momentum_before: f64,

    /// m·v of the merged body
    pub momentum_after: f64,

    /// ½m1·v1² + ½m2·v2²
    pub kinetic_energy_before: f64,

    /// ½m·v² of the merged body
    pub kinetic_energy_after: f64,
}

impl Merger {
    /// Kinetic energy converted to heat/deformation (>= 0 up to rounding).
    pub fn energy_lost(&self) -> f64 {
        self.kinetic_energy_before - self.kinetic_energy_after
    }

    /// Absolute momentum error introduced by the merge.
    pub fn momentum_drift(&self) -> f64 {
        (self.momentum_after - self.momentum_before).abs()
    }
}

/// Merges `left` and `right` into one body.
///
/// # Errors
/// Only fails when the combined values overflow to infinity.
///
/// # Examples
///
/// ```
/// use collide_core::{resolve, Particle};
///
/// let a = Particle::new(5.0, 10.0, 20.0).unwrap();
/// let b = Particle::new(2.0, 0.0, 20.0).unwrap();
/// let m = resolve(&a, &b).unwrap();
///
/// assert_eq!(m.merged.mass(), 7.0);
/// assert!((m.merged.velocity() - 50.0 / 7.0).abs() < 1e-12);
/// ```
pub fn resolve(left: &Particle, right: &Particle) -> Result<Merger> {
    let mass = left.mass() + right.mass();
    let momentum_before = left.momentum() + right.momentum();
    let velocity = momentum_before / mass;
    let position = 0.5 * (left.position() + right.position());

    let merged = Particle::new(mass, velocity, position)?;

    Ok(Merger {
        merged,
        contact: Contact {
            left_position: left.position(),
            right_position: right.position(),
        },
        momentum_before,
        momentum_after: merged.momentum(),
        kinetic_energy_before: left.kinetic_energy() + right.kinetic_energy(),
        kinetic_energy_after: merged.kinetic_energy(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn p(mass: f64, velocity: f64, position: f64) -> Particle {
        Particle::new(mass, velocity, position).unwrap()
    }

    #[test]
    fn test_merge_mass_conservation() {
        let m = resolve(&p(5.0, 10.0, 20.0), &p(2.0, 0.0, 20.0)).unwrap();
        assert_relative_eq!(m.merged.mass(), 7.0);
    }

    #[test]
    fn test_merge_velocity_from_momentum() {
        let m = resolve(&p(5.0, 10.0, 20.0), &p(2.0, 0.0, 20.0)).unwrap();
        assert_relative_eq!(m.merged.velocity(), 50.0 / 7.0, epsilon = 1e-12);
        assert!(m.momentum_drift() < 1e-12);
    }

    #[test]
    fn test_merge_position_is_midpoint() {
        let m = resolve(&p(1.0, 3.0, 10.5), &p(9.0, -1.0, 9.5)).unwrap();
        assert_relative_eq!(m.merged.position(), 10.0);
        assert_eq!(m.contact.penetration(), 1.0);
    }

    #[test]
    fn test_head_on_equal_masses_stop() {
        let m = resolve(&p(2.0, 4.0, 0.0), &p(2.0, -4.0, 0.0)).unwrap();
        assert_relative_eq!(m.merged.velocity(), 0.0);
        assert_relative_eq!(m.energy_lost(), 32.0);
    }

    #[test]
    fn test_equal_velocities_lose_no_energy() {
        let m = resolve(&p(3.0, 2.5, 1.0), &p(4.0, 2.5, 1.0)).unwrap();
        assert_relative_eq!(m.merged.velocity(), 2.5, epsilon = 1e-12);
        assert!(m.energy_lost().abs() < 1e-9);
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = f64::MAX;
        assert!(resolve(&p(big, 0.0, 0.0), &p(big, 0.0, 0.0)).is_err());
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            m1 in 1e-3f64..1e3, m2 in 1e-3f64..1e3,
            v1 in -1e3f64..1e3, v2 in -1e3f64..1e3,
        ) {
            let m = resolve(&p(m1, v1, 0.0), &p(m2, v2, 0.0)).unwrap();
            let expected = (m1 * v1 + m2 * v2) / (m1 + m2);
            prop_assert!((m.merged.velocity() - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
            prop_assert!(m.momentum_drift() <= 1e-9 * (1.0 + m.momentum_before.abs()));
        }

        #[test]
        fn prop_energy_non_increasing(
            m1 in 1e-3f64..1e3, m2 in 1e-3f64..1e3,
            v1 in -1e3f64..1e3, v2 in -1e3f64..1e3,
        ) {
            let m = resolve(&p(m1, v1, 0.0), &p(m2, v2, 0.0)).unwrap();
            let tol = 1e-9 * (1.0 + m.kinetic_energy_before);
            prop_assert!(m.kinetic_energy_after <= m.kinetic_energy_before + tol);
            // Strict loss whenever the bodies had different velocities
            let reduced = m1 * m2 / (m1 + m2);
            let expected_loss = 0.5 * reduced * (v1 - v2) * (v1 - v2);
            prop_assert!((m.energy_lost() - expected_loss).abs() <= tol);
        }
    }
}
