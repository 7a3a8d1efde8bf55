//! Constant-velocity integrator.

use crate::error::Result;
use crate::particle::Particle;

/// Advances every particle by `dt` seconds: `position += velocity * dt`.
///
/// `dt == 0.0` returns without touching any particle, so the state stays
/// bit-for-bit identical (a `-0.0` position would otherwise become `+0.0`).
/// `dt` must already be validated as finite and non-negative.
///
/// # Errors
/// * `SimError::NonFinite` - a position overflowed; no particle is moved
pub fn advance(particles: &mut [Particle], dt: f64) -> Result<()> {
    if dt == 0.0 {
        return Ok(());
    }
    let moved = particles
        .iter()
        .map(|p| p.drifted(dt))
        .collect::<Result<Vec<_>>>()?;
    particles.copy_from_slice(&moved);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_moves_by_velocity() {
        let mut ps = [
            Particle::new(1.0, 20.0, 0.0).unwrap(),
            Particle::new(1.0, -4.0, 10.0).unwrap(),
        ];
        advance(&mut ps, 0.5).unwrap();
        assert_relative_eq!(ps[0].position(), 10.0);
        assert_relative_eq!(ps[1].position(), 8.0);
        // Velocity and mass untouched
        assert_eq!(ps[0].velocity(), 20.0);
        assert_eq!(ps[1].mass(), 1.0);
    }

    #[test]
    fn test_zero_dt_is_bitwise_noop() {
        let mut ps = [
            Particle::new(1.0, -3.0, -0.0).unwrap(),
            Particle::new(2.0, 0.1, 0.3).unwrap(),
        ];
        let before = ps;
        advance(&mut ps, 0.0).unwrap();
        for (a, b) in ps.iter().zip(before.iter()) {
            assert_eq!(a.position().to_bits(), b.position().to_bits());
            assert_eq!(a.velocity().to_bits(), b.velocity().to_bits());
            assert_eq!(a.mass().to_bits(), b.mass().to_bits());
        }
    }

    #[test]
    fn test_advance_single_particle() {
        let mut ps = [Particle::new(7.0, 2.0, 1.0).unwrap()];
        advance(&mut ps, 3.0).unwrap();
        assert_relative_eq!(ps[0].position(), 7.0);
    }

    #[test]
    fn test_overflow_moves_nothing() {
        // Only the second particle overflows; the first must not move either
        let mut ps = [
            Particle::new(1.0, 1.0, 0.0).unwrap(),
            Particle::new(1.0, 1e300, 1e308).unwrap(),
        ];
        let before = ps;
        let err = advance(&mut ps, 1e10).unwrap_err();
        assert!(matches!(err, SimError::NonFinite { field: "position", .. }));
        assert_eq!(ps, before);
    }
}
