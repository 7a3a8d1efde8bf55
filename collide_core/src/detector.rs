//! Two-body proximity test.
//!
//! Slot 0 is the left body and slot 1 the right body. A contact is reported
//! once the left center has reached or passed the right center. Particle
//! size plays no part in the test.

use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// A detected contact between the two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Position of the left body when the contact was detected
    pub left_position: f64,

    /// Position of the right body when the contact was detected
    pub right_position: f64,
}

impl Contact {
    /// How far the left body has passed the right one (>= 0).
    pub fn penetration(&self) -> f64 {
        self.left_position - self.right_position
    }
}

/// Returns the contact if the pair has met or crossed.
pub fn detect(pair: &[Particle; 2]) -> Option<Contact> {
    let [left, right] = pair;
    if left.position() >= right.position() {
        Some(Contact {
            left_position: left.position(),
            right_position: right.position(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(x0: f64, x1: f64) -> [Particle; 2] {
        [
            Particle::new(1.0, 0.0, x0).unwrap(),
            Particle::new(1.0, 0.0, x1).unwrap(),
        ]
    }

    #[test]
    fn test_separated_pair_no_contact() {
        assert!(detect(&pair(0.0, 10.0)).is_none());
        assert!(detect(&pair(9.999, 10.0)).is_none());
    }

    #[test]
    fn test_touching_pair_is_contact() {
        let c = detect(&pair(10.0, 10.0)).unwrap();
        assert_eq!(c.penetration(), 0.0);
    }

    #[test]
    fn test_crossed_pair_is_contact() {
        let c = detect(&pair(12.0, 10.0)).unwrap();
        assert_eq!(c.left_position, 12.0);
        assert_eq!(c.right_position, 10.0);
        assert_eq!(c.penetration(), 2.0);
    }

    #[test]
    fn test_order_matters() {
        // Right body on the left side is already "crossed"
        assert!(detect(&pair(5.0, -5.0)).is_some());
        assert!(detect(&pair(-5.0, 5.0)).is_none());
    }
}
