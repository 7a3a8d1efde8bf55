//! Ground truth oracle for simulation.
//!
//! The Oracle knows the closed-form answer for a two-body run:
//! - When the bodies meet (continuous time, no step quantization)
//! - What the merged body looks like
//! - Where every particle is at any time
//!
//! Stepped runs are checked against it.

use collide_core::{resolve, Particle, Result};

/// Closed-form merge prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Time at which the centers meet
    pub contact_time: f64,

    /// Position where they meet
    pub contact_position: f64,

    /// The merged body at `contact_time`
    pub merged: Particle,
}

/// The Oracle - exact kinematics for one initial pair.
#[derive(Debug, Clone, Copy)]
pub struct Oracle {
    initial: [Particle; 2],
}

impl Oracle {
    /// Creates an oracle for an initial configuration.
    pub fn new(initial: [Particle; 2]) -> Self {
        Self { initial }
    }

    pub fn initial(&self) -> &[Particle; 2] {
        &self.initial
    }

    /// Time until the left center reaches the right center.
    ///
    /// `Some(0.0)` if they already touch or have crossed; `None` if they
    /// never close.
    pub fn contact_time(&self) -> Option<f64> {
        let [left, right] = self.initial;
        let gap = right.position() - left.position();
        if gap <= 0.0 {
            return Some(0.0);
        }
        let closing_speed = left.velocity() - right.velocity();
        if closing_speed <= 0.0 {
            return None;
        }
        Some(gap / closing_speed)
    }

    /// Predicts the merge, if one ever happens.
    pub fn predict(&self) -> Result<Option<Prediction>> {
        let Some(t) = self.contact_time() else {
            return Ok(None);
        };
        let [left, right] = self.initial;
        let contact_position = left.position() + left.velocity() * t;
        let at_contact_left = left.with_position(contact_position)?;
        let at_contact_right = right.with_position(contact_position)?;
        let merger = resolve(&at_contact_left, &at_contact_right)?;
        Ok(Some(Prediction {
            contact_time: t,
            contact_position,
            merged: merger.merged,
        }))
    }

    /// Exact particle list at time `t` since the initial configuration.
    pub fn state_at(&self, t: f64) -> Result<Vec<Particle>> {
        match self.predict()? {
            Some(pred) if t >= pred.contact_time => {
                let merged = pred.merged;
                let x = merged.position() + merged.velocity() * (t - pred.contact_time);
                Ok(vec![merged.with_position(x)?])
            }
            _ => self
                .initial
                .iter()
                .map(|p| p.with_position(p.position() + p.velocity() * t))
                .collect(),
        }
    }
}
