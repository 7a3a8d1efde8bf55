//! Presentation mapping: particles to screen-space sprites.
//!
//! Pure functions of the particle list and a `Viewport`; nothing here feeds
//! back into the simulation.

use crate::config::Viewport;
use collide_core::Particle;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Fill color for the left slot (and the merged body).
pub const LEFT_COLOR: [u8; 3] = [70, 180, 255];

/// Fill color for the right slot.
pub const RIGHT_COLOR: [u8; 3] = [255, 140, 70];

/// A circle to draw for one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Slot index in the particle list
    pub slot: usize,

    /// Screen-space center in pixels
    pub center: Point2<f32>,

    /// Radius in pixels
    pub radius: f32,

    /// RGB fill
    pub color: [u8; 3],
}

impl Viewport {
    /// Screen x for a world position.
    pub fn screen_x(&self, position: f64) -> f32 {
        self.origin_x + position as f32 * self.pixels_per_meter
    }

    /// Sprite radius for a mass.
    pub fn radius_for(&self, mass: f64) -> f32 {
        self.base_radius + mass as f32
    }

    /// Whether a sprite is at least partly inside the window.
    pub fn is_visible(&self, sprite: &Sprite) -> bool {
        sprite.center.x + sprite.radius >= 0.0 && sprite.center.x - sprite.radius <= self.width
    }
}

/// Projects every particle to a sprite.
pub fn project(particles: &[Particle], viewport: &Viewport) -> Vec<Sprite> {
    particles
        .iter()
        .enumerate()
        .map(|(slot, p)| {
            let radius = viewport.radius_for(p.mass());
            Sprite {
                slot,
                center: Point2::new(
                    viewport.screen_x(p.position()),
                    viewport.baseline_y - radius * viewport.lift,
                ),
                radius,
                color: if slot == 0 { LEFT_COLOR } else { RIGHT_COLOR },
            }
        })
        .collect()
}
