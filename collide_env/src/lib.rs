//! Collide Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" seam between the collision engine's
//! driver and the outside world, so the same driver loop runs in both
//! **Production** (tokio wall clock) and **Simulation** (virtual clock).
//!
//! # Core Concept
//!
//! The engine itself only ever sees a `dt`. Everything that would make a
//! run non-reproducible lives behind these traits:
//! - Time (`now()`, `sleep()`)
//! - Input events (`poll()`)
//!
//! # Example
//!
//! ```ignore
//! use collide_env::{FrameClock, InputSource};
//!
//! async fn driver_loop<C: FrameClock, I: InputSource>(clock: &C, input: &mut I) {
//!     loop {
//!         for event in input.poll(clock.now()) {
//!             handle(event);
//!         }
//!         clock.sleep(Duration::from_millis(16)).await;
//!     }
//! }
//! ```

mod clock;
mod input;
mod error;
mod tokio_impl;

pub use clock::FrameClock;
pub use input::{InputEvent, InputSource, NoInput};
pub use error::EnvError;
pub use tokio_impl::TokioClock;
