//! Collide Driver Harness
//!
//! Runs the `collide_core` engine the way an interactive front end would
//! (frame clock, play/pause, reset, quit) but headless and deterministic.
//!
//! # Core Principle: Injected Time
//!
//! The engine never reads a clock. The driver samples a [`FrameClock`]
//! once per frame and hands the delta to `Simulation::update`:
//! - **Virtual time**: [`SimContext`] advances only when the driver sleeps
//! - **Wall time**: `collide_env::TokioClock` for real-time runs
//! - **Input**: [`ScriptedInput`] replays `event@seconds` scripts
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ScenarioRunner                │
//! │  ┌────────────┐   dt    ┌─────────────────┐   │
//! │  │   Driver   │────────►│   Simulation    │   │
//! │  └────▲───▲───┘         └─────────────────┘   │
//! │       │   │                                   │
//! │  FrameClock  InputSource        Oracle        │
//! │  (SimContext) (ScriptedInput)  (closed form)  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use collide_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::TwoBodyMerge);
//! assert!(result.passed);
//! ```
//!
//! [`FrameClock`]: collide_env::FrameClock

mod config;
mod context;
mod driver;
mod error;
mod exporter;
mod input;
mod oracle;
mod runner;
pub mod scenarios;
pub mod view;

pub use config::{DriverConfig, ScenarioFile, Viewport};
pub use context::SimContext;
pub use driver::{Driver, DriverSummary, FrameRecord};
pub use error::HarnessError;
pub use exporter::SimExport;
pub use input::{parse_events, ScriptedInput};
pub use oracle::{Oracle, Prediction};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::{Expectation, ScenarioId, ScenarioSpec};
pub use view::Sprite;
