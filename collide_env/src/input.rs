//! Input events and the source trait the driver polls once per frame.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A control input understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Flip between playing and paused
    TogglePlay,
    /// Restore the initial configuration
    Reset,
    /// Stop the driver loop
    Quit,
}

impl InputEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::TogglePlay => "toggle",
            InputEvent::Reset => "reset",
            InputEvent::Quit => "quit",
        }
    }
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for InputEvent {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toggle" | "space" | "play" | "pause" => Ok(InputEvent::TogglePlay),
            "reset" | "r" => Ok(InputEvent::Reset),
            "quit" | "close" | "q" => Ok(InputEvent::Quit),
            other => Err(EnvError::input(format!("unknown event '{}'", other))),
        }
    }
}

/// Abstraction for the event source of a driver (keyboard, window, script).
///
/// Called once per frame with the driver clock's current time; returns the
/// events that became due since the previous poll, in order.
pub trait InputSource: Send {
    fn poll(&mut self, now: Duration) -> Vec<InputEvent>;
}

/// An input source that never produces events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _now: Duration) -> Vec<InputEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!("toggle".parse::<InputEvent>().unwrap(), InputEvent::TogglePlay);
        assert_eq!(" Space ".parse::<InputEvent>().unwrap(), InputEvent::TogglePlay);
        assert_eq!("R".parse::<InputEvent>().unwrap(), InputEvent::Reset);
        assert_eq!("quit".parse::<InputEvent>().unwrap(), InputEvent::Quit);
        assert!("jump".parse::<InputEvent>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for ev in [InputEvent::TogglePlay, InputEvent::Reset, InputEvent::Quit] {
            assert_eq!(ev.to_string().parse::<InputEvent>().unwrap(), ev);
        }
    }

    #[test]
    fn test_no_input_is_silent() {
        let mut src = NoInput;
        assert!(src.poll(Duration::from_secs(10)).is_empty());
    }
}
