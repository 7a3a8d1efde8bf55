//! Scripted input source for headless runs.
//!
//! A script is a comma-separated list of `event@seconds` entries, e.g.
//! `toggle@1.0,toggle@1.5,reset@3.0`. Times are driver-clock seconds.

use collide_env::{EnvError, InputEvent, InputSource};
use std::collections::VecDeque;
use std::time::Duration;

/// Replays timed input events in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<(Duration, InputEvent)>,
}

impl ScriptedInput {
    /// Creates a script from `(seconds, event)` pairs. Entries are sorted by
    /// time; events at the same time keep their given order.
    pub fn new(events: &[(f64, InputEvent)]) -> Result<Self, EnvError> {
        let mut timed = Vec::with_capacity(events.len());
        for &(secs, event) in events {
            if !secs.is_finite() || secs < 0.0 {
                return Err(EnvError::input(format!(
                    "event '{}' has invalid time {}",
                    event, secs
                )));
            }
            let at = Duration::try_from_secs_f64(secs).map_err(|_| {
                EnvError::input(format!("event '{}' time {} is out of range", event, secs))
            })?;
            timed.push((at, event));
        }
        timed.sort_by_key(|(at, _)| *at);
        Ok(Self {
            pending: timed.into(),
        })
    }

    /// Parses `event@seconds[,event@seconds...]`. An empty string is an empty script.
    pub fn parse(script: &str) -> Result<Self, EnvError> {
        Self::new(&parse_events(script)?)
    }

    /// Number of events not yet delivered.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Parses a script into `(seconds, event)` pairs without scheduling them.
pub fn parse_events(script: &str) -> Result<Vec<(f64, InputEvent)>, EnvError> {
    let mut events = Vec::new();
    for entry in script.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, at) = entry
            .split_once('@')
            .ok_or_else(|| EnvError::input(format!("missing '@' in '{}'", entry)))?;
        let event: InputEvent = name.parse()?;
        let secs: f64 = at
            .trim()
            .parse()
            .map_err(|_| EnvError::input(format!("bad time in '{}'", entry)))?;
        events.push((secs, event));
    }
    Ok(events)
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, now: Duration) -> Vec<InputEvent> {
        let mut due = Vec::new();
        while let Some(&(at, event)) = self.pending.front() {
            if at > now {
                break;
            }
            self.pending.pop_front();
            due.push(event);
        }
        due
    }
}
