//! Difficulty controller
//!
//! Holds the current level for one game session and decides when a new
//! distance measurement should trigger a repopulation.

use serde::{Deserialize, Serialize};

use super::level::{Level, classify, count_for};

/// Instruction to regenerate the on-screen tacos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepopulateEvent {
    pub level: Level,
    pub count: u32,
}

impl RepopulateEvent {
    pub fn for_level(level: Level) -> Self {
        Self {
            level,
            count: count_for(level),
        }
    }
}

/// Session-scoped difficulty state.
///
/// Calls must be serialized by the owner; `&mut self` enforces that within
/// a single owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyController {
    current_level: Level,
    #[serde(skip)]
    last_distance: Option<f64>,
}

impl DifficultyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    /// Taco count for the current level
    pub fn current_count(&self) -> u32 {
        count_for(self.current_level)
    }

    /// Most recent measurement (miles), if any
    pub fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }

    /// Feed a new distance. Returns an event only when the level changes.
    pub fn on_distance_measured(&mut self, distance_miles: f64) -> Option<RepopulateEvent> {
        self.last_distance = Some(distance_miles);
        let new_level = classify(distance_miles);

        if new_level == self.current_level {
            log::debug!(
                "Distance: {:.2} miles, level unchanged ({})",
                distance_miles,
                new_level.get()
            );
            return None;
        }

        log::info!(
            "Distance: {:.2} miles, level {} -> {}",
            distance_miles,
            self.current_level.get(),
            new_level.get()
        );
        self.current_level = new_level;
        Some(RepopulateEvent::for_level(new_level))
    }

    /// Back to level 1 for a new session
    pub fn reset(&mut self) {
        self.current_level = Level::MIN;
        self.last_distance = None;
    }
}
