//! Taco Rush - a proximity-driven taco tapping game
//!
//! Core modules:
//! - `sim`: Difficulty engine (distance classification, level state, spawn plans, session)
//! - `location`: Permission/location/search pipeline feeding the difficulty engine
//! - `settings`: JSON-backed game configuration

pub mod location;
pub mod settings;
pub mod sim;

pub use location::{Coordinate, ProximityTracker, StatusMessage};
pub use settings::Settings;
pub use sim::{DifficultyController, GameSession, Level, RepopulateEvent};

/// Game configuration constants
pub mod consts {
    /// Meters in one statute mile
    pub const METERS_PER_MILE: f64 = 1609.34;
    /// Mean Earth radius used for great-circle distance (meters)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Default point-of-interest search
    pub const DEFAULT_QUERY: &str = "Taco Bell";
    /// Side of the square search region around the player (meters)
    pub const SEARCH_RADIUS_METERS: f64 = 10_000.0;
    /// Fallback when no location fix is available (San Francisco)
    pub const FALLBACK_LATITUDE: f64 = 37.7749;
    pub const FALLBACK_LONGITUDE: f64 = -122.4194;

    /// Taco defaults
    pub const TACO_SIZE: f32 = 60.0;
    /// Horizontal margin from the playfield edges, also the first spawn height above the top
    pub const SPAWN_MARGIN: f32 = 50.0;
    /// Vertical gap between stacked spawns
    pub const SPAWN_STACK_SPACING: f32 = 30.0;
    /// Max initial spin (radians/sec, either direction)
    pub const SPAWN_MAX_SPIN: f32 = 3.0;

    /// Default playfield width (points) when the renderer hasn't reported one
    pub const DEFAULT_FIELD_WIDTH: f32 = 390.0;
}

/// Convert meters to miles
#[inline]
pub fn meters_to_miles(meters: f64) -> f64 {
    meters / consts::METERS_PER_MILE
}
