//! Game settings
//!
//! Persisted as JSON. Missing fields take their defaults so older files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::location::Coordinate;
use crate::sim::SpawnConfig;

/// Errors loading or saving settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Dynamics parameters forwarded to the physics collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsProfile {
    pub gravity_magnitude: f32,
    pub elasticity: f32,
    pub friction: f32,
    pub resistance: f32,
    pub density: f32,
}

impl Default for PhysicsProfile {
    fn default() -> Self {
        Self {
            gravity_magnitude: 1.0,
            elasticity: 0.6,
            friction: 0.2,
            resistance: 0.1,
            density: 0.5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Search ===
    /// Point-of-interest query sent to the place search
    pub query: String,
    /// Side of the square search region (meters)
    pub search_radius_meters: f64,
    /// Origin used when the device can't get a fix
    pub fallback_location: Coordinate,

    // === Playfield ===
    /// Playfield width (points)
    pub field_width: f32,
    pub spawn: SpawnConfig,
    pub physics: PhysicsProfile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            search_radius_meters: SEARCH_RADIUS_METERS,
            fallback_location: Coordinate::new(FALLBACK_LATITUDE, FALLBACK_LONGITUDE),

            field_width: DEFAULT_FIELD_WIDTH,
            spawn: SpawnConfig::default(),
            physics: PhysicsProfile::default(),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "taco_rush_settings.json";

    /// Reject values no collaborator can work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.query.trim().is_empty() {
            return Err(SettingsError::Invalid("query is empty".into()));
        }
        if !self.search_radius_meters.is_finite() || self.search_radius_meters <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "search radius must be positive, got {}",
                self.search_radius_meters
            )));
        }
        if !self.fallback_location.is_valid() {
            return Err(SettingsError::Invalid(format!(
                "fallback location out of range: {:?}",
                self.fallback_location
            )));
        }
        if !self.field_width.is_finite() || self.field_width <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "field width must be positive and finite, got {}",
                self.field_width
            )));
        }
        let spawn = &self.spawn;
        for (name, value) in [
            ("taco_size", spawn.taco_size),
            ("margin", spawn.margin),
            ("stack_spacing", spawn.stack_spacing),
            ("max_spin", spawn.max_spin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "spawn.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
