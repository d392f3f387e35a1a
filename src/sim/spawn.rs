//! Taco spawn planning
//!
//! Produces the starting layout for a wave of tacos. The physics collaborator
//! takes it from there (gravity, collisions, spin).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spawn layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Edge length of a taco's tap target (points)
    pub taco_size: f32,
    /// Horizontal inset from the field edges; also the height of the first taco above the top
    pub margin: f32,
    /// Vertical gap between successive tacos
    pub stack_spacing: f32,
    /// Initial spin is uniform in [-max_spin, max_spin]
    pub max_spin: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            taco_size: TACO_SIZE,
            margin: SPAWN_MARGIN,
            stack_spacing: SPAWN_STACK_SPACING,
            max_spin: SPAWN_MAX_SPIN,
        }
    }
}

/// One taco handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TacoSpawn {
    pub id: u32,
    /// Top-left corner in screen space (y grows downward, negative = above the screen)
    pub position: Vec2,
    /// Initial angular velocity (radians/sec)
    pub angular_velocity: f32,
}

/// Lay out `count` tacos stacked above the field.
///
/// Ids start at `first_id` and increase by one per taco.
pub fn plan_wave<R: Rng + ?Sized>(
    rng: &mut R,
    count: u32,
    first_id: u32,
    field_width: f32,
    config: &SpawnConfig,
) -> Vec<TacoSpawn> {
    let margin = finite_or_zero(config.margin).max(0.0);
    let spacing = finite_or_zero(config.stack_spacing).max(0.0);
    let spin = finite_or_zero(config.max_spin).abs();

    let min_x = margin;
    // Narrow (or unusable) fields collapse to a single column
    let max_x = if field_width.is_finite() {
        (field_width - margin).max(min_x)
    } else {
        min_x
    };

    (0..count)
        .map(|i| {
            let x = rng.random_range(min_x..=max_x);
            let y = -margin - i as f32 * spacing;
            TacoSpawn {
                id: first_id.wrapping_add(i),
                position: Vec2::new(x, y),
                angular_velocity: rng.random_range(-spin..=spin),
            }
        })
        .collect()
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
