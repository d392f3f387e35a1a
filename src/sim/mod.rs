//! Difficulty simulation module
//!
//! Pure game logic, no rendering or platform dependencies:
//! - Distance -> level -> taco count
//! - Level state and repopulation decisions
//! - Seeded spawn layouts

pub mod controller;
pub mod level;
pub mod session;
pub mod spawn;

pub use controller::{DifficultyController, RepopulateEvent};
pub use level::{FALLBACK_TACO_COUNT, Level, LevelError, classify, count_for, count_for_raw};
pub use session::{GameSession, TapOutcome};
pub use spawn::{SpawnConfig, TacoSpawn, plan_wave};
