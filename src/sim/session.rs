//! One game session
//!
//! Owns the difficulty state, the score and the tacos currently in play.
//! Nothing here survives the session.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::controller::{DifficultyController, RepopulateEvent};
use super::level::{Level, count_for};
use super::spawn::{SpawnConfig, TacoSpawn, plan_wave};
use crate::location::DistanceSink;
use crate::settings::{PhysicsProfile, Settings};

/// Result of a tap
#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    /// No live taco with that id (already popped, or stale)
    Missed,
    /// Taco popped, others still falling
    Scored { score: u64 },
    /// Last taco popped; a fresh wave at the same level was spawned
    Cleared { score: u64, spawned: Vec<TacoSpawn> },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducible layouts
    pub seed: u64,
    controller: DifficultyController,
    score: u64,
    tacos: Vec<TacoSpawn>,
    rng: Pcg32,
    next_id: u32,
    field_width: f32,
    spawn: SpawnConfig,
    physics: PhysicsProfile,
}

impl GameSession {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            controller: DifficultyController::new(),
            score: 0,
            tacos: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            field_width: settings.field_width,
            spawn: settings.spawn.clone(),
            physics: settings.physics.clone(),
        }
    }

    pub fn level(&self) -> Level {
        self.controller.current_level()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn tacos(&self) -> &[TacoSpawn] {
        &self.tacos
    }

    pub fn controller(&self) -> &DifficultyController {
        &self.controller
    }

    /// Dynamics the physics collaborator applies to every spawned taco
    pub fn physics(&self) -> &PhysicsProfile {
        &self.physics
    }

    pub fn field_width(&self) -> f32 {
        self.field_width
    }

    /// Renderer reports a new playfield width (rotation, resize).
    /// Non-finite or non-positive widths are ignored.
    pub fn set_field_width(&mut self, width: f32) {
        if !width.is_finite() || width <= 0.0 {
            log::warn!("Ignoring playfield width {}", width);
            return;
        }
        self.field_width = width;
    }

    /// Replace every taco with a fresh wave for `level`
    pub fn populate(&mut self, level: Level) -> &[TacoSpawn] {
        let count = count_for(level);
        log::info!("Creating {} tacos for level {}", count, level.get());

        let wave = plan_wave(
            &mut self.rng,
            count,
            self.next_id,
            self.field_width,
            &self.spawn,
        );
        self.next_id = self.next_id.wrapping_add(count);
        self.tacos = wave;
        &self.tacos
    }

    pub fn apply_event(&mut self, event: RepopulateEvent) -> &[TacoSpawn] {
        self.populate(event.level)
    }

    /// Forward a measurement and respawn when the level changes.
    ///
    /// An empty board (session start, after a refresh) is filled at the
    /// current level even when the level didn't change.
    pub fn on_distance_measured(&mut self, distance_miles: f64) -> Option<RepopulateEvent> {
        let event = match self.controller.on_distance_measured(distance_miles) {
            Some(event) => event,
            None if self.tacos.is_empty() => RepopulateEvent::for_level(self.level()),
            None => return None,
        };
        self.apply_event(event);
        Some(event)
    }

    pub fn tap(&mut self, id: u32) -> TapOutcome {
        let Some(index) = self.tacos.iter().position(|t| t.id == id) else {
            return TapOutcome::Missed;
        };
        self.tacos.remove(index);
        self.score += 1;

        if !self.tacos.is_empty() {
            return TapOutcome::Scored { score: self.score };
        }

        let level = self.level();
        log::debug!("All tacos cleared, refilling level {}", level.get());
        let spawned = self.populate(level).to_vec();
        TapOutcome::Cleared {
            score: self.score,
            spawned,
        }
    }

    /// Pull-to-refresh: drop the current tacos before re-measuring.
    /// The next measurement refills the board.
    pub fn refresh(&mut self) {
        self.tacos.clear();
    }

    /// Start over with the same seed
    pub fn restart(&mut self) {
        self.controller.reset();
        self.score = 0;
        self.tacos.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.next_id = 1;
    }
}

impl DistanceSink for GameSession {
    fn on_distance_measured(&mut self, distance_miles: f64) -> Option<RepopulateEvent> {
        GameSession::on_distance_measured(self, distance_miles)
    }
}
