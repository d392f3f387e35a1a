//! Difficulty levels
//!
//! Distance to the nearest taco shop picks the level; the level picks how many
//! tacos fall. Closer means harder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Taco count used for anything outside the level table
pub const FALLBACK_TACO_COUNT: u32 = 2;

/// Raw value outside the level range
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("level {0} out of range 1..=5")]
pub struct LevelError(pub u8);

/// Difficulty tier, 1 (easiest) to 5 (hardest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    /// Returns `None` outside 1..=5
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Level(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of tacos spawned per wave at this level
    pub fn taco_count(self) -> u32 {
        count_for_raw(self.0)
    }

    /// All levels, easiest first
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level: {}", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or(LevelError(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// Map distance (miles) to a level.
///
/// Buckets are closed at the top: exactly 1.0 mile is still level 5.
/// Negative input lands in the closest bucket; NaN compares false everywhere
/// and falls through to level 1.
pub fn classify(distance_miles: f64) -> Level {
    let level = if distance_miles <= 1.0 {
        5
    } else if distance_miles <= 2.0 {
        4
    } else if distance_miles <= 3.0 {
        3
    } else if distance_miles <= 4.0 {
        2
    } else {
        1
    };
    Level(level)
}

/// Taco count for a level
pub fn count_for(level: Level) -> u32 {
    level.taco_count()
}

/// Taco count for a raw level number, `FALLBACK_TACO_COUNT` when unknown
pub fn count_for_raw(level: u8) -> u32 {
    match level {
        1 => 2,
        2 => 5,
        3 => 11,
        4 => 17,
        5 => 25,
        _ => FALLBACK_TACO_COUNT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_buckets() {
        assert_eq!(classify(0.0).get(), 5);
        assert_eq!(classify(0.5).get(), 5);
        assert_eq!(classify(1.5).get(), 4);
        assert_eq!(classify(2.5).get(), 3);
        assert_eq!(classify(3.5).get(), 2);
        assert_eq!(classify(12.0).get(), 1);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(1.0).get(), 5);
        assert_eq!(classify(1.0001).get(), 4);
        assert_eq!(classify(2.0).get(), 4);
        assert_eq!(classify(3.0).get(), 3);
        assert_eq!(classify(4.0).get(), 2);
        assert_eq!(classify(4.0001).get(), 1);
    }

    #[test]
    fn test_classify_out_of_domain_does_not_panic() {
        assert_eq!(classify(-3.0), Level::MAX);
        assert_eq!(classify(f64::NAN), Level::MIN);
        assert_eq!(classify(f64::INFINITY), Level::MIN);
    }

    #[test]
    fn test_count_table() {
        let counts: Vec<u32> = Level::all().map(count_for).collect();
        assert_eq!(counts, vec![2, 5, 11, 17, 25]);
        assert_eq!(count_for_raw(0), 2);
        assert_eq!(count_for_raw(99), 2);
    }

    #[test]
    fn test_counts_strictly_increase() {
        let counts: Vec<u32> = Level::all().map(count_for).collect();
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_level_range() {
        assert!(Level::new(0).is_none());
        assert!(Level::new(6).is_none());
        assert_eq!(Level::new(3).map(Level::get), Some(3));
        assert_eq!(Level::default(), Level::MIN);
        assert_eq!(Level::MAX.to_string(), "Level: 5");
    }

    #[test]
    fn test_level_serde_rejects_out_of_range() {
        let level: Level = serde_json::from_str("4").unwrap();
        assert_eq!(level.get(), 4);
        assert!(serde_json::from_str::<Level>("9").is_err());
        assert_eq!(serde_json::to_string(&Level::MAX).unwrap(), "5");
    }

    #[test]
    fn test_try_from_reports_value() {
        assert_eq!(Level::try_from(2), Ok(Level::new(2).unwrap()));
        assert_eq!(Level::try_from(0), Err(LevelError(0)));
        assert_eq!(LevelError(7).to_string(), "level 7 out of range 1..=5");
    }

    proptest! {
        #[test]
        fn prop_within_one_mile_is_hardest(d in 0.0f64..=1.0) {
            prop_assert_eq!(classify(d), Level::MAX);
        }

        #[test]
        fn prop_beyond_four_miles_is_easiest(d in 4.0001f64..10_000.0) {
            prop_assert_eq!(classify(d), Level::MIN);
        }

        #[test]
        fn prop_farther_is_never_harder(a in 0.0f64..20.0, b in 0.0f64..20.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(near) >= classify(far));
        }
    }
}
