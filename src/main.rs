//! Taco Rush native demo
//!
//! Replays a list of distances (miles) through the full measurement pipeline
//! and prints what the renderer would be told.

use std::path::PathBuf;

use clap::Parser;
use taco_rush::consts::{EARTH_RADIUS_METERS, METERS_PER_MILE};
use taco_rush::location::{
    Coordinate, LocationError, LocationPermission, LocationProvider, PlaceSearch, SearchError,
    SearchRequest,
};
use taco_rush::{GameSession, ProximityTracker, Settings};

/// Default walk: far away, closing in, then driving off
const DEMO_DISTANCES: [f64; 6] = [6.2, 3.5, 0.5, 0.5, 1.8, 4.4];

/// Replay distances (miles) to the nearest taco shop through a game session
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when it doesn't exist
    #[arg(long, value_name = "FILE", default_value = Settings::FILE_NAME)]
    settings: PathBuf,
    /// Distances in miles, replayed in order. A built-in walk is used when empty.
    #[arg(value_name = "MILES", allow_negative_numbers = true)]
    miles: Vec<f64>,
}

/// Location fix that never comes, so the tracker uses its fallback origin
struct NoFix;

impl LocationProvider for NoFix {
    fn current_location(&mut self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable("no GPS on this host".into()))
    }
}

/// Places the nearest shop due north of whatever origin it is asked about
struct ScriptedSearch {
    miles: f64,
}

impl PlaceSearch for ScriptedSearch {
    fn search(&mut self, request: &SearchRequest) -> Result<Vec<Coordinate>, SearchError> {
        if self.miles < 0.0 || !self.miles.is_finite() {
            return Err(SearchError::Failed(format!("bad distance {}", self.miles)));
        }
        let dlat = (self.miles * METERS_PER_MILE / EARTH_RADIUS_METERS).to_degrees();
        Ok(vec![Coordinate::new(
            request.origin.latitude + dlat,
            request.origin.longitude,
        )])
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Taco Rush (native) starting...");

    let args = Args::parse();
    let distances = if args.miles.is_empty() {
        DEMO_DISTANCES.to_vec()
    } else {
        args.miles
    };

    let settings = Settings::load_or_default(&args.settings);
    let mut session = GameSession::new(0x7AC0, &settings);
    let mut tracker = ProximityTracker::new(&settings);
    println!("{}", tracker.status());
    log::debug!("Physics profile: {:?}", session.physics());

    for miles in distances {
        let mut search = ScriptedSearch { miles };
        let outcome = tracker.measure(
            &LocationPermission::Granted,
            &mut NoFix,
            &mut search,
            &mut session,
        );

        println!("{}", outcome.status);
        match outcome.event {
            Some(event) => println!(
                "  {} -> spawning {} tacos (score {})",
                event.level,
                session.tacos().len(),
                session.score()
            ),
            None => println!("  {} unchanged", session.level()),
        }
    }

    // Pop everything once to show the refill at the current level
    let ids: Vec<u32> = session.tacos().iter().map(|t| t.id).collect();
    for id in ids {
        session.tap(id);
    }
    println!(
        "Cleared the board: score {}, {} fresh tacos at {}",
        session.score(),
        session.tacos().len(),
        session.level()
    );
}
