//! Location pipeline
//!
//! permission -> location fix -> place search -> distance -> difficulty.
//!
//! Platform callbacks arrive on whatever context they like; the owner of the
//! tracker feeds each result back in as a value, so the difficulty state is
//! only ever touched from one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::EARTH_RADIUS_METERS;
use crate::meters_to_miles;
use crate::settings::Settings;
use crate::sim::{DifficultyController, RepopulateEvent};

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in meters
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        haversine_meters(*self, *other)
    }
}

/// Haversine great-circle distance (meters)
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    2.0 * EARTH_RADIUS_METERS * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Location authorization, resolved by the platform layer.
/// Platform "restricted" maps to `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationPermission {
    Granted,
    Denied,
    NotDetermined,
}

pub trait LocationPermissionProvider {
    fn status(&self) -> LocationPermission;
}

impl LocationPermissionProvider for LocationPermission {
    fn status(&self) -> LocationPermission {
        *self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("location request timed out")]
    TimedOut,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("place search failed: {0}")]
    Failed(String),

    #[error("place search network error: {0}")]
    Network(String),
}

/// Single-shot location fix
pub trait LocationProvider {
    fn current_location(&mut self) -> Result<Coordinate, LocationError>;
}

/// Point-of-interest search. Results are relevance ordered.
pub trait PlaceSearch {
    fn search(&mut self, request: &SearchRequest) -> Result<Vec<Coordinate>, SearchError>;
}

/// Query for the place search collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub origin: Coordinate,
    /// Side of the square region centered on `origin` (meters)
    pub region_meters: f64,
}

/// Text shown to the player for each pipeline state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusMessage {
    Searching { query: String },
    PermissionDenied,
    SearchFailed { query: String },
    NoResults { query: String },
    Nearest { query: String, miles: f64 },
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusMessage::Searching { query } => write!(f, "Finding nearest {query}..."),
            StatusMessage::PermissionDenied => {
                write!(f, "Please enable location access in Settings")
            }
            StatusMessage::SearchFailed { query } => write!(f, "Error finding {query} locations"),
            StatusMessage::NoResults { query } => {
                write!(f, "No {query} locations found nearby")
            }
            StatusMessage::Nearest { query, miles } => {
                write!(f, "Nearest {query}: {miles:.1} miles")
            }
        }
    }
}

/// What the platform layer should do next
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementStep {
    /// Ask the user for location access
    RequestAuthorization,
    /// Request a single location fix
    RequestLocation,
    /// Don't measure; show the message
    Blocked(StatusMessage),
}

/// Result of a completed (or abandoned) measurement
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    pub status: StatusMessage,
    pub distance_miles: Option<f64>,
    pub event: Option<RepopulateEvent>,
}

/// Anything that reacts to a fresh distance measurement
pub trait DistanceSink {
    fn on_distance_measured(&mut self, distance_miles: f64) -> Option<RepopulateEvent>;
}

impl DistanceSink for DifficultyController {
    fn on_distance_measured(&mut self, distance_miles: f64) -> Option<RepopulateEvent> {
        DifficultyController::on_distance_measured(self, distance_miles)
    }
}

/// Drives one measurement at a time and keeps the current status text
#[derive(Debug, Clone)]
pub struct ProximityTracker {
    query: String,
    region_meters: f64,
    fallback: Coordinate,
    status: StatusMessage,
}

impl ProximityTracker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            query: settings.query.clone(),
            region_meters: settings.search_radius_meters,
            fallback: settings.fallback_location,
            status: StatusMessage::Searching {
                query: settings.query.clone(),
            },
        }
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Start a measurement given the current authorization
    pub fn begin(&mut self, permission: &dyn LocationPermissionProvider) -> MeasurementStep {
        self.on_authorization_changed(permission.status())
    }

    pub fn on_authorization_changed(&mut self, permission: LocationPermission) -> MeasurementStep {
        match permission {
            LocationPermission::Granted => MeasurementStep::RequestLocation,
            LocationPermission::NotDetermined => MeasurementStep::RequestAuthorization,
            LocationPermission::Denied => {
                log::info!("Location access denied");
                self.status = StatusMessage::PermissionDenied;
                MeasurementStep::Blocked(StatusMessage::PermissionDenied)
            }
        }
    }

    /// Turn a location fix into a search. Failures fall back to the default origin.
    pub fn on_location(&mut self, location: Result<Coordinate, LocationError>) -> SearchRequest {
        let origin = match location {
            Ok(origin) => origin,
            Err(e) => {
                log::warn!("Location error: {}, using fallback {:?}", e, self.fallback);
                self.fallback
            }
        };
        SearchRequest {
            query: self.query.clone(),
            origin,
            region_meters: self.region_meters,
        }
    }

    /// Consume the search result. The sink is only called when a distance was found.
    pub fn on_search_complete<S: DistanceSink + ?Sized>(
        &mut self,
        sink: &mut S,
        request: &SearchRequest,
        result: Result<Vec<Coordinate>, SearchError>,
    ) -> MeasurementOutcome {
        let places = match result {
            Ok(places) => places,
            Err(e) => {
                log::warn!("Search error: {}", e);
                return self.abandon(StatusMessage::SearchFailed {
                    query: self.query.clone(),
                });
            }
        };

        let Some(nearest) = places.first() else {
            log::info!("No {} locations found", self.query);
            return self.abandon(StatusMessage::NoResults {
                query: self.query.clone(),
            });
        };

        let miles = meters_to_miles(request.origin.distance_meters(nearest));
        log::info!("Found {} at {:.2} miles", self.query, miles);
        self.status = StatusMessage::Nearest {
            query: self.query.clone(),
            miles,
        };

        MeasurementOutcome {
            status: self.status.clone(),
            distance_miles: Some(miles),
            event: sink.on_distance_measured(miles),
        }
    }

    /// Run the whole pipeline synchronously
    pub fn measure<S: DistanceSink + ?Sized>(
        &mut self,
        permission: &dyn LocationPermissionProvider,
        locator: &mut dyn LocationProvider,
        search: &mut dyn PlaceSearch,
        sink: &mut S,
    ) -> MeasurementOutcome {
        match self.begin(permission) {
            MeasurementStep::RequestLocation => {}
            MeasurementStep::RequestAuthorization => {
                return self.abandon(StatusMessage::Searching {
                    query: self.query.clone(),
                });
            }
            MeasurementStep::Blocked(status) => return self.abandon(status),
        }

        let request = self.on_location(locator.current_location());
        let result = search.search(&request);
        self.on_search_complete(sink, &request, result)
    }

    fn abandon(&mut self, status: StatusMessage) -> MeasurementOutcome {
        self.status = status.clone();
        MeasurementOutcome {
            status,
            distance_miles: None,
            event: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Level;

    struct FixedLocation(Result<Coordinate, LocationError>);

    impl LocationProvider for FixedLocation {
        fn current_location(&mut self) -> Result<Coordinate, LocationError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSearch {
        result: Option<Result<Vec<Coordinate>, SearchError>>,
        requests: Vec<SearchRequest>,
    }

    impl PlaceSearch for RecordingSearch {
        fn search(&mut self, request: &SearchRequest) -> Result<Vec<Coordinate>, SearchError> {
            self.requests.push(request.clone());
            self.result.clone().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Point roughly `miles` due north of `origin`
    fn north_of(origin: Coordinate, miles: f64) -> Coordinate {
        let meters = miles * crate::consts::METERS_PER_MILE;
        let dlat = (meters / EARTH_RADIUS_METERS).to_degrees();
        Coordinate::new(origin.latitude + dlat, origin.longitude)
    }

    fn home() -> Coordinate {
        Coordinate::new(40.7128, -74.0060)
    }

    #[test]
    fn test_haversine_known_distance() {
        // San Francisco to Los Angeles is about 559 km
        let sf = Coordinate::new(37.7749, -122.4194);
        let la = Coordinate::new(34.0522, -118.2437);
        let km = haversine_meters(sf, la) / 1000.0;
        assert!((km - 559.0).abs() < 5.0, "got {km}");
        assert_eq!(haversine_meters(sf, sf), 0.0);
    }

    #[test]
    fn test_north_of_helper_matches_haversine() {
        let target = north_of(home(), 2.5);
        let miles = meters_to_miles(home().distance_meters(&target));
        assert!((miles - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_status_text() {
        let q = "Taco Bell".to_string();
        assert_eq!(
            StatusMessage::Searching { query: q.clone() }.to_string(),
            "Finding nearest Taco Bell..."
        );
        assert_eq!(
            StatusMessage::PermissionDenied.to_string(),
            "Please enable location access in Settings"
        );
        assert_eq!(
            StatusMessage::SearchFailed { query: q.clone() }.to_string(),
            "Error finding Taco Bell locations"
        );
        assert_eq!(
            StatusMessage::NoResults { query: q.clone() }.to_string(),
            "No Taco Bell locations found nearby"
        );
        assert_eq!(
            StatusMessage::Nearest { query: q, miles: 1.26 }.to_string(),
            "Nearest Taco Bell: 1.3 miles"
        );
    }

    #[test]
    fn test_permission_steps() {
        let mut tracker = ProximityTracker::new(&Settings::default());
        assert_eq!(tracker.begin(&LocationPermission::Granted), MeasurementStep::RequestLocation);
        assert_eq!(
            tracker.begin(&LocationPermission::NotDetermined),
            MeasurementStep::RequestAuthorization
        );
        assert_eq!(
            tracker.begin(&LocationPermission::Denied),
            MeasurementStep::Blocked(StatusMessage::PermissionDenied)
        );
        assert_eq!(tracker.status(), &StatusMessage::PermissionDenied);
    }

    #[test]
    fn test_denied_never_measures() {
        let mut tracker = ProximityTracker::new(&Settings::default());
        let mut controller = DifficultyController::new();
        let mut locator = FixedLocation(Ok(home()));
        let mut search = RecordingSearch {
            result: Some(Ok(vec![north_of(home(), 0.5)])),
            ..Default::default()
        };

        let outcome = tracker.measure(
            &LocationPermission::Denied,
            &mut locator,
            &mut search,
            &mut controller,
        );

        assert_eq!(outcome.status, StatusMessage::PermissionDenied);
        assert!(outcome.event.is_none());
        assert!(search.requests.is_empty());
        assert!(controller.last_distance().is_none());
    }

    #[test]
    fn test_nearby_place_raises_level() {
        let mut tracker = ProximityTracker::new(&Settings::default());
        let mut controller = DifficultyController::new();
        let mut locator = FixedLocation(Ok(home()));
        let mut search = RecordingSearch {
            // First result wins even when a later one is closer
            result: Some(Ok(vec![north_of(home(), 0.5), north_of(home(), 0.1)])),
            ..Default::default()
        };

        let outcome = tracker.measure(
            &LocationPermission::Granted,
            &mut locator,
            &mut search,
            &mut controller,
        );

        let miles = outcome.distance_miles.unwrap();
        assert!((miles - 0.5).abs() < 1e-6);
        assert_eq!(outcome.event, Some(RepopulateEvent::for_level(Level::MAX)));
        assert_eq!(outcome.status.to_string(), "Nearest Taco Bell: 0.5 miles");
        assert_eq!(search.requests[0].origin, home());
        assert_eq!(search.requests[0].query, "Taco Bell");
        assert_eq!(search.requests[0].region_meters, 10_000.0);
    }

    #[test]
    fn test_location_failure_uses_fallback() {
        let settings = Settings::default();
        let mut tracker = ProximityTracker::new(&settings);
        let request = tracker.on_location(Err(LocationError::TimedOut));
        assert_eq!(request.origin, settings.fallback_location);
    }

    #[test]
    fn test_search_failures_leave_level_alone() {
        let mut tracker = ProximityTracker::new(&Settings::default());
        let mut controller = DifficultyController::new();
        controller.on_distance_measured(2.5);
        let request = tracker.on_location(Ok(home()));

        let outcome = tracker.on_search_complete(
            &mut controller,
            &request,
            Err(SearchError::Network("offline".into())),
        );
        assert_eq!(outcome.status.to_string(), "Error finding Taco Bell locations");
        assert!(outcome.distance_miles.is_none());

        let outcome = tracker.on_search_complete(&mut controller, &request, Ok(Vec::new()));
        assert_eq!(outcome.status.to_string(), "No Taco Bell locations found nearby");
        assert!(outcome.event.is_none());

        assert_eq!(controller.current_level().get(), 3);
        assert_eq!(controller.last_distance(), Some(2.5));
    }

    #[test]
    fn test_repeat_measurement_is_idempotent() {
        let mut tracker = ProximityTracker::new(&Settings::default());
        let mut controller = DifficultyController::new();
        let request = tracker.on_location(Ok(home()));
        let places = vec![north_of(home(), 3.5)];

        let first = tracker.on_search_complete(&mut controller, &request, Ok(places.clone()));
        let second = tracker.on_search_complete(&mut controller, &request, Ok(places));
        assert_eq!(first.event.map(|e| (e.level.get(), e.count)), Some((2, 5)));
        assert!(second.event.is_none());
    }
}
