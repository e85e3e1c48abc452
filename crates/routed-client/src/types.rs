//! Request and response types for the route backend.
//!
//! Decoding is strict about required fields (a candidate without travel
//! times is rejected, not defaulted) and lenient about optional metadata
//! (ratings, place ids, types).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

// =========================================================================
// Place search (geocoding)
// =========================================================================

/// Request body for `POST /search_place`.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSearchRequest {
    /// Free-text place query.
    pub query: String,
}

/// Geometry block of a geocoding result.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceGeometry {
    /// Resolved coordinates.
    pub location: LatLng,
}

/// One geocoding result.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    /// Display name of the place.
    pub name: String,

    /// Geometry of the place.
    pub geometry: PlaceGeometry,
}

/// Response body for `POST /search_place`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSearchResponse {
    /// Upstream status string ("OK" on success).
    pub status: String,

    /// Geocoding results, best match first.
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

impl PlaceSearchResponse {
    /// The best match, if the search succeeded and found anything.
    #[must_use]
    pub fn first_match(&self) -> Option<&PlaceResult> {
        if self.status == "OK" {
            self.results.first()
        } else {
            None
        }
    }
}

// =========================================================================
// Route suggestions
// =========================================================================

/// Request body for `POST /suggest_stops`.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestStopsRequest {
    /// Ordered route stops; at least two.
    pub stops: Vec<LatLng>,

    /// Optional place-type filter (e.g. "restaurant").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_type: Option<String>,

    /// Optional free-text keyword filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Spacing of sample points along the route, in meters.
    pub sample_every_m: u32,

    /// Search radius around each sample point, in meters.
    pub search_radius: u32,

    /// Maximum number of candidates to return.
    pub max_candidates: u32,

    /// Maximum allowed added detour, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_constraint_seconds: Option<u64>,
}

/// Summary of the unmodified route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSummary {
    /// Total travel time of the original route, in seconds.
    pub original_total_travel_time_seconds: u64,

    /// Total distance of the original route, in meters.
    #[serde(default)]
    pub original_total_distance_meters: Option<u64>,
}

/// A suggested point of interest along the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Upstream place identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Short address/neighbourhood line.
    pub vicinity: String,

    /// Coordinates, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LatLng>,

    /// Place-type tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Average rating out of 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Number of ratings behind the average.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u64>,

    /// Indexes of the stops the candidate would be inserted between.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_between: Option<[usize; 2]>,

    /// Detour cost of visiting the candidate, in seconds.
    pub added_time_seconds: u64,

    /// Total route time with the candidate inserted, in seconds.
    pub total_travel_time_seconds: u64,
}

/// Response body for `POST /suggest_stops`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestStopsResponse {
    /// Summary of the unmodified route.
    pub route_summary: RouteSummary,

    /// Suggested stops, cheapest detour first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

// =========================================================================
// Batch reservations
// =========================================================================

/// Contact and timing details shared by every reservation in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetails {
    /// Party size.
    pub party_size: u32,

    /// Reservation date.
    pub date: NaiveDate,

    /// Requested time, as entered (e.g. "7:00 PM").
    pub time: String,

    /// Guest name.
    pub name: String,

    /// Contact phone number.
    pub phone: String,

    /// Contact email.
    pub email: String,
}

/// Request body for `POST /make_reservations`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRequest {
    /// Places to attempt reservations at.
    pub places_data: Vec<Candidate>,

    /// Shared reservation details.
    pub reservation_details: ReservationDetails,
}

/// A venue reference inside a reservation outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantRef {
    /// Venue name.
    pub name: String,
}

/// Outcome of one reservation attempt.
///
/// The agent reports venue names under either `restaurant_name` or
/// `restaurant.name`; [`ReservationOutcome::restaurant`] normalizes the two.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReservationOutcome {
    /// Venue name (flat form).
    pub restaurant_name: Option<String>,

    /// Venue reference (nested form).
    pub restaurant: Option<RestaurantRef>,

    /// Venue location line.
    pub location: Option<String>,

    /// Attempt status (e.g. "confirmed", "requires_phone_call").
    pub status: Option<String>,

    /// Confirmation number, when the booking succeeded.
    pub confirmation_number: Option<String>,

    /// Phone number for manual booking, when online booking failed.
    pub phone_for_manual_booking: Option<String>,

    /// Error message, when the attempt failed outright.
    pub error: Option<String>,
}

impl ReservationOutcome {
    /// The venue name, whichever form it arrived in.
    #[must_use]
    pub fn restaurant(&self) -> Option<&str> {
        self.restaurant_name
            .as_deref()
            .or(self.restaurant.as_ref().map(|r| r.name.as_str()))
    }

    /// Whether the attempt ended in a confirmed booking.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status.as_deref() == Some("confirmed")
    }
}

/// A response that may be a single object or an array of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    /// An array of outcomes.
    Many(Vec<T>),
    /// A bare outcome, normalized to a one-element vector.
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_match_requires_ok_status() {
        let response: PlaceSearchResponse = serde_json::from_value(json!({
            "status": "ZERO_RESULTS",
            "results": []
        }))
        .unwrap();
        assert!(response.first_match().is_none());

        let response: PlaceSearchResponse = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                {"name": "CN Tower", "geometry": {"location": {"lat": 43.64, "lng": -79.39}}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_match().unwrap().name, "CN Tower");
    }

    #[test]
    fn candidate_requires_travel_times() {
        let result: Result<Candidate, _> = serde_json::from_value(json!({
            "name": "Cafe",
            "vicinity": "70 Temperance St"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn candidate_defaults_optional_metadata() {
        let candidate: Candidate = serde_json::from_value(json!({
            "name": "Cafe",
            "vicinity": "70 Temperance St",
            "added_time_seconds": 105,
            "total_travel_time_seconds": 629
        }))
        .unwrap();
        assert!(candidate.rating.is_none());
        assert!(candidate.types.is_empty());
        assert!(candidate.insert_between.is_none());
    }

    #[test]
    fn outcome_normalizes_venue_name_forms() {
        let flat: ReservationOutcome =
            serde_json::from_value(json!({"restaurant_name": "Cafe", "status": "confirmed"}))
                .unwrap();
        assert_eq!(flat.restaurant(), Some("Cafe"));
        assert!(flat.is_confirmed());

        let nested: ReservationOutcome =
            serde_json::from_value(json!({"restaurant": {"name": "Bar"}})).unwrap();
        assert_eq!(nested.restaurant(), Some("Bar"));
        assert!(!nested.is_confirmed());
    }

    #[test]
    fn one_or_many_normalizes() {
        let one: OneOrMany<ReservationOutcome> =
            serde_json::from_value(json!({"status": "error"})).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: OneOrMany<ReservationOutcome> =
            serde_json::from_value(json!([{"status": "confirmed"}, {"status": "error"}])).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }
}
