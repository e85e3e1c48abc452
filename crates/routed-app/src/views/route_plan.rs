//! Route-planning view-model.
//!
//! Ephemeral, in-memory state for the stop list and the rendered suggestion
//! results. Nothing here is persisted.

use routed_client::{Candidate, LatLng, PlaceSearchResponse, SuggestStopsRequest,
    SuggestStopsResponse};

use crate::error::AppError;

/// Spacing of sample points along the route, in meters.
pub const SAMPLE_EVERY_M: u32 = 1500;

/// Search radius around each sample point, in meters.
pub const SEARCH_RADIUS_M: u32 = 1200;

/// Maximum candidates requested per search.
pub const MAX_CANDIDATES: u32 = 5;

/// Minimum stops needed to define a route.
pub const MIN_STOPS: usize = 2;

/// A geocoded stop in the user's route.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Display name.
    pub name: String,

    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lng: f64,
}

/// The route-planning form: stops plus search filters.
#[derive(Debug, Default)]
pub struct RoutePlanner {
    stops: Vec<Stop>,

    /// Optional place-type filter (e.g. "restaurant").
    pub desired_type: Option<String>,

    /// Optional keyword filter (e.g. "coffee").
    pub keyword: Option<String>,

    /// Maximum added detour, in minutes.
    pub time_constraint_minutes: Option<u64>,
}

impl RoutePlanner {
    /// Create an empty planner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stops, in route order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Append a stop.
    pub fn add_stop(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    /// Append the best match of a geocoding response.
    ///
    /// # Errors
    ///
    /// Returns an error when the search failed or found nothing.
    pub fn add_stop_from_search(
        &mut self,
        response: &PlaceSearchResponse,
    ) -> Result<Stop, AppError> {
        let result = response.first_match().ok_or_else(|| {
            AppError::InvalidInput(format!("place not found (status: {})", response.status))
        })?;

        let stop = Stop {
            name: result.name.clone(),
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
        };
        self.stops.push(stop.clone());
        Ok(stop)
    }

    /// Remove a stop by zero-based index.
    ///
    /// # Errors
    ///
    /// Returns an error when the index is out of range.
    pub fn remove_stop(&mut self, index: usize) -> Result<Stop, AppError> {
        if index >= self.stops.len() {
            return Err(AppError::InvalidInput(format!(
                "no stop #{} (have {})",
                index + 1,
                self.stops.len()
            )));
        }
        Ok(self.stops.remove(index))
    }

    /// Whether enough stops exist to submit a search.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.stops.len() >= MIN_STOPS
    }

    /// Build the suggestion request for the current form.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than [`MIN_STOPS`] stops are present; the
    /// search is blocked client-side and no call is issued.
    pub fn build_request(&self) -> Result<SuggestStopsRequest, AppError> {
        if !self.can_submit() {
            return Err(AppError::NotEnoughStops {
                have: self.stops.len(),
            });
        }

        Ok(SuggestStopsRequest {
            stops: self
                .stops
                .iter()
                .map(|stop| LatLng {
                    lat: stop.lat,
                    lng: stop.lng,
                })
                .collect(),
            desired_type: self.desired_type.clone().filter(|s| !s.is_empty()),
            keyword: self.keyword.clone().filter(|s| !s.is_empty()),
            sample_every_m: SAMPLE_EVERY_M,
            search_radius: SEARCH_RADIUS_M,
            max_candidates: MAX_CANDIDATES,
            time_constraint_seconds: self.time_constraint_minutes.map(|minutes| minutes * 60),
        })
    }
}

/// Round seconds to whole minutes (half a minute rounds up).
#[must_use]
pub fn minutes_rounded(seconds: u64) -> u64 {
    (seconds + 30) / 60
}

/// A candidate projected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateView {
    /// Display name.
    pub name: String,

    /// Address/neighbourhood line.
    pub vicinity: String,

    /// Rating line, e.g. `4.6/5 (180 reviews)` or `No rating`.
    pub rating_label: String,

    /// Detour cost in whole minutes.
    pub added_minutes: u64,

    /// Total trip time in whole minutes.
    pub total_minutes: u64,

    /// Place-type tags.
    pub types: Vec<String>,
}

impl CandidateView {
    /// Project a wire candidate for display.
    #[must_use]
    pub fn from_candidate(candidate: &Candidate) -> Self {
        let rating_label = candidate.rating.map_or_else(
            || "No rating".to_string(),
            |rating| {
                let reviews = candidate.user_ratings_total.unwrap_or(0);
                format!("{rating}/5 ({reviews} reviews)")
            },
        );

        Self {
            name: candidate.name.clone(),
            vicinity: candidate.vicinity.clone(),
            rating_label,
            added_minutes: minutes_rounded(candidate.added_time_seconds),
            total_minutes: minutes_rounded(candidate.total_travel_time_seconds),
            types: candidate.types.clone(),
        }
    }
}

/// A suggestion response projected for display.
#[derive(Debug, Clone)]
pub struct RouteSuggestions {
    /// Original route time in whole minutes.
    pub original_minutes: u64,

    /// Candidates in backend order (cheapest detour first).
    pub candidates: Vec<CandidateView>,
}

impl RouteSuggestions {
    /// Project a wire response for display.
    #[must_use]
    pub fn from_response(response: &SuggestStopsResponse) -> Self {
        Self {
            original_minutes: minutes_rounded(
                response.route_summary.original_total_travel_time_seconds,
            ),
            candidates: response
                .candidates
                .iter()
                .map(CandidateView::from_candidate)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn planner_with_stops(n: usize) -> RoutePlanner {
        let mut planner = RoutePlanner::new();
        for i in 0..n {
            planner.add_stop(Stop {
                name: format!("stop-{i}"),
                lat: 43.0 + f64::from(u32::try_from(i).unwrap()) * 0.01,
                lng: -79.0,
            });
        }
        planner
    }

    #[test]
    fn rounding_is_half_up_not_truncation() {
        assert_eq!(minutes_rounded(629), 10); // 10.48 min
        assert_eq!(minutes_rounded(90), 2); // 1.5 min rounds up
        assert_eq!(minutes_rounded(89), 1);
        assert_eq!(minutes_rounded(0), 0);
    }

    #[test]
    fn request_blocked_below_two_stops() {
        let planner = planner_with_stops(1);
        assert!(!planner.can_submit());
        assert!(matches!(
            planner.build_request(),
            Err(AppError::NotEnoughStops { have: 1 })
        ));
    }

    #[test]
    fn request_uses_documented_constants() {
        let mut planner = planner_with_stops(2);
        planner.keyword = Some("coffee".to_string());
        planner.time_constraint_minutes = Some(30);

        let request = planner.build_request().unwrap();
        assert_eq!(request.sample_every_m, 1500);
        assert_eq!(request.search_radius, 1200);
        assert_eq!(request.max_candidates, 5);
        assert_eq!(request.time_constraint_seconds, Some(1800));
        assert!(request.desired_type.is_none());
        assert_eq!(request.stops.len(), 2);
    }

    #[test]
    fn empty_filters_are_omitted() {
        let mut planner = planner_with_stops(2);
        planner.desired_type = Some(String::new());
        let request = planner.build_request().unwrap();
        assert!(request.desired_type.is_none());
    }

    #[test]
    fn add_stop_from_search_takes_first_match() {
        let response = serde_json::from_value(json!({
            "status": "OK",
            "results": [
                {"name": "CN Tower", "geometry": {"location": {"lat": 43.6426, "lng": -79.3871}}},
                {"name": "CN Tower Gift Shop", "geometry": {"location": {"lat": 43.6427, "lng": -79.3870}}}
            ]
        }))
        .unwrap();

        let mut planner = RoutePlanner::new();
        let stop = planner.add_stop_from_search(&response).unwrap();
        assert_eq!(stop.name, "CN Tower");
        assert_eq!(planner.stops().len(), 1);
    }

    #[test]
    fn add_stop_from_search_rejects_non_ok_status() {
        let response = serde_json::from_value(json!({"status": "ZERO_RESULTS"})).unwrap();
        let mut planner = RoutePlanner::new();
        let error = planner.add_stop_from_search(&response).unwrap_err();
        assert!(error.to_string().contains("ZERO_RESULTS"));
        assert!(planner.stops().is_empty());
    }

    #[test]
    fn remove_stop_checks_bounds() {
        let mut planner = planner_with_stops(2);
        assert!(planner.remove_stop(5).is_err());
        let removed = planner.remove_stop(0).unwrap();
        assert_eq!(removed.name, "stop-0");
        assert_eq!(planner.stops().len(), 1);
    }

    #[test]
    fn three_candidates_render_three_views() {
        let response = serde_json::from_value(json!({
            "route_summary": {"original_total_travel_time_seconds": 524},
            "candidates": [
                {"name": "a", "vicinity": "v", "rating": 4.6, "user_ratings_total": 180,
                 "added_time_seconds": 105, "total_travel_time_seconds": 629},
                {"name": "b", "vicinity": "v", "added_time_seconds": 150, "total_travel_time_seconds": 674},
                {"name": "c", "vicinity": "v", "added_time_seconds": 260, "total_travel_time_seconds": 784}
            ]
        }))
        .unwrap();

        let view = RouteSuggestions::from_response(&response);
        assert_eq!(view.original_minutes, 9); // 524 s = 8.7 min
        assert_eq!(view.candidates.len(), 3);
        assert_eq!(view.candidates[0].added_minutes, 2); // 105 s = 1.75 min
        assert_eq!(view.candidates[0].total_minutes, 10);
        assert_eq!(view.candidates[0].rating_label, "4.6/5 (180 reviews)");
        assert_eq!(view.candidates[1].rating_label, "No rating");
        assert_eq!(view.candidates[2].added_minutes, 4); // 260 s = 4.3 min
    }
}
