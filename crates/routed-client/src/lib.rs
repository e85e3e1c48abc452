//! Typed clients for Routed's external collaborators.
//!
//! This crate covers the three network dependencies of the client:
//!
//! - the route backend (`/search_place`, `/suggest_stops`,
//!   `/make_reservations`) via [`RouteApiClient`]
//! - the generative itinerary planner via [`PlannerClient`]
//! - duplicate-request suppression via [`InflightRegistry`]
//!
//! Response payloads are decoded into typed variants at the boundary;
//! required fields that are absent reject the payload with
//! [`ClientError::Decode`] rather than being silently defaulted.
//!
//! # Example
//!
//! ```no_run
//! use routed_client::{RouteApiClient, SuggestStopsRequest, LatLng};
//!
//! # async fn example() -> Result<(), routed_client::ClientError> {
//! let client = RouteApiClient::new("http://127.0.0.1:5000");
//!
//! let response = client.suggest_stops(&SuggestStopsRequest {
//!     stops: vec![
//!         LatLng { lat: 43.6426, lng: -79.3871 },
//!         LatLng { lat: 43.6532, lng: -79.3832 },
//!     ],
//!     desired_type: Some("cafe".to_string()),
//!     keyword: None,
//!     sample_every_m: 1500,
//!     search_radius: 1200,
//!     max_candidates: 5,
//!     time_constraint_seconds: Some(1800),
//! }).await?;
//!
//! println!("{} candidates", response.candidates.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
pub mod inflight;
pub mod planner;
pub mod repair;
mod types;

pub use client::RouteApiClient;
pub use error::ClientError;
pub use inflight::{ActionKind, InflightGuard, InflightRegistry};
pub use planner::{Itinerary, ItineraryRequest, PlannerClient};
pub use types::{
    Candidate, LatLng, PlaceGeometry, PlaceResult, PlaceSearchRequest, PlaceSearchResponse,
    ReservationDetails, ReservationOutcome, ReservationRequest, RestaurantRef, RouteSummary,
    SuggestStopsRequest, SuggestStopsResponse,
};
