//! Route backend HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorBody, OneOrMany, PlaceSearchRequest, PlaceSearchResponse, ReservationOutcome,
    ReservationRequest, SuggestStopsRequest, SuggestStopsResponse,
};

/// Route backend API client.
///
/// Covers the three backend endpoints: place search, route-stop suggestions,
/// and batch reservations.
#[derive(Debug, Clone)]
pub struct RouteApiClient {
    client: Client,
    base_url: String,
}

impl RouteApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend (e.g. `"http://127.0.0.1:5000"`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Geocode a free-text place query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn search_place(&self, query: &str) -> Result<PlaceSearchResponse, ClientError> {
        let url = format!("{}/search_place", self.base_url);
        let request = PlaceSearchRequest {
            query: query.trim().to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        self.handle_response(response).await
    }

    /// Request stop suggestions along a route.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn suggest_stops(
        &self,
        request: &SuggestStopsRequest,
    ) -> Result<SuggestStopsResponse, ClientError> {
        let url = format!("{}/suggest_stops", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        self.handle_response(response).await
    }

    /// Submit a batch of reservation attempts.
    ///
    /// The backend replies with either an array of outcomes or a single
    /// outcome object; both normalize to a vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn make_reservations(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<ReservationOutcome>, ClientError> {
        let url = format!("{}/make_reservations", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;
        let outcomes: OneOrMany<ReservationOutcome> = self.handle_response(response).await?;
        Ok(outcomes.into_vec())
    }

    /// Handle an API response: strict decode on success, `{error}` body
    /// mapping on failure.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()));
        }

        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map_or_else(|_| format!("HTTP {status}"), |parsed| parsed.error);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = RouteApiClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.base_url, "http://127.0.0.1:5000");
    }
}
