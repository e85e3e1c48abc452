//! Generative itinerary planner client.
//!
//! Turns a free-text trip description into a structured route request via a
//! `generateContent`-style REST API. Model output is parsed strictly first,
//! then run through best-effort repair before being rejected.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ClientError;
use crate::repair::{repair_json, strip_code_fences};

/// Default planner model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Default planner API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Cap on the itinerary time budget, in seconds (8 hours).
pub const MAX_TIME_BUDGET_SECONDS: u64 = 28_800;

/// What the user is planning: an activity, where, and when.
#[derive(Debug, Clone)]
pub struct ItineraryRequest {
    /// Activity description (e.g. "date", "museum day").
    pub activity: String,

    /// Target location (e.g. "New York City").
    pub location: String,

    /// Start of the outing.
    pub start: DateTime<Utc>,

    /// End of the outing.
    pub end: DateTime<Utc>,
}

impl ItineraryRequest {
    /// Outing duration in whole seconds (zero when the window is inverted).
    #[must_use]
    pub fn duration_seconds(&self) -> u64 {
        u64::try_from((self.end - self.start).num_seconds()).unwrap_or(0)
    }

    /// Outing duration rounded to whole hours.
    #[must_use]
    pub fn duration_hours(&self) -> u64 {
        (self.duration_seconds() + 1800) / 3600
    }

    /// Build the planner prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        let hours = self.duration_hours();
        let budget = self.duration_seconds().min(MAX_TIME_BUDGET_SECONDS);
        format!(
            "You are a travel itinerary planner. Create a detailed itinerary for a {activity} in {location} from {start} to {end}.\n\
             \n\
             Duration: {hours} hours\n\
             \n\
             IMPORTANT: Respond with ONLY a valid JSON object in this exact format with no additional text or markdown:\n\
             \n\
             {{\n\
             \x20 \"stops\": [\"specific address or landmark 1\", \"specific address or landmark 2\", \"specific address or landmark 3\"],\n\
             \x20 \"desired_type\": \"appropriate_google_places_type\",\n\
             \x20 \"keyword\": \"{activity}\",\n\
             \x20 \"sample_every_m\": 1500,\n\
             \x20 \"search_radius\": 1200,\n\
             \x20 \"max_candidates\": 20,\n\
             \x20 \"time_constraint_seconds\": {budget}\n\
             }}\n\
             \n\
             Requirements:\n\
             - Include 3-6 real, specific stops in {location} suitable for a {activity}\n\
             - Use actual addresses, landmark names, or well-known locations\n\
             - Choose appropriate desired_type from: restaurant, tourist_attraction, museum, park, shopping_mall, amusement_park, zoo, etc.\n\
             - Order stops logically for an efficient route\n\
             - Consider the {hours}-hour timeframe\n\
             \n\
             Respond with only the JSON object, no other text.",
            activity = self.activity,
            location = self.location,
            start = self.start.format("%Y-%m-%d %H:%M"),
            end = self.end.format("%Y-%m-%d %H:%M"),
        )
    }
}

/// A generated itinerary: route stops plus the search parameters to feed the
/// route backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Ordered stops (addresses or landmark names); at least two.
    pub stops: Vec<String>,

    /// Place-type filter for stop suggestions.
    pub desired_type: String,

    /// Keyword filter for stop suggestions.
    pub keyword: String,

    /// Sample spacing along the route, in meters.
    pub sample_every_m: u32,

    /// Search radius around sample points, in meters.
    pub search_radius: u32,

    /// Maximum suggestion candidates.
    pub max_candidates: u32,

    /// Time budget for the outing, in seconds.
    pub time_constraint_seconds: u64,
}

impl Itinerary {
    /// Check the structural requirements for a usable itinerary.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than two stops are present or the search
    /// filters are empty.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.stops.len() < 2 {
            return Err(ClientError::InvalidItinerary(
                "insufficient stops".to_string(),
            ));
        }
        if self.desired_type.is_empty() || self.keyword.is_empty() {
            return Err(ClientError::InvalidItinerary(
                "missing required fields".to_string(),
            ));
        }
        Ok(())
    }

    /// Remove a stop by index; out-of-range indexes are ignored.
    pub fn remove_stop(&mut self, index: usize) {
        if index < self.stops.len() {
            self.stops.remove(index);
        }
    }
}

/// Itinerary planner API client.
#[derive(Debug, Clone)]
pub struct PlannerClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl PlannerClient {
    /// Create a planner client with the default endpoint and model.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL (used by tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate an itinerary for a trip description.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the completion is empty or
    /// unparseable after repair, or the itinerary fails validation.
    pub async fn generate_itinerary(
        &self,
        request: &ItineraryRequest,
    ) -> Result<Itinerary, ClientError> {
        let text = self.complete(&request.prompt()).await?;
        let itinerary = parse_itinerary(&text)?;
        itinerary.validate()?;
        Ok(itinerary)
    }

    /// Ask for a single replacement stop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the completion is not a
    /// one-element JSON array of a non-empty string.
    pub async fn regenerate_stop(
        &self,
        activity: &str,
        location: &str,
    ) -> Result<String, ClientError> {
        let prompt = format!(
            "Suggest one new stop in {location} suitable for a {activity}.\n\
             Respond with ONLY a valid JSON array of one string, no markdown."
        );
        let text = self.complete(&prompt).await?;

        let cleaned = strip_code_fences(&text);
        let stops: Vec<String> = serde_json::from_str(&cleaned)
            .or_else(|_| serde_json::from_str(&repair_json(&cleaned)))
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        stops
            .into_iter()
            .find(|stop| !stop.is_empty())
            .ok_or(ClientError::EmptyCompletion)
    }

    /// Run one completion and return its text.
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateErrorBody>(&body)
                .map_or_else(|_| format!("HTTP {status}"), |parsed| parsed.error.message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ClientError::EmptyCompletion);
        }
        Ok(text)
    }
}

/// Parse a completion into an itinerary: strict parse first, repaired parse
/// as fallback.
pub(crate) fn parse_itinerary(text: &str) -> Result<Itinerary, ClientError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned)
        .or_else(|_| serde_json::from_str(&repair_json(&cleaned)))
        .map_err(|e| ClientError::Decode(e.to_string()))
}

// =========================================================================
// Wire types for the generateContent API
// =========================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeneratedCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeneratedCandidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateErrorBody {
    error: GenerateErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GenerateErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ItineraryRequest {
        let start = chrono::DateTime::parse_from_rfc3339("2025-09-20T14:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ItineraryRequest {
            activity: "date".to_string(),
            location: "New York City".to_string(),
            start,
            end: start + chrono::Duration::hours(12),
        }
    }

    #[test]
    fn prompt_caps_time_budget() {
        let prompt = request().prompt();
        assert!(prompt.contains("Duration: 12 hours"));
        // 12 hours exceeds the 8-hour cap.
        assert!(prompt.contains("\"time_constraint_seconds\": 28800"));
        assert!(prompt.contains("\"sample_every_m\": 1500"));
    }

    #[test]
    fn parses_fenced_output_with_trailing_comma() {
        let completion = "```json\n{\n  \"stops\": [\"Central Park\", \"Times Square\",],\n  \"desired_type\": \"restaurant\",\n  \"keyword\": \"date\",\n  \"sample_every_m\": 1500,\n  \"search_radius\": 1200,\n  \"max_candidates\": 20,\n  \"time_constraint_seconds\": 7200\n}\n```";
        let itinerary = parse_itinerary(completion).unwrap();
        assert_eq!(itinerary.stops.len(), 2);
        itinerary.validate().unwrap();
    }

    #[test]
    fn validate_rejects_single_stop() {
        let mut itinerary = parse_itinerary(
            r#"{"stops": ["a", "b"], "desired_type": "park", "keyword": "walk",
                "sample_every_m": 1500, "search_radius": 1200, "max_candidates": 20,
                "time_constraint_seconds": 3600}"#,
        )
        .unwrap();
        itinerary.remove_stop(1);
        assert!(matches!(
            itinerary.validate(),
            Err(ClientError::InvalidItinerary(_))
        ));
    }

    #[test]
    fn remove_stop_ignores_out_of_range() {
        let mut itinerary = Itinerary {
            stops: vec!["a".to_string(), "b".to_string()],
            desired_type: "park".to_string(),
            keyword: "walk".to_string(),
            sample_every_m: 1500,
            search_radius: 1200,
            max_candidates: 20,
            time_constraint_seconds: 3600,
        };
        itinerary.remove_stop(9);
        assert_eq!(itinerary.stops.len(), 2);
    }
}
