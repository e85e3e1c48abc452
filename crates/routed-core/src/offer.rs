//! Voice-assistant offer payloads.
//!
//! The assistant sends structured messages over the voice transport. The only
//! variant the client consumes is `offer_options`: booking choices for a
//! venue. Payloads are decoded at the boundary and rejected when required
//! fields are missing; accepted payloads are archived verbatim.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OfferResponseId;

/// A venue named in an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue name.
    pub name: String,

    /// City the venue is in.
    pub city: String,
}

/// Cancellation and deposit policy attached to a booking option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferPolicy {
    /// Deposit amount, if one is required.
    pub deposit: Option<f64>,

    /// Hours before the booking during which cancellation is allowed.
    pub cancel_window_hours: u32,

    /// Whether a card is held to secure the booking.
    pub holds_card: bool,
}

impl Default for OfferPolicy {
    fn default() -> Self {
        Self {
            deposit: None,
            cancel_window_hours: 0,
            holds_card: false,
        }
    }
}

/// One bookable option within an offer.
///
/// `time_local` is kept as spoken by the assistant; no clock format is
/// guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingOption {
    /// Local time of the table, as offered.
    pub time_local: String,

    /// Booking provider (e.g. "opentable").
    pub provider: String,

    /// Free-text note about the table.
    pub table_note: String,

    /// Cancellation/deposit policy.
    pub policy: OfferPolicy,
}

/// An alternate date/time/provider triple offered when the requested slot is
/// unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferAlternate {
    /// Alternate date.
    pub date: NaiveDate,

    /// Alternate local time.
    pub time_local: String,

    /// Provider for the alternate slot.
    pub provider: String,
}

/// Booking choices for a venue, as sent by the voice assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferOptionsResponse {
    /// The venue being offered.
    pub venue: Venue,

    /// Party size the options were searched for.
    pub party_size: u32,

    /// Date the options are for.
    pub date: NaiveDate,

    /// Bookable options.
    pub options: Vec<BookingOption>,

    /// Alternate slots.
    pub alternates: Vec<OfferAlternate>,
}

/// A structured message from the voice assistant, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantMessage {
    /// Booking choices for a venue.
    OfferOptions(OfferOptionsResponse),
}

impl AssistantMessage {
    /// Decode an inbound message payload.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the payload is not a known
    /// message shape or required fields are absent.
    pub fn decode(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// An archived offer response: the verbatim payload wrapped with a generated
/// id and a capture timestamp. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedOfferResponse {
    /// Archive-entry identifier (time-ordered).
    pub id: OfferResponseId,

    /// When the response was received.
    pub received_at: DateTime<Utc>,

    /// The payload as received.
    #[serde(flatten)]
    pub response: OfferOptionsResponse,
}

impl ArchivedOfferResponse {
    /// Wrap a freshly received response for archival.
    #[must_use]
    pub fn new(response: OfferOptionsResponse) -> Self {
        Self {
            id: OfferResponseId::generate(),
            received_at: Utc::now(),
            response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offer_json() -> serde_json::Value {
        json!({
            "type": "offer_options",
            "venue": {"name": "11:59 Bar:Cafe", "city": "Toronto"},
            "party_size": 2,
            "date": "2025-09-21",
            "options": [
                {
                    "time_local": "19:00",
                    "provider": "opentable",
                    "table_note": "window seat",
                    "policy": {"deposit": null, "cancel_window_hours": 2, "holds_card": false}
                }
            ],
            "alternates": [
                {"date": "2025-09-22", "time_local": "18:30", "provider": "resy"}
            ]
        })
    }

    #[test]
    fn decodes_offer_options() {
        let message = AssistantMessage::decode(offer_json()).unwrap();
        let AssistantMessage::OfferOptions(offer) = message;
        assert_eq!(offer.venue.city, "Toronto");
        assert_eq!(offer.options.len(), 1);
        assert_eq!(offer.alternates[0].provider, "resy");
    }

    #[test]
    fn rejects_unknown_message_type() {
        let result = AssistantMessage::decode(json!({"type": "transcript", "text": "hi"}));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut payload = offer_json();
        payload.as_object_mut().unwrap().remove("venue");
        assert!(AssistantMessage::decode(payload).is_err());
    }

    #[test]
    fn archive_wrapper_flattens_payload() {
        let AssistantMessage::OfferOptions(offer) =
            AssistantMessage::decode(offer_json()).unwrap();
        let archived = ArchivedOfferResponse::new(offer);
        let value = serde_json::to_value(&archived).unwrap();
        // Wrapper fields sit next to the payload fields, as in the original
        // archive format.
        assert!(value.get("id").is_some());
        assert!(value.get("received_at").is_some());
        assert_eq!(value["venue"]["city"], "Toronto");
    }
}
