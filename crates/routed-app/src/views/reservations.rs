//! Reservation view-model.
//!
//! Builds batch reservation requests from the current candidates and turns
//! outcomes into display lines and booking-history records.

use chrono::NaiveDate;

use routed_client::{Candidate, ReservationDetails, ReservationOutcome, ReservationRequest};
use routed_core::{
    BookingOption, BookingRecord, BookingStatus, OfferPolicy, UserId, Venue,
};
use routed_store::PreferenceStore;

use crate::error::AppError;

/// Contact and timing details for a reservation batch.
#[derive(Debug, Clone)]
pub struct ReservationForm {
    /// Party size.
    pub party_size: u32,

    /// Reservation date.
    pub date: NaiveDate,

    /// Requested time, as entered.
    pub time: String,

    /// Guest name.
    pub name: String,

    /// Contact phone number.
    pub phone: String,

    /// Contact email.
    pub email: String,
}

impl ReservationForm {
    fn to_details(&self) -> ReservationDetails {
        ReservationDetails {
            party_size: self.party_size,
            date: self.date,
            time: self.time.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

/// Build the batch request, refusing an empty candidate list.
///
/// # Errors
///
/// Returns `AppError::NoCandidates` when there is nothing to reserve; the
/// submission is blocked client-side and no call is issued.
pub fn build_reservation_request(
    form: &ReservationForm,
    candidates: &[Candidate],
) -> Result<ReservationRequest, AppError> {
    if candidates.is_empty() {
        return Err(AppError::NoCandidates);
    }

    Ok(ReservationRequest {
        places_data: candidates.to_vec(),
        reservation_details: form.to_details(),
    })
}

/// One display line per outcome.
#[must_use]
pub fn summarize_outcomes(outcomes: &[ReservationOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|outcome| {
            let name = outcome.restaurant().unwrap_or("(unknown venue)");
            let status = outcome.status.as_deref().unwrap_or("unknown");
            let mut line = format!("{name}: {status}");
            if let Some(confirmation) = &outcome.confirmation_number {
                line.push_str(&format!(" (confirmation {confirmation})"));
            }
            if let Some(phone) = &outcome.phone_for_manual_booking {
                line.push_str(&format!(" (call {phone})"));
            }
            if let Some(error) = &outcome.error {
                line.push_str(&format!(" ({error})"));
            }
            line
        })
        .collect()
}

/// Append a history record for every confirmed outcome.
///
/// Reservation-flow bookings have no offered option to point at, so the
/// selected option is synthesized from the form (requested time, `web`
/// provider).
///
/// # Errors
///
/// Returns an error if a history write fails.
pub fn record_confirmed_bookings(
    store: &dyn PreferenceStore,
    user_id: &UserId,
    form: &ReservationForm,
    outcomes: &[ReservationOutcome],
) -> Result<usize, AppError> {
    let mut recorded = 0;
    for outcome in outcomes.iter().filter(|o| o.is_confirmed()) {
        let Some(name) = outcome.restaurant() else {
            tracing::warn!("confirmed outcome without a venue name; skipping history entry");
            continue;
        };

        let record = BookingRecord::new(
            user_id.clone(),
            Venue {
                name: name.to_string(),
                city: outcome.location.clone().unwrap_or_default(),
            },
            form.date,
            form.party_size,
            BookingOption {
                time_local: form.time.clone(),
                provider: "web".to_string(),
                table_note: String::new(),
                policy: OfferPolicy::default(),
            },
            BookingStatus::Confirmed,
        );
        store.add_booking_to_history(&record)?;
        recorded += 1;
    }
    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routed_store::MemoryStore;
    use serde_json::json;

    fn form() -> ReservationForm {
        ReservationForm {
            party_size: 4,
            date: NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            time: "7:00 PM".to_string(),
            name: "John Smith".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "john@example.com".to_string(),
        }
    }

    fn candidate() -> Candidate {
        serde_json::from_value(json!({
            "name": "11:59 Bar:Cafe",
            "vicinity": "70 Temperance St, Toronto",
            "added_time_seconds": 105,
            "total_travel_time_seconds": 629
        }))
        .unwrap()
    }

    #[test]
    fn empty_candidates_block_submission() {
        let result = build_reservation_request(&form(), &[]);
        assert!(matches!(result, Err(AppError::NoCandidates)));
    }

    #[test]
    fn request_carries_form_and_candidates() {
        let request = build_reservation_request(&form(), &[candidate()]).unwrap();
        assert_eq!(request.places_data.len(), 1);
        assert_eq!(request.reservation_details.party_size, 4);
        assert_eq!(request.reservation_details.time, "7:00 PM");
    }

    #[test]
    fn summaries_cover_every_outcome_shape() {
        let outcomes: Vec<ReservationOutcome> = serde_json::from_value(json!([
            {"restaurant_name": "Cafe", "status": "confirmed", "confirmation_number": "ABC123"},
            {"restaurant": {"name": "Bar"}, "status": "requires_phone_call",
             "phone_for_manual_booking": "(555) 987-6543"},
            {"status": "error", "error": "no availability"}
        ]))
        .unwrap();

        let lines = summarize_outcomes(&outcomes);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Cafe: confirmed (confirmation ABC123)");
        assert_eq!(lines[1], "Bar: requires_phone_call (call (555) 987-6543)");
        assert_eq!(lines[2], "(unknown venue): error (no availability)");
    }

    #[test]
    fn only_confirmed_outcomes_reach_history() {
        let store = MemoryStore::new();
        let user = UserId::new("user_123").unwrap();
        let outcomes: Vec<ReservationOutcome> = serde_json::from_value(json!([
            {"restaurant_name": "Cafe", "status": "confirmed", "location": "Toronto"},
            {"restaurant_name": "Bar", "status": "no_availability"}
        ]))
        .unwrap();

        let recorded = record_confirmed_bookings(&store, &user, &form(), &outcomes).unwrap();
        assert_eq!(recorded, 1);

        let history = store.get_booking_history(&user).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].venue.name, "Cafe");
        assert_eq!(history[0].venue.city, "Toronto");
        assert_eq!(history[0].selected_option.provider, "web");
        assert_eq!(history[0].status, BookingStatus::Confirmed);
    }
}
