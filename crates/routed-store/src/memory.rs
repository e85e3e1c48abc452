//! In-memory storage implementation.
//!
//! `MemoryStore` backs tests and ephemeral sessions. It keeps the same
//! semantics as the durable backend: one preference record per user,
//! insertion-ordered logs, and the capped offer archive.

use std::collections::HashMap;
use std::sync::Mutex;

use routed_core::{
    ArchivedOfferResponse, BookingRecord, CustomerPreferences, OfferOptionsResponse, UserId,
};

use crate::error::{Result, StoreError};
use crate::{PreferenceStore, MAX_OFFER_RESPONSES};

/// Process-memory storage implementation.
#[derive(Default)]
pub struct MemoryStore {
    preferences: Mutex<HashMap<String, CustomerPreferences>>,
    bookings: Mutex<HashMap<String, Vec<BookingRecord>>>,
    offers: Mutex<HashMap<String, Vec<ArchivedOfferResponse>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<std::sync::MutexGuard<'a, T>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Database("store mutex poisoned".to_string()))
    }
}

impl PreferenceStore for MemoryStore {
    fn get_preferences(&self, user_id: &UserId) -> Result<Option<CustomerPreferences>> {
        let map = Self::lock(&self.preferences)?;
        Ok(map.get(user_id.as_str()).cloned())
    }

    fn save_preferences(&self, prefs: &CustomerPreferences) -> Result<CustomerPreferences> {
        let mut stored = prefs.clone();
        stored.updated_at = chrono::Utc::now();

        let mut map = Self::lock(&self.preferences)?;
        map.insert(stored.user_id.as_str().to_string(), stored.clone());
        Ok(stored)
    }

    fn get_booking_history(&self, user_id: &UserId) -> Result<Vec<BookingRecord>> {
        let map = Self::lock(&self.bookings)?;
        Ok(map.get(user_id.as_str()).cloned().unwrap_or_default())
    }

    fn add_booking_to_history(&self, booking: &BookingRecord) -> Result<()> {
        let mut map = Self::lock(&self.bookings)?;
        map.entry(booking.user_id.as_str().to_string())
            .or_default()
            .push(booking.clone());
        Ok(())
    }

    fn save_offer_response(
        &self,
        user_id: &UserId,
        response: OfferOptionsResponse,
    ) -> Result<ArchivedOfferResponse> {
        let entry = ArchivedOfferResponse::new(response);

        let mut map = Self::lock(&self.offers)?;
        let archive = map.entry(user_id.as_str().to_string()).or_default();
        archive.push(entry.clone());
        if archive.len() > MAX_OFFER_RESPONSES {
            let overflow = archive.len() - MAX_OFFER_RESPONSES;
            archive.drain(..overflow);
        }
        Ok(entry)
    }

    fn get_offer_responses(&self, user_id: &UserId) -> Result<Vec<ArchivedOfferResponse>> {
        let map = Self::lock(&self.offers)?;
        Ok(map.get(user_id.as_str()).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences_summary;
    use routed_core::{BookingOption, BookingStatus, OfferPolicy, Venue};

    fn user(token: &str) -> UserId {
        UserId::new(token).unwrap()
    }

    fn offer(venue_name: &str) -> OfferOptionsResponse {
        OfferOptionsResponse {
            venue: Venue {
                name: venue_name.to_string(),
                city: "New York".to_string(),
            },
            party_size: 2,
            date: chrono::NaiveDate::from_ymd_opt(2025, 9, 20).unwrap(),
            options: vec![BookingOption {
                time_local: "18:30".to_string(),
                provider: "resy".to_string(),
                table_note: String::new(),
                policy: OfferPolicy::default(),
            }],
            alternates: Vec::new(),
        }
    }

    #[test]
    fn archive_cap_matches_durable_backend() {
        let store = MemoryStore::new();
        let user = user("user_123");

        for i in 0..55 {
            store
                .save_offer_response(&user, offer(&format!("venue-{i:02}")))
                .unwrap();
        }

        let archived = store.get_offer_responses(&user).unwrap();
        assert_eq!(archived.len(), MAX_OFFER_RESPONSES);
        assert_eq!(archived[0].response.venue.name, "venue-05");
        assert_eq!(archived[49].response.venue.name, "venue-54");
    }

    #[test]
    fn update_on_unknown_user_is_absent() {
        let store = MemoryStore::new();
        let result = store
            .update_preferences(&user("ghost"), routed_core::PreferencesUpdate::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn summary_rolls_up_recent_activity() {
        let store = MemoryStore::new();
        let user = user("user_123");
        store.create_default_preferences(&user).unwrap();

        for i in 0..7 {
            let source = offer(&format!("venue-{i}"));
            let record =
                BookingRecord::from_offer(user.clone(), &source, 0, BookingStatus::Completed)
                    .unwrap();
            store.add_booking_to_history(&record).unwrap();
            store.save_offer_response(&user, source).unwrap();
        }

        let summary = preferences_summary(&store, &user).unwrap();
        assert!(summary.preferences.is_some());
        assert_eq!(summary.total_bookings, 7);
        assert_eq!(summary.recent_bookings.len(), 5);
        assert_eq!(summary.recent_bookings[0].venue.name, "venue-2");
        assert_eq!(summary.total_offer_responses, 7);
        assert_eq!(summary.recent_responses.len(), 3);
        assert_eq!(summary.recent_responses[2].response.venue.name, "venue-6");
    }
}
