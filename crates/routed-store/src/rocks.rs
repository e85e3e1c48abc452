//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the
//! `PreferenceStore` trait. Values are CBOR-encoded; per-user logs use
//! time-ordered keys so prefix iteration yields insertion order.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use routed_core::{
    ArchivedOfferResponse, BookingRecord, CustomerPreferences, OfferOptionsResponse, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{PreferenceStore, MAX_OFFER_RESPONSES};

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    ///
    /// Failures are reported for the caller to degrade, not to propagate.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> std::result::Result<T, String> {
        ciborium::from_reader(data).map_err(|e| e.to_string())
    }

    /// Collect every key under a user's log prefix, in key (insertion) order.
    fn user_log_keys(&self, cf: &Arc<BoundColumnFamily<'_>>, user_id: &UserId) -> Result<Vec<Vec<u8>>> {
        let prefix = keys::user_log_prefix(user_id);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut found = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            found.push(key.to_vec());
        }
        Ok(found)
    }

    /// Read and decode every entry under a user's log prefix, skipping
    /// entries that no longer decode.
    fn read_user_log<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let prefix = keys::user_log_prefix(user_id);
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            match Self::deserialize(&value) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    tracing::warn!(
                        user_id = %user_id,
                        column_family = cf_name,
                        %error,
                        "skipping undecodable log entry"
                    );
                }
            }
        }
        Ok(entries)
    }
}

impl PreferenceStore for RocksStore {
    fn get_preferences(&self, user_id: &UserId) -> Result<Option<CustomerPreferences>> {
        let cf = self.cf(cf::PREFERENCES)?;
        let key = keys::preferences_key(user_id);

        let Some(data) = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        match Self::deserialize(&data) {
            Ok(prefs) => Ok(Some(prefs)),
            Err(error) => {
                tracing::warn!(user_id = %user_id, %error, "stored preferences undecodable; treating as absent");
                Ok(None)
            }
        }
    }

    fn save_preferences(&self, prefs: &CustomerPreferences) -> Result<CustomerPreferences> {
        let cf = self.cf(cf::PREFERENCES)?;
        let key = keys::preferences_key(&prefs.user_id);

        let mut stored = prefs.clone();
        stored.updated_at = chrono::Utc::now();

        let value = Self::serialize(&stored)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(stored)
    }

    fn get_booking_history(&self, user_id: &UserId) -> Result<Vec<BookingRecord>> {
        self.read_user_log(cf::BOOKING_HISTORY, user_id)
    }

    fn add_booking_to_history(&self, booking: &BookingRecord) -> Result<()> {
        let cf = self.cf(cf::BOOKING_HISTORY)?;
        let key = keys::booking_key(&booking.user_id, booking.id);
        let value = Self::serialize(booking)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn save_offer_response(
        &self,
        user_id: &UserId,
        response: OfferOptionsResponse,
    ) -> Result<ArchivedOfferResponse> {
        let cf = self.cf(cf::OFFER_RESPONSES)?;

        let entry = ArchivedOfferResponse::new(response);
        let entry_key = keys::offer_response_key(user_id, entry.id);
        let value = Self::serialize(&entry)?;

        // Append and evict in one atomic write: anything beyond the cap
        // (counting the new entry) is deleted oldest-first.
        let existing = self.user_log_keys(&cf, user_id)?;
        let overflow = (existing.len() + 1).saturating_sub(MAX_OFFER_RESPONSES);

        let mut batch = WriteBatch::default();
        for key in existing.iter().take(overflow) {
            batch.delete_cf(&cf, key);
        }
        batch.put_cf(&cf, &entry_key, &value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(entry)
    }

    fn get_offer_responses(&self, user_id: &UserId) -> Result<Vec<ArchivedOfferResponse>> {
        self.read_user_log(cf::OFFER_RESPONSES, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routed_core::{
        BookingOption, BookingStatus, OfferPolicy, PreferencesUpdate, Venue, Weekday,
    };
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn user(token: &str) -> UserId {
        UserId::new(token).unwrap()
    }

    fn offer(venue_name: &str) -> OfferOptionsResponse {
        OfferOptionsResponse {
            venue: Venue {
                name: venue_name.to_string(),
                city: "Toronto".to_string(),
            },
            party_size: 2,
            date: chrono::NaiveDate::from_ymd_opt(2025, 9, 21).unwrap(),
            options: vec![BookingOption {
                time_local: "19:00".to_string(),
                provider: "opentable".to_string(),
                table_note: String::new(),
                policy: OfferPolicy::default(),
            }],
            alternates: Vec::new(),
        }
    }

    #[test]
    fn default_preferences_roundtrip() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");

        assert!(store.get_preferences(&user).unwrap().is_none());

        let created = store.create_default_preferences(&user).unwrap();
        let retrieved = store.get_preferences(&user).unwrap().unwrap();

        assert_eq!(retrieved.id, created.id);
        assert_eq!(retrieved.weekly_availability.len(), 7);
        let friday = retrieved.availability_for(Weekday::Friday).unwrap();
        assert_eq!(friday.preferred_times[0].end_time.to_string(), "22:00");
        assert!(retrieved.updated_at >= retrieved.created_at);
    }

    #[test]
    fn save_is_idempotent_modulo_timestamp() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");

        let first = store.create_default_preferences(&user).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        let second = store.save_preferences(&first).unwrap();

        assert!(second.updated_at >= first.updated_at);
        let mut normalized = second.clone();
        normalized.updated_at = first.updated_at;
        assert_eq!(normalized, first);
    }

    #[test]
    fn update_merges_over_existing_record() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");
        store.create_default_preferences(&user).unwrap();

        let update = PreferencesUpdate {
            preferred_party_size: Some(6),
            preferred_cities: Some(vec!["Toronto".to_string()]),
            ..PreferencesUpdate::default()
        };
        let updated = store.update_preferences(&user, update).unwrap().unwrap();

        assert_eq!(updated.preferred_party_size, 6);
        assert_eq!(updated.preferred_cities, vec!["Toronto".to_string()]);
        // Untouched fields survive the merge.
        assert_eq!(updated.preferred_providers, vec!["opentable".to_string()]);
    }

    #[test]
    fn update_on_unknown_user_writes_nothing() {
        let (store, _dir) = create_test_store();
        let user = user("nobody");

        let update = PreferencesUpdate {
            preferred_party_size: Some(8),
            ..PreferencesUpdate::default()
        };
        assert!(store.update_preferences(&user, update).unwrap().is_none());
        assert!(store.get_preferences(&user).unwrap().is_none());
    }

    #[test]
    fn booking_history_keeps_insertion_order() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");

        for name in ["First Table", "Second Table", "Third Table"] {
            let source = offer(name);
            let record =
                BookingRecord::from_offer(user.clone(), &source, 0, BookingStatus::Confirmed)
                    .unwrap();
            store.add_booking_to_history(&record).unwrap();
            std::thread::sleep(Duration::from_millis(2));
        }

        let history = store.get_booking_history(&user).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].venue.name, "First Table");
        assert_eq!(history[2].venue.name, "Third Table");
    }

    #[test]
    fn history_is_per_user() {
        let (store, _dir) = create_test_store();
        let alice = user("alice");
        let bob = user("bob");

        let record =
            BookingRecord::from_offer(alice.clone(), &offer("Cafe"), 0, BookingStatus::Completed)
                .unwrap();
        store.add_booking_to_history(&record).unwrap();

        assert_eq!(store.get_booking_history(&alice).unwrap().len(), 1);
        assert!(store.get_booking_history(&bob).unwrap().is_empty());
    }

    #[test]
    fn offer_archive_evicts_oldest_beyond_cap() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");

        for i in 0..55 {
            store
                .save_offer_response(&user, offer(&format!("venue-{i:02}")))
                .unwrap();
            std::thread::sleep(Duration::from_millis(2));
        }

        let archived = store.get_offer_responses(&user).unwrap();
        assert_eq!(archived.len(), MAX_OFFER_RESPONSES);
        // The first five inserts were evicted; relative order is preserved.
        assert_eq!(archived[0].response.venue.name, "venue-05");
        assert_eq!(archived[49].response.venue.name, "venue-54");
    }

    #[test]
    fn corrupt_preferences_degrade_to_absent() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");
        store.create_default_preferences(&user).unwrap();

        let cf = store.cf(cf::PREFERENCES).unwrap();
        store
            .db
            .put_cf(&cf, keys::preferences_key(&user), b"not cbor")
            .unwrap();

        assert!(store.get_preferences(&user).unwrap().is_none());
    }

    #[test]
    fn corrupt_log_entries_are_skipped() {
        let (store, _dir) = create_test_store();
        let user = user("user_123");

        store.save_offer_response(&user, offer("good")).unwrap();
        let cf = store.cf(cf::OFFER_RESPONSES).unwrap();
        let bogus_key = keys::offer_response_key(&user, routed_core::OfferResponseId::generate());
        store.db.put_cf(&cf, bogus_key, b"not cbor").unwrap();

        let archived = store.get_offer_responses(&user).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].response.venue.name, "good");
    }
}
