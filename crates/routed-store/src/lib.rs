//! Preference storage layer for Routed.
//!
//! This crate owns every durable per-user record: the preference record, the
//! append-only booking history, and a capped archive of voice-assistant
//! offer responses.
//!
//! # Architecture
//!
//! The `RocksDB` backend uses the following column families:
//!
//! - `preferences`: one record per user, keyed by user id
//! - `booking_history`: append-only log, keyed by `user_id || 0x00 || ULID`
//! - `offer_responses`: capped log (most recent 50), same key shape
//!
//! # Failure semantics
//!
//! Malformed stored data degrades to "no data" (absent record, skipped log
//! entry) with a warning, rather than propagating a parse error; only
//! genuine I/O failures surface as errors.
//!
//! # Example
//!
//! ```no_run
//! use routed_store::{PreferenceStore, RocksStore};
//! use routed_core::UserId;
//!
//! let store = RocksStore::open("/tmp/routed-db").unwrap();
//! let user = UserId::new("user_123").unwrap();
//!
//! let prefs = match store.get_preferences(&user).unwrap() {
//!     Some(prefs) => prefs,
//!     None => store.create_default_preferences(&user).unwrap(),
//! };
//! assert_eq!(prefs.user_id, user);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use routed_core::{
    ArchivedOfferResponse, BookingRecord, CustomerPreferences, OfferOptionsResponse,
    PreferencesUpdate, UserId,
};

/// Maximum archived offer responses per user; older entries are evicted
/// oldest-first.
pub const MAX_OFFER_RESPONSES: usize = 50;

/// The storage trait defining all per-user persistence operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (`RocksDB`, in-memory for testing). Implementations stamp
/// `updated_at` on every preference save.
pub trait PreferenceStore: Send + Sync {
    // =========================================================================
    // Preference Operations
    // =========================================================================

    /// Get a user's preference record.
    ///
    /// Returns `None` when no record exists or the stored record cannot be
    /// decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_preferences(&self, user_id: &UserId) -> Result<Option<CustomerPreferences>>;

    /// Insert or update a preference record, stamping `updated_at`.
    ///
    /// Returns the record as stored. Saving the same logical content twice
    /// yields identical fields other than the timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn save_preferences(&self, prefs: &CustomerPreferences) -> Result<CustomerPreferences>;

    /// Create and persist a record with the documented defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_default_preferences(&self, user_id: &UserId) -> Result<CustomerPreferences> {
        self.save_preferences(&CustomerPreferences::with_defaults(user_id.clone()))
    }

    /// Shallow-merge a partial update over an existing record.
    ///
    /// Returns `None` without writing anything when the user has no record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn update_preferences(
        &self,
        user_id: &UserId,
        update: PreferencesUpdate,
    ) -> Result<Option<CustomerPreferences>> {
        let Some(mut prefs) = self.get_preferences(user_id)? else {
            return Ok(None);
        };
        prefs.apply(update);
        self.save_preferences(&prefs).map(Some)
    }

    // =========================================================================
    // Booking History Operations
    // =========================================================================

    /// List a user's booking history in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_booking_history(&self, user_id: &UserId) -> Result<Vec<BookingRecord>>;

    /// Append a booking to the user's history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn add_booking_to_history(&self, booking: &BookingRecord) -> Result<()>;

    // =========================================================================
    // Offer Archive Operations
    // =========================================================================

    /// Archive an offer response, evicting beyond [`MAX_OFFER_RESPONSES`].
    ///
    /// The response is wrapped with a generated id and a capture timestamp;
    /// the wrapped entry is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn save_offer_response(
        &self,
        user_id: &UserId,
        response: OfferOptionsResponse,
    ) -> Result<ArchivedOfferResponse>;

    /// List a user's archived offer responses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_offer_responses(&self, user_id: &UserId) -> Result<Vec<ArchivedOfferResponse>>;
}

/// A read-only roll-up of a user's stored state.
#[derive(Debug, Clone)]
pub struct PreferencesSummary {
    /// The preference record, if one exists.
    pub preferences: Option<CustomerPreferences>,

    /// Total bookings on record.
    pub total_bookings: usize,

    /// The five most recent bookings, oldest of the five first.
    pub recent_bookings: Vec<BookingRecord>,

    /// Total archived offer responses.
    pub total_offer_responses: usize,

    /// The three most recent archived responses, oldest of the three first.
    pub recent_responses: Vec<ArchivedOfferResponse>,
}

/// Assemble a summary of everything stored for a user.
///
/// # Errors
///
/// Returns an error if any underlying read fails.
pub fn preferences_summary(
    store: &dyn PreferenceStore,
    user_id: &UserId,
) -> Result<PreferencesSummary> {
    let preferences = store.get_preferences(user_id)?;
    let bookings = store.get_booking_history(user_id)?;
    let responses = store.get_offer_responses(user_id)?;

    let recent_bookings = bookings
        .iter()
        .rev()
        .take(5)
        .rev()
        .cloned()
        .collect::<Vec<_>>();
    let recent_responses = responses
        .iter()
        .rev()
        .take(3)
        .rev()
        .cloned()
        .collect::<Vec<_>>();

    Ok(PreferencesSummary {
        preferences,
        total_bookings: bookings.len(),
        recent_bookings,
        total_offer_responses: responses.len(),
        recent_responses,
    })
}
