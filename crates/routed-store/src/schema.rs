//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Preference records, keyed by user id.
    pub const PREFERENCES: &str = "preferences";

    /// Append-only booking history, keyed by `user_id || 0x00 || booking_id`.
    pub const BOOKING_HISTORY: &str = "booking_history";

    /// Capped archive of offer responses, keyed by
    /// `user_id || 0x00 || response_id`.
    pub const OFFER_RESPONSES: &str = "offer_responses";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::PREFERENCES, cf::BOOKING_HISTORY, cf::OFFER_RESPONSES]
}
