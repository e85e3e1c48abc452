//! Key encoding utilities for `RocksDB`.
//!
//! User ids are opaque variable-length tokens, so log keys put a NUL
//! separator between the user id and the record id. `UserId` guarantees the
//! token itself is NUL-free, which keeps per-user prefixes unambiguous
//! ("user_1" never matches keys belonging to "user_12").

use routed_core::{BookingId, OfferResponseId, UserId};

/// Create a preferences key from a user id.
#[must_use]
pub fn preferences_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a booking-history key.
///
/// Format: `user_id || 0x00 || booking_id (16 bytes)`
///
/// ULIDs are time-ordered, so a user's bookings sort by creation time.
#[must_use]
pub fn booking_key(user_id: &UserId, booking_id: BookingId) -> Vec<u8> {
    log_key(user_id, booking_id.to_bytes())
}

/// Create an offer-response archive key.
///
/// Format: `user_id || 0x00 || response_id (16 bytes)`
#[must_use]
pub fn offer_response_key(user_id: &UserId, response_id: OfferResponseId) -> Vec<u8> {
    log_key(user_id, response_id.to_bytes())
}

/// Create a prefix for iterating a user's log entries.
#[must_use]
pub fn user_log_prefix(user_id: &UserId) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(user_id.as_bytes().len() + 1);
    prefix.extend_from_slice(user_id.as_bytes());
    prefix.push(0);
    prefix
}

fn log_key(user_id: &UserId, record_id: [u8; 16]) -> Vec<u8> {
    let mut key = user_log_prefix(user_id);
    key.extend_from_slice(&record_id);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_key_is_raw_token() {
        let user = UserId::new("user_123").unwrap();
        assert_eq!(preferences_key(&user), b"user_123".to_vec());
    }

    #[test]
    fn log_key_format() {
        let user = UserId::new("user_1").unwrap();
        let id = BookingId::generate();
        let key = booking_key(&user, id);

        assert_eq!(key.len(), "user_1".len() + 1 + 16);
        assert_eq!(&key[.."user_1".len()], b"user_1");
        assert_eq!(key["user_1".len()], 0);
        assert_eq!(&key["user_1".len() + 1..], id.to_bytes());
    }

    #[test]
    fn prefixes_do_not_collide_across_users() {
        let short = UserId::new("user_1").unwrap();
        let long = UserId::new("user_12").unwrap();
        let id = OfferResponseId::generate();
        let long_key = offer_response_key(&long, id);
        assert!(!long_key.starts_with(&user_log_prefix(&short)));
    }
}
