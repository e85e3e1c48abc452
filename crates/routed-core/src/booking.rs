//! Booking history records.
//!
//! History is append-only: a record is created when a booking completes and
//! never mutated afterwards. Status changes arrive as new appended facts in
//! the source systems, so no update path exists here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, UserId};
use crate::offer::{BookingOption, OfferOptionsResponse, Venue};

/// Terminal status of a booking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// The booking was confirmed.
    Confirmed,

    /// The booking was cancelled.
    Cancelled,

    /// The visit took place.
    Completed,

    /// The party did not show up.
    NoShow,
}

/// One completed or attempted booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Record identifier (time-ordered).
    pub id: BookingId,

    /// User the booking belongs to.
    pub user_id: UserId,

    /// The venue booked.
    pub venue: Venue,

    /// Date of the booking.
    pub booking_date: NaiveDate,

    /// Party size.
    pub party_size: u32,

    /// The option that was chosen.
    pub selected_option: BookingOption,

    /// Outcome of the booking.
    pub status: BookingStatus,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Create a new history record.
    #[must_use]
    pub fn new(
        user_id: UserId,
        venue: Venue,
        booking_date: NaiveDate,
        party_size: u32,
        selected_option: BookingOption,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: BookingId::generate(),
            user_id,
            venue,
            booking_date,
            party_size,
            selected_option,
            status,
            created_at: Utc::now(),
        }
    }

    /// Build a record from one option of an archived offer.
    ///
    /// # Errors
    ///
    /// Returns an error if `option_index` does not name an option of the
    /// offer.
    pub fn from_offer(
        user_id: UserId,
        offer: &OfferOptionsResponse,
        option_index: usize,
        status: BookingStatus,
    ) -> Result<Self, OfferSelectionError> {
        let selected = offer
            .options
            .get(option_index)
            .cloned()
            .ok_or(OfferSelectionError::NoSuchOption {
                index: option_index,
                available: offer.options.len(),
            })?;
        Ok(Self::new(
            user_id,
            offer.venue.clone(),
            offer.date,
            offer.party_size,
            selected,
            status,
        ))
    }
}

/// Errors selecting an option out of an offer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferSelectionError {
    /// The index does not name an offered option.
    #[error("offer has {available} option(s); index {index} is out of range")]
    NoSuchOption {
        /// Requested option index.
        index: usize,
        /// Number of options in the offer.
        available: usize,
    },
}
