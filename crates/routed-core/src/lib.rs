//! Core types for the Routed client.
//!
//! This crate provides the foundational types used throughout Routed:
//!
//! - **Identifiers**: `UserId`, `PreferenceId`, `BookingId`, `OfferResponseId`
//! - **Time**: `ClockTime`, `TimeRange`, `Weekday`
//! - **Preferences**: `CustomerPreferences`, `DayAvailability`,
//!   `PreferencesUpdate`
//! - **Bookings**: `BookingRecord`, `BookingStatus`
//! - **Offers**: `OfferOptionsResponse`, `AssistantMessage`,
//!   `ArchivedOfferResponse`
//!
//! Availability checks are pure functions of these types: a time is "in
//! range" iff the day is available and the time falls inside any configured
//! window, inclusive on both ends.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod booking;
pub mod ids;
pub mod offer;
pub mod preferences;
pub mod time;

pub use booking::{BookingRecord, BookingStatus, OfferSelectionError};
pub use ids::{BookingId, IdError, OfferResponseId, PreferenceId, UserId};
pub use offer::{
    ArchivedOfferResponse, AssistantMessage, BookingOption, OfferAlternate, OfferOptionsResponse,
    OfferPolicy, Venue,
};
pub use preferences::{
    CustomerPreferences, DayAvailability, PreferencesUpdate, DEFAULT_CANCELLATION_WINDOW_HOURS,
    DEFAULT_LEAD_TIME_DAYS, DEFAULT_MAX_TRAVEL_MILES, DEFAULT_PARTY_SIZE, DEFAULT_REMINDER_HOURS,
};
pub use time::{ClockTime, TimeError, TimeRange, Weekday};
