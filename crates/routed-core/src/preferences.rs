//! Customer dining preferences.
//!
//! Exactly one `CustomerPreferences` record exists per user. The record is
//! created with defaults on first access and mutated in place afterwards;
//! `updated_at` is stamped by the store on every save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PreferenceId, UserId};
use crate::time::{ClockTime, TimeRange, Weekday};

/// Default preferred party size for new records.
pub const DEFAULT_PARTY_SIZE: u32 = 2;

/// Default maximum travel distance in miles.
pub const DEFAULT_MAX_TRAVEL_MILES: f64 = 25.0;

/// Default booking lead time in days.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 3;

/// Default minimum cancellation window in hours.
pub const DEFAULT_CANCELLATION_WINDOW_HOURS: u32 = 2;

/// Default reminder lead time in hours.
pub const DEFAULT_REMINDER_HOURS: u32 = 2;

/// Availability for a single day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Which day this record describes.
    pub day: Weekday,

    /// Whether the user is available at all on this day.
    pub available: bool,

    /// Preferred time windows; empty means available but no preference.
    pub preferred_times: Vec<TimeRange>,
}

impl DayAvailability {
    /// Whether `time` falls within a preferred window on this day.
    ///
    /// Always false when the day is marked unavailable. Window bounds are
    /// inclusive.
    #[must_use]
    pub fn allows(&self, time: ClockTime) -> bool {
        self.available && self.preferred_times.iter().any(|range| range.contains(time))
    }
}

/// A user's durable dining preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPreferences {
    /// Record identifier.
    pub id: PreferenceId,

    /// Owning user; unique per record.
    pub user_id: UserId,

    /// Preferred party size.
    pub preferred_party_size: u32,

    /// Preferred cuisines (e.g. "italian", "sushi").
    pub preferred_cuisine_types: Vec<String>,

    /// Dietary restrictions (e.g. "vegetarian", "gluten-free").
    pub dietary_restrictions: Vec<String>,

    /// One entry per weekday, Monday first.
    pub weekly_availability: Vec<DayAvailability>,

    /// How many days in advance the user prefers to book.
    pub preferred_booking_lead_time_days: u32,

    /// Cities the user prefers to dine in.
    pub preferred_cities: Vec<String>,

    /// Maximum travel distance in miles.
    pub max_travel_distance_miles: f64,

    /// Booking providers in preference order (e.g. "opentable", "resy").
    pub preferred_providers: Vec<String>,

    /// Whether the user accepts deposit-backed bookings.
    pub accepts_deposits: bool,

    /// Minimum acceptable cancellation window in hours.
    pub min_cancellation_window_hours: u32,

    /// Whether to send booking confirmations.
    pub booking_confirmations: bool,

    /// Whether to send booking reminders.
    pub reminder_notifications: bool,

    /// Reminder lead time in hours.
    pub reminder_hours_before: u32,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last saved; never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

impl CustomerPreferences {
    /// Create a record with the documented defaults.
    ///
    /// Weekday evenings 18:00-21:00, Friday 18:00-22:00, Saturday
    /// 17:00-22:00, Sunday 17:00-21:00; all days available.
    #[must_use]
    pub fn with_defaults(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: PreferenceId::generate(),
            user_id,
            preferred_party_size: DEFAULT_PARTY_SIZE,
            preferred_cuisine_types: Vec::new(),
            dietary_restrictions: Vec::new(),
            weekly_availability: default_weekly_availability(),
            preferred_booking_lead_time_days: DEFAULT_LEAD_TIME_DAYS,
            preferred_cities: Vec::new(),
            max_travel_distance_miles: DEFAULT_MAX_TRAVEL_MILES,
            preferred_providers: vec!["opentable".to_string()],
            accepts_deposits: true,
            min_cancellation_window_hours: DEFAULT_CANCELLATION_WINDOW_HOURS,
            booking_confirmations: true,
            reminder_notifications: true,
            reminder_hours_before: DEFAULT_REMINDER_HOURS,
            created_at: now,
            updated_at: now,
        }
    }

    /// Availability record for a given weekday, if configured.
    #[must_use]
    pub fn availability_for(&self, day: Weekday) -> Option<&DayAvailability> {
        self.weekly_availability.iter().find(|entry| entry.day == day)
    }

    /// Shallow-merge a partial update over this record.
    ///
    /// Only fields present in `update` are replaced; timestamps are left for
    /// the store to stamp on save.
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.preferred_party_size {
            self.preferred_party_size = v;
        }
        if let Some(v) = update.preferred_cuisine_types {
            self.preferred_cuisine_types = v;
        }
        if let Some(v) = update.dietary_restrictions {
            self.dietary_restrictions = v;
        }
        if let Some(v) = update.weekly_availability {
            self.weekly_availability = v;
        }
        if let Some(v) = update.preferred_booking_lead_time_days {
            self.preferred_booking_lead_time_days = v;
        }
        if let Some(v) = update.preferred_cities {
            self.preferred_cities = v;
        }
        if let Some(v) = update.max_travel_distance_miles {
            self.max_travel_distance_miles = v;
        }
        if let Some(v) = update.preferred_providers {
            self.preferred_providers = v;
        }
        if let Some(v) = update.accepts_deposits {
            self.accepts_deposits = v;
        }
        if let Some(v) = update.min_cancellation_window_hours {
            self.min_cancellation_window_hours = v;
        }
        if let Some(v) = update.booking_confirmations {
            self.booking_confirmations = v;
        }
        if let Some(v) = update.reminder_notifications {
            self.reminder_notifications = v;
        }
        if let Some(v) = update.reminder_hours_before {
            self.reminder_hours_before = v;
        }
    }
}

/// A partial update to `CustomerPreferences`.
///
/// Absent fields leave the stored value untouched (shallow merge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesUpdate {
    /// New party size.
    pub preferred_party_size: Option<u32>,

    /// Replacement cuisine list.
    pub preferred_cuisine_types: Option<Vec<String>>,

    /// Replacement dietary-restriction list.
    pub dietary_restrictions: Option<Vec<String>>,

    /// Replacement weekly availability.
    pub weekly_availability: Option<Vec<DayAvailability>>,

    /// New booking lead time in days.
    pub preferred_booking_lead_time_days: Option<u32>,

    /// Replacement city list.
    pub preferred_cities: Option<Vec<String>>,

    /// New maximum travel distance in miles.
    pub max_travel_distance_miles: Option<f64>,

    /// Replacement provider list.
    pub preferred_providers: Option<Vec<String>>,

    /// New deposit acceptance flag.
    pub accepts_deposits: Option<bool>,

    /// New minimum cancellation window in hours.
    pub min_cancellation_window_hours: Option<u32>,

    /// New booking-confirmation flag.
    pub booking_confirmations: Option<bool>,

    /// New reminder flag.
    pub reminder_notifications: Option<bool>,

    /// New reminder lead time in hours.
    pub reminder_hours_before: Option<u32>,
}

/// The default week: every day available, evening windows per day.
fn default_weekly_availability() -> Vec<DayAvailability> {
    fn window(start: u16, end: u16) -> Vec<TimeRange> {
        vec![TimeRange {
            start_time: ClockTime::from_minutes(start),
            end_time: ClockTime::from_minutes(end),
        }]
    }

    let six_pm = 18 * 60;
    let five_pm = 17 * 60;
    let nine_pm = 21 * 60;
    let ten_pm = 22 * 60;

    vec![
        DayAvailability {
            day: Weekday::Monday,
            available: true,
            preferred_times: window(six_pm, nine_pm),
        },
        DayAvailability {
            day: Weekday::Tuesday,
            available: true,
            preferred_times: window(six_pm, nine_pm),
        },
        DayAvailability {
            day: Weekday::Wednesday,
            available: true,
            preferred_times: window(six_pm, nine_pm),
        },
        DayAvailability {
            day: Weekday::Thursday,
            available: true,
            preferred_times: window(six_pm, nine_pm),
        },
        DayAvailability {
            day: Weekday::Friday,
            available: true,
            preferred_times: window(six_pm, ten_pm),
        },
        DayAvailability {
            day: Weekday::Saturday,
            available: true,
            preferred_times: window(five_pm, ten_pm),
        },
        DayAvailability {
            day: Weekday::Sunday,
            available: true,
            preferred_times: window(five_pm, nine_pm),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user_123").unwrap()
    }

    #[test]
    fn defaults_match_documented_week() {
        let prefs = CustomerPreferences::with_defaults(user());
        assert_eq!(prefs.weekly_availability.len(), 7);
        assert!(prefs.weekly_availability.iter().all(|d| d.available));

        let friday = prefs.availability_for(Weekday::Friday).unwrap();
        assert_eq!(friday.preferred_times.len(), 1);
        assert_eq!(friday.preferred_times[0].start_time.to_string(), "18:00");
        assert_eq!(friday.preferred_times[0].end_time.to_string(), "22:00");

        let sunday = prefs.availability_for(Weekday::Sunday).unwrap();
        assert_eq!(sunday.preferred_times[0].start_time.to_string(), "17:00");
        assert_eq!(sunday.preferred_times[0].end_time.to_string(), "21:00");
    }

    #[test]
    fn defaults_match_documented_scalars() {
        let prefs = CustomerPreferences::with_defaults(user());
        assert_eq!(prefs.preferred_party_size, 2);
        assert_eq!(prefs.preferred_booking_lead_time_days, 3);
        assert!((prefs.max_travel_distance_miles - 25.0).abs() < f64::EPSILON);
        assert_eq!(prefs.preferred_providers, vec!["opentable".to_string()]);
        assert!(prefs.accepts_deposits);
        assert_eq!(prefs.min_cancellation_window_hours, 2);
        assert!(prefs.booking_confirmations);
        assert!(prefs.reminder_notifications);
        assert_eq!(prefs.reminder_hours_before, 2);
        assert_eq!(prefs.created_at, prefs.updated_at);
    }

    #[test]
    fn allows_respects_availability_flag() {
        let prefs = CustomerPreferences::with_defaults(user());
        let monday = prefs.availability_for(Weekday::Monday).unwrap();
        let half_past_six: ClockTime = "18:30".parse().unwrap();
        assert!(monday.allows(half_past_six));

        let mut closed = monday.clone();
        closed.available = false;
        assert!(!closed.allows(half_past_six));
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut prefs = CustomerPreferences::with_defaults(user());
        let update = PreferencesUpdate {
            preferred_party_size: Some(4),
            preferred_cuisine_types: Some(vec!["sushi".to_string()]),
            ..PreferencesUpdate::default()
        };
        prefs.apply(update);
        assert_eq!(prefs.preferred_party_size, 4);
        assert_eq!(prefs.preferred_cuisine_types, vec!["sushi".to_string()]);
        // Untouched fields keep their defaults.
        assert_eq!(prefs.preferred_providers, vec!["opentable".to_string()]);
        assert!(prefs.accepts_deposits);
    }

    #[test]
    fn update_deserializes_from_sparse_json() {
        let update: PreferencesUpdate =
            serde_json::from_str(r#"{"accepts_deposits": false}"#).unwrap();
        assert_eq!(update.accepts_deposits, Some(false));
        assert!(update.preferred_party_size.is_none());
    }
}
