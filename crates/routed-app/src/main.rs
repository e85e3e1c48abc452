//! Routed - interactive route-planning and dining client.
//!
//! Wires configuration, the preference store, and the external clients into
//! a small command loop. Every command maps to one of the UI actions of the
//! original application: managing stops, requesting suggestions, generating
//! itineraries, submitting reservations, and inspecting stored preferences.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod state;
mod views;

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routed_client::{ActionKind, Candidate, Itinerary, ItineraryRequest};
use routed_core::{BookingRecord, BookingStatus};
use routed_store::{preferences_summary, PreferenceStore, RocksStore};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::reservations::{
    build_reservation_request, record_confirmed_bookings, summarize_outcomes, ReservationForm,
};
use crate::views::route_plan::{RoutePlanner, RouteSuggestions};

/// Mutable per-session UI state.
#[derive(Default)]
struct Session {
    route: RoutePlanner,
    last_suggestions: Vec<Candidate>,
    last_itinerary: Option<Itinerary>,
    itinerary_context: Option<(String, String)>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,routed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Routed");

    let config = AppConfig::from_env();
    tracing::info!(
        backend_url = %config.backend_url,
        data_dir = %config.data_dir,
        user_id = %config.user_id,
        planner_configured = %config.planner_api_key.is_some(),
        voice_configured = %config.voice.public_key.is_some(),
        "configuration loaded"
    );

    tracing::info!(path = %config.data_dir, "opening preference store");
    let store: Arc<dyn PreferenceStore> = Arc::new(RocksStore::open(&config.data_dir)?);

    let state = AppState::new(store, config)?;
    let mut session = Session::default();

    println!(
        "routed - backend {} - type 'help' for commands",
        state.config.backend_url
    );
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        if let Err(error) = run_command(&state, &mut session, line).await {
            // Failures are confined to the command that triggered them.
            println!("error: {error}");
        }
    }

    Ok(())
}

async fn run_command(state: &AppState, session: &mut Session, line: &str) -> Result<(), AppError> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "help" => print_help(),
        "stops" => list_stops(session),
        "stop" => stop_command(state, session, rest).await?,
        "type" => session.route.desired_type = non_empty(rest),
        "keyword" => session.route.keyword = non_empty(rest),
        "maxtime" => {
            session.route.time_constraint_minutes = Some(parse_number(rest, "minutes")?);
        }
        "plan" => plan_route(state, session).await?,
        "itinerary" => itinerary_command(state, session, rest).await?,
        "reserve" => reserve(state, session).await?,
        "prefs" => prefs_command(state, rest)?,
        "history" => show_history(state)?,
        "offers" => show_offers(state)?,
        "book" => book_offer(state, rest)?,
        other => {
            return Err(AppError::InvalidInput(format!(
                "unknown command '{other}'; try 'help'"
            )))
        }
    }
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  stop add <place>        geocode a place and append it to the route");
    println!("  stop rm <n>             remove stop n");
    println!("  stops                   list current stops");
    println!("  type <place type>       set the place-type filter");
    println!("  keyword <text>          set the keyword filter");
    println!("  maxtime <minutes>       cap the added detour");
    println!("  plan                    suggest stops along the route");
    println!("  itinerary <hours> <activity> in <location>");
    println!("  itinerary import        geocode the generated stops into the route");
    println!("  itinerary regen <n>     regenerate one generated stop");
    println!("  reserve                 book the suggested stops (interactive)");
    println!("  prefs | prefs set <json partial>");
    println!("  history | offers | book <offer> <option>");
    println!("  quit");
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("expected {what}, got '{value}'")))
}

fn list_stops(session: &Session) {
    if session.route.stops().is_empty() {
        println!("no stops added yet");
        return;
    }
    for (i, stop) in session.route.stops().iter().enumerate() {
        println!("{}. {} ({:.4}, {:.4})", i + 1, stop.name, stop.lat, stop.lng);
    }
}

async fn stop_command(
    state: &AppState,
    session: &mut Session,
    rest: &str,
) -> Result<(), AppError> {
    match rest.split_once(' ').unwrap_or((rest, "")) {
        ("add", place) if !place.trim().is_empty() => {
            let _guard = state
                .inflight
                .begin(ActionKind::Geocode)
                .ok_or(AppError::RequestInFlight(ActionKind::Geocode))?;
            let response = state.api.search_place(place).await?;
            let stop = session.route.add_stop_from_search(&response)?;
            println!("added: {} ({:.4}, {:.4})", stop.name, stop.lat, stop.lng);
            Ok(())
        }
        ("rm", index) => {
            let index: usize = parse_number(index.trim(), "a stop number")?;
            let removed = session
                .route
                .remove_stop(index.checked_sub(1).ok_or_else(|| {
                    AppError::InvalidInput("stop numbers start at 1".to_string())
                })?)?;
            println!("removed: {}", removed.name);
            Ok(())
        }
        _ => Err(AppError::InvalidInput(
            "usage: stop add <place> | stop rm <n>".to_string(),
        )),
    }
}

async fn plan_route(state: &AppState, session: &mut Session) -> Result<(), AppError> {
    let request = session.route.build_request()?;
    let _guard = state
        .inflight
        .begin(ActionKind::SuggestStops)
        .ok_or(AppError::RequestInFlight(ActionKind::SuggestStops))?;

    let response = state.api.suggest_stops(&request).await?;
    session.last_suggestions = response.candidates.clone();

    let view = RouteSuggestions::from_response(&response);
    println!("original route: {} minutes", view.original_minutes);
    if view.candidates.is_empty() {
        println!("no suitable stops found along your route");
        return Ok(());
    }
    for (i, candidate) in view.candidates.iter().enumerate() {
        println!(
            "{}. {} - {} - {} - +{} min ({} min total)",
            i + 1,
            candidate.name,
            candidate.vicinity,
            candidate.rating_label,
            candidate.added_minutes,
            candidate.total_minutes,
        );
        if !candidate.types.is_empty() {
            println!("   types: {}", candidate.types.join(", "));
        }
    }
    Ok(())
}

async fn itinerary_command(
    state: &AppState,
    session: &mut Session,
    rest: &str,
) -> Result<(), AppError> {
    match rest.split_once(' ').unwrap_or((rest, "")) {
        ("import", _) => {
            let itinerary = session
                .last_itinerary
                .clone()
                .ok_or_else(|| AppError::InvalidInput("generate an itinerary first".to_string()))?;
            for stop_name in &itinerary.stops {
                let response = state.api.search_place(stop_name).await?;
                match session.route.add_stop_from_search(&response) {
                    Ok(stop) => println!("added: {}", stop.name),
                    Err(error) => println!("skipped '{stop_name}': {error}"),
                }
            }
            Ok(())
        }
        ("regen", index) => {
            let index: usize = parse_number(index.trim(), "a stop number")?;
            let (activity, location) = session
                .itinerary_context
                .clone()
                .ok_or_else(|| AppError::InvalidInput("generate an itinerary first".to_string()))?;
            let itinerary = session
                .last_itinerary
                .as_mut()
                .ok_or_else(|| AppError::InvalidInput("generate an itinerary first".to_string()))?;
            let slot = index
                .checked_sub(1)
                .filter(|i| *i < itinerary.stops.len())
                .ok_or_else(|| AppError::InvalidInput(format!("no generated stop #{index}")))?;

            let replacement = state.planner()?.regenerate_stop(&activity, &location).await?;
            println!("{} -> {}", itinerary.stops[slot], replacement);
            itinerary.stops[slot] = replacement;
            Ok(())
        }
        _ => generate_itinerary(state, session, rest).await,
    }
}

async fn generate_itinerary(
    state: &AppState,
    session: &mut Session,
    rest: &str,
) -> Result<(), AppError> {
    let (hours, description) = rest.split_once(' ').ok_or_else(usage_itinerary)?;
    let hours: i64 = parse_number(hours, "hours")?;
    let (activity, location) = description
        .split_once(" in ")
        .map(|(a, l)| (a.trim().to_string(), l.trim().to_string()))
        .filter(|(a, l)| !a.is_empty() && !l.is_empty())
        .ok_or_else(usage_itinerary)?;

    let planner = state.planner()?;
    let _guard = state
        .inflight
        .begin(ActionKind::Itinerary)
        .ok_or(AppError::RequestInFlight(ActionKind::Itinerary))?;

    let start = chrono::Utc::now();
    let request = ItineraryRequest {
        activity: activity.clone(),
        location: location.clone(),
        start,
        end: start + chrono::Duration::hours(hours),
    };

    let itinerary = planner.generate_itinerary(&request).await?;
    println!("your {activity} itinerary in {location}:");
    for (i, stop) in itinerary.stops.iter().enumerate() {
        println!("{}. {stop}", i + 1);
    }
    println!(
        "type: {} / keyword: {} / budget: {}h{:02}m",
        itinerary.desired_type,
        itinerary.keyword,
        itinerary.time_constraint_seconds / 3600,
        (itinerary.time_constraint_seconds % 3600) / 60,
    );

    session.last_itinerary = Some(itinerary);
    session.itinerary_context = Some((activity, location));
    Ok(())
}

fn usage_itinerary() -> AppError {
    AppError::InvalidInput("usage: itinerary <hours> <activity> in <location>".to_string())
}

async fn reserve(state: &AppState, session: &mut Session) -> Result<(), AppError> {
    // Blocked before any prompt or network call when there is nothing to
    // reserve.
    if session.last_suggestions.is_empty() {
        return Err(AppError::NoCandidates);
    }

    let form = ReservationForm {
        party_size: parse_number(&prompt("party size")?, "a party size")?,
        date: prompt("date (YYYY-MM-DD)").and_then(|value| {
            value
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("invalid date '{value}'")))
        })?,
        time: prompt("time (e.g. 7:00 PM)")?,
        name: prompt("name")?,
        phone: prompt("phone")?,
        email: prompt("email")?,
    };

    let request = build_reservation_request(&form, &session.last_suggestions)?;
    let _guard = state
        .inflight
        .begin(ActionKind::Reservations)
        .ok_or(AppError::RequestInFlight(ActionKind::Reservations))?;

    let outcomes = state.api.make_reservations(&request).await?;
    for line in summarize_outcomes(&outcomes) {
        println!("{line}");
    }

    let recorded = record_confirmed_bookings(&*state.store, &state.user_id, &form, &outcomes)?;
    if recorded > 0 {
        println!("{recorded} booking(s) added to history");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String, AppError> {
    print!("{label}: ");
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(line.trim().to_string())
}

fn prefs_command(state: &AppState, rest: &str) -> Result<(), AppError> {
    match rest.split_once(' ').unwrap_or((rest, "")) {
        ("set", partial) => {
            let update = serde_json::from_str(partial)
                .map_err(|e| AppError::InvalidInput(format!("bad preferences JSON: {e}")))?;
            match state.store.update_preferences(&state.user_id, update)? {
                Some(prefs) => println!("saved (updated {})", prefs.updated_at),
                None => println!("no preferences yet; run 'prefs' first"),
            }
            Ok(())
        }
        ("", _) => {
            // Created on first access if absent.
            let prefs = match state.store.get_preferences(&state.user_id)? {
                Some(prefs) => prefs,
                None => state.store.create_default_preferences(&state.user_id)?,
            };
            println!(
                "party size {} / providers {} / max distance {} mi",
                prefs.preferred_party_size,
                prefs.preferred_providers.join(", "),
                prefs.max_travel_distance_miles,
            );
            for day in &prefs.weekly_availability {
                let windows: Vec<String> = day
                    .preferred_times
                    .iter()
                    .map(|w| format!("{}-{}", w.start_time, w.end_time))
                    .collect();
                println!(
                    "  {:9} {}",
                    day.day.to_string(),
                    if day.available {
                        windows.join(", ")
                    } else {
                        "unavailable".to_string()
                    }
                );
            }

            let summary = preferences_summary(&*state.store, &state.user_id)?;
            println!(
                "{} booking(s), {} archived offer(s)",
                summary.total_bookings, summary.total_offer_responses
            );
            Ok(())
        }
        _ => Err(AppError::InvalidInput(
            "usage: prefs | prefs set <json partial>".to_string(),
        )),
    }
}

fn show_history(state: &AppState) -> Result<(), AppError> {
    let history = state.store.get_booking_history(&state.user_id)?;
    if history.is_empty() {
        println!("no bookings yet");
        return Ok(());
    }
    for record in &history {
        println!(
            "{} - {} in {} - party of {} at {} ({:?})",
            record.booking_date,
            record.venue.name,
            record.venue.city,
            record.party_size,
            record.selected_option.time_local,
            record.status,
        );
    }
    Ok(())
}

fn show_offers(state: &AppState) -> Result<(), AppError> {
    let offers = state.store.get_offer_responses(&state.user_id)?;
    if offers.is_empty() {
        println!("no archived offers");
        return Ok(());
    }
    for (i, entry) in offers.iter().enumerate() {
        println!(
            "{}. {} in {} on {} - {} option(s), {} alternate(s)",
            i + 1,
            entry.response.venue.name,
            entry.response.venue.city,
            entry.response.date,
            entry.response.options.len(),
            entry.response.alternates.len(),
        );
        for (j, option) in entry.response.options.iter().enumerate() {
            println!(
                "   {}.{} {} via {} {}",
                i + 1,
                j + 1,
                option.time_local,
                option.provider,
                option.table_note,
            );
        }
    }
    Ok(())
}

fn book_offer(state: &AppState, rest: &str) -> Result<(), AppError> {
    let (offer, option) = rest
        .split_once(' ')
        .ok_or_else(|| AppError::InvalidInput("usage: book <offer> <option>".to_string()))?;
    let offer_index: usize = parse_number(offer.trim(), "an offer number")?;
    let option_index: usize = parse_number(option.trim(), "an option number")?;

    let offers = state.store.get_offer_responses(&state.user_id)?;
    let entry = offer_index
        .checked_sub(1)
        .and_then(|i| offers.get(i))
        .ok_or_else(|| AppError::InvalidInput(format!("no archived offer #{offer_index}")))?;

    let record = BookingRecord::from_offer(
        state.user_id.clone(),
        &entry.response,
        option_index.checked_sub(1).ok_or_else(|| {
            AppError::InvalidInput("option numbers start at 1".to_string())
        })?,
        BookingStatus::Confirmed,
    )
    .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    state.store.add_booking_to_history(&record)?;
    println!(
        "booked {} on {} at {}",
        record.venue.name, record.booking_date, record.selected_option.time_local
    );
    Ok(())
}
