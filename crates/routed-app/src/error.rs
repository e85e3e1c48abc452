//! Application error types.
//!
//! Every failure is confined to the command that triggered it; nothing here
//! is fatal to the process.

use routed_client::ActionKind;

/// Errors surfaced to the user by application commands.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A route needs at least two stops.
    #[error("add at least two stops to create a route ({have} so far)")]
    NotEnoughStops {
        /// How many stops are currently in the plan.
        have: usize,
    },

    /// A reservation batch needs at least one candidate.
    #[error("no candidates to reserve; run a route search first")]
    NoCandidates,

    /// A request of this kind is already outstanding.
    #[error("a {0} request is already in progress")]
    RequestInFlight(ActionKind),

    /// The planner is not configured.
    #[error("itinerary planner is not configured (set GEMINI_API_KEY)")]
    PlannerUnavailable,

    /// User input could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A storage operation failed.
    #[error(transparent)]
    Store(#[from] routed_store::StoreError),

    /// An external call failed.
    #[error(transparent)]
    Client(#[from] routed_client::ClientError),

    /// An identifier failed validation.
    #[error(transparent)]
    Id(#[from] routed_core::IdError),
}
