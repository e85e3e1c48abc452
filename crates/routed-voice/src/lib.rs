//! Voice-assistant session bridge for Routed.
//!
//! This crate wraps the external voice-assistant client behind a typed
//! session object:
//!
//! - [`VoiceConfig`] loads the two required secrets (public key, assistant
//!   id) from the environment or a secrets file
//! - [`VoiceTransport`] is the seam over the external SDK's transport; the
//!   audio pipeline itself stays outside this crate
//! - [`VoiceSession`] runs the Idle -> Connecting -> Active lifecycle,
//!   archives structured booking offers through the preference store, and
//!   forwards them to an observer callback
//!
//! Sessions are disposable: one per view, torn down on drop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod session;

pub use config::{Credentials, VoiceConfig};
pub use error::VoiceError;
pub use session::{CallState, Observer, SessionEvent, TransportEvent, VoiceSession, VoiceTransport};
