//! Voice call session state machine.
//!
//! A `VoiceSession` owns one connection to the external voice assistant for
//! the lifetime of a view. It is explicitly constructed, explicitly
//! disposable, and never shared: dropping the session stops any live call
//! and releases the observer, so no subscription outlives the view that
//! created it.

use std::sync::Arc;

use routed_core::{ArchivedOfferResponse, AssistantMessage, UserId};
use routed_store::PreferenceStore;

use crate::config::VoiceConfig;
use crate::error::VoiceError;

/// Call lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call in progress.
    Idle,

    /// Start requested; waiting for confirmation from the service.
    Connecting,

    /// Call confirmed and live.
    Active,
}

/// An event from the external voice transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The service confirmed the call.
    CallStarted,

    /// The call ended.
    CallEnded,

    /// A structured message arrived.
    Message(serde_json::Value),

    /// The transport failed.
    Error(String),
}

/// An event surfaced to the session observer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The call went live.
    CallStarted,

    /// The call ended.
    CallEnded,

    /// A booking offer arrived and was archived.
    OfferReceived(ArchivedOfferResponse),

    /// A structured message arrived but did not decode; nothing was
    /// archived.
    RejectedMessage {
        /// Why the payload was rejected.
        reason: String,
    },

    /// The session failed; the call is no longer live.
    Failed {
        /// Generic, user-presentable description.
        message: String,
    },
}

/// The external voice client, reduced to the two requests the bridge issues.
///
/// The real transport (audio pipeline, WebRTC, event delivery) belongs to
/// the external SDK; implementations forward its events into
/// [`VoiceSession::handle_event`].
pub trait VoiceTransport: Send + Sync {
    /// Ask the service to start a call with the given assistant.
    ///
    /// # Errors
    ///
    /// Returns an error if the start request cannot be issued.
    fn start(&self, assistant_id: &str) -> Result<(), VoiceError>;

    /// Ask the service to stop the current call.
    ///
    /// # Errors
    ///
    /// Returns an error if the stop request cannot be issued.
    fn stop(&self) -> Result<(), VoiceError>;
}

/// Observer callback for session events.
pub type Observer = Box<dyn FnMut(SessionEvent) + Send>;

/// A single voice-assistant call session.
pub struct VoiceSession {
    transport: Arc<dyn VoiceTransport>,
    store: Arc<dyn PreferenceStore>,
    config: VoiceConfig,
    user_id: UserId,
    state: CallState,
    observer: Option<Observer>,
}

impl VoiceSession {
    /// Create an idle session for one user.
    #[must_use]
    pub fn new(
        transport: Arc<dyn VoiceTransport>,
        store: Arc<dyn PreferenceStore>,
        config: VoiceConfig,
        user_id: UserId,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            user_id,
            state: CallState::Idle,
            observer: None,
        }
    }

    /// Current call state.
    #[must_use]
    pub fn state(&self) -> CallState {
        self.state
    }

    /// Register the observer; replaces any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(SessionEvent) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Drop the observer without touching the call.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Start a call.
    ///
    /// Valid only from `Idle`. Missing secrets fail fast with no state
    /// change; a transport failure likewise leaves the session idle.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::InvalidState` when a call is already in
    /// progress, `VoiceError::Configuration` when a secret is missing, or
    /// the transport error when the start request cannot be issued.
    pub fn start_call(&mut self) -> Result<(), VoiceError> {
        if self.state != CallState::Idle {
            return Err(VoiceError::InvalidState(format!(
                "cannot start a call while {:?}",
                self.state
            )));
        }

        let credentials = self.config.credentials()?;
        self.transport.start(credentials.assistant_id)?;
        self.state = CallState::Connecting;
        tracing::info!(user_id = %self.user_id, "voice call start requested");
        Ok(())
    }

    /// End the current call.
    ///
    /// Valid from `Active` or `Connecting`. The session returns to `Idle`
    /// even if the stop request fails.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError::InvalidState` when no call is in progress, or
    /// the transport error when the stop request fails.
    pub fn end_call(&mut self) -> Result<(), VoiceError> {
        if self.state == CallState::Idle {
            return Err(VoiceError::InvalidState(
                "no call in progress".to_string(),
            ));
        }

        let result = self.transport.stop();
        self.state = CallState::Idle;
        tracing::info!(user_id = %self.user_id, "voice call ended");
        result
    }

    /// Feed one transport event through the state machine.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CallStarted => {
                if self.state == CallState::Connecting {
                    self.state = CallState::Active;
                    self.notify(SessionEvent::CallStarted);
                } else {
                    tracing::warn!(state = ?self.state, "unexpected call-start confirmation");
                }
            }
            TransportEvent::CallEnded => {
                self.state = CallState::Idle;
                self.notify(SessionEvent::CallEnded);
            }
            TransportEvent::Error(detail) => {
                tracing::error!(user_id = %self.user_id, error = %detail, "voice transport error");
                self.state = CallState::Idle;
                self.notify(SessionEvent::Failed {
                    message: "voice session error".to_string(),
                });
            }
            TransportEvent::Message(payload) => {
                if self.state != CallState::Active {
                    tracing::warn!(state = ?self.state, "discarding message outside active call");
                    return;
                }
                self.handle_message(payload);
            }
        }
    }

    /// Explicit teardown: stop any live call and release the observer.
    pub fn close(&mut self) {
        if self.state != CallState::Idle {
            if let Err(error) = self.transport.stop() {
                tracing::warn!(%error, "stop on teardown failed");
            }
            self.state = CallState::Idle;
        }
        self.observer = None;
    }

    fn handle_message(&mut self, payload: serde_json::Value) {
        match AssistantMessage::decode(payload) {
            Ok(AssistantMessage::OfferOptions(offer)) => {
                let archived = match self
                    .store
                    .save_offer_response(&self.user_id, offer.clone())
                {
                    Ok(archived) => archived,
                    Err(error) => {
                        // The offer still reaches the observer; only the
                        // archive write was lost.
                        tracing::warn!(user_id = %self.user_id, %error, "failed to archive offer response");
                        ArchivedOfferResponse::new(offer)
                    }
                };
                self.notify(SessionEvent::OfferReceived(archived));
            }
            Err(error) => {
                tracing::warn!(user_id = %self.user_id, %error, "rejected assistant message");
                self.notify(SessionEvent::RejectedMessage {
                    reason: error.to_string(),
                });
            }
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(event);
        }
    }
}

impl Drop for VoiceSession {
    fn drop(&mut self) {
        self.close();
    }
}
