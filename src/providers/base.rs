//! Base provider traits for Quotegen
//!
//! This module defines the boundary to the remote conversational model:
//! a [`Provider`] opens conversations, and a [`Conversation`] is an opaque
//! stateful handle that accepts one turn of text at a time. All dialogue
//! memory lives behind the handle, so callers only ever send the new
//! message of each turn.

use crate::error::Result;
use async_trait::async_trait;

/// A remote conversational model service
///
/// Implementations own the credentials and HTTP plumbing needed to talk
/// to their service and hand out fresh conversation handles on demand.
pub trait Provider: Send + Sync {
    /// Human-readable provider name, used in log and error messages
    fn name(&self) -> &'static str;

    /// The model identifier this provider is configured for
    fn model(&self) -> String;

    /// Begin a fresh conversation with empty history
    ///
    /// # Returns
    ///
    /// An opaque handle that accumulates dialogue state across turns
    fn start_conversation(&self) -> Box<dyn Conversation>;
}

/// An opaque, stateful conversation handle
///
/// Each call to [`Conversation::send_turn`] contributes one user turn and
/// returns the model's reply. The handle remembers prior turns, so callers
/// never resend earlier messages. A failed turn must leave the accumulated
/// history exactly as it was before the call.
#[async_trait]
pub trait Conversation: Send {
    /// Send one turn of text and return the model's reply
    ///
    /// # Arguments
    ///
    /// * `text` - The new message for this turn
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed;
    /// the handle's history is unchanged in that case
    async fn send_turn(&mut self, text: &str) -> Result<String>;
}
