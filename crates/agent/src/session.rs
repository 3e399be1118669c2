//! Dialogue session
//!
//! One conversation: current stage, accumulated slots and the append-only
//! message log. A session is mutated by exactly one message at a time; the
//! session store wraps it in a mutex to serialize access per key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use ywait_core::{BotReply, DialogueStage, Error, Message, Result, SlotStore};
use ywait_text_processing::IntentClassifier;

use crate::response::ResponseSynthesizer;
use crate::transition::{transition, Transition};

/// Read-only view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub key: String,
    pub stage: DialogueStage,
    pub slots: SlotStore,
    pub message_count: usize,
    pub turn_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Conversation state for one session key
#[derive(Debug)]
pub struct DialogueSession {
    key: String,
    stage: DialogueStage,
    slots: SlotStore,
    messages: Vec<Message>,
    greeting: Option<BotReply>,
    turn_count: usize,
    classifier: Arc<IntentClassifier>,
    synthesizer: ResponseSynthesizer,
    created_at: DateTime<Utc>,
}

impl DialogueSession {
    pub fn new(
        key: impl Into<String>,
        classifier: Arc<IntentClassifier>,
        synthesizer: ResponseSynthesizer,
    ) -> Self {
        Self {
            key: key.into(),
            stage: DialogueStage::default(),
            slots: SlotStore::new(),
            messages: Vec::new(),
            greeting: None,
            turn_count: 0,
            classifier,
            synthesizer,
            created_at: Utc::now(),
        }
    }

    /// Session with its own classifier and an optional fixed seed
    pub fn standalone(key: impl Into<String>, seed: Option<u64>) -> Self {
        Self::new(
            key,
            Arc::new(IntentClassifier::new()),
            ResponseSynthesizer::new(seed),
        )
    }

    /// Open the log with the personalised welcome.
    ///
    /// Idempotent: a session greets once and returns the same greeting after.
    pub fn greet(&mut self, user_name: &str, brand: &str) -> BotReply {
        if let Some(greeting) = &self.greeting {
            return greeting.clone();
        }
        let reply = self.synthesizer.greeting(user_name, brand);
        self.messages.push(Message::bot(&reply));
        self.greeting = Some(reply.clone());
        reply
    }

    /// Process one user message and return the bot's reply.
    ///
    /// Empty or whitespace-only text is rejected without touching the session.
    pub fn submit(&mut self, text: &str) -> Result<BotReply> {
        if text.trim().is_empty() {
            tracing::warn!(session = %self.key, stage = %self.stage, "Rejected empty message");
            return Err(Error::EmptyInput);
        }

        self.messages.push(Message::user(text));

        let Transition {
            from,
            to,
            slots,
            reply,
            ..
        } = transition(
            self.stage,
            &self.slots,
            text,
            &self.classifier,
            &mut self.synthesizer,
        );

        self.stage = to;
        self.slots = slots;
        self.turn_count += 1;
        self.messages.push(Message::bot(&reply));

        tracing::debug!(
            session = %self.key,
            from = %from,
            to = %to,
            turn = self.turn_count,
            "Processed message"
        );

        Ok(reply)
    }

    /// Back to `greeting` with empty slots; the log is kept
    pub fn reset(&mut self) {
        self.stage = DialogueStage::Greeting;
        self.slots.clear();
        tracing::info!(session = %self.key, "Session reset");
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn stage(&self) -> DialogueStage {
        self.stage
    }

    pub fn slots(&self) -> &SlotStore {
        &self.slots
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn greeting(&self) -> Option<&BotReply> {
        self.greeting.as_ref()
    }

    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            key: self.key.clone(),
            stage: self.stage,
            slots: self.slots.clone(),
            message_count: self.messages.len(),
            turn_count: self.turn_count,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ywait_core::{Sender, SlotKey};

    #[test]
    fn test_empty_input_leaves_session_untouched() {
        let mut session = DialogueSession::standalone("u1", Some(1));
        session.submit("Check wait times").unwrap();

        for text in ["", "   ", "\n\t"] {
            assert_eq!(session.submit(text), Err(Error::EmptyInput));
        }
        assert_eq!(session.stage(), DialogueStage::WaitTime);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.turn_count(), 1);
    }

    #[test]
    fn test_log_alternates_user_and_bot() {
        let mut session = DialogueSession::standalone("u1", Some(1));
        session.submit("Schedule appointment").unwrap();
        session.submit("Account Services").unwrap();

        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot]
        );
        assert_eq!(session.messages()[2].content, "Account Services");
        assert!(!session.messages()[3].options.is_empty());
    }

    #[test]
    fn test_greet_once() {
        let mut session = DialogueSession::standalone("u1", None);
        let first = session.greet("Sam", "Y-Wait Banking");
        let second = session.greet("Someone Else", "Other Bank");
        assert_eq!(first, second);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.greeting(), Some(&first));
    }

    #[test]
    fn test_reset_keeps_log() {
        let mut session = DialogueSession::standalone("u1", Some(3));
        session.submit("Join virtual queue").unwrap();
        session.submit("Card Services").unwrap();
        assert_eq!(session.slots().get(SlotKey::Service), Some("Card Services"));

        session.reset();
        assert_eq!(session.stage(), DialogueStage::Greeting);
        assert!(session.slots().is_empty());
        assert_eq!(session.messages().len(), 4);
    }

    #[test]
    fn test_snapshot() {
        let mut session = DialogueSession::standalone("u9", Some(3));
        session.submit("learn").unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.key, "u9");
        assert_eq!(snap.stage, DialogueStage::Completed);
        assert_eq!(snap.message_count, 2);
        assert_eq!(snap.turn_count, 1);
    }
}
