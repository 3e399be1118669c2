//! Conversation types including stages, messages and replies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dialogue stages for the banking assistant flow
///
/// `Completed` is a re-entrant hub rather than an exit: every finished task
/// lands there and the next message may start another flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    /// Top-level menu, free-form intent recognition
    #[default]
    Greeting,
    /// Waiting for the service name
    Service,
    /// Waiting for the branch name
    Branch,
    /// Waiting for the appointment date
    Date,
    /// Waiting for the appointment time
    Time,
    /// Waiting for confirm / change / cancel
    Confirmation,
    /// Waiting for the branch whose wait time is requested
    #[serde(rename = "waittime")]
    WaitTime,
    /// Task finished, free-form follow-ups
    Completed,
}

impl DialogueStage {
    /// All stages, in declaration order
    pub const ALL: [DialogueStage; 8] = [
        DialogueStage::Greeting,
        DialogueStage::Service,
        DialogueStage::Branch,
        DialogueStage::Date,
        DialogueStage::Time,
        DialogueStage::Confirmation,
        DialogueStage::WaitTime,
        DialogueStage::Completed,
    ];

    /// Wire name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueStage::Greeting => "greeting",
            DialogueStage::Service => "service",
            DialogueStage::Branch => "branch",
            DialogueStage::Date => "date",
            DialogueStage::Time => "time",
            DialogueStage::Confirmation => "confirmation",
            DialogueStage::WaitTime => "waittime",
            DialogueStage::Completed => "completed",
        }
    }

    /// Whether this stage interprets input through the intent classifier.
    ///
    /// The remaining stages take the raw text positionally as the answer to
    /// the question they asked.
    pub fn uses_intent_classifier(&self) -> bool {
        matches!(self, DialogueStage::Greeting | DialogueStage::Completed)
    }

    /// Stages reachable in a single turn from this one
    pub fn valid_transitions(&self) -> &'static [DialogueStage] {
        use DialogueStage::*;
        match self {
            Greeting => &[Service, WaitTime, Completed, Greeting],
            Service => &[Branch],
            Branch => &[Confirmation, Date],
            Date => &[Time],
            Time => &[Confirmation],
            Confirmation => &[Completed, Date, Service, Greeting],
            WaitTime => &[Completed],
            Completed => &[Completed, Service],
        }
    }

    /// Check if a transition to the target stage is allowed
    pub fn can_transition_to(&self, target: DialogueStage) -> bool {
        self.valid_transitions().contains(&target)
    }
}

impl std::fmt::Display for DialogueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author of a message in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The bot's answer to one user message.
///
/// `options` are quick replies: choosing one resubmits its exact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl BotReply {
    /// Reply without quick-reply options
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// Reply with quick-reply options
    pub fn with_options<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the reply offers the given option verbatim
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// A single entry in the append-only message log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            options: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a bot message from a reply
    pub fn bot(reply: &BotReply) -> Self {
        Self {
            sender: Sender::Bot,
            content: reply.text.clone(),
            options: reply.options.clone(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(DialogueStage::WaitTime.to_string(), "waittime");
        assert_eq!(
            serde_json::to_string(&DialogueStage::WaitTime).unwrap(),
            "\"waittime\""
        );
        assert_eq!(
            serde_json::from_str::<DialogueStage>("\"confirmation\"").unwrap(),
            DialogueStage::Confirmation
        );
    }

    #[test]
    fn test_unknown_stage_fails_loudly() {
        assert!(serde_json::from_str::<DialogueStage>("\"alternatives\"").is_err());
    }

    #[test]
    fn test_stage_transitions() {
        let stage = DialogueStage::Greeting;
        assert!(stage.can_transition_to(DialogueStage::Service));
        assert!(stage.can_transition_to(DialogueStage::WaitTime));
        assert!(!stage.can_transition_to(DialogueStage::Time));
        assert!(DialogueStage::Completed.can_transition_to(DialogueStage::Completed));
    }

    #[test]
    fn test_classifier_stages() {
        let classified: Vec<_> = DialogueStage::ALL
            .iter()
            .filter(|s| s.uses_intent_classifier())
            .collect();
        assert_eq!(
            classified,
            vec![&DialogueStage::Greeting, &DialogueStage::Completed]
        );
    }

    #[test]
    fn test_message_from_reply() {
        let reply = BotReply::with_options("Pick one", ["A", "B"]);
        let msg = Message::bot(&reply);
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.options, vec!["A", "B"]);
        assert!(reply.offers("B"));
        assert!(!reply.offers("b"));

        let user = Message::user("hello");
        assert_eq!(user.sender, Sender::User);
        assert!(user.options.is_empty());
    }
}
