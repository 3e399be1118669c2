//! Intent classification for the banking assistant
//!
//! Free-form intent recognition happens only at the two open-ended decision
//! points of the dialogue: the opening `greeting` stage and the re-entrant
//! `completed` hub. Every other stage reads the user's text positionally.
//!
//! Classification is case-insensitive substring matching against ordered
//! keyword rules. The first rule that matches wins; no rule matching yields
//! `None`, which callers answer with a fallback menu.
//!
//! # Example
//!
//! ```
//! use ywait_text_processing::intent::{Intent, IntentClassifier};
//!
//! let classifier = IntentClassifier::new();
//! assert_eq!(
//!     classifier.classify_greeting("Book an appointment"),
//!     Some(Intent::BookAppointment)
//! );
//! assert_eq!(classifier.classify_greeting("hello"), None);
//! ```

mod rules;

pub use rules::{fold, KeywordRule, Matcher, RuleSet};

use std::fmt;
use ywait_core::DialogueStage;

/// Coarse user intent recognised in `greeting` and `completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    BookAppointment,
    CheckWaitTimes,
    JoinQueue,
    ViewQueuePosition,
    LearnServices,
    /// Asks which queue to leave
    LeaveQueue,
    LeaveAccountServicesQueue,
    LeaveLoanInquiryQueue,
    SmsNotifications,
    AddToCalendar,
    PersonalBanking,
    MortgageServices,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BookAppointment => "book_appointment",
            Intent::CheckWaitTimes => "check_wait_times",
            Intent::JoinQueue => "join_queue",
            Intent::ViewQueuePosition => "view_queue_position",
            Intent::LearnServices => "learn_services",
            Intent::LeaveQueue => "leave_queue",
            Intent::LeaveAccountServicesQueue => "leave_account_services_queue",
            Intent::LeaveLoanInquiryQueue => "leave_loan_inquiry_queue",
            Intent::SmsNotifications => "sms_notifications",
            Intent::AddToCalendar => "add_to_calendar",
            Intent::PersonalBanking => "personal_banking",
            Intent::MortgageServices => "mortgage_services",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the user answered a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationChoice {
    /// Join the queue / confirm the appointment
    Accept,
    /// Queue only: schedule an appointment for later instead
    Defer,
    /// Appointment only: start over with different details
    Amend,
    /// Anything else cancels
    Decline,
}

impl ConfirmationChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationChoice::Accept => "accept",
            ConfirmationChoice::Defer => "defer",
            ConfirmationChoice::Amend => "amend",
            ConfirmationChoice::Decline => "decline",
        }
    }
}

/// Rule order for the opening menu
fn greeting_rules() -> RuleSet<Intent> {
    RuleSet::new("greeting")
        .rule(
            KeywordRule::new("book", Intent::BookAppointment)
                .any(&["schedule", "appointment", "book"]),
        )
        .rule(KeywordRule::new("wait", Intent::CheckWaitTimes).any(&["wait", "time", "check"]))
        // "View my queue position" mentions "queue" too; let it reach the position rule.
        .rule(
            KeywordRule::new("join_queue", Intent::JoinQueue)
                .any(&["queue", "join"])
                .unless(&["position", "my queue", "view queue"]),
        )
        .rule(
            KeywordRule::new("position", Intent::ViewQueuePosition)
                .any(&["position", "my queue", "view queue"]),
        )
        .rule(KeywordRule::new("learn", Intent::LearnServices).any(&["learn", "services"]))
}

/// Rule order for the `completed` hub
fn completed_rules() -> RuleSet<Intent> {
    RuleSet::new("completed")
        // Naming a specific queue goes straight to removal.
        .rule(
            KeywordRule::new("leave_menu", Intent::LeaveQueue)
                .all(&["leave", "queue"])
                .unless(&["leave account", "leave loan"]),
        )
        .rule(
            KeywordRule::new("leave_account", Intent::LeaveAccountServicesQueue)
                .any(&["leave account", "1"]),
        )
        .rule(
            KeywordRule::new("leave_loan", Intent::LeaveLoanInquiryQueue)
                .any(&["leave loan", "2"]),
        )
        .rule(
            KeywordRule::new("sms", Intent::SmsNotifications).any(&["sms", "notification"]),
        )
        .rule(KeywordRule::new("calendar", Intent::AddToCalendar).any(&["calendar", "add"]))
        .rule(KeywordRule::new("join_queue", Intent::JoinQueue).any(&["queue", "join"]))
        .rule(
            KeywordRule::new("book", Intent::BookAppointment).any(&["appointment", "schedule"]),
        )
        .rule(
            KeywordRule::new("personal", Intent::PersonalBanking)
                .any(&["personal", "checking", "savings"]),
        )
        .rule(
            KeywordRule::new("mortgage", Intent::MortgageServices)
                .any(&["mortgage", "home", "loan"]),
        )
}

fn queue_confirmation_rules() -> RuleSet<ConfirmationChoice> {
    RuleSet::new("queue_confirmation")
        .rule(
            KeywordRule::new("join", ConfirmationChoice::Accept)
                .any(&["join", "yes"])
                .exact(&["y"]),
        )
        .rule(KeywordRule::new("later", ConfirmationChoice::Defer).any(&["schedule", "later"]))
}

fn appointment_confirmation_rules() -> RuleSet<ConfirmationChoice> {
    RuleSet::new("appointment_confirmation")
        .rule(
            KeywordRule::new("confirm", ConfirmationChoice::Accept)
                .any(&["confirm", "yes"])
                .exact(&["y"]),
        )
        .rule(KeywordRule::new("change", ConfirmationChoice::Amend).any(&["change", "edit"]))
}

/// Keyword intent classifier
///
/// Holds the compiled rule sets; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    greeting: RuleSet<Intent>,
    completed: RuleSet<Intent>,
    queue_confirmation: RuleSet<ConfirmationChoice>,
    appointment_confirmation: RuleSet<ConfirmationChoice>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            greeting: greeting_rules(),
            completed: completed_rules(),
            queue_confirmation: queue_confirmation_rules(),
            appointment_confirmation: appointment_confirmation_rules(),
        }
    }

    /// Classify text for the given stage.
    ///
    /// Returns `None` for stages that do not use intent recognition.
    pub fn classify(&self, stage: DialogueStage, text: &str) -> Option<Intent> {
        if !stage.uses_intent_classifier() {
            return None;
        }
        let rules = if stage == DialogueStage::Greeting {
            &self.greeting
        } else {
            &self.completed
        };
        Self::run(rules, text)
    }

    pub fn classify_greeting(&self, text: &str) -> Option<Intent> {
        Self::run(&self.greeting, text)
    }

    pub fn classify_completed(&self, text: &str) -> Option<Intent> {
        Self::run(&self.completed, text)
    }

    /// Interpret the answer to "join the virtual queue?"
    pub fn queue_confirmation(&self, text: &str) -> ConfirmationChoice {
        self.queue_confirmation
            .classify(text)
            .unwrap_or(ConfirmationChoice::Decline)
    }

    /// Interpret the answer to "confirm this appointment?"
    pub fn appointment_confirmation(&self, text: &str) -> ConfirmationChoice {
        self.appointment_confirmation
            .classify(text)
            .unwrap_or(ConfirmationChoice::Decline)
    }

    pub fn greeting_rules(&self) -> &RuleSet<Intent> {
        &self.greeting
    }

    pub fn completed_rules(&self) -> &RuleSet<Intent> {
        &self.completed
    }

    fn run(rules: &RuleSet<Intent>, text: &str) -> Option<Intent> {
        let matched = rules.first_match(text);
        tracing::debug!(
            rule_set = rules.name(),
            rule = matched.map(|r| r.name()).unwrap_or("none"),
            "Classified input"
        );
        matched.map(KeywordRule::outcome)
    }
}
