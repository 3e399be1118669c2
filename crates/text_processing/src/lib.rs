//! Text processing for the Y-Wait banking assistant
//!
//! Currently a single capability:
//! - **Intent Classification**: ordered keyword rules for the open-ended
//!   dialogue stages, plus the confirmation-prompt reply rules

pub mod intent;

pub use intent::{ConfirmationChoice, Intent, IntentClassifier, KeywordRule, RuleSet};
