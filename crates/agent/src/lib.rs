//! Dialogue engine for the Y-Wait banking assistant
//!
//! Features:
//! - Flat, table-driven stage transitions (`transition`)
//! - Templated replies with seedable mock values (`response`)
//! - Per-key conversation state with an append-only log (`session`)

pub mod response;
pub mod session;
pub mod transition;

pub use response::ResponseSynthesizer;
pub use session::{DialogueSession, SessionSnapshot};
pub use transition::{transition, Transition, TransitionReason};

// Re-export intent types so transports need only this crate
pub use ywait_text_processing::{ConfirmationChoice, Intent, IntentClassifier};
