//! Core types for the Y-Wait banking assistant
//!
//! This crate provides the types shared by every other crate:
//! - Dialogue stages
//! - Slot store and purposes
//! - Messages and bot replies
//! - Error types

pub mod conversation;
pub mod error;
pub mod slots;

pub use conversation::{BotReply, DialogueStage, Message, Sender};
pub use error::{Error, Result};
pub use slots::{Purpose, SlotKey, SlotStore};
