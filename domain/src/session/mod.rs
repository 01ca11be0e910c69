//! Conversation messages exchanged with the completion service

pub mod entities;

pub use entities::{Message, Role};
