//! Conversation state management
//!
//! Session list plus the active transcript, with optimistic message
//! handling for the ask/answer exchange.

mod engine;

pub use engine::ConversationEngine;
