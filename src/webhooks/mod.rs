//! Interaction intake for the chat platform.
//!
//! This module provides:
//! - Signature verification for interaction requests (Ed25519)
//! - Parsing of interaction payloads into typed events

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{Interaction, InteractionContext, InteractionMember, TargetMessage};
pub use parser::{ParseError, parse_interaction};
pub use signature::{InteractionVerifier, SignatureError, parse_signature_header};
#[cfg(test)]
pub(crate) use signature::sign_interaction;
