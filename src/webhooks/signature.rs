//! Interaction signature verification using Ed25519.
//!
//! The chat platform signs every interaction request with the application's
//! key pair. The request carries two headers:
//!
//! - `X-Signature-Ed25519`: hex-encoded 64-byte signature
//! - `X-Signature-Timestamp`: the timestamp that was signed
//!
//! The signed message is `timestamp || body`. Verification is the first step
//! in interaction processing; requests with invalid signatures are rejected
//! before parsing.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
#[cfg(test)]
use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;

/// Errors from signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The configured public key is not a valid hex Ed25519 key.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// The signature header is not 64 hex-encoded bytes.
    #[error("malformed signature header")]
    MalformedSignature,

    /// The signature does not match the payload.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verifies interaction requests against the application public key.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    pub fn new(key: VerifyingKey) -> Self {
        InteractionVerifier { key }
    }

    /// Parses a hex-encoded 32-byte public key.
    pub fn from_hex(public_key: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            SignatureError::InvalidKey(format!("expected 32 bytes, got {}", b.len()))
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(InteractionVerifier { key })
    }

    /// Verifies `signature_hex` over `timestamp || body`.
    pub fn verify(
        &self,
        timestamp: &str,
        body: &[u8],
        signature_hex: &str,
    ) -> Result<(), SignatureError> {
        let signature = parse_signature_header(signature_hex)?;
        let message = signed_message(timestamp, body);
        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}

/// Decodes a hex signature header. Never panics.
pub fn parse_signature_header(header: &str) -> Result<Signature, SignatureError> {
    let bytes = hex::decode(header.trim()).map_err(|_| SignatureError::MalformedSignature)?;
    Signature::from_slice(&bytes).map_err(|_| SignatureError::MalformedSignature)
}

/// Signs `timestamp || body` and returns the hex header value.
#[cfg(test)]
pub(crate) fn sign_interaction(key: &SigningKey, timestamp: &str, body: &[u8]) -> String {
    let signature = key.sign(&signed_message(timestamp, body));
    hex::encode(signature.to_bytes())
}

fn signed_message(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);
    message
}
