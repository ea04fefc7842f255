//! Ed25519 webhook signature verification.
//!
//! Discord signs every webhook delivery over `timestamp + body` with the
//! application's Ed25519 key and sends the hex signature and timestamp in
//! request headers. A clean mismatch and a malformed input are reported as
//! distinct errors so the router can log them apart.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::{AppError, Result};

/// Verifier bound to one application's public key.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    /// Build a verifier from a hex-encoded Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SignatureVerification` if the key is not valid
    /// hex or not a valid Ed25519 point.
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes = hex::decode(public_key)
            .map_err(|err| AppError::SignatureVerification(format!("public key hex: {err}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AppError::SignatureVerification("public key must be 32 bytes".into()))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|err| AppError::SignatureVerification(format!("public key: {err}")))?;
        Ok(Self { key })
    }

    /// Verify a request signature over `timestamp + body`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SignatureVerification` if the signature is not
    /// decodable, and `AppError::InvalidSignature` if it decodes but does
    /// not match.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> Result<()> {
        let sig_bytes = hex::decode(signature_hex)
            .map_err(|err| AppError::SignatureVerification(format!("signature hex: {err}")))?;
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|err| AppError::SignatureVerification(format!("signature: {err}")))?;

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| AppError::InvalidSignature)
    }
}
