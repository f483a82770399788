// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC-SHA256 signing over `header.payload`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::codec::encode_segment;
use crate::config::ConfigError;

type HmacSha256 = Hmac<Sha256>;

/// Symmetric signer keyed with the server secret.
///
/// The key is installed once; every call to [`Signer::sign`] works on a
/// clone of the keyed MAC state.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Key a signer with `secret`. A blank secret is rejected.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ConfigError::InvalidSecret(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Sign `message`, returning the base64url-unpadded digest.
    pub fn sign(&self, message: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(message.as_bytes());
        encode_segment(&mac.finalize().into_bytes())
    }

    /// Check `signature` against a fresh signature of `message`.
    ///
    /// Compares the encoded forms in constant time, so a tampered signature
    /// is a mismatch even when it is not valid base64.
    pub fn verify(&self, message: &str, signature: &str) -> bool {
        let expected = self.sign(message);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}
