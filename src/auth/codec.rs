// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! URL-safe, unpadded base64 segments for the compact token format.

use base64ct::{Base64UrlUnpadded, Encoding};

use super::token::TokenError;

/// Encode raw bytes as a base64url segment without `=` padding.
pub fn encode_segment(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decode a base64url segment.
///
/// Rejects padding, characters outside the URL-safe alphabet, and
/// non-canonical trailing bits.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    Base64UrlUnpadded::decode_vec(segment).map_err(|_| TokenError::Malformed)
}
