//! Binary-to-text encoding used uniformly across the wallet surface.
//!
//! Every byte payload the wallet hands to a page (message bytes, signatures,
//! transaction bytes) is base64. Mixing encodings across methods is a defect
//! class this module exists to prevent: all call sites go through here.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};

/// Encode bytes for the wallet's external surface.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a payload previously produced by [`encode`].
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(s)
}

/// Serde adapter serializing `Vec<u8>` fields as base64 strings on the wire.
pub mod base64_bytes {
    use super::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
