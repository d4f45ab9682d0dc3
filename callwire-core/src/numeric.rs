//! Decimal-string encoding for 32-bit wire integers
//!
//! SSRCs, ICE priorities and generation counters can exceed the range a
//! double-based JSON implementation represents exactly, so peers exchange them
//! as decimal strings. Smaller bounded values (ids, ports, counts) stay native
//! JSON numbers.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serializer};

/// Render `value` in decimal with no sign and no leading zeros
#[must_use]
pub fn encode_u32(value: u32) -> String {
    value.to_string()
}

/// Parse a decimal string, yielding `0` for anything that is not a plain run
/// of ASCII digits fitting in a `u32`
///
/// The decode never fails. Callers that must tell "invalid" apart from a
/// literal zero check for zero themselves.
#[must_use]
pub fn decode_u32(text: &str) -> u32 {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

/// Serde adapter carrying a single `u32` as a decimal string
///
/// A non-string wire value is a type error; a string that does not decode
/// becomes `0`.
pub mod decimal {
    use super::*;

    /// Serialize as a decimal string
    pub fn serialize<S>(value: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_u32(*value))
    }

    /// Deserialize from a decimal string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Ok(decode_u32(&text))
    }
}

/// Serde adapter for SSRC lists: an array of decimal strings, none of which
/// may decode to zero
pub mod nonzero_decimal_seq {
    use super::*;

    /// Serialize as an array of decimal strings
    pub fn serialize<S>(values: &[u32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|value| encode_u32(*value)))
    }

    /// Deserialize, rejecting the whole list on the first zero entry
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let texts = Vec::<String>::deserialize(deserializer)?;
        texts
            .iter()
            .map(|text| match decode_u32(text) {
                0 => Err(de::Error::invalid_value(
                    Unexpected::Str(text),
                    &"a nonzero decimal SSRC",
                )),
                value => Ok(value),
            })
            .collect()
    }
}
