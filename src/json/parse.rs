//! Purpose: Provide the internal runtime JSON decode and encode entrypoints.
//! Exports: `from_str`, `from_slice`, `to_string`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Swapping the underlying parser touches only this file.
//! Invariants: Error mapping is done by callsites so domain context stays explicit.

use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}

pub(crate) fn to_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
