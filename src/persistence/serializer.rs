// Copyright 2025 Cowboy AI, LLC.

//! Byte encodings used by the in-memory store

use crate::errors::BoxError;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

/// Converts values to and from bytes
///
/// When used for identifiers the encoding must be injective: two distinct
/// identifiers must never produce the same bytes, or they alias in the store.
pub trait Serializer<T>: Send + Sync {
    /// Encode a value
    fn serialize(&self, value: &T) -> Result<Vec<u8>, BoxError>;

    /// Decode a value
    fn deserialize(&self, bytes: &[u8]) -> Result<T, BoxError>;
}

/// JSON encoding through serde
#[derive(Debug)]
pub struct JsonSerializer<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonSerializer<T> {
    /// Create a new JSON serializer
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonSerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Serializer<T> for JsonSerializer<T>
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Raw UTF-8 encoding for string-like identifiers
#[derive(Debug)]
pub struct Utf8KeySerializer<K> {
    _phantom: PhantomData<fn() -> K>,
}

impl<K> Utf8KeySerializer<K> {
    /// Create a new UTF-8 key serializer
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<K> Default for Utf8KeySerializer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Serializer<K> for Utf8KeySerializer<K>
where
    K: AsRef<str> + From<String>,
{
    fn serialize(&self, value: &K) -> Result<Vec<u8>, BoxError> {
        Ok(value.as_ref().as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<K, BoxError> {
        Ok(K::from(String::from_utf8(bytes.to_vec())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: u32,
        label: String,
    }

    #[test]
    fn test_json_serializer() {
        let serializer = JsonSerializer::<Sample>::new();
        let sample = Sample {
            id: 3,
            label: "three".to_string(),
        };

        let bytes = serializer.serialize(&sample).unwrap();
        assert_eq!(bytes, br#"{"id":3,"label":"three"}"#.to_vec());
        assert_eq!(serializer.deserialize(&bytes).unwrap(), sample);
    }

    #[test]
    fn test_json_serializer_rejects_garbage() {
        let serializer = JsonSerializer::<Sample>::new();
        let err = serializer.deserialize(b"{ not json").unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn test_utf8_key_serializer() {
        let serializer = Utf8KeySerializer::<String>::new();
        assert_eq!(serializer.serialize(&"10".to_string()).unwrap(), b"10".to_vec());
        assert_eq!(serializer.deserialize(b"10").unwrap(), "10");
        assert!(serializer.deserialize(&[0xff, 0xfe]).is_err());
    }
}
