//! Stored tile response records.
//!
//! Map tile hosts rarely grant cross-origin read access, so a fetched tile
//! often arrives as an *opaque* response: the body bytes can be stored and
//! replayed, but status and headers are not available to the caller. The
//! cache treats both shapes as first-class values and carries the tag
//! end-to-end, so a replayed opaque response stays opaque.

use serde::{Deserialize, Serialize};

use super::traits::CacheError;

/// A tile response as stored in and served from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileResponse {
    /// A same-origin or CORS-readable response with inspectable metadata.
    Readable {
        /// HTTP status code.
        status: u16,
        /// Content-Type header, when the origin supplied one.
        content_type: Option<String>,
        /// Response body bytes.
        body: Vec<u8>,
    },

    /// A cross-origin response fetched in no-cors mode.
    ///
    /// Status and headers are unreadable; only the body bytes are carried,
    /// and they are valid to display and to cache.
    Opaque {
        /// Response body bytes.
        body: Vec<u8>,
    },
}

impl TileResponse {
    /// Body bytes of the response, regardless of shape.
    pub fn body(&self) -> &[u8] {
        match self {
            TileResponse::Readable { body, .. } => body,
            TileResponse::Opaque { body } => body,
        }
    }

    /// Whether the response is opaque (status/headers unreadable).
    pub fn is_opaque(&self) -> bool {
        matches!(self, TileResponse::Opaque { .. })
    }

    /// Encode the response for storage.
    pub fn encode(&self) -> Result<Vec<u8>, CacheError> {
        bincode::serialize(self).map_err(|e| CacheError::Codec(e.to_string()))
    }

    /// Decode a stored record back into a response.
    pub fn decode(bytes: &[u8]) -> Result<Self, CacheError> {
        bincode::deserialize(bytes).map_err(|e| CacheError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_accessor() {
        let readable = TileResponse::Readable {
            status: 200,
            content_type: Some("image/jpeg".to_string()),
            body: vec![1, 2, 3],
        };
        let opaque = TileResponse::Opaque { body: vec![4, 5] };

        assert_eq!(readable.body(), &[1, 2, 3]);
        assert_eq!(opaque.body(), &[4, 5]);
        assert!(!readable.is_opaque());
        assert!(opaque.is_opaque());
    }

    #[test]
    fn test_encode_decode_preserves_opaque_tag() {
        let original = TileResponse::Opaque {
            body: vec![0xFF, 0xD8, 0xFF],
        };

        let encoded = original.encode().unwrap();
        let decoded = TileResponse::decode(&encoded).unwrap();

        assert_eq!(decoded, original);
        assert!(decoded.is_opaque());
    }

    #[test]
    fn test_decode_garbage_is_an_error() {
        let result = TileResponse::decode(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01]);
        assert!(matches!(result, Err(CacheError::Codec(_))));
    }
}
