//! Content addressing for replay resources
//!
//! Provides [`ContentId`], the 32-byte Blake3 digest under which resource
//! blobs (textures, buffers, resize requests) are stored and resolved.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Content address of a blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentId([u8; 32]);

impl ContentId {
    /// Wrap a raw digest
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Address of `data`
    #[inline]
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Address of a value's JSON encoding
    ///
    /// # Errors
    /// Returns error if the value cannot be serialized
    pub fn of_serializable<T>(value: &T) -> Result<Self, ContentIdError>
    where
        T: serde::Serialize,
    {
        let json = serde_json::to_vec(value)?;
        Ok(Self::of(&json))
    }

    /// First 8 bytes as hex, for logs
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ContentId {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ContentIdError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl serde::Serialize for ContentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors building a [`ContentId`]
#[derive(Debug, thiserror::Error)]
pub enum ContentIdError {
    /// Decoded digest is not 32 bytes
    #[error("invalid content id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Not a hex string
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Value could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_data_same_id() {
        assert_eq!(ContentId::of(b"pixels"), ContentId::of(b"pixels"));
        assert_ne!(ContentId::of(b"pixels"), ContentId::of(b"texels"));
    }

    #[test]
    fn wraps_raw_digest() {
        let digest = *blake3::hash(b"pixels").as_bytes();
        let id = ContentId::from_bytes(digest);
        assert_eq!(id, ContentId::of(b"pixels"));
        assert_eq!(id.as_bytes(), &digest);
        assert_eq!(ContentId::default().as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn parses_own_display() {
        let id = ContentId::of(b"blob");
        let parsed: ContentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn rejects_short_hex() {
        let err = "abcd".parse::<ContentId>().unwrap_err();
        assert!(matches!(err, ContentIdError::InvalidLength(2)));
    }

    #[test]
    fn serializable_id_is_stable() {
        let a = ContentId::of_serializable(&("resize", 4, 4)).unwrap();
        let b = ContentId::of_serializable(&("resize", 4, 4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn json_round_trip_is_hex_string() {
        let id = ContentId::of(b"x");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json.len(), 66);
        assert_eq!(serde_json::from_str::<ContentId>(&json).unwrap(), id);
    }
}
