//! Scalar values pushed into the outgoing command stream

use serde::{Deserialize, Serialize};

/// A scalar value understood by the execution target
///
/// Values are encoded little-endian when read back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Boolean, encoded as a single byte
    Bool(bool),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Signed 32-bit integer
    S32(i32),
    /// Signed 64-bit integer
    S64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
}

impl Value {
    /// Encoded size in bytes
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Value::Bool(_) | Value::U8(_) => 1,
            Value::U16(_) => 2,
            Value::U32(_) | Value::S32(_) | Value::F32(_) => 4,
            Value::U64(_) | Value::S64(_) | Value::F64(_) => 8,
        }
    }

    /// Little-endian encoding
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match *self {
            Value::Bool(v) => vec![u8::from(v)],
            Value::U8(v) => vec![v],
            Value::U16(v) => v.to_le_bytes().to_vec(),
            Value::U32(v) => v.to_le_bytes().to_vec(),
            Value::U64(v) => v.to_le_bytes().to_vec(),
            Value::S32(v) => v.to_le_bytes().to_vec(),
            Value::S64(v) => v.to_le_bytes().to_vec(),
            Value::F32(v) => v.to_le_bytes().to_vec(),
            Value::F64(v) => v.to_le_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_length_matches_size() {
        let values = [
            Value::Bool(true),
            Value::U8(7),
            Value::U16(0x1234),
            Value::U32(0xE11D_E11D),
            Value::U64(1),
            Value::S32(-1),
            Value::S64(-2),
            Value::F32(1.5),
            Value::F64(2.5),
        ];
        for v in values {
            assert_eq!(v.to_le_bytes().len(), v.size(), "{v:?}");
        }
    }

    #[test]
    fn u32_is_little_endian() {
        assert_eq!(Value::U32(0xE11D_E11D).to_le_bytes(), vec![0x1D, 0xE1, 0x1D, 0xE1]);
    }

    #[test]
    fn serde_tagged_form() {
        let json = serde_json::to_string(&Value::U16(3)).unwrap();
        assert_eq!(json, r#"{"type":"u16","value":3}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::U16(3));
    }
}
