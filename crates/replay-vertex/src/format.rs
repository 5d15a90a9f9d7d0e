//! Element layouts

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Scalar type of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Unsigned 8-bit integer
    U8,
    /// Signed 8-bit integer
    S8,
    /// Unsigned 16-bit integer
    U16,
    /// Signed 16-bit integer
    S16,
    /// Unsigned 32-bit integer
    U32,
    /// Signed 32-bit integer
    S32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl DataType {
    /// Encoded size of one component in bytes
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            DataType::U8 | DataType::S8 => 1,
            DataType::U16 | DataType::S16 => 2,
            DataType::U32 | DataType::S32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    /// True for `F32` and `F64`
    #[inline]
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, DataType::F32 | DataType::F64)
    }

    /// Largest representable magnitude, used as the normalization scale
    pub(crate) fn max(self) -> f64 {
        match self {
            DataType::U8 => f64::from(u8::MAX),
            DataType::S8 => f64::from(i8::MAX),
            DataType::U16 => f64::from(u16::MAX),
            DataType::S16 => f64::from(i16::MAX),
            DataType::U32 => f64::from(u32::MAX),
            DataType::S32 => f64::from(i32::MAX),
            DataType::F32 | DataType::F64 => 1.0,
        }
    }
}

/// Layout of one stream element
///
/// `normalized` only affects integer types: a normalized unsigned component
/// maps `0..=MAX` onto `0.0..=1.0`, a normalized signed one maps onto
/// `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Component type
    pub data_type: DataType,
    /// Components per element, `1..=4`
    pub components: u8,
    /// Integer components encode fractions
    #[serde(default)]
    pub normalized: bool,
}

impl StreamFormat {
    /// Largest supported component count
    pub const MAX_COMPONENTS: u8 = 4;

    /// Non-normalized format
    #[inline]
    #[must_use]
    pub const fn new(data_type: DataType, components: u8) -> Self {
        Self {
            data_type,
            components,
            normalized: false,
        }
    }

    /// Normalized format
    #[inline]
    #[must_use]
    pub const fn normalized(data_type: DataType, components: u8) -> Self {
        Self {
            data_type,
            components,
            normalized: true,
        }
    }

    /// Bytes per element
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.data_type.size() * self.components as usize
    }

    /// Check the component count
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidComponents`] outside `1..=4`.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if (1..=Self::MAX_COMPONENTS).contains(&self.components) {
            Ok(())
        } else {
            Err(ConvertError::InvalidComponents(self.components))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_size_times_components() {
        assert_eq!(StreamFormat::new(DataType::F32, 3).stride(), 12);
        assert_eq!(StreamFormat::normalized(DataType::U8, 4).stride(), 4);
        assert_eq!(StreamFormat::new(DataType::F64, 2).stride(), 16);
    }

    #[test]
    fn component_count_is_bounded() {
        assert!(StreamFormat::new(DataType::U16, 1).validate().is_ok());
        assert!(matches!(
            StreamFormat::new(DataType::U16, 0).validate(),
            Err(ConvertError::InvalidComponents(0))
        ));
        assert!(matches!(
            StreamFormat::new(DataType::U16, 5).validate(),
            Err(ConvertError::InvalidComponents(5))
        ));
    }

    #[test]
    fn serde_shape() {
        let format = StreamFormat::normalized(DataType::S16, 2);
        let json = serde_json::to_value(format).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data_type": "s16", "components": 2, "normalized": true})
        );

        let parsed: StreamFormat =
            serde_json::from_str(r#"{"data_type":"f32","components":3}"#).unwrap();
        assert_eq!(parsed, StreamFormat::new(DataType::F32, 3));
    }
}
