//! Per-component transcoding
//!
//! Every component is lifted to an `f64` in the "unit" domain (fractions for
//! normalized integers, the raw number otherwise) and lowered into the target
//! type. Integer targets round to nearest and saturate.

use crate::error::ConvertError;
use crate::format::{DataType, StreamFormat};

/// Value of a component missing from the source
#[inline]
fn fill(component: usize) -> f64 {
    if component == 3 {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn convert(
    data: &[u8],
    from: &StreamFormat,
    to: &StreamFormat,
) -> Result<Vec<u8>, ConvertError> {
    from.validate()?;
    to.validate()?;

    let stride = from.stride();
    if data.len() % stride != 0 {
        return Err(ConvertError::Misaligned {
            len: data.len(),
            stride,
        });
    }
    if from == to {
        return Ok(data.to_vec());
    }

    let size = from.data_type.size();
    let present = usize::from(from.components);
    let mut out = Vec::with_capacity(data.len() / stride * to.stride());

    for element in data.chunks_exact(stride) {
        for component in 0..usize::from(to.components) {
            let value = if component < present {
                let bytes = &element[component * size..(component + 1) * size];
                lift(from, decode(from.data_type, bytes))
            } else {
                fill(component)
            };
            encode(to, value, &mut out);
        }
    }
    Ok(out)
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(bytes);
    out
}

fn decode(data_type: DataType, b: &[u8]) -> f64 {
    match data_type {
        DataType::U8 => f64::from(b[0]),
        DataType::S8 => f64::from(i8::from_le_bytes(array(b))),
        DataType::U16 => f64::from(u16::from_le_bytes(array(b))),
        DataType::S16 => f64::from(i16::from_le_bytes(array(b))),
        DataType::U32 => f64::from(u32::from_le_bytes(array(b))),
        DataType::S32 => f64::from(i32::from_le_bytes(array(b))),
        DataType::F32 => f64::from(f32::from_le_bytes(array(b))),
        DataType::F64 => f64::from_le_bytes(array(b)),
    }
}

fn lift(format: &StreamFormat, raw: f64) -> f64 {
    if !format.normalized || format.data_type.is_float() {
        return raw;
    }
    (raw / format.data_type.max()).max(-1.0)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn encode(format: &StreamFormat, value: f64, out: &mut Vec<u8>) {
    let data_type = format.data_type;
    let value = if format.normalized && !data_type.is_float() {
        let lower = if matches!(data_type, DataType::U8 | DataType::U16 | DataType::U32) {
            0.0
        } else {
            -1.0
        };
        (value.clamp(lower, 1.0) * data_type.max()).round()
    } else if data_type.is_float() {
        value
    } else {
        value.round()
    };

    // Float to integer `as` casts saturate.
    match data_type {
        DataType::U8 => out.push(value as u8),
        DataType::S8 => out.extend_from_slice(&(value as i8).to_le_bytes()),
        DataType::U16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
        DataType::S16 => out.extend_from_slice(&(value as i16).to_le_bytes()),
        DataType::U32 => out.extend_from_slice(&(value as u32).to_le_bytes()),
        DataType::S32 => out.extend_from_slice(&(value as i32).to_le_bytes()),
        DataType::F32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
        DataType::F64 => out.extend_from_slice(&value.to_le_bytes()),
    }
}
