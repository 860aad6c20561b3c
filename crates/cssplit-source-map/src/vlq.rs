//! Base64 VLQ encoding used by the `mappings` field.

use crate::error::SourceMapError;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Append the VLQ encoding of `value` to `out`
pub fn encode(value: i64, out: &mut String) {
    // The sign lives in the least significant bit
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// Decode one VLQ value starting at `*pos`, advancing `*pos` past it
pub fn decode(input: &[u8], pos: &mut usize) -> Result<i64, SourceMapError> {
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let byte = *input.get(*pos).ok_or(SourceMapError::UnexpectedEnd)?;
        let digit = base64_value(byte).ok_or(SourceMapError::InvalidBase64(byte as char))?;
        *pos += 1;

        if shift >= 64 {
            return Err(SourceMapError::Overflow);
        }
        result |= (digit & VLQ_BASE_MASK) << shift;
        shift += VLQ_BASE_SHIFT;

        if digit & VLQ_CONTINUATION_BIT == 0 {
            break;
        }
    }

    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 == 1 { -magnitude } else { magnitude })
}

/// Decode every value of a comma-free segment
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, SourceMapError> {
    let bytes = segment.as_bytes();
    let mut pos = 0;
    let mut values = Vec::with_capacity(5);
    while pos < bytes.len() {
        values.push(decode(bytes, &mut pos)?);
    }
    Ok(values)
}
