//! Element-type codec for directory tag payloads
//!
//! Every directory entry carries an element type code describing how its raw
//! payload bytes are to be reinterpreted. This module holds the decode table:
//! a pure mapping from (type code, element count, raw bytes) to a typed
//! [`Value`]. All multi-byte quantities are big-endian.

use byteorder::{BigEndian, ByteOrder};
use chrono::{NaiveDate, NaiveTime};

use crate::{error::Result, TagError};

/// A decoded tag payload
///
/// Numeric payloads with a single element unwrap to bare scalars; date and
/// time payloads always format to composite strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single integer element (type codes 1, 3, 4, 5)
    Int(i64),
    /// Multiple integer elements
    Ints(Vec<i64>),
    /// A single floating-point element (type codes 7, 8)
    Float(f64),
    /// Multiple floating-point elements
    Floats(Vec<f64>),
    /// Raw character data (type code 2)
    Bytes(Vec<u8>),
    /// Text, including formatted date and time strings (codes 10, 11, 18, 19)
    Str(String),
    /// A single-byte boolean (type code 13)
    Bool(bool),
}
impl Value {
    /// Converts the value into its textual form
    ///
    /// Character payloads must be valid UTF-8; numeric payloads format with
    /// their `Display` representation.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Str(s) => Ok(s),
            Self::Bytes(b) => Ok(std::str::from_utf8(&b)?.to_owned()),
            Self::Int(v) => Ok(v.to_string()),
            Self::Float(v) => Ok(v.to_string()),
            Self::Bool(v) => Ok(v.to_string()),
            Self::Ints(v) => Ok(v
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")),
            Self::Floats(v) => Ok(v
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")),
        }
    }
}

/// Decodes a raw tag payload according to its element type code
///
/// # Errors
///
/// Returns [`TagError::UnsupportedType`] for legacy type codes with no
/// decode rule, [`TagError::ShortPayload`] when the payload cannot hold
/// `elem_count` elements, and date/time errors for out-of-range calendar
/// or clock fields.
pub fn decode(code: u16, elem_count: usize, raw: &[u8]) -> Result<Value> {
    match code {
        // byte: signed 8-bit sequence
        1 => {
            need(raw, elem_count)?;
            Ok(unwrap_ints(
                raw[..elem_count].iter().map(|&b| i64::from(b as i8)).collect(),
            ))
        }
        // char: raw bytes, kept as-is
        2 => Ok(Value::Bytes(raw.to_vec())),
        // word: unsigned 16-bit
        3 => ints(raw, elem_count, 2, |c| i64::from(BigEndian::read_u16(c))),
        // short: signed 16-bit
        4 => ints(raw, elem_count, 2, |c| i64::from(BigEndian::read_i16(c))),
        // long: signed 32-bit
        5 => ints(raw, elem_count, 4, |c| i64::from(BigEndian::read_i32(c))),
        // float: IEEE-754 32-bit
        7 => floats(raw, elem_count, 4, |c| f64::from(BigEndian::read_f32(c))),
        // double: IEEE-754 64-bit
        8 => floats(raw, elem_count, 8, BigEndian::read_f64),
        10 => decode_date(raw),
        11 => decode_time(raw),
        // bool: single byte, true if non-zero
        13 => {
            need(raw, 1)?;
            Ok(Value::Bool(raw[0] != 0))
        }
        // pascal string: length prefix dropped
        18 => {
            need(raw, 1)?;
            Ok(Value::Str(std::str::from_utf8(&raw[1..])?.to_owned()))
        }
        // C string: terminating byte dropped
        19 => match raw.split_last() {
            Some((_, text)) => Ok(Value::Str(std::str::from_utf8(text)?.to_owned())),
            None => Ok(Value::Str(String::new())),
        },
        other => Err(TagError::UnsupportedType(other).into()),
    }
}

fn need(raw: &[u8], bytes: usize) -> Result<()> {
    if raw.len() < bytes {
        return Err(TagError::ShortPayload {
            got: raw.len(),
            need: bytes,
        }
        .into());
    }
    Ok(())
}

fn ints(raw: &[u8], count: usize, width: usize, read: fn(&[u8]) -> i64) -> Result<Value> {
    need(raw, count * width)?;
    Ok(unwrap_ints(
        raw[..count * width].chunks_exact(width).map(read).collect(),
    ))
}

fn floats(raw: &[u8], count: usize, width: usize, read: fn(&[u8]) -> f64) -> Result<Value> {
    need(raw, count * width)?;
    let values: Vec<f64> = raw[..count * width].chunks_exact(width).map(read).collect();
    if values.len() == 1 {
        Ok(Value::Float(values[0]))
    } else {
        Ok(Value::Floats(values))
    }
}

fn unwrap_ints(values: Vec<i64>) -> Value {
    if values.len() == 1 {
        Value::Int(values[0])
    } else {
        Value::Ints(values)
    }
}

/// Date payload: (year: i16, month: u8, day: u8), formatted `YYYY-MM-DD`
fn decode_date(raw: &[u8]) -> Result<Value> {
    need(raw, 4)?;
    let year = i32::from(BigEndian::read_i16(&raw[0..2]));
    let (month, day) = (raw[2], raw[3]);
    let date = NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
        .ok_or(TagError::InvalidDate(year, month, day))?;
    Ok(Value::Str(date.to_string()))
}

/// Time payload: (hour, minute, second, hundredths), hundredths dropped,
/// formatted `HH:MM:SS`
fn decode_time(raw: &[u8]) -> Result<Value> {
    need(raw, 4)?;
    let (hour, minute, second) = (raw[0], raw[1], raw[2]);
    let time = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
        .ok_or(TagError::InvalidTime(hour, minute, second))?;
    Ok(Value::Str(time.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use anyhow::Result;

    #[test]
    fn decodes_word() -> Result<()> {
        assert_eq!(decode(3, 1, &[0x00, 0x0A])?, Value::Int(10));
        Ok(())
    }

    #[test]
    fn decodes_short_negative() -> Result<()> {
        assert_eq!(decode(4, 1, &[0xFF, 0xFE])?, Value::Int(-2));
        Ok(())
    }

    #[test]
    fn decodes_long() -> Result<()> {
        assert_eq!(decode(5, 1, &[0x00, 0x01, 0x00, 0x00])?, Value::Int(65536));
        Ok(())
    }

    #[test]
    fn decodes_float_and_double() -> Result<()> {
        assert_eq!(decode(7, 1, &1.5f32.to_be_bytes())?, Value::Float(1.5));
        assert_eq!(decode(8, 1, &(-2.25f64).to_be_bytes())?, Value::Float(-2.25));
        Ok(())
    }

    #[test]
    fn multi_element_numerics_stay_wrapped() -> Result<()> {
        assert_eq!(
            decode(3, 2, &[0x00, 0x0A, 0x00, 0x0B])?,
            Value::Ints(vec![10, 11])
        );
        assert_eq!(decode(1, 2, &[0xFF, 0x01])?, Value::Ints(vec![-1, 1]));
        Ok(())
    }

    #[test]
    fn decodes_char_as_bytes() -> Result<()> {
        assert_eq!(decode(2, 4, b"ACGT")?, Value::Bytes(b"ACGT".to_vec()));
        Ok(())
    }

    #[test]
    fn decodes_date() -> Result<()> {
        // 2011-03-05
        assert_eq!(
            decode(10, 1, &[0x07, 0xDB, 0x03, 0x05])?,
            Value::Str("2011-03-05".to_owned())
        );
        Ok(())
    }

    #[test]
    fn decodes_time_dropping_hundredths() -> Result<()> {
        assert_eq!(
            decode(11, 1, &[17, 4, 5, 99])?,
            Value::Str("17:04:05".to_owned())
        );
        Ok(())
    }

    #[test]
    fn rejects_impossible_date() {
        let err = decode(10, 1, &[0x07, 0xDB, 13, 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::TagError(TagError::InvalidDate(2011, 13, 1))
        ));
    }

    #[test]
    fn decodes_bool() -> Result<()> {
        assert_eq!(decode(13, 1, &[0])?, Value::Bool(false));
        assert_eq!(decode(13, 1, &[7])?, Value::Bool(true));
        Ok(())
    }

    #[test]
    fn decodes_pascal_string() -> Result<()> {
        assert_eq!(
            decode(18, 4, &[0x03, b'a', b'b', b'c'])?,
            Value::Str("abc".to_owned())
        );
        Ok(())
    }

    #[test]
    fn decodes_c_string() -> Result<()> {
        assert_eq!(
            decode(19, 4, &[b'a', b'b', b'c', 0x00])?,
            Value::Str("abc".to_owned())
        );
        assert_eq!(decode(19, 0, &[])?, Value::Str(String::new()));
        Ok(())
    }

    #[test]
    fn rejects_legacy_type_codes() {
        for code in [6, 12, 14, 15, 16, 17, 20] {
            let err = decode(code, 1, &[0; 16]).unwrap_err();
            assert!(matches!(
                err,
                Error::TagError(TagError::UnsupportedType(c)) if c == code
            ));
        }
    }

    #[test]
    fn rejects_short_payload() {
        let err = decode(5, 2, &[0x00, 0x01]).unwrap_err();
        assert!(matches!(
            err,
            Error::TagError(TagError::ShortPayload { got: 2, need: 8 })
        ));
    }
}
