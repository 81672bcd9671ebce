//! Per-entry tag decoding
//!
//! For one allowlisted directory entry this module resolves where the
//! payload bytes actually live, reads them, and hands them to the
//! element-type codec.

use std::io::{Read, Seek, SeekFrom};

use crate::{
    directory::{DirectoryEntry, Field, INLINE_DATA_OFFSET},
    error::Result,
    value::{self, Value},
};

/// Where a tag payload lives, resolved once per entry
///
/// Payloads of at most 4 bytes are stored inside the entry's own data-offset
/// field; larger payloads live at the absolute offset that field stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLocation {
    /// Payload stored inside the directory entry itself
    Inline(u64),
    /// Payload stored at an absolute file offset
    Stored(u64),
}
impl DataLocation {
    /// Resolves the payload location for an entry
    #[must_use]
    pub fn resolve(entry: &DirectoryEntry) -> Self {
        if entry.data_size <= 4 {
            Self::Inline(entry.entry_offset + INLINE_DATA_OFFSET)
        } else {
            Self::Stored(u64::from(entry.data_offset))
        }
    }

    /// The absolute byte offset of the payload
    #[must_use]
    pub fn offset(self) -> u64 {
        match self {
            Self::Inline(offset) | Self::Stored(offset) => offset,
        }
    }
}

/// An allowlisted tag together with its decoded payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTag {
    pub field: Field,
    pub value: Value,
}

/// Reads and decodes the payload of one allowlisted directory entry
///
/// # Errors
///
/// Returns an error if seeking or reading the payload fails (a truncated
/// stream surfaces as a short read) or if the payload does not decode under
/// the entry's element type code.
pub fn decode_entry<R: Read + Seek>(
    field: Field,
    entry: &DirectoryEntry,
    stream: &mut R,
) -> Result<DecodedTag> {
    let location = DataLocation::resolve(entry);
    stream.seek(SeekFrom::Start(location.offset()))?;

    let mut raw = vec![0u8; entry.data_size as usize];
    stream.read_exact(&mut raw)?;

    let value = value::decode(entry.elem_code, entry.elem_count as usize, &raw)?;
    Ok(DecodedTag { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    fn entry(elem_code: u16, elem_count: u32, data_size: u32, data_offset: u32) -> DirectoryEntry {
        DirectoryEntry {
            tag_name: *b"SMPL",
            tag_number: 1,
            elem_code,
            elem_size: 1,
            elem_count,
            data_size,
            data_offset,
            entry_offset: 100,
        }
    }

    #[test]
    fn small_payloads_resolve_inline() {
        let e = entry(3, 1, 2, 0xDEAD);
        assert_eq!(DataLocation::resolve(&e), DataLocation::Inline(120));
    }

    #[test]
    fn large_payloads_resolve_to_stored_offset() {
        let e = entry(2, 8, 8, 0x40);
        assert_eq!(DataLocation::resolve(&e), DataLocation::Stored(0x40));
    }

    #[test]
    fn decodes_inline_payload_from_entry_body() -> Result<()> {
        // entry starts at 100, so a 2-byte inline word sits at 120
        let mut bytes = vec![0u8; 128];
        bytes[120..122].copy_from_slice(&[0x00, 0x0A]);
        let tag = decode_entry(Field::SampleId, &entry(3, 1, 2, 0xDEAD), &mut Cursor::new(bytes))?;
        assert_eq!(tag.field, Field::SampleId);
        assert_eq!(tag.value, Value::Int(10));
        Ok(())
    }

    #[test]
    fn decodes_stored_payload_at_offset() -> Result<()> {
        let mut bytes = vec![0u8; 80];
        bytes[0x40..0x48].copy_from_slice(b"ACGTACGT");
        let tag = decode_entry(Field::Sequence, &entry(2, 8, 8, 0x40), &mut Cursor::new(bytes))?;
        assert_eq!(tag.value, Value::Bytes(b"ACGTACGT".to_vec()));
        Ok(())
    }

    #[test]
    fn truncated_payload_is_a_short_read() {
        let bytes = vec![0u8; 0x42];
        let err = decode_entry(Field::Sequence, &entry(2, 8, 8, 0x40), &mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, crate::Error::IoError(_)));
    }
}
