//! Directory-table scanner
//!
//! An ABIF container indexes its contents through a directory table: a run
//! of fixed-size, self-describing entries, each naming a tag and describing
//! where its payload lives. The scanner walks the table entry by entry and
//! yields only the tags on the extraction allowlist; everything else is read
//! past and discarded.

use byteorder::{BigEndian, ByteOrder};
use std::io::{Read, Seek, SeekFrom};

use crate::{error::Result, header::AbifHeader};

/// Size in bytes of a single on-disk directory entry
pub const SIZE_ENTRY: usize = 28;

/// Byte distance from an entry's start to its data-offset field
///
/// When a payload fits in 4 bytes it is stored inside that field itself, so
/// inline data always lives exactly this far past the entry start.
pub const INLINE_DATA_OFFSET: u64 = 20;

/// The semantic fields this reader extracts, keyed by `(tag name, number)`
///
/// The underlying file typically carries over a hundred tags; only these
/// eleven contribute to the assembled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `TUBE1` - well position of the sample on the plate
    SampleWell,
    /// `DySN1` - dye set name
    Dye,
    /// `GTyp1` - polymer type
    Polymer,
    /// `MODL1` - sequencing machine model
    MachineModel,
    /// `PBAS2` - base-called sequence
    Sequence,
    /// `PCON2` - per-base quality values of the base calls
    Quality,
    /// `SMPL1` - sample id entered before the sequencing run
    SampleId,
    /// `RUND1` - run start date
    RunStartDate,
    /// `RUND2` - run finish date
    RunFinishDate,
    /// `RUNT1` - run start time
    RunStartTime,
    /// `RUNT2` - run finish time
    RunFinishTime,
}
impl Field {
    /// Resolves a directory key against the allowlist
    #[must_use]
    pub fn lookup(tag_name: [u8; 4], tag_number: i32) -> Option<Self> {
        match (&tag_name, tag_number) {
            (b"TUBE", 1) => Some(Self::SampleWell),
            (b"DySN", 1) => Some(Self::Dye),
            (b"GTyp", 1) => Some(Self::Polymer),
            (b"MODL", 1) => Some(Self::MachineModel),
            (b"PBAS", 2) => Some(Self::Sequence),
            (b"PCON", 2) => Some(Self::Quality),
            (b"SMPL", 1) => Some(Self::SampleId),
            (b"RUND", 1) => Some(Self::RunStartDate),
            (b"RUND", 2) => Some(Self::RunFinishDate),
            (b"RUNT", 1) => Some(Self::RunStartTime),
            (b"RUNT", 2) => Some(Self::RunFinishTime),
            _ => None,
        }
    }

    /// The output metadata key for direct-copy annotation fields
    #[must_use]
    pub fn annotation_key(self) -> Option<&'static str> {
        match self {
            Self::SampleWell => Some("sample_well"),
            Self::Dye => Some("dye"),
            Self::Polymer => Some("polymer"),
            Self::MachineModel => Some("machine_model"),
            _ => None,
        }
    }
}

/// One parsed directory entry
///
/// All fields are stored on disk big-endian; `entry_offset` is derived from
/// the entry's position in the table rather than read from disk, and anchors
/// inline payload resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Four ASCII characters naming the tag
    pub tag_name: [u8; 4],
    /// Numeric suffix distinguishing tags with the same name
    pub tag_number: i32,
    /// Element type code selecting the decode rule
    pub elem_code: u16,
    /// Size in bytes of a single element
    pub elem_size: u16,
    /// Number of elements in the payload
    pub elem_count: u32,
    /// Total payload size in bytes
    pub data_size: u32,
    /// Absolute payload offset; meaningless when the payload is inline
    pub data_offset: u32,
    /// Absolute offset of this entry's own first byte
    pub entry_offset: u64,
}
impl DirectoryEntry {
    /// Parses an entry from its fixed-size on-disk representation
    #[must_use]
    pub fn from_bytes(buffer: &[u8; SIZE_ENTRY], entry_offset: u64) -> Self {
        let mut tag_name = [0u8; 4];
        tag_name.copy_from_slice(&buffer[0..4]);
        Self {
            tag_name,
            tag_number: BigEndian::read_i32(&buffer[4..8]),
            elem_code: BigEndian::read_u16(&buffer[8..10]),
            elem_size: BigEndian::read_u16(&buffer[10..12]),
            elem_count: BigEndian::read_u32(&buffer[12..16]),
            data_size: BigEndian::read_u32(&buffer[16..20]),
            data_offset: BigEndian::read_u32(&buffer[20..24]),
            // buffer[24..28] is the directory handle, unused
            entry_offset,
        }
    }
}

/// Walks the directory table described by a header
///
/// The scanner owns only the walk position; the stream is passed to each
/// call so the caller can interleave payload reads between entries.
#[derive(Debug)]
pub struct DirectoryScanner {
    entry_size: u16,
    entry_count: u32,
    dir_offset: u32,
    index: u32,
}
impl DirectoryScanner {
    /// Creates a scanner over the directory table a header describes
    #[must_use]
    pub fn new(header: &AbifHeader) -> Self {
        Self {
            entry_size: header.entry_size,
            entry_count: header.entry_count,
            dir_offset: header.dir_offset,
            index: 0,
        }
    }

    /// Yields the next allowlisted entry, or `None` when the table is done
    ///
    /// Entries outside the allowlist are read (to advance the walk) and
    /// skipped. Duplicate keys for skipped tags are legal in the wild and
    /// never reach the caller.
    pub fn next_wanted<R: Read + Seek>(
        &mut self,
        stream: &mut R,
    ) -> Result<Option<(Field, DirectoryEntry)>> {
        while self.index < self.entry_count {
            let start =
                u64::from(self.dir_offset) + u64::from(self.index) * u64::from(self.entry_size);
            self.index += 1;

            stream.seek(SeekFrom::Start(start))?;
            let mut buffer = [0u8; SIZE_ENTRY];
            stream.read_exact(&mut buffer)?;
            let entry = DirectoryEntry::from_bytes(&buffer, start);

            if let Some(field) = Field::lookup(entry.tag_name, entry.tag_number) {
                return Ok(Some((field, entry)));
            }
        }
        Ok(None)
    }
}
