//! Header module for the abif library
//!
//! This module provides the header structure for ABIF trace files. The header
//! sits at offset zero, identifies the container by its magic bytes, and
//! describes where the directory table lives and how it is laid out.

use byteorder::{BigEndian, ByteOrder};
use std::io::Read;

use crate::{error::Result, FormatError};

/// Magic bytes identifying an ABIF container: `"ABIF"` in ASCII
pub const MAGIC: [u8; 4] = *b"ABIF";

/// Number of header bytes read and validated
///
/// The on-disk header region is larger, but only this fixed prefix carries
/// fields this reader interprets.
pub const SIZE_HEADER: usize = 34;

/// Header structure for ABIF trace files
///
/// The header shares its layout with a directory entry: after the magic and
/// version comes a (name, number, type) triple that this reader never uses,
/// followed by the geometry of the directory table. All fields are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbifHeader {
    /// Magic bytes identifying the file format
    pub magic: [u8; 4],

    /// Version of the file format (e.g. 101 for version 1.01)
    pub version: u16,

    /// Size in bytes of a single directory entry
    pub entry_size: u16,

    /// Number of entries in the directory table
    pub entry_count: u32,

    /// Absolute byte offset of the directory table
    pub dir_offset: u32,
}
impl AbifHeader {
    /// Parses a header from a fixed-size byte array
    ///
    /// Validates the magic bytes before constructing a header instance.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidMagic`] if the buffer does not start
    /// with the ABIF magic.
    pub fn from_bytes(buffer: &[u8; SIZE_HEADER]) -> Result<Self> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buffer[0..4]);
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic(magic).into());
        }
        let version = BigEndian::read_u16(&buffer[4..6]);
        // bytes 6..16 mirror a directory entry's (name, number, type) triple
        // and are not interpreted here
        let entry_size = BigEndian::read_u16(&buffer[16..18]);
        let entry_count = BigEndian::read_u32(&buffer[18..22]);
        // bytes 22..26 hold the directory data size, unused
        let dir_offset = BigEndian::read_u32(&buffer[26..30]);
        Ok(Self {
            magic,
            version,
            entry_size,
            entry_count,
            dir_offset,
        })
    }

    /// Reads a header from a reader positioned at offset zero
    ///
    /// Reads exactly [`SIZE_HEADER`] bytes and parses them.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, the stream is shorter than the
    /// header, or the magic bytes do not match.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_HEADER];
        reader.read_exact(&mut buffer)?;
        Self::from_bytes(&buffer)
    }
}
