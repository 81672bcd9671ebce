//! ABIF stream reader
//!
//! This module ties the pipeline together: header validation, directory
//! walk, per-tag decoding, record assembly, and optional quality trimming.
//! A valid stream holds exactly one read record; an empty stream holds none.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use memmap2::Mmap;

use crate::{
    assemble::RecordAssembler,
    directory::DirectoryScanner,
    error::Result,
    header::AbifHeader,
    record::{AbifRecord, Alphabet},
    tag::decode_entry,
    trim::trim,
};

/// Reader over a single ABIF trace stream
///
/// The stream must be seekable; the reader performs explicit seeks for the
/// header, each directory entry, and each payload. Construction is cheap
/// and does no I/O; all work happens in [`read_record`](Self::read_record).
#[derive(Debug)]
pub struct AbifReader<R: Read + Seek> {
    inner: R,
    name: String,
    alphabet: Option<Alphabet>,
    trim: bool,
    finished: bool,
}
impl<R: Read + Seek> AbifReader<R> {
    /// Creates a reader over a seekable byte stream
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            name: String::new(),
            alphabet: None,
            trim: false,
            finished: false,
        }
    }

    /// Overrides alphabet inference with a caller-supplied alphabet
    ///
    /// Only DNA alphabets are accepted; the override is validated when
    /// [`read_record`](Self::read_record) runs, before any decoding.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Enables quality trimming of the emitted record
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the display name carried into the record
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parses the stream into its single read record
    ///
    /// Returns `Ok(None)` for an empty stream and on every call after the
    /// first. A set trim flag replaces the emitted record with its trimmed
    /// counterpart.
    ///
    /// # Errors
    ///
    /// Returns an error for a foreign magic number, a truncated stream, an
    /// undecodable wanted tag, a missing mandatory tag, or a non-DNA
    /// alphabet override. No partial record is emitted on failure.
    pub fn read_record(&mut self) -> Result<Option<AbifRecord>> {
        if self.finished {
            return Ok(None);
        }
        self.finished = true;

        let mut assembler = RecordAssembler::new(self.alphabet)?;

        // a zero-byte stream holds zero records and is not an error
        self.inner.seek(SeekFrom::Start(0))?;
        let mut probe = [0u8; 1];
        if self.inner.read(&mut probe)? == 0 {
            return Ok(None);
        }

        self.inner.seek(SeekFrom::Start(0))?;
        let header = AbifHeader::from_reader(&mut self.inner)?;

        let mut scanner = DirectoryScanner::new(&header);
        while let Some((field, entry)) = scanner.next_wanted(&mut self.inner)? {
            let tag = decode_entry(field, &entry, &mut self.inner)?;
            assembler.consume(tag)?;
        }

        let record = assembler.finish(&self.name)?;
        if self.trim {
            Ok(Some(trim(&record)))
        } else {
            Ok(Some(record))
        }
    }

    /// Consumes the reader, returning the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl AbifReader<Cursor<Mmap>> {
    /// Opens a trace file by path, memory-mapping its contents
    ///
    /// The record display name is derived from the file stem, matching the
    /// convention of naming a read after its `.ab1` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let map = unsafe { Mmap::map(&file)? };
        let name = path
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(Cursor::new(map)).with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FormatError};
    use anyhow::Result;

    #[test]
    fn empty_stream_yields_zero_records() -> Result<()> {
        let mut reader = AbifReader::new(Cursor::new(Vec::new()));
        assert!(reader.read_record()?.is_none());
        // subsequent calls stay finished
        assert!(reader.read_record()?.is_none());
        Ok(())
    }

    #[test]
    fn foreign_magic_is_a_format_error() {
        let mut bytes = vec![0u8; 64];
        bytes[0..4].copy_from_slice(b"XXIF");
        let mut reader = AbifReader::new(Cursor::new(bytes));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(
            err,
            Error::FormatError(FormatError::InvalidMagic(m)) if &m == b"XXIF"
        ));
    }

    #[test]
    fn truncated_header_is_a_short_read() {
        let mut reader = AbifReader::new(Cursor::new(b"ABIF\x00\x65".to_vec()));
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
