//! # abif
//!
//! A reader for ABIF trace files, the tagged binary container written by
//! capillary sequencing instruments (commonly seen as `.ab1` files).
//!
//! An ABIF container is a small self-describing database: a header at
//! offset zero points at a directory table whose entries each name a tag,
//! an element type, and a payload location. This crate walks that
//! directory, decodes the fixed set of tags that make up a sequencing read
//! (base calls, per-base quality, sample id, run metadata), and assembles
//! them into a single [`AbifRecord`]. Low-quality flanks can optionally be
//! trimmed with Mott's cumulative-score algorithm.
//!
//! ## Usage
//!
//! ```no_run
//! use abif::AbifReader;
//!
//! let mut reader = AbifReader::from_path("./data/trace.ab1").unwrap();
//! if let Some(record) = reader.read_record().unwrap() {
//!     println!("{}: {} bases", record.id, record.len());
//! }
//! ```
//!
//! Any `Read + Seek` stream works; trimming and an explicit alphabet are
//! opt-in:
//!
//! ```no_run
//! use abif::{AbifReader, Alphabet};
//! use std::fs::File;
//!
//! let handle = File::open("./data/trace.ab1").unwrap();
//! let mut reader = AbifReader::new(handle)
//!     .with_alphabet(Alphabet::AmbiguousDna)
//!     .with_trim(true);
//! let record = reader.read_record().unwrap();
//! ```

mod assemble;
mod directory;
mod error;
mod header;
mod reader;
mod record;
mod tag;
mod trim;
mod value;

pub use assemble::RecordAssembler;
pub use directory::{DirectoryEntry, DirectoryScanner, Field, SIZE_ENTRY};
pub use error::{Error, FormatError, RecordError, Result, TagError};
pub use header::{AbifHeader, MAGIC, SIZE_HEADER};
pub use reader::AbifReader;
pub use record::{AbifRecord, Alphabet, AMBIGUITY_CODES};
pub use tag::{decode_entry, DataLocation, DecodedTag};
pub use trim::{trim, trim_bounds, CUTOFF, MIN_SEGMENT_LEN};
pub use value::{decode, Value};
