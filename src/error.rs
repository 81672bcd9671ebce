use crate::record::Alphabet;

/// Custom Result type for abif operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the abif library, encompassing all possible error
/// cases that can occur while parsing a trace file.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to the container header and on-disk layout
    FormatError(#[from] FormatError),
    /// Errors that occur while decoding a single directory tag
    TagError(#[from] TagError),
    /// Errors that occur while assembling the final read record
    RecordError(#[from] RecordError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// UTF-8 decoding errors from string-typed tag payloads
    Utf8Error(#[from] std::str::Utf8Error),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

/// Errors specific to validating the container layout
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// The first four bytes of the stream are not the ABIF magic
    #[error("not an ABIF container: stream starts with {0:?}")]
    InvalidMagic([u8; 4]),
}

/// Errors that can occur while decoding a directory tag payload
#[derive(thiserror::Error, Debug)]
pub enum TagError {
    /// A wanted tag carries a legacy element type this reader does not decode
    #[error("unsupported element type code: {0}")]
    UnsupportedType(u16),

    /// A date tag does not describe a real calendar date
    #[error("invalid calendar date in tag: {0:04}-{1:02}-{2:02}")]
    InvalidDate(i32, u8, u8),

    /// A time tag does not describe a real time of day
    #[error("invalid time of day in tag: {0:02}:{1:02}:{2:02}")]
    InvalidTime(u8, u8, u8),

    /// The payload is shorter than the element layout requires
    #[error("tag payload too short: got {got} bytes, need {need}")]
    ShortPayload { got: usize, need: usize },
}

/// Errors that can occur while assembling the read record
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// A mandatory tag was absent from the directory
    #[error("incomplete record: missing mandatory tag {0}")]
    IncompleteRecord(&'static str),

    /// The sequence and quality tags disagree in length
    #[error("quality length ({quality}) does not match sequence length ({sequence})")]
    LengthMismatch { sequence: usize, quality: usize },

    /// The caller-supplied alphabet cannot describe ABIF data
    #[error("invalid alphabet {0:?}: ABIF files only hold DNA")]
    InvalidAlphabet(Alphabet),
}
