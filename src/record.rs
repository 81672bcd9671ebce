//! Assembled read record and alphabet classification

use std::collections::HashMap;
use std::ops::Range;

use crate::{error::Result, RecordError};

/// Ambiguity codes whose presence classifies a sequence as ambiguous DNA
pub const AMBIGUITY_CODES: &[u8] = b"KYWMRS";

/// Alphabet classification of a base sequence
///
/// ABIF containers only ever hold DNA; the RNA and protein variants exist so
/// a caller-supplied override can be rejected with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// Plain A/C/G/T calls
    Dna,
    /// DNA including IUPAC ambiguity codes
    AmbiguousDna,
    /// RNA, never stored by the format; rejected as an override
    Rna,
    /// Protein, never stored by the format; rejected as an override
    Protein,
}
impl Alphabet {
    /// Classifies a base sequence by the presence of ambiguity codes
    #[must_use]
    pub fn infer(sequence: &[u8]) -> Self {
        if sequence.iter().any(|b| AMBIGUITY_CODES.contains(b)) {
            Self::AmbiguousDna
        } else {
            Self::Dna
        }
    }

    /// Validates that the alphabet can describe ABIF data
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidAlphabet`] for RNA and protein, which
    /// the format never stores.
    pub fn validate_dna(self) -> Result<Self> {
        match self {
            Self::Dna | Self::AmbiguousDna => Ok(self),
            Self::Rna | Self::Protein => Err(RecordError::InvalidAlphabet(self).into()),
        }
    }
}

/// One assembled sequencing read
///
/// Produced fresh per parse call; never mutated after assembly. Trimming
/// yields a new, shorter record rather than editing this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbifRecord {
    /// Sample id entered before the run
    pub id: String,
    /// Display name, derived from the source filename when known
    pub name: String,
    /// Base-called sequence
    pub sequence: Vec<u8>,
    /// Per-base quality scores, same length as `sequence`
    pub quality: Vec<u8>,
    /// Run metadata: sample well, dye, polymer, machine model, run
    /// start/finish timestamps
    pub annotations: HashMap<String, Option<String>>,
    /// Inferred or caller-supplied alphabet classification
    pub alphabet: Alphabet,
}
impl AbifRecord {
    /// Number of base calls in the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns a sub-record over `range`
    ///
    /// Bases and quality scores are re-sliced consistently; id, name,
    /// annotations, and alphabet carry over unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds for the sequence.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            sequence: self.sequence[range.clone()].to_vec(),
            quality: self.quality[range].to_vec(),
            annotations: self.annotations.clone(),
            alphabet: self.alphabet,
        }
    }
}
