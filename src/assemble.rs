//! Record assembly from decoded tags
//!
//! The assembler consumes decoded tags in whatever order the directory
//! yields them, applies the per-field post-processing (quality byte
//! conversion, timestamp composition, alphabet resolution), and builds the
//! final record. Assembly either completes fully or fails; no partial
//! record is ever produced.

use std::collections::HashMap;

use crate::{
    directory::Field,
    error::Result,
    record::{AbifRecord, Alphabet},
    tag::DecodedTag,
    value::Value,
    RecordError,
};

#[derive(Debug, Default)]
struct RunTimes {
    start_date: String,
    finish_date: String,
    start_time: String,
    finish_time: String,
}

/// Collects decoded tags and produces an [`AbifRecord`]
#[derive(Debug)]
pub struct RecordAssembler {
    alphabet: Option<Alphabet>,
    sequence: Option<Vec<u8>>,
    quality: Option<Vec<u8>>,
    sample_id: Option<String>,
    times: RunTimes,
    annotations: HashMap<String, Option<String>>,
}
impl RecordAssembler {
    /// Creates an assembler, validating any caller-supplied alphabet
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidAlphabet`] immediately for a non-DNA
    /// override, before any decoding work is spent on the stream.
    pub fn new(alphabet: Option<Alphabet>) -> Result<Self> {
        if let Some(alphabet) = alphabet {
            alphabet.validate_dna()?;
        }
        // direct-copy annotation keys default to null when the tag is absent
        let annotations = [Field::SampleWell, Field::Dye, Field::Polymer, Field::MachineModel]
            .into_iter()
            .filter_map(Field::annotation_key)
            .map(|key| (key.to_owned(), None))
            .collect();
        Ok(Self {
            alphabet,
            sequence: None,
            quality: None,
            sample_id: None,
            times: RunTimes::default(),
            annotations,
        })
    }

    /// Folds one decoded tag into the record under construction
    pub fn consume(&mut self, tag: DecodedTag) -> Result<()> {
        match tag.field {
            Field::Sequence => self.sequence = Some(into_raw_bytes(tag.value)?),
            // quality scores are the payload bytes themselves, one unsigned
            // integer per base
            Field::Quality => self.quality = Some(into_raw_bytes(tag.value)?),
            Field::SampleId => self.sample_id = Some(tag.value.into_text()?),
            Field::RunStartDate => self.times.start_date = tag.value.into_text()?,
            Field::RunFinishDate => self.times.finish_date = tag.value.into_text()?,
            Field::RunStartTime => self.times.start_time = tag.value.into_text()?,
            Field::RunFinishTime => self.times.finish_time = tag.value.into_text()?,
            field => {
                if let Some(key) = field.annotation_key() {
                    self.annotations
                        .insert(key.to_owned(), Some(tag.value.into_text()?));
                }
            }
        }
        Ok(())
    }

    /// Finalizes the record
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::IncompleteRecord`] if the mandatory sequence
    /// or quality tags never arrived, and [`RecordError::LengthMismatch`]
    /// if their lengths disagree.
    pub fn finish(self, name: &str) -> Result<AbifRecord> {
        let sequence = self
            .sequence
            .ok_or(RecordError::IncompleteRecord("PBAS2"))?;
        let quality = self
            .quality
            .ok_or(RecordError::IncompleteRecord("PCON2"))?;
        if quality.len() != sequence.len() {
            return Err(RecordError::LengthMismatch {
                sequence: sequence.len(),
                quality: quality.len(),
            }
            .into());
        }

        let alphabet = match self.alphabet {
            Some(alphabet) => alphabet,
            None => Alphabet::infer(&sequence),
        };

        let mut annotations = self.annotations;
        annotations.insert(
            "run_start".to_owned(),
            Some(format!("{} {}", self.times.start_date, self.times.start_time)),
        );
        annotations.insert(
            "run_finish".to_owned(),
            Some(format!("{} {}", self.times.finish_date, self.times.finish_time)),
        );

        Ok(AbifRecord {
            id: self.sample_id.unwrap_or_default(),
            name: name.to_owned(),
            sequence,
            quality,
            annotations,
            alphabet,
        })
    }
}

fn into_raw_bytes(value: Value) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Ok(other.into_text()?.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use anyhow::Result;

    fn tag(field: Field, value: Value) -> DecodedTag {
        DecodedTag { field, value }
    }

    fn full_assembler() -> Result<RecordAssembler> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGTACGT".to_vec())))?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 8])))?;
        asm.consume(tag(Field::SampleId, Value::Str("sample-7".into())))?;
        Ok(asm)
    }

    #[test]
    fn assembles_sequence_quality_and_id() -> Result<()> {
        let record = full_assembler()?.finish("trace01")?;
        assert_eq!(record.id, "sample-7");
        assert_eq!(record.name, "trace01");
        assert_eq!(record.sequence, b"ACGTACGT");
        assert_eq!(record.quality.len(), record.sequence.len());
        assert_eq!(record.alphabet, Alphabet::Dna);
        Ok(())
    }

    #[test]
    fn composes_run_timestamps() -> Result<()> {
        let mut asm = full_assembler()?;
        asm.consume(tag(Field::RunStartDate, Value::Str("2011-03-05".into())))?;
        asm.consume(tag(Field::RunStartTime, Value::Str("17:04:05".into())))?;
        asm.consume(tag(Field::RunFinishDate, Value::Str("2011-03-06".into())))?;
        // finish time deliberately absent
        let record = asm.finish("trace01")?;
        assert_eq!(
            record.annotations["run_start"],
            Some("2011-03-05 17:04:05".to_owned())
        );
        assert_eq!(record.annotations["run_finish"], Some("2011-03-06 ".to_owned()));
        Ok(())
    }

    #[test]
    fn absent_annotation_tags_stay_null() -> Result<()> {
        let mut asm = full_assembler()?;
        asm.consume(tag(Field::Dye, Value::Str("Z-BigDyeV3".into())))?;
        let record = asm.finish("trace01")?;
        assert_eq!(record.annotations["dye"], Some("Z-BigDyeV3".to_owned()));
        assert_eq!(record.annotations["sample_well"], None);
        assert_eq!(record.annotations["polymer"], None);
        assert_eq!(record.annotations["machine_model"], None);
        Ok(())
    }

    #[test]
    fn missing_sequence_is_incomplete() -> Result<()> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 8])))?;
        let err = asm.finish("trace01").unwrap_err();
        assert!(matches!(
            err,
            Error::RecordError(RecordError::IncompleteRecord("PBAS2"))
        ));
        Ok(())
    }

    #[test]
    fn missing_quality_is_incomplete() -> Result<()> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGT".to_vec())))?;
        let err = asm.finish("trace01").unwrap_err();
        assert!(matches!(
            err,
            Error::RecordError(RecordError::IncompleteRecord("PCON2"))
        ));
        Ok(())
    }

    #[test]
    fn mismatched_quality_length_is_an_error() -> Result<()> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGT".to_vec())))?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 6])))?;
        let err = asm.finish("trace01").unwrap_err();
        assert!(matches!(
            err,
            Error::RecordError(RecordError::LengthMismatch {
                sequence: 4,
                quality: 6
            })
        ));
        Ok(())
    }

    #[test]
    fn ambiguity_codes_flip_the_inferred_alphabet() -> Result<()> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGTKACGT".to_vec())))?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 9])))?;
        let record = asm.finish("trace01")?;
        assert_eq!(record.alphabet, Alphabet::AmbiguousDna);
        Ok(())
    }

    #[test]
    fn explicit_alphabet_override_wins_over_inference() -> Result<()> {
        let mut asm = RecordAssembler::new(Some(Alphabet::AmbiguousDna))?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGT".to_vec())))?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 4])))?;
        let record = asm.finish("trace01")?;
        assert_eq!(record.alphabet, Alphabet::AmbiguousDna);
        Ok(())
    }

    #[test]
    fn non_dna_override_fails_before_any_decoding() {
        for alphabet in [Alphabet::Rna, Alphabet::Protein] {
            let err = RecordAssembler::new(Some(alphabet)).unwrap_err();
            assert!(matches!(
                err,
                Error::RecordError(RecordError::InvalidAlphabet(_))
            ));
        }
    }

    #[test]
    fn missing_sample_id_yields_empty_id() -> Result<()> {
        let mut asm = RecordAssembler::new(None)?;
        asm.consume(tag(Field::Sequence, Value::Bytes(b"ACGT".to_vec())))?;
        asm.consume(tag(Field::Quality, Value::Bytes(vec![40; 4])))?;
        let record = asm.finish("trace01")?;
        assert_eq!(record.id, "");
        Ok(())
    }
}
