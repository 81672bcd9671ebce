//! Quality trimming with Mott's cumulative-score algorithm
//!
//! Low-quality flanks are located by turning each base's quality into a
//! score against a fixed error-probability cutoff and keeping the segment
//! under the highest zero-floored cumulative score. Records at or below the
//! minimum segment length pass through untouched.

use crate::record::AbifRecord;

/// Records no longer than this are never trimmed
pub const MIN_SEGMENT_LEN: usize = 20;

/// Error-probability cutoff used to score each base
pub const CUTOFF: f64 = 0.05;

/// Returns a new record with low-quality flanks removed
///
/// The input record is left untouched; identifier, name, annotations, and
/// alphabet carry over into the trimmed record.
#[must_use]
pub fn trim(record: &AbifRecord) -> AbifRecord {
    if record.len() <= MIN_SEGMENT_LEN {
        return record.clone();
    }
    let (start, finish) = trim_bounds(&record.quality);
    record.slice(start..finish)
}

/// Computes the half-open `[start, finish)` window retained by trimming
///
/// Position 0 is never scored: it can never become the trim start and is
/// always eligible for trimming. The start is fixed at the first index
/// where the clamped cumulative score turns strictly positive; the finish
/// is the first occurrence of the maximum cumulative score.
#[must_use]
pub fn trim_bounds(quality: &[u8]) -> (usize, usize) {
    let mut cumulative = Vec::with_capacity(quality.len());
    cumulative.push(0.0f64);

    let mut trim_start = 0;
    let mut started = false;
    for (i, &qual) in quality.iter().enumerate().skip(1) {
        let score = CUTOFF - 10f64.powf(f64::from(qual) / -10.0);
        let running = cumulative[i - 1] + score;
        if running > 0.0 {
            cumulative.push(running);
            if !started {
                trim_start = i;
                started = true;
            }
        } else {
            cumulative.push(0.0);
        }
    }

    let mut trim_finish = 0;
    let mut best = cumulative[0];
    for (i, &value) in cumulative.iter().enumerate() {
        if value > best {
            best = value;
            trim_finish = i;
        }
    }

    (trim_start, trim_finish)
}
