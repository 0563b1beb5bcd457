//! Match identifier codec
//!
//! A match id packs its creation hour and bracket position into a single
//! sortable 18-digit decimal value:
//!
//! ```text
//! yy MM dd HH rr ssssssss
//! 2  2  2  2  2  8        digits, most significant first
//! ```
//!
//! `rr` is the 1-based bracket round and `ssssssss` the 1-based sequence
//! within the round. Because rounds and sequences are assigned in emission
//! order, ids are strictly increasing within a run, so the same value works
//! as primary key and natural sort key, and one tournament hour (or day)
//! stays range-queryable without a separate timestamp column.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

const SEQUENCE_WIDTH: i64 = 100_000_000; // 8 digits
const ROUND_WIDTH: i64 = 100; // 2 digits
const BUCKET_WIDTH: i64 = ROUND_WIDTH * SEQUENCE_WIDTH; // shift for the yyMMddHH prefix

const MIN_ID: i64 = 100_000_000_000_000_000; // 18 digits exactly
const MAX_ID: i64 = 999_999_999_999_999_999;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatchIdError {
    #[error("match identifier must be exactly 18 digits, got {0}")]
    Malformed(i64),

    #[error("round {0} does not fit the two-digit round field")]
    RoundOverflow(u32),

    #[error("sequence {0} does not fit the eight-digit sequence field")]
    SequenceOverflow(u32),
}

/// Decoded match identifier fields. `year` is the two-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchIdParts {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub round: u32,
    pub sequence: u32,
}

/// The 8-digit `yyMMddHH` prefix shared by every match created in the same
/// UTC hour.
pub fn hour_bucket(created_at: DateTime<Utc>) -> i64 {
    let yy = (created_at.year() % 100) as i64;
    let mm = created_at.month() as i64;
    let dd = created_at.day() as i64;
    let hh = created_at.hour() as i64;
    yy * 1_000_000 + mm * 10_000 + dd * 100 + hh
}

/// Build a match identifier from its creation hour and bracket position.
///
/// Round and sequence values wider than their fields are a programmer error
/// and are rejected outright rather than truncated.
///
/// Assumes a two-digit year of 10 or more: for years x0..x9 of a century
/// the leading zero of `yy` vanishes from the integer, the value falls
/// below 18 digits, and [`decode`] rejects it. Holds until 2100.
pub fn encode(created_at: DateTime<Utc>, round: u32, sequence: u32) -> Result<i64, MatchIdError> {
    if round as i64 >= ROUND_WIDTH {
        return Err(MatchIdError::RoundOverflow(round));
    }
    if sequence as i64 >= SEQUENCE_WIDTH {
        return Err(MatchIdError::SequenceOverflow(sequence));
    }

    Ok(hour_bucket(created_at) * BUCKET_WIDTH + round as i64 * SEQUENCE_WIDTH + sequence as i64)
}

/// Inverse of [`encode`], assuming fixed field widths.
pub fn decode(id: i64) -> Result<MatchIdParts, MatchIdError> {
    if !(MIN_ID..=MAX_ID).contains(&id) {
        return Err(MatchIdError::Malformed(id));
    }

    let sequence = (id % SEQUENCE_WIDTH) as u32;
    let rest = id / SEQUENCE_WIDTH;
    let round = (rest % ROUND_WIDTH) as u32;
    let rest = rest / ROUND_WIDTH;
    let hour = (rest % 100) as u32;
    let rest = rest / 100;
    let day = (rest % 100) as u32;
    let rest = rest / 100;
    let month = (rest % 100) as u32;
    let year = (rest / 100) as u32;

    Ok(MatchIdParts { year, month, day, hour, round, sequence })
}

/// Inclusive identifier bounds covering every match created on `date`.
/// External readers use these for string-range history queries; the local
/// history recorder uses them directly as `BETWEEN` bounds.
pub fn day_range(date: NaiveDate) -> (i64, i64) {
    let yy = (date.year() % 100) as i64;
    let prefix = yy * 10_000 + date.month() as i64 * 100 + date.day() as i64; // yyMMdd
    let low = prefix * 100 * BUCKET_WIDTH;
    let high = (prefix * 100 + 23) * BUCKET_WIDTH + BUCKET_WIDTH - 1;
    (low, high)
}
