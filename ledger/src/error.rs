//! Error types for the ledger core.
//!
//! One small enum per error *kind*, manual `Display`/`Error` impls, and
//! `From` composition rather than a single catch-all error.

use std::fmt;

/// Block/chain framing failures (kind 1 in the error handling design).
#[derive(Debug)]
pub enum FramingError {
    /// Input shorter than the fixed 144-byte header.
    TooShort { len: usize },
    /// A length-prefixed field claims more bytes than remain in the input.
    TruncatedField(&'static str),
    /// Trailing bytes left over after a fixed-size region was consumed.
    TrailingBytes,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::TooShort { len } => {
                write!(f, "block frame too short: {len} bytes, need at least 144")
            }
            FramingError::TruncatedField(name) => write!(f, "truncated field: {name}"),
            FramingError::TrailingBytes => write!(f, "trailing bytes after framed region"),
        }
    }
}

impl std::error::Error for FramingError {}

/// Body-codec input-constraint failures (kind 7): these indicate a caller
/// bug, not adversarial input, so they surface as structured errors instead
/// of collapsing to a boolean.
#[derive(Debug)]
pub enum BodyError {
    /// `intro` exceeds the 65535-byte length-prefix limit.
    IntroTooLong(usize),
    /// Candidate data blob exceeds the 65535-byte length-prefix limit.
    CandidateDataTooLong(usize),
    /// Zero or more than 255 candidates.
    CandidateCountOutOfRange(usize),
    /// `number_of_winners >= number_of_candidates`.
    TooManyWinners { winners: u8, candidates: u8 },
    /// Two candidates in the same proposal hashed to the same value.
    DuplicateCandidateHash,
    /// A candidate's stored hash does not match `SHA256(data)`.
    CandidateHashMismatch,
    /// Framing problem underneath a structured body (reused from block
    /// framing since the wire rules are identical: BE integers, length
    /// prefixes, no padding).
    Framing(FramingError),
    /// Tag byte does not match any entry in the control-character registry.
    UnknownTag(u8),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::IntroTooLong(n) => write!(f, "intro too long: {n} bytes, max 65535"),
            BodyError::CandidateDataTooLong(n) => {
                write!(f, "candidate data too long: {n} bytes, max 65535")
            }
            BodyError::CandidateCountOutOfRange(n) => {
                write!(f, "candidate count out of range: {n}, must be 1..=255")
            }
            BodyError::TooManyWinners { winners, candidates } => write!(
                f,
                "number_of_winners ({winners}) must be less than number_of_candidates ({candidates})"
            ),
            BodyError::DuplicateCandidateHash => write!(f, "duplicate candidate hash"),
            BodyError::CandidateHashMismatch => {
                write!(f, "candidate hash does not match SHA256(data)")
            }
            BodyError::Framing(e) => write!(f, "{e}"),
            BodyError::UnknownTag(tag) => write!(f, "unknown control-character tag: {tag:#04x}"),
        }
    }
}

impl std::error::Error for BodyError {}

impl From<FramingError> for BodyError {
    fn from(e: FramingError) -> Self {
        BodyError::Framing(e)
    }
}

/// Tally-engine failures. Per the design, tally algorithms never throw on
/// invalid *ballots* (those are counted, not rejected) — this enum only
/// covers malformed *inputs* to the tally functions themselves.
#[derive(Debug)]
pub enum TallyError {
    /// `candidates` is empty.
    NoCandidates,
    /// `number_of_winners` is zero or exceeds the candidate count.
    InvalidWinnerCount { requested: usize, candidates: usize },
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyError::NoCandidates => write!(f, "tally requires at least one candidate"),
            TallyError::InvalidWinnerCount { requested, candidates } => write!(
                f,
                "invalid number_of_winners {requested} for {candidates} candidates"
            ),
        }
    }
}

impl std::error::Error for TallyError {}
