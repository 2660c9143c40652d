//! Constant-time secret comparison.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compare two byte sequences of equal length in constant time.
///
/// Returns equality without branching on content: every byte is examined
/// regardless of where the first mismatch sits. Inputs of different lengths
/// compare unequal; length itself is treated as public.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Compare a candidate secret against the expected secret without leaking
/// timing information.
///
/// Both inputs are hashed to fixed-size SHA-256 digests before the
/// constant-time comparison. Hashing normalizes length, so the comparison
/// always runs over 32-byte buffers and the expected secret's length is
/// never observable through timing.
#[must_use]
pub fn timing_safe_match(candidate: &str, expected: &str) -> bool {
    let candidate_digest = Sha256::digest(candidate.as_bytes());
    let expected_digest = Sha256::digest(expected.as_bytes());
    constant_time_eq(candidate_digest.as_slice(), expected_digest.as_slice())
}
