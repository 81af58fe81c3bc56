//! Deterministic event identifiers.

use sha2::{Digest, Sha256};

use crate::row::SessionType;

/// Google requires caller-supplied event ids to be lowercase alphanumeric;
/// the hex digest already satisfies that, the tag keeps our ids recognizable.
const ID_TAG: &str = "cls";

/// Hex characters kept from the digest (80 bits).
const ID_DIGEST_LEN: usize = 20;

/// Stable id for one (course, session type, day, start time) slot.
///
/// The same four inputs always hash to the same id across runs and
/// processes, which is what makes re-imports idempotent: the calendar
/// rejects the duplicate id instead of creating a second event.
///
/// `start_time` must be the raw text from the input row, not a reparsed or
/// reformatted value, since formatting participates in identity.
/// There is no collision fallback; 80 bits over a handful of courses is an
/// accepted residual risk.
pub fn generate_event_id(
    course_code: &str,
    session_type: SessionType,
    day: &str,
    start_time: &str,
) -> String {
    let raw = format!("{}-{}-{}-{}", course_code, session_type, day, start_time);
    let digest = hex::encode(Sha256::digest(raw.as_bytes()));
    format!("{}{}", ID_TAG, &digest[..ID_DIGEST_LEN])
}
