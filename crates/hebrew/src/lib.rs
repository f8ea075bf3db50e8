//! Hebrew numeral codec and Talmudic folio addressing.
//!
//! Everything in this crate is a pure function over strings and integers:
//! encoding/decoding of Hebrew numerals (including the geresh-marked
//! thousands notation used for years), the two-sided daf page addressing
//! used by Talmudic works, and a couple of small script helpers.
//!
//! The codec deliberately has no error type. A value that cannot be
//! represented (zero, out of range, or one of the ambiguous whole-thousands
//! forms) encodes to `None`, and a string containing characters outside the
//! numeral tables decodes to `None`. Callers are expected to check.

mod daf;
mod numeral;
mod script;

pub use crate::daf::{Amud, daf_to_int, int_to_daf};
pub use crate::numeral::{decode_hebrew_numeral, encode_hebrew_numeral, encode_hebrew_numeral_bare};
pub use crate::script::{is_hebrew_text, strip_nikkud};

/// Geresh (U+05F3), marks a single-letter numeral and separates the
/// thousands bucket in large numerals.
pub const GERESH: char = '\u{05F3}';
/// Gershayim (U+05F4), inserted before the final letter of a multi-letter
/// numeral.
pub const GERSHAYIM: char = '\u{05F4}';
