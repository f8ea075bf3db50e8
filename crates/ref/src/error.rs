//! Ref Parse Error Types
//!
//! Parse failures are part of the normal data flow here — a search box
//! feeds arbitrary strings through the parser to decide whether they are
//! refs at all — so the error is a small, cloneable value type rather than
//! a location-tracked error tree. Infrastructure failures elsewhere in the
//! workspace use `exn`; this deliberately doesn't.

use derive_more::{Display, Error};

/// Why a citation string failed to parse or format.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum RefParseError {
    /// No known work matches any prefix of the query.
    #[display("Unknown book.")]
    UnknownBook,
    /// The part after the book name is not a valid section path.
    #[display("Bad section string.")]
    BadSectionString,
    /// A structured ref is missing its book or section paths.
    #[display("Bad input.")]
    BadInput,
}
