//! Citation parsing, formatting and the structured reference model.
//!
//! A *ref* is a citation string addressing a location in a work
//! ("Genesis 1:4", "Shabbat 15a", "Rashi on Genesis 2:3:1"). This crate
//! turns refs into a [`StructuredRef`] — book, ordered section path, and an
//! inclusive range end — and back again, against a [`TitleIndex`] of known
//! works.
//!
//! Parse failures are ordinary values, not panics or exceptions: every
//! entry point returns `Result<_, RefParseError>` and callers are expected
//! to branch on it. The parser memoizes per normalized query, successes
//! and failures alike, since the same handful of refs tend to be resolved
//! over and over while a reader navigates.

pub mod error;
pub mod fixtures;
mod parse;
mod section;
mod structured;
mod title;

pub use crate::error::RefParseError;
pub use crate::parse::RefParser;
pub use crate::section::Section;
pub use mikra_hebrew::Amud;
pub use crate::structured::{StructuredRef, human_ref, make_ref};
pub use crate::title::{Addressing, BookRecord, TitleIndex};
