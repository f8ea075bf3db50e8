//! Citation string parsing.

use crate::error::RefParseError;
use crate::section::Section;
use crate::structured::{StructuredRef, make_ref};
use crate::title::{Addressing, TitleIndex};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};
use tracing::instrument;

/// Valid section paths: an integer with an optional folio side, followed
/// by any number of plain integers.
static SECTION_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[ab]?( \d+)*$").expect("static regex"));
/// Valid range-end paths, which may also end on a folio side.
static TO_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[ab]?( \d+[ab]?)*$").expect("static regex"));

/// Parses citation strings against a [`TitleIndex`].
///
/// Every query is normalized first (underscores and separator punctuation
/// to spaces, first letter capitalized), then matched against the longest
/// known title at a word boundary. Results — including failures — are
/// memoized per normalized query, so repeated resolution of the same refs
/// is a map lookup.
#[derive(Debug)]
pub struct RefParser {
    index: Arc<TitleIndex>,
    memo: Mutex<HashMap<String, Result<StructuredRef, RefParseError>>>,
}

impl RefParser {
    pub fn new(index: Arc<TitleIndex>) -> Self {
        Self { index, memo: Mutex::new(HashMap::new()) }
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    /// Parse a citation string into a [`StructuredRef`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use mikra_ref::{RefParser, RefParseError, fixtures};
    ///
    /// let parser = RefParser::new(Arc::new(fixtures::sample_index()));
    /// let sref = parser.parse("Genesis 1:4-6").unwrap();
    /// assert_eq!(sref.book, "Genesis");
    /// assert_eq!(sref.ref_str, "Genesis.1.4-6");
    /// assert_eq!(parser.parse("Zzzznotabook 1:1"), Err(RefParseError::UnknownBook));
    /// ```
    #[instrument(skip(self))]
    pub fn parse(&self, query: &str) -> Result<StructuredRef, RefParseError> {
        let normalized = normalize(query);
        if let Some(hit) = self.memo.lock().unwrap().get(&normalized) {
            return hit.clone();
        }
        let result = self.parse_normalized(&normalized);
        self.memo.lock().unwrap().insert(normalized, result.clone());
        result
    }

    /// True when the string parses to a ref with a known book.
    pub fn is_ref(&self, query: &str) -> bool {
        self.parse(query).is_ok_and(|sref| !sref.book.is_empty())
    }

    fn parse_normalized(&self, normalized: &str) -> Result<StructuredRef, RefParseError> {
        // A single hyphen splits the query into a from-part and a to-part.
        let (base, to_part) = match normalized.split_once('-') {
            Some((base, to_part)) => (base.trim(), Some(to_part.trim())),
            None => (normalized, None),
        };

        let words: Vec<&str> = base.split(' ').collect();
        let (record, consumed) = self.index.match_title(&words).ok_or(RefParseError::UnknownBook)?;

        let section_part = words[consumed..].join(" ");
        let sections = parse_section_path(&section_part)?;
        let to_sections = match to_part {
            Some(to_part) if !sections.is_empty() => align_to_sections(&sections, to_part)?,
            Some(_) => return Err(RefParseError::BadSectionString),
            None => sections.clone(),
        };
        // A folio token only means anything for folio-addressed works.
        if record.addressing != Addressing::Folio
            && sections.iter().chain(&to_sections).any(Section::is_folio)
        {
            return Err(RefParseError::BadSectionString);
        }

        let mut sref = StructuredRef {
            book: record.title.clone(),
            index: record.index_title.clone(),
            sections,
            to_sections,
            ref_str: String::new(),
        };
        sref.ref_str = make_ref(&sref).map_err(|_| RefParseError::BadSectionString)?;
        Ok(sref)
    }
}

/// Normalize a raw query: underscores and colon/period separators become
/// spaces, runs of whitespace collapse, and the first letter is
/// capitalized.
fn normalize(query: &str) -> String {
    let spaced = query.replace(['_', ':', '.'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => collapsed,
    }
}

fn parse_section_path(part: &str) -> Result<Vec<Section>, RefParseError> {
    if part.is_empty() {
        return Ok(Vec::new());
    }
    if !SECTION_PATH.is_match(part) {
        return Err(RefParseError::BadSectionString);
    }
    part.split(' ')
        .map(|token| token.parse::<Section>().map_err(|_| RefParseError::BadSectionString))
        .collect()
}

/// Right-align the to-part against the from-part's section path: a to-part
/// with fewer components addresses only the trailing, most specific
/// levels ("Genesis 1:4-6" ends at 1:6, not 6:_).
fn align_to_sections(sections: &[Section], to_part: &str) -> Result<Vec<Section>, RefParseError> {
    if to_part.is_empty() || !TO_PATH.is_match(to_part) {
        return Err(RefParseError::BadSectionString);
    }
    let components: Vec<Section> = to_part
        .split(' ')
        .map(|token| token.parse::<Section>().map_err(|_| RefParseError::BadSectionString))
        .collect::<Result<_, _>>()?;
    let Some(offset) = sections.len().checked_sub(components.len()) else {
        return Err(RefParseError::BadSectionString);
    };
    let mut to_sections = sections.to_vec();
    to_sections[offset..].clone_from_slice(&components);
    Ok(to_sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use rstest::rstest;

    fn parser() -> RefParser {
        RefParser::new(Arc::new(fixtures::sample_index()))
    }

    #[test]
    fn parses_a_simple_range() {
        let sref = parser().parse("Genesis 1:4-6").unwrap();
        assert_eq!(sref.book, "Genesis");
        assert_eq!(sref.index, "Genesis");
        assert_eq!(sref.sections, vec![Section::Num(1), Section::Num(4)]);
        assert_eq!(sref.to_sections, vec![Section::Num(1), Section::Num(6)]);
        assert_eq!(crate::human_ref(&sref).unwrap(), "Genesis 1:4-6");
    }

    #[rstest]
    #[case("Genesis 1:4", "Genesis.1.4")]
    #[case("genesis 1:4", "Genesis.1.4")]
    #[case("Genesis_1.4", "Genesis.1.4")]
    #[case("Genesis   1  4", "Genesis.1.4")]
    #[case("Genesis 1:4-6", "Genesis.1.4-6")]
    #[case("Genesis 1:16-2:4", "Genesis.1.16-2.4")]
    #[case("Genesis", "Genesis")]
    #[case("Song of Songs 1:2", "Song_of_Songs.1.2")]
    #[case("Song_of_Songs.1.2", "Song_of_Songs.1.2")]
    #[case("Shabbat 15a", "Shabbat.15a")]
    #[case("Shabbat 15a-15b", "Shabbat.15a-15b")]
    #[case("Shabbat 15a:3", "Shabbat.15a.3")]
    #[case("Rashi on Genesis 2:3:1", "Rashi_on_Genesis.2.3.1")]
    #[case("Bereshit 1:4", "Genesis.1.4")]
    fn canonicalizes(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(parser().parse(query).unwrap().ref_str, expected);
    }

    #[rstest]
    #[case("Zzzznotabook 1:1", RefParseError::UnknownBook)]
    #[case("Jobs 1:1", RefParseError::UnknownBook)]
    #[case("", RefParseError::UnknownBook)]
    #[case("Genesis one", RefParseError::BadSectionString)]
    #[case("Genesis 1:x", RefParseError::BadSectionString)]
    #[case("Genesis 15a", RefParseError::BadSectionString)]
    #[case("Genesis 1:4-6:7:8", RefParseError::BadSectionString)]
    #[case("Genesis-1", RefParseError::BadSectionString)]
    fn failures_are_values(#[case] query: &str, #[case] expected: RefParseError) {
        assert_eq!(parser().parse(query), Err(expected));
    }

    #[test]
    fn memoizes_successes_and_failures() {
        let parser = parser();
        assert!(parser.parse("Genesis 1:4").is_ok());
        assert!(parser.parse("Nope 1:1").is_err());
        let memo = parser.memo.lock().unwrap();
        assert!(memo.get("Genesis 1 4").is_some_and(|r| r.is_ok()));
        assert!(memo.get("Nope 1 1").is_some_and(|r| r.is_err()));
    }

    #[test]
    fn round_trips_through_the_formatter() {
        let parser = parser();
        for query in ["Genesis 1:4", "Genesis 1:4-6", "Shabbat 15a-15b", "Song of Songs 1:2", "Rashi on Genesis 2:3:1"]
        {
            let first = parser.parse(query).unwrap();
            let second = parser.parse(&first.ref_str).unwrap();
            assert_eq!(first.book, second.book);
            assert_eq!(first.sections, second.sections);
            assert_eq!(first.to_sections, second.to_sections);
        }
    }

    #[test]
    fn is_ref_matches_parse_success() {
        let parser = parser();
        assert!(parser.is_ref("Genesis 1:4"));
        assert!(parser.is_ref("Genesis"));
        assert!(!parser.is_ref("totally not a ref"));
    }
}
