//! The structured reference value type and its formatters.

use crate::error::RefParseError;
use crate::section::Section;
use serde::{Deserialize, Serialize};

/// A parsed citation: a book, an ordered section path, and the inclusive
/// end of the addressed range.
///
/// `sections` and `to_sections` always have the same length, and are
/// element-wise equal for a non-ranging ref. `ref_str` is the canonical
/// dotted form produced by [`make_ref`] ("Genesis.1.1-5").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRef {
    pub book: String,
    /// Root index title; equals `book` except for nested/complex works.
    pub index: String,
    pub sections: Vec<Section>,
    #[serde(rename = "toSections")]
    pub to_sections: Vec<Section>,
    #[serde(rename = "ref")]
    pub ref_str: String,
}

impl StructuredRef {
    /// True when the ref addresses a range rather than a single point.
    pub fn is_ranging(&self) -> bool {
        self.sections != self.to_sections
    }

    /// True when the range crosses a section boundary (any level above the
    /// leaf differs between start and end).
    pub fn is_spanning(&self) -> bool {
        self.sections.len() > 1
            && self.sections[..self.sections.len() - 1] != self.to_sections[..self.to_sections.len() - 1]
    }

    /// The containing section: the same ref with the final level dropped
    /// (for a ranged ref, the section containing the start). A book-level
    /// or depth-1 ref is its own section.
    pub fn section_ref(&self) -> StructuredRef {
        if self.sections.len() <= 1 {
            let mut point = self.clone();
            point.to_sections = point.sections.clone();
            point.ref_str = make_ref(&point).unwrap_or_else(|_| self.ref_str.clone());
            return point;
        }
        let sections: Vec<Section> = self.sections[..self.sections.len() - 1].to_vec();
        let mut section = StructuredRef {
            book: self.book.clone(),
            index: self.index.clone(),
            to_sections: sections.clone(),
            sections,
            ref_str: String::new(),
        };
        section.ref_str = make_ref(&section).unwrap_or_default();
        section
    }

    /// Expand a ranged ref into its constituent segment refs.
    ///
    /// Within a single section this enumerates the leaf range exactly.
    /// When the range spans section boundaries, enumerating the interior
    /// would require per-section segment counts that only cached text data
    /// can supply, so this falls back to returning one ref per spanned
    /// *section*, which callers must treat as coarse.
    pub fn split_ranging(&self) -> Vec<StructuredRef> {
        if !self.is_ranging() {
            return vec![self.clone()];
        }
        if !self.is_spanning() {
            let (Some(from), Some(to)) = (self.sections.last(), self.to_sections.last()) else {
                return vec![self.clone()];
            };
            let mut out = Vec::new();
            for ordinal in from.ordinal()..=to.ordinal() {
                let mut sections = self.sections.clone();
                *sections.last_mut().unwrap() = from.advanced_by(ordinal - from.ordinal());
                let mut seg = StructuredRef {
                    book: self.book.clone(),
                    index: self.index.clone(),
                    to_sections: sections.clone(),
                    sections,
                    ref_str: String::new(),
                };
                seg.ref_str = make_ref(&seg).unwrap_or_default();
                out.push(seg);
            }
            return out;
        }
        self.split_spanning_sections()
    }

    /// One ref per spanned section. Exact segment enumeration inside the
    /// interior sections is only possible with cached text data; callers
    /// holding that data should split against it instead.
    fn split_spanning_sections(&self) -> Vec<StructuredRef> {
        let leaf = self.sections.len() - 1;
        // is_spanning guarantees a divergent level above the leaf.
        let level = self.sections[..leaf]
            .iter()
            .zip(&self.to_sections)
            .position(|(a, b)| a != b)
            .unwrap_or(leaf - 1);
        let from = &self.sections[level];
        let to = &self.to_sections[level];
        let mut out = Vec::new();
        for ordinal in from.ordinal()..=to.ordinal() {
            let sections: Vec<Section> = self.sections[..level]
                .iter()
                .cloned()
                .chain([from.advanced_by(ordinal - from.ordinal())])
                .collect();
            let mut section = StructuredRef {
                book: self.book.clone(),
                index: self.index.clone(),
                to_sections: sections.clone(),
                sections,
                ref_str: String::new(),
            };
            section.ref_str = make_ref(&section).unwrap_or_default();
            out.push(section);
        }
        out
    }
}

/// Build the canonical dotted ref string for a structured ref.
///
/// Spaces in the book title become underscores, section levels are joined
/// with dots, and a range is collapsed to the minimal suffix that differs
/// between `sections` and `to_sections`:
///
/// ```
/// use mikra_ref::{StructuredRef, Section, make_ref};
/// let sref = StructuredRef {
///     book: "Genesis".into(),
///     index: "Genesis".into(),
///     sections: vec![Section::Num(1), Section::Num(1)],
///     to_sections: vec![Section::Num(1), Section::Num(5)],
///     ref_str: String::new(),
/// };
/// assert_eq!(make_ref(&sref).unwrap(), "Genesis.1.1-5");
/// ```
pub fn make_ref(sref: &StructuredRef) -> Result<String, RefParseError> {
    if sref.book.is_empty() || sref.sections.len() != sref.to_sections.len() {
        return Err(RefParseError::BadInput);
    }
    let mut out = sref.book.replace(' ', "_");
    for section in &sref.sections {
        out.push('.');
        out.push_str(&section.to_string());
    }
    if let Some(diverge) = range_divergence(&sref.sections, &sref.to_sections) {
        out.push('-');
        let suffix: Vec<String> = sref.to_sections[diverge..].iter().map(Section::to_string).collect();
        out.push_str(&suffix.join("."));
    }
    Ok(out)
}

/// Build the human display form: "Genesis 1:4-6", "Shabbat 15a".
pub fn human_ref(sref: &StructuredRef) -> Result<String, RefParseError> {
    if sref.book.is_empty() || sref.sections.len() != sref.to_sections.len() {
        return Err(RefParseError::BadInput);
    }
    let mut out = sref.book.clone();
    if !sref.sections.is_empty() {
        out.push(' ');
        let path: Vec<String> = sref.sections.iter().map(Section::to_string).collect();
        out.push_str(&path.join(":"));
    }
    if let Some(diverge) = range_divergence(&sref.sections, &sref.to_sections) {
        out.push('-');
        let suffix: Vec<String> = sref.to_sections[diverge..].iter().map(Section::to_string).collect();
        out.push_str(&suffix.join(":"));
    }
    Ok(out)
}

/// First level at which the range end differs from the start; `None` for a
/// non-ranging ref.
fn range_divergence(sections: &[Section], to_sections: &[Section]) -> Option<usize> {
    sections.iter().zip(to_sections).position(|(a, b)| a != b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sref(book: &str, sections: &[&str], to_sections: &[&str]) -> StructuredRef {
        StructuredRef {
            book: book.into(),
            index: book.into(),
            sections: sections.iter().map(|s| s.parse().unwrap()).collect(),
            to_sections: to_sections.iter().map(|s| s.parse().unwrap()).collect(),
            ref_str: String::new(),
        }
    }

    #[rstest]
    #[case(sref("Genesis", &["1", "1"], &["1", "5"]), "Genesis.1.1-5")]
    #[case(sref("Genesis", &["1", "1"], &["2", "5"]), "Genesis.1.1-2.5")]
    #[case(sref("Genesis", &["1", "4"], &["1", "4"]), "Genesis.1.4")]
    #[case(sref("Genesis", &[], &[]), "Genesis")]
    #[case(sref("Song of Songs", &["1", "2"], &["1", "2"]), "Song_of_Songs.1.2")]
    #[case(sref("Shabbat", &["15a"], &["15b"]), "Shabbat.15a-15b")]
    fn canonical_form(#[case] input: StructuredRef, #[case] expected: &str) {
        assert_eq!(make_ref(&input).unwrap(), expected);
    }

    #[rstest]
    #[case(sref("Genesis", &["1", "4"], &["1", "6"]), "Genesis 1:4-6")]
    #[case(sref("Genesis", &["1", "16"], &["2", "4"]), "Genesis 1:16-2:4")]
    #[case(sref("Shabbat", &["15a"], &["15a"]), "Shabbat 15a")]
    #[case(sref("Genesis", &[], &[]), "Genesis")]
    fn human_form(#[case] input: StructuredRef, #[case] expected: &str) {
        assert_eq!(human_ref(&input).unwrap(), expected);
    }

    #[test]
    fn bad_input_is_an_error_value() {
        let mut broken = sref("Genesis", &["1", "1"], &["1", "5"]);
        broken.to_sections.pop();
        assert_eq!(make_ref(&broken), Err(RefParseError::BadInput));
        broken.book.clear();
        assert_eq!(human_ref(&broken), Err(RefParseError::BadInput));
    }

    #[test]
    fn section_ref_drops_the_leaf_level() {
        let seg = sref("Genesis", &["1", "4"], &["1", "6"]);
        assert_eq!(seg.section_ref().ref_str, "Genesis.1");
    }

    #[test]
    fn split_within_one_section() {
        let range = sref("Genesis", &["1", "4"], &["1", "6"]);
        let segments: Vec<String> = range.split_ranging().into_iter().map(|r| r.ref_str).collect();
        assert_eq!(segments, vec!["Genesis.1.4", "Genesis.1.5", "Genesis.1.6"]);
    }

    #[test]
    fn split_with_folio_addressing() {
        let range = sref("Shabbat", &["2a"], &["3a"]);
        let segments: Vec<String> = range.split_ranging().into_iter().map(|r| r.ref_str).collect();
        assert_eq!(segments, vec!["Shabbat.2a", "Shabbat.2b", "Shabbat.3a"]);
    }

    #[test]
    fn spanning_split_falls_back_to_sections() {
        let range = sref("Genesis", &["1", "16"], &["3", "4"]);
        let segments: Vec<String> = range.split_ranging().into_iter().map(|r| r.ref_str).collect();
        assert_eq!(segments, vec!["Genesis.1", "Genesis.2", "Genesis.3"]);
    }

    #[test]
    fn spanning_detection() {
        assert!(sref("Genesis", &["1", "16"], &["2", "4"]).is_spanning());
        assert!(!sref("Genesis", &["1", "1"], &["1", "5"]).is_spanning());
        assert!(!sref("Shabbat", &["2a"], &["3b"]).is_spanning());
    }
}
