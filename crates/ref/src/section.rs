//! The tagged section address type.

use mikra_hebrew::{Amud, daf_to_int, int_to_daf};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// One level of a section path. Most works address sections with plain
/// integers; Talmudic works address their top level by folio ("15a").
///
/// Sections serialize as strings ("4", "15a") to match the wire form, and
/// order numerically — folio ordering goes through the flat side index, so
/// `2a < 2b < 3a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    Num(u32),
    Daf { page: u32, amud: Amud },
}

impl Section {
    /// Position of this section on a numeric axis, for ordering and range
    /// enumeration. Folio addresses map through their zero-based side
    /// index; plain numbers map through themselves.
    pub fn ordinal(&self) -> u32 {
        match self {
            Section::Num(n) => *n,
            Section::Daf { .. } => {
                // Representable because the value was parsed from u32.
                daf_to_int(&self.to_string()).unwrap_or(0) as u32
            }
        }
    }

    /// The section at `ordinal() + n` on the same axis.
    pub fn advanced_by(&self, n: u32) -> Section {
        match self {
            Section::Num(v) => Section::Num(v + n),
            Section::Daf { .. } => {
                let label = int_to_daf(self.ordinal() as usize + n as usize);
                label.parse().unwrap_or_else(|_| self.clone())
            }
        }
    }

    pub fn is_folio(&self) -> bool {
        matches!(self, Section::Daf { .. })
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Section::Num(n) => write!(f, "{n}"),
            Section::Daf { page, amud } => write!(f, "{page}{amud}"),
        }
    }
}

impl FromStr for Section {
    type Err = ();

    /// Accepts `\d+` as a numeric section and `\d+[ab]` as a folio.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(());
        }
        if let Some(side) = s.strip_suffix(['a', 'b']) {
            let page: u32 = side.parse().map_err(|_| ())?;
            if page == 0 {
                return Err(());
            }
            let amud = if s.ends_with('a') { Amud::A } else { Amud::B };
            return Ok(Section::Daf { page, amud });
        }
        s.parse::<u32>().map(Section::Num).map_err(|_| ())
    }
}

impl PartialOrd for Section {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Section {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl Serialize for Section {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The wire is inconsistent: sections arrive as JSON numbers for
        // numeric addressing and strings for folio addressing.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Num(u32),
            Str(String),
        }
        match Wire::deserialize(deserializer)? {
            Wire::Num(n) => Ok(Section::Num(n)),
            Wire::Str(s) => s.parse().map_err(|_| serde::de::Error::custom(format!("invalid section: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("4", Section::Num(4))]
    #[case("15a", Section::Daf { page: 15, amud: Amud::A })]
    #[case("2b", Section::Daf { page: 2, amud: Amud::B })]
    fn parse_display_round_trip(#[case] input: &str, #[case] expected: Section) {
        let parsed: Section = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("a")]
    #[case("0a")]
    #[case("4c")]
    #[case("one")]
    fn rejects_malformed(#[case] input: &str) {
        assert!(input.parse::<Section>().is_err());
    }

    #[test]
    fn folio_ordering_is_by_side() {
        let a: Section = "2a".parse().unwrap();
        let b: Section = "2b".parse().unwrap();
        let c: Section = "3a".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn advancing_a_folio_crosses_sides() {
        let start: Section = "2a".parse().unwrap();
        assert_eq!(start.advanced_by(1).to_string(), "2b");
        assert_eq!(start.advanced_by(2).to_string(), "3a");
    }

    #[test]
    fn serde_accepts_numbers_and_strings() {
        let sections: Vec<Section> = serde_json::from_str(r#"[1, "15a"]"#).unwrap();
        assert_eq!(sections[0], Section::Num(1));
        assert_eq!(sections[1].to_string(), "15a");
        assert_eq!(serde_json::to_string(&sections).unwrap(), r#"["1","15a"]"#);
    }
}
