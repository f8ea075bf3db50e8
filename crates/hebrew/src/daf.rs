//! Two-sided daf (folio) page addressing.
//!
//! Talmudic works are paginated by physical leaf, with each leaf split into
//! a recto ("a") and verso ("b") side. Internally segments are counted with
//! a flat zero-based index; these helpers convert between that index and
//! the printed label.

use derive_more::Display;
use std::str::FromStr;

/// Which side of the folio.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Amud {
    #[display("a")]
    A,
    #[display("b")]
    B,
}

impl FromStr for Amud {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Amud::A),
            "b" => Ok(Amud::B),
            _ => Err(()),
        }
    }
}

/// Convert a zero-based side index to a daf label.
///
/// Counting starts at `1a`: index 0 is `1a`, index 1 is `1b`, index 28 is
/// `15a`. (Printed editions start their text at daf 2, but the address
/// space itself begins at 1.)
///
/// # Examples
///
/// ```
/// use mikra_hebrew::int_to_daf;
/// assert_eq!(int_to_daf(0), "1a");
/// assert_eq!(int_to_daf(28), "15a");
/// assert_eq!(int_to_daf(29), "15b");
/// ```
pub fn int_to_daf(i: usize) -> String {
    let page = i / 2 + 1;
    let amud = if i % 2 == 0 { Amud::A } else { Amud::B };
    format!("{page}{amud}")
}

/// Parse a daf label back to its zero-based side index. Exact inverse of
/// [`int_to_daf`]; anything that isn't `<positive integer>[ab]` is `None`.
pub fn daf_to_int(daf: &str) -> Option<usize> {
    let split = daf.len().checked_sub(1)?;
    if !daf.is_char_boundary(split) {
        return None;
    }
    let (page, amud) = daf.split_at(split);
    let page: usize = page.parse().ok()?;
    if page == 0 {
        return None;
    }
    let base = (page - 1) * 2;
    match amud.parse::<Amud>().ok()? {
        Amud::A => Some(base),
        Amud::B => Some(base + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "1a")]
    #[case(1, "1b")]
    #[case(2, "2a")]
    #[case(28, "15a")]
    #[case(29, "15b")]
    fn label_for_index(#[case] i: usize, #[case] label: &str) {
        assert_eq!(int_to_daf(i), label);
        assert_eq!(daf_to_int(label), Some(i));
    }

    #[test]
    fn bijection() {
        for i in 0..1000 {
            assert_eq!(daf_to_int(&int_to_daf(i)), Some(i));
        }
    }

    #[rstest]
    #[case("")]
    #[case("15")]
    #[case("a")]
    #[case("0a")]
    #[case("15c")]
    #[case("-2a")]
    fn rejects_malformed_labels(#[case] label: &str) {
        assert_eq!(daf_to_int(label), None);
    }
}
