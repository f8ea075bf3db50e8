//! Integer ↔ Hebrew numeral conversion.
//!
//! The traditional scheme is additive: letters carry fixed values
//! (א=1 … ט=9, י=10 … צ=90, ק=100 … ת=400) and a numeral is the sum of its
//! letters, largest first. Values of 500 and above are written by stacking
//! hundreds letters (תק=500 … תתת=1200). From 1300 upward a thousands
//! bucket is split off and marked with a geresh (ה׳תשפ״ד = 5784).
//!
//! Two letter pairs are never written: יה (15) and יו (16) spell fragments
//! of the divine name and are replaced by the reserved tokens טו and טז.

use crate::{GERESH, GERSHAYIM};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Reserved token for 15.
const TET_VAV: &str = "\u{05D8}\u{05D5}";
/// Reserved token for 16.
const TET_ZAYIN: &str = "\u{05D8}\u{05D6}";
/// "Thousands", used for whole-thousands year notation (ה׳ אלפים = 5000).
const ALAFIM: &str = "\u{05D0}\u{05DC}\u{05E4}\u{05D9}\u{05DD}";

/// The numeral table, value → letters. Entries above 400 are the
/// conventional stacked-hundreds spellings; the additive decode handles
/// them without any special casing.
static NUM_TO_HEB: LazyLock<HashMap<u32, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (1, "\u{05D0}"),
        (2, "\u{05D1}"),
        (3, "\u{05D2}"),
        (4, "\u{05D3}"),
        (5, "\u{05D4}"),
        (6, "\u{05D5}"),
        (7, "\u{05D6}"),
        (8, "\u{05D7}"),
        (9, "\u{05D8}"),
        (10, "\u{05D9}"),
        (20, "\u{05DB}"),
        (30, "\u{05DC}"),
        (40, "\u{05DE}"),
        (50, "\u{05E0}"),
        (60, "\u{05E1}"),
        (70, "\u{05E2}"),
        (80, "\u{05E4}"),
        (90, "\u{05E6}"),
        (100, "\u{05E7}"),
        (200, "\u{05E8}"),
        (300, "\u{05E9}"),
        (400, "\u{05EA}"),
        (500, "\u{05EA}\u{05E7}"),
        (600, "\u{05EA}\u{05E8}"),
        (700, "\u{05EA}\u{05E9}"),
        (800, "\u{05EA}\u{05EA}"),
        (900, "\u{05EA}\u{05EA}\u{05E7}"),
        (1000, "\u{05EA}\u{05EA}\u{05E8}"),
        (1100, "\u{05EA}\u{05EA}\u{05E9}"),
        (1200, "\u{05EA}\u{05EA}\u{05EA}"),
    ])
});

/// Letter → value, including final forms (sofit letters decode to the same
/// value as their medial counterparts).
static HEB_TO_NUM: LazyLock<HashMap<char, u32>> = LazyLock::new(|| {
    HashMap::from([
        ('\u{05D0}', 1),
        ('\u{05D1}', 2),
        ('\u{05D2}', 3),
        ('\u{05D3}', 4),
        ('\u{05D4}', 5),
        ('\u{05D5}', 6),
        ('\u{05D6}', 7),
        ('\u{05D7}', 8),
        ('\u{05D8}', 9),
        ('\u{05D9}', 10),
        ('\u{05DB}', 20),
        ('\u{05DA}', 20),
        ('\u{05DC}', 30),
        ('\u{05DE}', 40),
        ('\u{05DD}', 40),
        ('\u{05E0}', 50),
        ('\u{05DF}', 50),
        ('\u{05E1}', 60),
        ('\u{05E2}', 70),
        ('\u{05E4}', 80),
        ('\u{05E3}', 80),
        ('\u{05E6}', 90),
        ('\u{05E5}', 90),
        ('\u{05E7}', 100),
        ('\u{05E8}', 200),
        ('\u{05E9}', 300),
        ('\u{05EA}', 400),
    ])
});

/// Orthographic substitutions applied to assembled large numerals. The
/// first two are the divine-name avoidance pairs; רע ("evil") is reordered
/// to ער by the same convention.
const SUBSTITUTIONS: [(&str, &str); 3] = [
    ("\u{05D9}\u{05D4}", TET_VAV),
    ("\u{05D9}\u{05D5}", TET_ZAYIN),
    ("\u{05E8}\u{05E2}", "\u{05E2}\u{05E8}"),
];

/// Encode an integer as a punctuated Hebrew numeral.
///
/// Multi-letter numerals get a gershayim before the final letter, single
/// letters get a trailing geresh. Returns `None` for zero, for values above
/// 9999, and for the whole-thousands values 2000/3000/4000 whose spellings
/// collide with the plain digits under this scheme.
///
/// # Examples
///
/// ```
/// use mikra_hebrew::encode_hebrew_numeral;
/// assert_eq!(encode_hebrew_numeral(5).as_deref(), Some("ה׳"));
/// assert_eq!(encode_hebrew_numeral(18).as_deref(), Some("י״ח"));
/// assert_eq!(encode_hebrew_numeral(5784).as_deref(), Some("ה׳תשפ״ד"));
/// assert_eq!(encode_hebrew_numeral(3000), None);
/// ```
pub fn encode_hebrew_numeral(n: u32) -> Option<String> {
    encode(n, true)
}

/// Encode an integer without the geresh/gershayim punctuation marks.
///
/// The geresh separating a thousands bucket is structural, not punctuation,
/// and is emitted either way.
pub fn encode_hebrew_numeral_bare(n: u32) -> Option<String> {
    encode(n, false)
}

fn encode(n: u32, punctuation: bool) -> Option<String> {
    if n == 0 || n > 9999 {
        return None;
    }
    if n >= 1300 {
        return encode_large(n, punctuation);
    }
    let body = encode_small(n)?;
    Some(if punctuation { punctuate(&body) } else { body })
}

/// Additive encoding for 1..=1299. The 15/16 tokens are substituted under
/// any hundreds prefix (115 is קטו, not קיה).
fn encode_small(n: u32) -> Option<String> {
    let mut out = String::new();
    let mut n = n;
    if n >= 100 {
        out.push_str(NUM_TO_HEB.get(&(n / 100 * 100))?);
        n %= 100;
    }
    match n {
        0 => {}
        15 => out.push_str(TET_VAV),
        16 => out.push_str(TET_ZAYIN),
        _ => {
            if n >= 10 {
                out.push_str(NUM_TO_HEB.get(&(n / 10 * 10))?);
                n %= 10;
            }
            if n > 0 {
                out.push_str(NUM_TO_HEB.get(&n)?);
            }
        }
    }
    Some(out)
}

/// Thousands-bucket encoding for 1300..=9999.
fn encode_large(n: u32, punctuation: bool) -> Option<String> {
    let thousands = n / 1000;
    let remainder = n % 1000;
    if remainder == 0 {
        // A bare thousands digit with a geresh reads as the plain digit
        // (ב׳ is 2, not 2000), so 2000-4000 have no spelling here. From
        // 5000 up, year notation is unambiguous and conventional.
        if thousands < 5 {
            return None;
        }
        return Some(format!("{}{GERESH} {ALAFIM}", encode_small(thousands)?));
    }
    let head = encode_small(thousands)?;
    let tail = encode_small(remainder)?;
    let mut body = format!("{head}{GERESH}{tail}");
    for (from, to) in SUBSTITUTIONS {
        body = body.replace(from, to);
    }
    Some(if punctuation { punctuate(&body) } else { body })
}

fn punctuate(body: &str) -> String {
    let mut chars: Vec<char> = body.chars().collect();
    if chars.len() > 1 {
        chars.insert(chars.len() - 1, GERSHAYIM);
        chars.into_iter().collect()
    } else {
        format!("{body}{GERESH}")
    }
}

/// Decode a Hebrew numeral string back to its integer value.
///
/// The reserved 15/16 tokens are matched whole; otherwise punctuation is
/// stripped, an interior geresh splits off a ×1000 thousands bucket, and
/// the remaining letters are summed. Any character outside the numeral
/// table makes the whole decode `None`.
///
/// # Examples
///
/// ```
/// use mikra_hebrew::decode_hebrew_numeral;
/// assert_eq!(decode_hebrew_numeral("י״ח"), Some(18));
/// assert_eq!(decode_hebrew_numeral("ה׳תשפ״ד"), Some(5784));
/// assert_eq!(decode_hebrew_numeral("טו"), Some(15));
/// assert_eq!(decode_hebrew_numeral("hello"), None);
/// ```
pub fn decode_hebrew_numeral(h: &str) -> Option<u32> {
    let h = h.trim();
    if h.is_empty() {
        return None;
    }
    if h == TET_VAV {
        return Some(15);
    }
    if h == TET_ZAYIN {
        return Some(16);
    }
    if let Some(prefix) = h.strip_suffix(ALAFIM) {
        let digits = prefix.trim_end().trim_end_matches(GERESH);
        return decode_letters(digits)?.checked_mul(1000);
    }
    let stripped: String = h.chars().filter(|&c| c != GERSHAYIM && c != '"').collect();
    if let Some(pos) = stripped.find(GERESH) {
        let head = &stripped[..pos];
        let tail = &stripped[pos + GERESH.len_utf8()..];
        if !head.is_empty() && !tail.is_empty() {
            return Some(decode_letters(head)? * 1000 + decode_letters(tail)?);
        }
    }
    decode_letters(stripped.trim_end_matches([GERESH, '\'']))
}

fn decode_letters(s: &str) -> Option<u32> {
    let mut n = 0;
    for c in s.chars() {
        n += HEB_TO_NUM.get(&c)?;
    }
    if n == 0 { None } else { Some(n) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "א׳")]
    #[case(5, "ה׳")]
    #[case(10, "י׳")]
    #[case(11, "י״א")]
    #[case(18, "י״ח")]
    #[case(100, "ק׳")]
    #[case(112, "קי״ב")]
    #[case(304, "ש״ד")]
    #[case(500, "ת״ק")]
    #[case(999, "תתקצ״ט")]
    #[case(1000, "תת״ר")]
    #[case(1299, "תתתצ״ט")]
    #[case(5784, "ה׳תשפ״ד")]
    fn encode_known_values(#[case] n: u32, #[case] expected: &str) {
        assert_eq!(encode_hebrew_numeral(n).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(15, "טו")]
    #[case(16, "טז")]
    #[case(115, "קטו")]
    #[case(116, "קטז")]
    #[case(915, "תתקטו")]
    fn reserved_tokens_under_any_hundreds(#[case] n: u32, #[case] expected: &str) {
        // The divine-name tokens must appear whatever the hundreds prefix.
        assert_eq!(encode_hebrew_numeral_bare(n).as_deref(), Some(expected));
        assert_eq!(decode_hebrew_numeral(expected), Some(n));
    }

    #[rstest]
    #[case(0)]
    #[case(2000)]
    #[case(3000)]
    #[case(4000)]
    #[case(10_000)]
    fn unencodable_values(#[case] n: u32) {
        assert_eq!(encode_hebrew_numeral(n), None);
        assert_eq!(encode_hebrew_numeral_bare(n), None);
    }

    #[test]
    fn whole_thousands_year_notation() {
        let five_thousand = encode_hebrew_numeral(5000).unwrap();
        assert_eq!(five_thousand, "ה׳ אלפים");
        assert_eq!(decode_hebrew_numeral(&five_thousand), Some(5000));
        assert_eq!(decode_hebrew_numeral(&encode_hebrew_numeral(9000).unwrap()), Some(9000));
    }

    #[test]
    fn round_trip() {
        for n in 1..=5000u32 {
            if matches!(n, 2000 | 3000 | 4000) {
                continue;
            }
            let encoded = encode_hebrew_numeral(n)
                .unwrap_or_else(|| panic!("{n} failed to encode"));
            assert_eq!(decode_hebrew_numeral(&encoded), Some(n), "round trip failed for {n} ({encoded})");
        }
    }

    #[test]
    fn round_trip_bare() {
        for n in 1..=5000u32 {
            if matches!(n, 2000 | 3000 | 4000) {
                continue;
            }
            let encoded = encode_hebrew_numeral_bare(n).unwrap();
            assert_eq!(decode_hebrew_numeral(&encoded), Some(n));
        }
    }

    #[test]
    fn evil_pair_is_reordered() {
        // 270 in a large numeral would assemble as רע; the substitution
        // pass reorders it without changing the additive sum.
        let encoded = encode_hebrew_numeral(5270).unwrap();
        assert!(!encoded.contains("\u{05E8}\u{05E2}"));
        assert_eq!(decode_hebrew_numeral(&encoded), Some(5270));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("12")]
    #[case("׳")]
    fn undecodable_strings(#[case] s: &str) {
        assert_eq!(decode_hebrew_numeral(s), None);
    }

    #[test]
    fn decode_accepts_final_forms() {
        // ן decodes like נ.
        assert_eq!(decode_hebrew_numeral("\u{05E7}\u{05DF}"), Some(150));
    }
}
