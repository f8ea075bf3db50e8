//! Script detection and normalization helpers.

/// Returns `true` when the majority of alphabetic characters in `s` are
/// Hebrew. Mixed strings (a Hebrew quote inside an English sentence) lean
/// whichever way the letter count leans; strings with no letters at all
/// are not Hebrew.
pub fn is_hebrew_text(s: &str) -> bool {
    let mut hebrew = 0usize;
    let mut other = 0usize;
    for c in s.chars() {
        if ('\u{05D0}'..='\u{05EA}').contains(&c) {
            hebrew += 1;
        } else if c.is_alphabetic() {
            other += 1;
        }
    }
    hebrew > 0 && hebrew >= other
}

/// Remove nikkud (vowel points) and cantillation marks, leaving only the
/// consonantal text. Useful for title matching, where sources vary in
/// whether they carry pointing.
pub fn strip_nikkud(s: &str) -> String {
    s.chars().filter(|c| !('\u{0591}'..='\u{05C7}').contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_hebrew() {
        assert!(is_hebrew_text("בראשית ברא"));
        assert!(!is_hebrew_text("Genesis 1:1"));
        assert!(!is_hebrew_text("12:4"));
    }

    #[test]
    fn mixed_text_leans_on_letter_count() {
        assert!(is_hebrew_text("בראשית a"));
        assert!(!is_hebrew_text("Genesis בר"));
    }

    #[test]
    fn strips_pointing() {
        assert_eq!(strip_nikkud("בְּרֵאשִׁית"), "בראשית");
        assert_eq!(strip_nikkud("Genesis"), "Genesis");
    }
}
