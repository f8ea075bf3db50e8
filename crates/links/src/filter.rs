//! Link filtering by commentator or category name.

use crate::models::LinkItem;

/// Select links matching any of the given filters.
///
/// A filter of the form `"Name|Quoting"` selects Quoting-Commentary links
/// attributed to `Name`; a bare name selects links whose category *or*
/// collective title matches it. An empty filter list selects everything.
pub fn filter_links(links: &[LinkItem], filters: &[String]) -> Vec<LinkItem> {
    if filters.is_empty() {
        return links.to_vec();
    }
    links.iter().filter(|link| filters.iter().any(|f| matches(link, f))).cloned().collect()
}

/// Count the links a filter selects.
pub fn link_count(links: &[LinkItem], filters: &[String]) -> usize {
    if filters.is_empty() {
        return links.len();
    }
    links.iter().filter(|link| filters.iter().any(|f| matches(link, f))).count()
}

fn matches(link: &LinkItem, filter: &str) -> bool {
    if let Some(name) = filter.strip_suffix("|Quoting") {
        return link.category == "Quoting Commentary" && link.collective_title.en == name;
    }
    link.category == filter || link.collective_title.en == filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleByLang;
    use rstest::rstest;

    fn link(category: &str, collective: &str) -> LinkItem {
        LinkItem {
            category: category.into(),
            collective_title: TitleByLang { en: collective.into(), he: String::new() },
            ..LinkItem::default()
        }
    }

    fn sample() -> Vec<LinkItem> {
        vec![
            link("Commentary", "Rashi"),
            link("Commentary", "Ibn Ezra"),
            link("Quoting Commentary", "Rashi"),
            link("Midrash", ""),
        ]
    }

    #[rstest]
    #[case("Rashi", 2)] // collective title matches in both categories
    #[case("Commentary", 2)]
    #[case("Rashi|Quoting", 1)]
    #[case("Ibn Ezra|Quoting", 0)]
    #[case("Midrash", 1)]
    #[case("Nobody", 0)]
    fn filter_grammar(#[case] filter: &str, #[case] expected: usize) {
        assert_eq!(link_count(&sample(), &[filter.to_string()]), expected);
        assert_eq!(filter_links(&sample(), &[filter.to_string()]).len(), expected);
    }

    #[test]
    fn empty_filter_selects_everything() {
        assert_eq!(link_count(&sample(), &[]), 4);
    }

    #[test]
    fn multiple_filters_union() {
        let filters = vec!["Midrash".to_string(), "Ibn Ezra".to_string()];
        assert_eq!(link_count(&sample(), &filters), 2);
    }
}
