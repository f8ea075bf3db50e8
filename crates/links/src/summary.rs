//! Category/book roll-up of a ref's links.

use crate::models::LinkItem;
use std::collections::BTreeMap;

/// Per-book link count inside a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCount {
    pub book: String,
    pub count: usize,
}

/// One category's row in a link summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummaryEntry {
    pub category: String,
    pub count: usize,
    pub books: Vec<BookCount>,
}

/// Commentators surfaced ahead of the alphabet inside "Commentary".
const COMMENTATOR_PRIORITY: [&str; 8] =
    ["Rashi", "Ibn Ezra", "Ramban", "Sforno", "Rashbam", "Tosafot", "Rabbeinu Bahya", "Or HaChaim"];

/// Category orders that override the global one, keyed by the primary
/// category of the ref being summarized.
fn override_order(primary_category: &str) -> Option<&'static [&'static str]> {
    match primary_category {
        "Tanakh" => {
            Some(&["Commentary", "Quoting Commentary", "Targum", "Midrash", "Mishnah", "Talmud", "Halakhah", "Kabbalah"])
        }
        "Talmud" => Some(&["Commentary", "Quoting Commentary", "Targum", "Halakhah", "Midrash", "Tanakh", "Mishnah"]),
        _ => None,
    }
}

/// Summarize links into ordered categories with per-book counts.
///
/// Category precedence is the override order for the ref's own primary
/// category when one is defined, and otherwise the global
/// table-of-contents order with "Commentary" pinned first and "Targum"
/// pinned third. Inside "Commentary" the classic commentators come first
/// in their traditional order, then the rest alphabetically; other
/// categories list books alphabetically.
pub fn link_summary(links: &[LinkItem], primary_category: Option<&str>, toc_order: &[String]) -> Vec<LinkSummaryEntry> {
    let mut by_category: BTreeMap<&str, Vec<&LinkItem>> = BTreeMap::new();
    for link in links {
        if link.category.is_empty() {
            continue;
        }
        by_category.entry(&link.category).or_default().push(link);
    }

    let order: Vec<String> = match primary_category.and_then(override_order) {
        Some(overridden) => overridden.iter().map(|c| c.to_string()).collect(),
        None => global_order(toc_order),
    };
    let position = |category: &str| order.iter().position(|c| c == category).unwrap_or(order.len());

    let mut entries: Vec<LinkSummaryEntry> = by_category
        .into_iter()
        .map(|(category, links)| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for link in &links {
                *counts.entry(link.book_name()).or_default() += 1;
            }
            let mut books: Vec<BookCount> =
                counts.into_iter().map(|(book, count)| BookCount { book: book.to_string(), count }).collect();
            if category == "Commentary" {
                sort_commentary_books(&mut books);
            }
            LinkSummaryEntry { category: category.to_string(), count: links.len(), books }
        })
        .collect();

    entries.sort_by(|a, b| position(&a.category).cmp(&position(&b.category)).then_with(|| a.category.cmp(&b.category)));
    entries
}

/// The global ordering: table-of-contents order with Commentary forced to
/// the front and Targum to third place.
fn global_order(toc_order: &[String]) -> Vec<String> {
    let mut order: Vec<String> =
        toc_order.iter().filter(|c| *c != "Commentary" && *c != "Targum").cloned().collect();
    order.insert(0, "Commentary".to_string());
    let targum_slot = order.len().min(2);
    order.insert(targum_slot, "Targum".to_string());
    order
}

fn sort_commentary_books(books: &mut [BookCount]) {
    let priority =
        |book: &str| COMMENTATOR_PRIORITY.iter().position(|p| *p == book).unwrap_or(COMMENTATOR_PRIORITY.len());
    books.sort_by(|a, b| priority(&a.book).cmp(&priority(&b.book)).then_with(|| a.book.cmp(&b.book)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleByLang;

    fn link(category: &str, book: &str) -> LinkItem {
        LinkItem {
            category: category.into(),
            collective_title: TitleByLang { en: book.into(), he: String::new() },
            ..LinkItem::default()
        }
    }

    fn toc() -> Vec<String> {
        ["Tanakh", "Mishnah", "Talmud", "Midrash", "Halakhah"].map(String::from).to_vec()
    }

    #[test]
    fn commentary_first_targum_third_in_global_order() {
        let links = vec![
            link("Midrash", "Genesis Rabbah"),
            link("Targum", "Onkelos"),
            link("Commentary", "Rashi"),
            link("Tanakh", "Isaiah"),
        ];
        let summary = link_summary(&links, None, &toc());
        let categories: Vec<&str> = summary.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories[0], "Commentary");
        assert_eq!(categories[2], "Targum");
    }

    #[test]
    fn override_order_wins_for_known_primary_categories() {
        let links = vec![link("Midrash", "Genesis Rabbah"), link("Targum", "Onkelos"), link("Commentary", "Rashi")];
        let summary = link_summary(&links, Some("Tanakh"), &toc());
        let categories: Vec<&str> = summary.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Commentary", "Targum", "Midrash"]);
    }

    #[test]
    fn commentators_sort_by_tradition_then_alphabet() {
        let links = vec![
            link("Commentary", "Abarbanel"),
            link("Commentary", "Ibn Ezra"),
            link("Commentary", "Rashi"),
            link("Commentary", "Chizkuni"),
            link("Commentary", "Rashi"),
        ];
        let summary = link_summary(&links, Some("Tanakh"), &toc());
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].count, 5);
        let books: Vec<&str> = summary[0].books.iter().map(|b| b.book.as_str()).collect();
        assert_eq!(books, vec!["Rashi", "Ibn Ezra", "Abarbanel", "Chizkuni"]);
        assert_eq!(summary[0].books[0].count, 2);
    }

    #[test]
    fn unknown_categories_sort_after_known_ones() {
        let links = vec![link("Web Pages", "Example"), link("Commentary", "Rashi")];
        let summary = link_summary(&links, None, &toc());
        assert_eq!(summary[0].category, "Commentary");
        assert_eq!(summary[1].category, "Web Pages");
    }

    #[test]
    fn uncategorized_links_are_ignored() {
        let links = vec![link("", "Mystery")];
        assert!(link_summary(&links, None, &toc()).is_empty());
    }
}
