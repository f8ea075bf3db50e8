//! API endpoint URL construction.
//!
//! De-duplication is keyed by the exact URL string, so every query
//! parameter is emitted in one fixed order — two calls that mean the same
//! thing always produce byte-identical URLs.

use crate::config::ClientConfig;
use mikra_text::TextOptions;

/// Percent-encode the characters that would break path or query parsing.
/// Canonical refs are almost entirely URL-safe already; version titles
/// and free-text queries are not.
fn encode(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for c in component.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            '%' => out.push_str("%25"),
            '+' => out.push_str("%2B"),
            _ => out.push(c),
        }
    }
    out
}

pub fn text(config: &ClientConfig, ref_str: &str, opts: &TextOptions) -> String {
    let mut url = config.api_url(&format!("api/texts/{}", encode(ref_str)));
    url.push_str(&format!(
        "?commentary=0&context={}&pad=0&wrapLinks=0&wrapNamedEntities=0",
        u8::from(opts.context)
    ));
    if let Some(version) = &opts.en_version {
        url.push_str("&ven=");
        url.push_str(&encode(version));
    }
    if let Some(version) = &opts.he_version {
        url.push_str("&vhe=");
        url.push_str(&encode(version));
    }
    url
}

pub fn versions(config: &ClientConfig, ref_str: &str) -> String {
    config.api_url(&format!("api/texts/versions/{}", encode(ref_str)))
}

pub fn related(config: &ClientConfig, ref_str: &str) -> String {
    config.api_url(&format!("api/related/{}?with_sheet_links=1", encode(ref_str)))
}

pub fn name(config: &ClientConfig, query: &str, ref_only: bool, limit: Option<usize>) -> String {
    let mut url = config.api_url(&format!("api/name/{}?ref_only={}", encode(query), u8::from(ref_only)));
    if let Some(limit) = limit {
        url.push_str(&format!("&limit={limit}"));
    }
    url
}

pub fn bulk_text(config: &ClientConfig, refs: &[String]) -> String {
    let joined: Vec<String> = refs.iter().map(|r| encode(r)).collect();
    config.api_url(&format!("api/bulktext/{}", joined.join("|")))
}

pub fn bulk_sheets(config: &ClientConfig, ids: &[u64]) -> String {
    let joined: Vec<String> = ids.iter().map(u64::to_string).collect();
    config.api_url(&format!("api/v2/sheets/bulk/{}", joined.join("|")))
}

pub fn texts_post(config: &ClientConfig, ref_str: &str) -> String {
    config.api_url(&format!("api/texts/{}", encode(ref_str)))
}

pub fn links_post(config: &ClientConfig) -> String {
    config.api_url("api/links/")
}

pub fn link_delete(config: &ClientConfig, id: &str) -> String {
    config.api_url(&format!("api/links/{}", encode(id)))
}

pub fn notes_post(config: &ClientConfig) -> String {
    config.api_url("api/notes/")
}

pub fn note_delete(config: &ClientConfig, id: &str) -> String {
    config.api_url(&format!("api/notes/{}", encode(id)))
}

pub fn collections_post(config: &ClientConfig) -> String {
    config.api_url("api/collections")
}

pub fn subscribe(config: &ClientConfig, email: &str) -> String {
    config.api_url(&format!("api/subscribe/{}", encode(email)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig { base_url: "https://example.org".into(), state_dir: None }
    }

    #[test]
    fn text_url_parameter_order_is_fixed() {
        let opts = TextOptions {
            en_version: Some("The JPS Tanakh".into()),
            he_version: None,
            context: true,
        };
        assert_eq!(
            text(&config(), "Genesis.1.4", &opts),
            "https://example.org/api/texts/Genesis.1.4?commentary=0&context=1&pad=0&wrapLinks=0&wrapNamedEntities=0&ven=The%20JPS%20Tanakh"
        );
    }

    #[test]
    fn bulk_urls_join_with_pipes() {
        let refs = vec!["Genesis.1.4".to_string(), "Exodus.2.1".to_string()];
        assert_eq!(bulk_text(&config(), &refs), "https://example.org/api/bulktext/Genesis.1.4|Exodus.2.1");
        assert_eq!(bulk_sheets(&config(), &[3, 17]), "https://example.org/api/v2/sheets/bulk/3|17");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(
            name(&config(), "what & why?", false, Some(5)),
            "https://example.org/api/name/what%20%26%20why%3F?ref_only=0&limit=5"
        );
    }
}
