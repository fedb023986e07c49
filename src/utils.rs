//! URL helpers shared by both extractors

use url::Url;

/// Drop everything from the first `?`. Idempotent.
pub fn clean_image_url(src: &str) -> String {
    src.split_once('?').map_or(src, |(path, _)| path).to_string()
}

/// Optional-input form used when reading `src` attributes
pub fn clean_image_attr(src: Option<&str>) -> Option<String> {
    src.filter(|s| !s.is_empty()).map(clean_image_url)
}

/// Resolve an href against the fixed site origin. Absolute addresses are
/// passed through unchanged; an unparseable origin leaves the href as is.
pub fn resolve_site_url(origin: &str, href: &str) -> String {
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
