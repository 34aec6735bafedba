use url::Url;

/// Resolve a possibly-relative reference against the page URL.
///
/// Returns `None` for empty references and for references that do not parse;
/// scheme filtering is left to [`is_http_url`].
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    base.join(trimmed).ok()
}

pub fn is_http_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
