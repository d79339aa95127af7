use url::Url;

/// Returns true when `text` parses as an absolute URL with a host.
///
/// Surrounding whitespace is ignored. Parse failures fold into `false`.
pub fn is_valid_url(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => url.has_host() && !url.cannot_be_a_base(),
        Err(_) => false,
    }
}
