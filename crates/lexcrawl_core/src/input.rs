use url::Url;

/// Split a URL list into entries: one per line, trimmed, blank lines and
/// `#` comments dropped. Order and duplicates are preserved.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect()
}

pub fn is_absolute_http_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
