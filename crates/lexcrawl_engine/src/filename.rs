use chrono::{DateTime, Utc};
use url::Url;

/// Capture time as it appears in filenames.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// UTF-8 bytes, so the full name stays well under the common 255-byte limit.
const MAX_SLUG_BYTES: usize = 150;
const FALLBACK_SLUG: &str = "untitled";

/// Deterministic, filesystem-safe filename: `{slug}_{YYYYMMDD-HHMMSS}.md`.
///
/// `sequence` 1 is the plain name; 2 and up append `-{sequence}` to
/// separate documents that share slug and second.
pub fn document_filename(slug: &str, captured_at: DateTime<Utc>, sequence: u32) -> String {
    let stamp = captured_at.format(FILENAME_TIMESTAMP_FORMAT);
    if sequence <= 1 {
        format!("{slug}_{stamp}.md")
    } else {
        format!("{slug}_{stamp}-{sequence}.md")
    }
}

/// Slug of the title, or of the source URL when the title has nothing usable.
pub fn document_slug(title: &str, url: &str) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() {
        slugify(&url_slug_source(url))
    } else {
        slug
    };
    if slug.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    if is_reserved_windows_name(&slug) {
        return format!("{slug}_");
    }
    slug
}

/// Host, path and query of a URL, without the scheme.
fn url_slug_source(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            let mut source = parsed.host_str().unwrap_or_default().to_string();
            source.push_str(parsed.path());
            if let Some(query) = parsed.query() {
                source.push('-');
                source.push_str(query);
            }
            source
        }
        Err(_) => url.to_string(),
    }
}

/// Lowercase alphanumerics joined by single dashes, capped in length.
fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len().min(MAX_SLUG_BYTES));
    let mut piece = String::new();
    let mut pending_dash = false;
    for c in input.chars() {
        if !c.is_alphanumeric() {
            pending_dash = true;
            continue;
        }
        piece.clear();
        if pending_dash && !slug.is_empty() {
            piece.push('-');
        }
        piece.extend(c.to_lowercase());
        if slug.len() + piece.len() > MAX_SLUG_BYTES {
            break;
        }
        slug.push_str(&piece);
        pending_dash = false;
    }
    slug
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
