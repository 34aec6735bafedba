use chrono::NaiveDateTime;
use url::Url;

use crate::dedup::ContentDigest;

pub const DEFAULT_EXTENSION: &str = "jpg";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const URL_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "svg", "ico", "heic", "heif",
    "avif",
];

/// `{label}_{YYYYMMDD-HHMMSS}_{digest[0..8]}.{ext}` with filesystem-unsafe characters replaced.
///
/// The extension comes from the content type, then the URL path, then `jpg`.
pub fn build_file_name(
    class_label: &str,
    digest: &ContentDigest,
    content_type: &str,
    source_url: &Url,
    timestamp: NaiveDateTime,
) -> String {
    let extension = extension_for_content_type(content_type)
        .or_else(|| extension_from_url(source_url))
        .unwrap_or(DEFAULT_EXTENSION);
    let name = format!(
        "{class_label}_{ts}_{prefix}.{extension}",
        ts = timestamp.format(TIMESTAMP_FORMAT),
        prefix = digest.short(),
    );
    sanitize_file_name(&name)
}

/// Map a declared media type to a file extension. Parameters after `;` are ignored.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    let ext = match media_type.as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/svg+xml" => "svg",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        "image/heic" => "heic",
        "image/heif" => "heif",
        "image/avif" => "avif",
        _ => return None,
    };
    Some(ext)
}

/// Extension of the URL path if it is a recognized image suffix (case-insensitive).
pub fn extension_from_url(url: &Url) -> Option<&'static str> {
    let path = url.path().to_ascii_lowercase();
    URL_EXTENSIONS.iter().copied().find(|ext| {
        path.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Replace each run of `\ / * ? : " < > |` with a single underscore.
pub fn sanitize_file_name(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if is_forbidden(c) {
            if !in_run {
                cleaned.push('_');
            }
            in_run = true;
        } else {
            cleaned.push(c);
            in_run = false;
        }
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}
