//! `Content-Disposition` filename extraction for note downloads.

use regex::Regex;

/// Extract the `filename=` parameter, quoted or not.
///
/// Returns `default` when the header is missing, has no filename, or the
/// filename is empty after trimming quotes and whitespace.
pub fn filename_from_disposition(header: Option<&str>, default: &str) -> String {
    header
        .and_then(extract_filename)
        .map(|name| sanitize_file_name(&name, default))
        .unwrap_or_else(|| default.to_string())
}

fn extract_filename(header: &str) -> Option<String> {
    let pattern = Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;]*))"#).ok()?;
    let caps = pattern.captures(header)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Strip directory components so a server-supplied name cannot escape the
/// output directory.
pub fn sanitize_file_name(name: &str, default: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => default.to_string(),
        _ => base.to_string(),
    }
}
