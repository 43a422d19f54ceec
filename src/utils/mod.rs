//! Utility functions and helpers.

pub mod disposition;
pub mod http;
pub mod time;

use url::Url;

use crate::error::Result;

/// Join a base URL and a path, keeping any path prefix on the base.
pub fn join_url(base: &str, path: &str) -> Result<Url> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Ok(Url::parse(&base)?.join(path.trim_start_matches('/'))?)
}
