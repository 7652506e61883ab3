/// URL normalization and hostname matching against the site registry
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::site::SiteRecord;

static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern compiles"));

/// Prefix `https://` unless the URL already starts with an http(s) scheme
///
/// Examples:
/// - example.com → https://example.com
/// - http://example.com → http://example.com
/// - HTTPS://example.com → HTTPS://example.com
pub fn format_url(url: &str) -> String {
    if HTTP_SCHEME.is_match(url) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Trim, reject empty input, add a scheme and check the result parses with a host
pub fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyUrl);
    }

    let formatted = format_url(trimmed);
    let parsed = url::Url::parse(&formatted).map_err(|e| Error::invalid_url(&formatted, e))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_url(&formatted, "URL has no host"));
    }

    Ok(formatted)
}

/// Does the page at `hostname` + `path` belong to `site`?
///
/// Exact records need the same hostname and the root path. Fuzzy records
/// match when either hostname contains the other; the path is ignored.
pub fn site_matches(site: &SiteRecord, hostname: &str, path: &str) -> Result<bool> {
    let site_hostname = site.hostname()?;

    if hostname.is_empty() {
        return Ok(false);
    }

    Ok(if site.fuzzy_match {
        hostname.contains(&site_hostname) || site_hostname.contains(hostname)
    } else {
        site_hostname == hostname && path == "/"
    })
}

/// First record in registry order matching the current page
///
/// Records with a malformed URL are reported and skipped.
pub fn match_site<'a>(hostname: &str, path: &str, sites: &'a [SiteRecord]) -> Option<&'a SiteRecord> {
    sites.iter().find(|site| match site_matches(site, hostname, path) {
        Ok(matched) => matched,
        Err(e) => {
            log::warn!("Skipping site record: {}", e);
            false
        }
    })
}
