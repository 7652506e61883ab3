/// Data structures for the referrer site registry
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A site the user can route links through
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteRecord {
    pub url: String,
    #[serde(rename = "fuzzyMatch", default)]
    pub fuzzy_match: bool,
}

impl SiteRecord {
    pub fn new(url: &str, fuzzy_match: bool) -> SiteRecord {
        SiteRecord {
            url: url.to_string(),
            fuzzy_match,
        }
    }

    /// Hostname of the record's URL, lowercased by the parser
    pub fn hostname(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.url).map_err(|e| Error::invalid_url(&self.url, e))?;
        parsed
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_url(&self.url, "URL has no host"))
    }

    /// Tooltip shown on the tray icon
    pub fn title(&self) -> String {
        let host = self.hostname().unwrap_or_else(|_| self.url.clone());
        if self.fuzzy_match {
            format!("{} (fuzzy match)", host)
        } else {
            host
        }
    }
}

/// Seed list used when nothing has been stored yet
pub fn default_sites() -> Vec<SiteRecord> {
    vec![
        SiteRecord::new("https://www.google.com", false),
        SiteRecord::new("https://www.baidu.com", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname() {
        let site = SiteRecord::new("https://www.Google.com/some/path", false);
        assert_eq!(site.hostname(), Ok("www.google.com".to_string()));
    }

    #[test]
    fn test_hostname_invalid() {
        let site = SiteRecord::new("not a url", false);
        assert!(matches!(site.hostname(), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_hostname_missing_host() {
        let site = SiteRecord::new("mailto:someone@example.com", false);
        assert!(matches!(site.hostname(), Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_title() {
        assert_eq!(SiteRecord::new("https://www.baidu.com", false).title(), "www.baidu.com");
        assert_eq!(
            SiteRecord::new("https://news.ycombinator.com", true).title(),
            "news.ycombinator.com (fuzzy match)"
        );
        assert_eq!(SiteRecord::new("broken", false).title(), "broken");
    }

    #[test]
    fn test_serialization_field_names() {
        let site = SiteRecord::new("https://www.google.com", true);
        let json = serde_json::to_value(&site).unwrap();

        assert_eq!(json["url"], "https://www.google.com");
        assert_eq!(json["fuzzyMatch"], true);
    }

    #[test]
    fn test_deserialize_without_fuzzy_flag() {
        let site: SiteRecord = serde_json::from_str(r#"{"url":"https://a.example"}"#).unwrap();
        assert!(!site.fuzzy_match);
    }

    #[test]
    fn test_default_sites() {
        let sites = default_sites();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].url, "https://www.google.com");
        assert_eq!(sites[1].url, "https://www.baidu.com");
        assert!(sites.iter().all(|s| !s.fuzzy_match));
    }
}
