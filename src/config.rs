/// Tunables and storage key names

pub const KEY_SITES: &str = "customSites";
pub const KEY_SHOW_DEBUG: &str = "showDebugOutput";
pub const KEY_TARGET_URL: &str = "targetUrl";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Wait between inserting the referrer meta tag and clicking the hidden link
    pub forward_delay_ms: u32,
    /// Idle time before the icon tray slides back out of view
    pub tray_hide_delay_ms: u32,
    /// Maximum number of lines kept by the debug log
    pub log_capacity: usize,
    pub referrer_policy: String,
    /// Prefix the site URL is appended to when building favicon URLs
    pub favicon_service: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            forward_delay_ms: 500,
            tray_hide_delay_ms: 1000,
            log_capacity: 500,
            referrer_policy: "unsafe-url".to_string(),
            favicon_service: "https://www.google.com/s2/favicons?domain=".to_string(),
        }
    }
}

impl Config {
    pub fn favicon_url(&self, site_url: &str) -> String {
        format!("{}{}", self.favicon_service, site_url)
    }
}
