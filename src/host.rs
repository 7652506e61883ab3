/// Capabilities the userscript manager and the page provide
///
/// The core only talks to these traits; `web` implements them over
/// `GM_*` and `web-sys`, tests implement them in memory.
use serde_json::Value;

use crate::error::Result;

/// Persisted key-value storage surviving page loads
pub trait KeyValueStore {
    fn get_value(&self, key: &str) -> Option<Value>;
    fn set_value(&self, key: &str, value: Value);
}

/// Opens URLs in a new, active browser tab
pub trait TabOpener {
    fn open_in_tab(&self, url: &str);
}

/// The document the script runs in, as seen by the forwarding step
pub trait ForwardingPage {
    /// Append `<meta name="referrer" content="{policy}">` to the head
    fn insert_referrer_policy(&self, policy: &str) -> Result<()>;

    /// Append a hidden anchor pointing at `href` to the body
    fn attach_hidden_link(&self, href: &str) -> Result<Box<dyn HiddenLink>>;
}

pub trait HiddenLink {
    /// Click the link programmatically
    fn activate(&self) -> Result<()>;
}
