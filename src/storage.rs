/// Persisted state: the site registry, the debug flag and the pending target
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{KEY_SHOW_DEBUG, KEY_SITES, KEY_TARGET_URL};
use crate::domain::normalize_url;
use crate::error::{Error, Result};
use crate::host::KeyValueStore;
use crate::site::{SiteRecord, default_sites};

/// In-memory mirror of the persisted settings
///
/// Loaded once, written through on every mutation.
pub struct SiteStore {
    backend: Rc<dyn KeyValueStore>,
    sites: Vec<SiteRecord>,
    show_debug: bool,
    // Registry value as last read or written by this tab
    last_synced: Option<Value>,
}

/// Outcome of writing the registry back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReport {
    Saved,
    /// Another tab had changed the stored registry; its changes were replaced
    OverwroteExternalChange,
}

impl SiteStore {
    pub fn load(backend: Rc<dyn KeyValueStore>) -> Self {
        let raw_sites = backend.get_value(KEY_SITES);
        let sites = read_sites(raw_sites.clone());
        let show_debug = read_or_default(KEY_SHOW_DEBUG, backend.get_value(KEY_SHOW_DEBUG), || false);

        SiteStore {
            backend,
            sites,
            show_debug,
            last_synced: raw_sites,
        }
    }

    pub fn sites(&self) -> &[SiteRecord] {
        &self.sites
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    /// Validate, normalize and append a new record
    pub fn add_site(&mut self, raw_url: &str, fuzzy_match: bool) -> Result<(SiteRecord, SaveReport)> {
        let url = normalize_url(raw_url)?;
        let site = SiteRecord { url, fuzzy_match };

        self.sites.push(site.clone());
        let report = self.save_sites();
        Ok((site, report))
    }

    pub fn remove_site(&mut self, index: usize) -> Result<(SiteRecord, SaveReport)> {
        self.check_index(index)?;

        let removed = self.sites.remove(index);
        let report = self.save_sites();
        Ok((removed, report))
    }

    pub fn set_fuzzy_match(&mut self, index: usize, fuzzy_match: bool) -> Result<(SiteRecord, SaveReport)> {
        self.check_index(index)?;

        self.sites[index].fuzzy_match = fuzzy_match;
        let report = self.save_sites();
        Ok((self.sites[index].clone(), report))
    }

    pub fn set_show_debug(&mut self, show: bool) {
        self.show_debug = show;
        self.backend.set_value(KEY_SHOW_DEBUG, Value::Bool(show));
    }

    /// Store the link to forward to once the referrer tab loads.
    /// Overwrites any target still pending.
    pub fn set_pending_target(&self, url: &str) {
        self.backend
            .set_value(KEY_TARGET_URL, Value::String(url.to_string()));
    }

    /// Read and clear the pending target
    pub fn take_pending_target(&self) -> Option<String> {
        let target = match self.backend.get_value(KEY_TARGET_URL) {
            Some(Value::String(url)) if !url.is_empty() => url,
            _ => return None,
        };

        self.backend.set_value(KEY_TARGET_URL, Value::Null);
        Some(target)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.sites.len() {
            Ok(())
        } else {
            Err(Error::NoSuchSite {
                index,
                len: self.sites.len(),
            })
        }
    }

    /// Last write wins; a concurrent change from another tab is reported
    fn save_sites(&mut self) -> SaveReport {
        let stored = self.backend.get_value(KEY_SITES);
        let report = if stored.is_some() && stored != self.last_synced {
            log::warn!("{} was changed in another tab; overwriting", KEY_SITES);
            SaveReport::OverwroteExternalChange
        } else {
            SaveReport::Saved
        };

        let value = to_value(&self.sites);
        self.backend.set_value(KEY_SITES, value.clone());
        self.last_synced = Some(value);
        report
    }
}

fn read_or_default<T: DeserializeOwned>(key: &str, raw: Option<Value>, default: impl FnOnce() -> T) -> T {
    match raw {
        None | Some(Value::Null) => default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            let err = Error::MalformedValue {
                key: key.to_string(),
                reason: e.to_string(),
            };
            log::warn!("{}; using default", err);
            default()
        }),
    }
}

/// A registry that is not a list falls back to the seed sites; a bad record
/// inside a list is skipped and the rest are kept.
fn read_sites(raw: Option<Value>) -> Vec<SiteRecord> {
    let records = match raw {
        Some(Value::Array(records)) => records,
        other => return read_or_default(KEY_SITES, other, default_sites),
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value::<SiteRecord>(record)
                .inspect_err(|e| {
                    let err = Error::MalformedValue {
                        key: format!("{}[{}]", KEY_SITES, index),
                        reason: e.to_string(),
                    };
                    log::warn!("{}; skipping record", err);
                })
                .ok()
        })
        .collect()
}

fn to_value<T: Serialize>(value: &T) -> Value {
    // Site records are plain strings and bools, which always serialize
    serde_json::to_value(value).unwrap_or(Value::Null)
}
