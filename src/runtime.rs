/// Everything one injected page needs: settings, log, tray and the
/// handlers the UI and page listeners dispatch to.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::Config;
use crate::debug_log::DebugLog;
use crate::domain::{match_site, normalize_url};
use crate::error::{Error, Result};
use crate::host::{ForwardingPage, KeyValueStore, TabOpener};
use crate::redirect::{self, LoadOutcome, PageLocation};
use crate::scheduler::Scheduler;
use crate::site::SiteRecord;
use crate::storage::{SaveReport, SiteStore};
use crate::tray::Tray;

pub struct Runtime {
    config: Config,
    store: RefCell<SiteStore>,
    log: DebugLog,
    opener: Rc<dyn TabOpener>,
    scheduler: Rc<dyn Scheduler>,
    tray: Tray,
    manage_open: Cell<bool>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Runtime {
    pub fn new(
        config: Config,
        backend: Rc<dyn KeyValueStore>,
        opener: Rc<dyn TabOpener>,
        scheduler: Rc<dyn Scheduler>,
        log: DebugLog,
    ) -> Self {
        let tray = Tray::new(Rc::clone(&scheduler), config.tray_hide_delay_ms);
        Runtime {
            config,
            store: RefCell::new(SiteStore::load(backend)),
            log,
            opener,
            scheduler,
            tray,
            manage_open: Cell::new(false),
            listener: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &DebugLog {
        &self.log
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn sites(&self) -> Vec<SiteRecord> {
        self.store.borrow().sites().to_vec()
    }

    pub fn show_debug(&self) -> bool {
        self.store.borrow().show_debug()
    }

    pub fn is_manage_open(&self) -> bool {
        self.manage_open.get()
    }

    /// Re-render hook for registry, debug flag and modal changes
    pub fn subscribe(&self, listener: Rc<dyn Fn()>) {
        *self.listener.borrow_mut() = Some(listener);
    }

    pub fn unsubscribe(&self) {
        self.listener.borrow_mut().take();
    }

    /// Arm the tray's initial collapse
    pub fn start(&self) {
        self.tray.start();
        let count = self.store.borrow().sites().len();
        self.log.log(format!("Icons initialized ({} sites)", count));
    }

    /// Remember `target_url` and open `referer_site` in a new tab
    pub fn redirect(&self, referer_site: &str, target_url: &str) -> Result<String> {
        self.log.log(format!("Preparing redirect: from {} to {}", referer_site, target_url));

        let target = normalize_url(target_url).inspect_err(|e| {
            self.log.log(format!("Redirect aborted: {}", e));
        })?;

        self.store.borrow().set_pending_target(&target);
        self.opener.open_in_tab(referer_site);
        Ok(target)
    }

    /// Drop on tray icon `index`. Empty payloads are ignored.
    pub fn icon_dropped(&self, index: usize, payload: Option<String>) -> Result<Option<String>> {
        self.tray.icon_dropped(index);

        let Some(dragged) = crate::drag::drop_payload(payload) else {
            return Ok(None);
        };

        let site = self.site_at(index)?;
        self.log.log(format!("Dropped URL: {}", dragged));
        self.redirect(&site.url, &dragged).map(Some)
    }

    /// Runs once per injection; forwards when this page is a registry site
    /// and a target is pending
    pub fn on_page_load(&self, location: &PageLocation, page: &dyn ForwardingPage) -> Result<LoadOutcome> {
        self.log.log(format!("Current page: {}{}", location.hostname, location.path));

        let matched = {
            let store = self.store.borrow();
            match_site(&location.hostname, &location.path, store.sites()).cloned()
        };
        let Some(site) = matched else {
            return Ok(LoadOutcome::Unmatched);
        };

        let Some(target) = self.store.borrow().take_pending_target() else {
            self.log.log("No redirect target pending");
            return Ok(LoadOutcome::DirectVisit(site));
        };
        self.log.log(format!("Found redirect target: {}", target));

        let task = redirect::forward(
            page,
            self.scheduler.as_ref(),
            &self.log,
            &self.config.referrer_policy,
            &target,
            self.config.forward_delay_ms,
        )
        .inspect_err(|e| self.log.log(format!("Forwarding failed: {}", e)))?;

        Ok(LoadOutcome::Forwarding { site, target, task })
    }

    /// Pointer-down over a hyperlink that was just made draggable
    pub fn link_marked_draggable(&self, href: &str) {
        self.log.log(format!("Link made draggable: {}", href));
    }

    /// Open the management modal. Returns false when it is already open.
    pub fn open_manage(&self) -> bool {
        if self.manage_open.replace(true) {
            self.log.log("Management panel already open");
            return false;
        }
        self.notify();
        true
    }

    pub fn close_manage(&self) {
        if self.manage_open.replace(false) {
            self.notify();
        }
    }

    pub fn add_site(&self, raw_url: &str, fuzzy_match: bool) -> Result<SiteRecord> {
        let added = self.store.borrow_mut().add_site(raw_url, fuzzy_match);
        let site = self.after_save(added)?;
        self.log.log(format!("Added site: {} (fuzzy match: {})", site.url, site.fuzzy_match));
        self.notify();
        Ok(site)
    }

    pub fn remove_site(&self, index: usize) -> Result<SiteRecord> {
        let removed = self.store.borrow_mut().remove_site(index);
        let site = self.after_save(removed)?;
        self.log.log(format!("Removed site: {}", site.url));
        self.notify();
        Ok(site)
    }

    pub fn set_fuzzy_match(&self, index: usize, fuzzy_match: bool) -> Result<SiteRecord> {
        let updated = self.store.borrow_mut().set_fuzzy_match(index, fuzzy_match);
        let site = self.after_save(updated)?;
        self.log.log(format!("Updated fuzzy match: {} (fuzzy match: {})", site.url, site.fuzzy_match));
        self.notify();
        Ok(site)
    }

    pub fn set_show_debug(&self, show: bool) {
        self.store.borrow_mut().set_show_debug(show);
        self.log.log(if show { "Debug output shown" } else { "Debug output hidden" });
        self.notify();
    }

    fn site_at(&self, index: usize) -> Result<SiteRecord> {
        let store = self.store.borrow();
        store.sites().get(index).cloned().ok_or(Error::NoSuchSite {
            index,
            len: store.sites().len(),
        })
    }

    fn after_save(&self, result: Result<(SiteRecord, SaveReport)>) -> Result<SiteRecord> {
        match result {
            Ok((site, SaveReport::Saved)) => Ok(site),
            Ok((site, SaveReport::OverwroteExternalChange)) => {
                self.log.log("Site list was changed in another tab; those changes were overwritten");
                Ok(site)
            }
            Err(e) => {
                self.log.log(format!("Site list not changed: {}", e));
                Err(e)
            }
        }
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KEY_SHOW_DEBUG, KEY_TARGET_URL};
    use crate::debug_log::fixed_clock;
    use crate::host::testing::{MemoryStore, RecordingOpener, RecordingPage};
    use crate::scheduler::ManualScheduler;
    use serde_json::{Value, json};

    struct Harness {
        backend: Rc<MemoryStore>,
        opener: Rc<RecordingOpener>,
        scheduler: Rc<ManualScheduler>,
        runtime: Runtime,
    }

    fn harness_with(backend: Rc<MemoryStore>) -> Harness {
        let opener = Rc::new(RecordingOpener::default());
        let scheduler = ManualScheduler::new();
        let runtime = Runtime::new(
            Config::default(),
            Rc::clone(&backend) as Rc<dyn KeyValueStore>,
            Rc::clone(&opener) as Rc<dyn TabOpener>,
            Rc::clone(&scheduler) as Rc<dyn Scheduler>,
            DebugLog::new(100, fixed_clock()),
        );
        Harness {
            backend,
            opener,
            scheduler,
            runtime,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new())
    }

    /// Simulate the script being injected again into another page
    fn reload(h: &Harness) -> Harness {
        harness_with(Rc::clone(&h.backend))
    }

    #[test]
    fn test_redirect_stores_target_and_opens_referrer() {
        let h = harness();

        let target = h.runtime.redirect("https://www.google.com", "target.example/page").unwrap();

        assert_eq!(target, "https://target.example/page");
        assert_eq!(h.backend.get_value(KEY_TARGET_URL), Some(json!("https://target.example/page")));
        assert_eq!(*h.opener.opened.borrow(), vec!["https://www.google.com"]);
    }

    #[test]
    fn test_redirect_rejects_invalid_target() {
        let h = harness();

        let result = h.runtime.redirect("https://www.google.com", "not a url at all");

        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
        assert!(h.opener.opened.borrow().is_empty());
        assert_eq!(h.backend.get_value(KEY_TARGET_URL), None);
        assert!(h.runtime.log().text().contains("Redirect aborted"));
    }

    #[test]
    fn test_last_drop_wins() {
        let h = harness();
        h.runtime.redirect("https://www.google.com", "https://one.example").unwrap();
        h.runtime.redirect("https://www.baidu.com", "https://two.example").unwrap();

        assert_eq!(h.backend.get_value(KEY_TARGET_URL), Some(json!("https://two.example")));
    }

    #[test]
    fn test_icon_drop_redirects_through_icon_site() {
        let h = harness();

        let target = h.runtime.icon_dropped(1, Some("https://news.example/a".to_string())).unwrap();

        assert_eq!(target.as_deref(), Some("https://news.example/a"));
        assert_eq!(*h.opener.opened.borrow(), vec!["https://www.baidu.com"]);
    }

    #[test]
    fn test_icon_drop_ignores_empty_payload() {
        let h = harness();

        assert_eq!(h.runtime.icon_dropped(0, Some(String::new())), Ok(None));
        assert_eq!(h.runtime.icon_dropped(0, None), Ok(None));
        assert!(h.opener.opened.borrow().is_empty());
        assert!(h.backend.writes().is_empty());
    }

    #[test]
    fn test_icon_drop_on_missing_site() {
        let h = harness();
        assert_eq!(
            h.runtime.icon_dropped(7, Some("https://a.example".to_string())),
            Err(Error::NoSuchSite { index: 7, len: 2 })
        );
    }

    #[test]
    fn test_full_redirect_chain() {
        let source_tab = harness();
        source_tab
            .runtime
            .redirect("https://www.google.com", "https://target.example/page")
            .unwrap();

        let referrer_tab = reload(&source_tab);
        let page = RecordingPage::default();
        let outcome = referrer_tab
            .runtime
            .on_page_load(&PageLocation::new("www.google.com", "/"), &page)
            .unwrap();

        match outcome {
            LoadOutcome::Forwarding { site, target, .. } => {
                assert_eq!(site.url, "https://www.google.com");
                assert_eq!(target, "https://target.example/page");
            }
            other => panic!("expected forwarding, got {:?}", other),
        }
        assert_eq!(page.effects(), vec!["meta:unsafe-url", "link:https://target.example/page"]);

        referrer_tab.scheduler.advance(500);
        assert_eq!(page.effects().last().unwrap(), "click:https://target.example/page");
    }

    #[test]
    fn test_path_mismatch_does_not_forward() {
        let h = harness();
        h.runtime.redirect("https://www.google.com", "https://target.example/page").unwrap();

        let page = RecordingPage::default();
        let outcome = reload(&h)
            .runtime
            .on_page_load(&PageLocation::new("www.google.com", "/search"), &page)
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Unmatched);
        assert!(page.effects().is_empty());
        assert_eq!(h.backend.get_value(KEY_TARGET_URL), Some(json!("https://target.example/page")));
    }

    #[test]
    fn test_target_consumed_once() {
        let h = harness();
        h.runtime.redirect("https://www.google.com", "https://target.example/page").unwrap();

        let first = reload(&h);
        let page = RecordingPage::default();
        first
            .runtime
            .on_page_load(&PageLocation::new("www.google.com", "/"), &page)
            .unwrap();
        first.scheduler.advance(500);

        let second = reload(&h);
        let again = RecordingPage::default();
        let outcome = second
            .runtime
            .on_page_load(&PageLocation::new("www.google.com", "/"), &again)
            .unwrap();

        assert!(matches!(outcome, LoadOutcome::DirectVisit(_)));
        assert!(again.effects().is_empty());
        second.scheduler.advance(1000);
        assert!(again.effects().is_empty());
        assert_eq!(h.backend.get_value(KEY_TARGET_URL), Some(Value::Null));
    }

    #[test]
    fn test_fuzzy_site_forwards_from_subdomain() {
        let h = harness();
        h.runtime.add_site("https://news.ycombinator.com", true).unwrap();
        h.runtime.redirect("https://news.ycombinator.com", "https://target.example").unwrap();

        let page = RecordingPage::default();
        let outcome = reload(&h)
            .runtime
            .on_page_load(&PageLocation::new("old.news.ycombinator.com", "/news"), &page)
            .unwrap();

        assert!(matches!(outcome, LoadOutcome::Forwarding { .. }));
    }

    #[test]
    fn test_unmatched_page_leaves_target() {
        let h = harness();
        h.runtime.redirect("https://www.google.com", "https://target.example").unwrap();

        let outcome = reload(&h)
            .runtime
            .on_page_load(&PageLocation::new("example.org", "/"), &RecordingPage::default())
            .unwrap();

        assert_eq!(outcome, LoadOutcome::Unmatched);
        assert_eq!(h.backend.get_value(KEY_TARGET_URL), Some(json!("https://target.example")));
    }

    #[test]
    fn test_manage_modal_rejects_reopen() {
        let h = harness();

        assert!(h.runtime.open_manage());
        assert!(!h.runtime.open_manage());
        assert!(h.runtime.log().text().contains("already open"));

        h.runtime.close_manage();
        assert!(!h.runtime.is_manage_open());
        assert!(h.runtime.open_manage());
    }

    #[test]
    fn test_management_operations_notify_and_log() {
        let h = harness();
        let renders = Rc::new(Cell::new(0));
        {
            let renders = Rc::clone(&renders);
            h.runtime.subscribe(Rc::new(move || renders.set(renders.get() + 1)));
        }

        h.runtime.add_site("bing.com", false).unwrap();
        h.runtime.set_fuzzy_match(2, true).unwrap();
        h.runtime.remove_site(0).unwrap();
        h.runtime.set_show_debug(true);

        assert_eq!(renders.get(), 4);
        assert_eq!(
            h.runtime.sites(),
            vec![
                SiteRecord::new("https://www.baidu.com", false),
                SiteRecord::new("https://bing.com", true),
            ]
        );
        assert_eq!(h.backend.get_value(KEY_SHOW_DEBUG), Some(json!(true)));

        let text = h.runtime.log().text();
        assert!(text.contains("Added site: https://bing.com (fuzzy match: false)"));
        assert!(text.contains("Updated fuzzy match: https://bing.com (fuzzy match: true)"));
        assert!(text.contains("Removed site: https://www.google.com"));
        assert!(text.contains("Debug output shown"));
    }

    #[test]
    fn test_failed_management_operation_does_not_notify() {
        let h = harness();
        let renders = Rc::new(Cell::new(0));
        {
            let renders = Rc::clone(&renders);
            h.runtime.subscribe(Rc::new(move || renders.set(renders.get() + 1)));
        }

        assert_eq!(h.runtime.add_site("  ", false), Err(Error::EmptyUrl));
        assert!(h.runtime.remove_site(9).is_err());

        assert_eq!(renders.get(), 0);
        assert!(h.runtime.log().text().contains("Site list not changed: URL is empty"));
    }

    #[test]
    fn test_start_keeps_tray_collapsed() {
        let h = harness();
        h.runtime.start();

        assert!(!h.runtime.tray().is_expanded());
        h.scheduler.advance(1000);
        assert!(!h.runtime.tray().is_expanded());
        assert!(h.runtime.log().text().contains("Icons initialized (2 sites)"));
    }
}
