/// Browser implementations of the host traits: GM_* storage and tabs,
/// the live document, and page-wide event listeners
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlAnchorElement, HtmlMetaElement};

use crate::drag::{DRAGGABLE_ATTR, should_mark_draggable};
use crate::error::{Error, Result};
use crate::host::{ForwardingPage, HiddenLink, KeyValueStore, TabOpener};
use crate::redirect::PageLocation;
use crate::runtime::Runtime;

pub const ROOT_ID: &str = "any-referrer-root";

// Import JS bridge functions
#[wasm_bindgen(module = "/gm_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn gmGetValue(key: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn gmSetValue(key: &str, value: JsValue) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn gmOpenInTab(url: &str) -> std::result::Result<(), JsValue>;
}

/// `GM_getValue` / `GM_setValue`
pub struct GmStore;

impl KeyValueStore for GmStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        match gmGetValue(key) {
            Ok(js) if js.is_null() || js.is_undefined() => None,
            Ok(js) => serde_wasm_bindgen::from_value(js)
                .map_err(|e| log::warn!("Failed to parse stored {}: {:?}", key, e))
                .ok(),
            Err(e) => {
                log::warn!("GM_getValue({}) failed: {:?}", key, e);
                None
            }
        }
    }

    fn set_value(&self, key: &str, value: Value) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js = match value.serialize(&serializer) {
            Ok(js) => js,
            Err(e) => {
                log::warn!("Failed to serialize {}: {:?}", key, e);
                return;
            }
        };

        if let Err(e) = gmSetValue(key, js) {
            log::warn!("GM_setValue({}) failed: {:?}", key, e);
        }
    }
}

/// `GM_openInTab` with an active, inserted, parented tab
pub struct GmTabOpener;

impl TabOpener for GmTabOpener {
    fn open_in_tab(&self, url: &str) {
        if let Err(e) = gmOpenInTab(url) {
            log::warn!("GM_openInTab({}) failed: {:?}", url, e);
        }
    }
}

pub fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| Error::Dom("no document".to_string()))
}

pub fn current_location() -> Result<PageLocation> {
    let location = web_sys::window()
        .ok_or_else(|| Error::Dom("no window".to_string()))?
        .location();
    Ok(PageLocation {
        hostname: location.hostname()?,
        path: location.pathname()?,
    })
}

/// Append the element the overlay renders into
pub fn mount_root(document: &Document) -> Result<Element> {
    let root = document.create_element("div")?;
    root.set_id(ROOT_ID);
    document
        .body()
        .ok_or_else(|| Error::Dom("document has no <body>".to_string()))?
        .append_child(&root)?;
    Ok(root)
}

pub struct DocumentPage {
    document: Document,
}

impl DocumentPage {
    pub fn new(document: Document) -> Self {
        DocumentPage { document }
    }
}

impl ForwardingPage for DocumentPage {
    fn insert_referrer_policy(&self, policy: &str) -> Result<()> {
        let meta: HtmlMetaElement = self
            .document
            .create_element("meta")?
            .dyn_into()
            .map_err(|_| Error::Dom("<meta> is not an HtmlMetaElement".to_string()))?;
        meta.set_name("referrer");
        meta.set_content(policy);

        self.document
            .head()
            .ok_or_else(|| Error::Dom("document has no <head>".to_string()))?
            .append_child(&meta)?;
        Ok(())
    }

    fn attach_hidden_link(&self, href: &str) -> Result<Box<dyn HiddenLink>> {
        let anchor: HtmlAnchorElement = self
            .document
            .create_element("a")?
            .dyn_into()
            .map_err(|_| Error::Dom("<a> is not an HtmlAnchorElement".to_string()))?;
        anchor.set_href(href);
        anchor.style().set_property("display", "none")?;

        self.document
            .body()
            .ok_or_else(|| Error::Dom("document has no <body>".to_string()))?
            .append_child(&anchor)?;
        Ok(Box::new(AnchorLink(anchor)))
    }
}

struct AnchorLink(HtmlAnchorElement);

impl HiddenLink for AnchorLink {
    fn activate(&self) -> Result<()> {
        if !self.0.is_connected() {
            return Err(Error::Dom("hidden link was removed from the page".to_string()));
        }
        self.0.click();
        Ok(())
    }
}

/// Event listener on the document, removed on drop
pub struct DocumentListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl DocumentListener {
    pub fn new(document: &Document, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let target: EventTarget = document.clone().into();
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(DocumentListener {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Hyperlink containing the event target, if any
fn hyperlink_for(event: &Event) -> Option<Element> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    element.closest("a").ok().flatten()
}

/// Lazy draggable marking on pointer-down, and tray reveal on link drag
pub fn install_page_listeners(runtime: &Rc<Runtime>) -> Result<Vec<DocumentListener>> {
    let document = document()?;

    let on_mousedown = {
        let runtime = Rc::clone(runtime);
        move |event: Event| {
            let Some(link) = hyperlink_for(&event) else {
                return;
            };
            let marked = link.get_attribute(DRAGGABLE_ATTR).as_deref() == Some("true");
            if should_mark_draggable(&link.tag_name(), marked)
                && link.set_attribute(DRAGGABLE_ATTR, "true").is_ok()
            {
                let href = link.get_attribute("href").unwrap_or_default();
                runtime.link_marked_draggable(&href);
            }
        }
    };

    let on_dragstart = {
        let runtime = Rc::clone(runtime);
        move |event: Event| {
            if hyperlink_for(&event).is_some() {
                runtime.tray().link_drag_started();
            }
        }
    };

    Ok(vec![
        DocumentListener::new(&document, "mousedown", on_mousedown)?,
        DocumentListener::new(&document, "dragstart", on_dragstart)?,
    ])
}
