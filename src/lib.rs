/// any-referrer - drag a link onto a site icon to open it with that site as referrer
/// Built with Rust + WASM + Yew, injected as a userscript

pub mod config;
pub mod debug_log;
pub mod domain;
pub mod drag;
pub mod error;
pub mod host;
pub mod redirect;
pub mod runtime;
pub mod scheduler;
pub mod site;
pub mod storage;
pub mod tray;
pub mod ui;
pub mod web;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::debug_log::DebugLog;
use crate::runtime::Runtime;
use crate::scheduler::TimeoutScheduler;
use crate::ui::RuntimeRef;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export URL normalization for JavaScript access
#[wasm_bindgen]
pub fn format_url(url: &str) -> String {
    domain::format_url(url)
}

// Inject the tray into the current page and forward if a target is pending
#[wasm_bindgen]
pub fn start_userscript() {
    if let Err(e) = boot() {
        log::error!("any-referrer failed to start: {}", e);
    }
}

fn boot() -> error::Result<()> {
    let config = Config::default();
    let log = DebugLog::with_browser_clock(config.log_capacity);
    let runtime = Rc::new(Runtime::new(
        config,
        Rc::new(web::GmStore),
        Rc::new(web::GmTabOpener),
        Rc::new(TimeoutScheduler::new()),
        log,
    ));

    let document = web::document()?;
    let root = web::mount_root(&document)?;
    yew::Renderer::<ui::overlay::Overlay>::with_root_and_props(
        root,
        ui::overlay::OverlayProps {
            runtime: RuntimeRef(Rc::clone(&runtime)),
        },
    )
    .render();
    runtime.start();

    let location = web::current_location()?;
    runtime.on_page_load(&location, &web::DocumentPage::new(document))?;
    Ok(())
}
