/// Root component injected into the host page

use std::rc::Rc;

use yew::prelude::*;

use crate::tray::IconScale;
use crate::ui::debug_panel::DebugPanel;
use crate::ui::manage::ManageDialog;
use crate::ui::tray::IconTray;
use crate::web;

use super::RuntimeRef;

#[derive(Properties, PartialEq)]
pub struct OverlayProps {
    pub runtime: RuntimeRef,
}

#[function_component(Overlay)]
pub fn overlay(props: &OverlayProps) -> Html {
    let runtime = props.runtime.0.clone();
    let redraw = use_force_update();

    // Re-render on registry, tray and log changes; own the page listeners
    {
        let runtime = runtime.clone();
        use_effect_with((), move |_| {
            let on_change: Rc<dyn Fn()> = Rc::new(move || redraw.force_update());
            runtime.subscribe(Rc::clone(&on_change));
            runtime.tray().subscribe(Rc::clone(&on_change));
            runtime.log().subscribe(Rc::clone(&on_change));
            // catch up on lines logged before mounting
            on_change();

            let listeners = match web::install_page_listeners(&runtime) {
                Ok(listeners) => listeners,
                Err(e) => {
                    runtime.log().log(format!("Page listeners not installed: {}", e));
                    Vec::new()
                }
            };

            move || {
                drop(listeners);
                runtime.log().unsubscribe();
                runtime.tray().unsubscribe();
                runtime.unsubscribe();
            }
        });
    }

    let sites = runtime.sites();
    let tray = runtime.tray();
    let scales: Vec<IconScale> = (0..sites.len()).map(|index| tray.icon_scale(index)).collect();

    html! {
        <>
            <IconTray
                runtime={props.runtime.clone()}
                sites={sites.clone()}
                expanded={tray.is_expanded()}
                {scales}
            />
            <DebugPanel visible={runtime.show_debug()} text={runtime.log().text()} />
            if runtime.is_manage_open() {
                <ManageDialog runtime={props.runtime.clone()} {sites} show_debug={runtime.show_debug()} />
            }
        </>
    }
}
