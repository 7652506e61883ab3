/// Floating icon tray: settings gear plus one drop target per site

use std::rc::Rc;

use yew::prelude::*;

use crate::drag::DRAG_PAYLOAD_TYPE;
use crate::runtime::Runtime;
use crate::site::SiteRecord;
use crate::tray::IconScale;

use super::RuntimeRef;

const GEAR_STYLE: &str = "width: 30px; height: 30px; cursor: pointer; font-size: 20px; text-align: center; line-height: 30px;";

fn tray_style(expanded: bool) -> String {
    format!(
        "position: fixed; top: 50%; right: {}; transform: translateY(-50%); width: 40px; z-index: 9999; \
         display: flex; flex-direction: column; gap: 5px; background-color: rgba(255, 255, 255, 0.8); \
         padding: 5px; border-radius: 10px 0 0 10px; box-shadow: -2px 0 5px rgba(0,0,0,0.1); transition: right 0.3s;",
        if expanded { "0px" } else { "-35px" }
    )
}

#[derive(Properties, PartialEq)]
pub struct IconTrayProps {
    pub runtime: RuntimeRef,
    pub sites: Vec<SiteRecord>,
    pub expanded: bool,
    /// Scale of each site icon, in registry order
    pub scales: Vec<IconScale>,
}

#[function_component(IconTray)]
pub fn icon_tray(props: &IconTrayProps) -> Html {
    let runtime = props.runtime.0.clone();
    let tray = runtime.tray().clone();

    let onmouseenter = {
        let tray = tray.clone();
        Callback::from(move |_: MouseEvent| tray.pointer_entered())
    };
    let onmouseleave = {
        let tray = tray.clone();
        Callback::from(move |_: MouseEvent| tray.pointer_left())
    };
    let on_manage = {
        let runtime = runtime.clone();
        Callback::from(move |_: MouseEvent| {
            runtime.open_manage();
        })
    };

    html! {
        <div style={tray_style(props.expanded)} {onmouseenter} {onmouseleave}>
            <div style={GEAR_STYLE} title="Manage sites" onclick={on_manage}>{"⚙️"}</div>
            {for props.sites.iter().enumerate().map(|(index, site)| {
                let scale = props.scales.get(index).copied().unwrap_or(IconScale::Normal);
                html! {
                    <SiteIcon key={index} runtime={props.runtime.clone()} {index} site={site.clone()} {scale} />
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SiteIconProps {
    runtime: RuntimeRef,
    index: usize,
    site: SiteRecord,
    scale: IconScale,
}

#[function_component(SiteIcon)]
fn site_icon(props: &SiteIconProps) -> Html {
    let runtime: Rc<Runtime> = props.runtime.0.clone();
    let tray = runtime.tray().clone();
    let index = props.index;

    let style = format!(
        "width: 30px; height: 30px; background-image: url('{}'); background-size: contain; \
         background-repeat: no-repeat; background-position: center; cursor: pointer; \
         transition: transform 0.2s; transform: {};",
        runtime.config().favicon_url(&props.site.url),
        props.scale.css()
    );

    let onmouseover = {
        let tray = tray.clone();
        Callback::from(move |_: MouseEvent| tray.icon_pointer_over(index))
    };
    let onmouseout = {
        let tray = tray.clone();
        Callback::from(move |_: MouseEvent| tray.icon_pointer_out(index))
    };
    let ondragover = {
        let tray = tray.clone();
        Callback::from(move |e: DragEvent| {
            // Needed for the element to accept the drop
            e.prevent_default();
            tray.icon_drag_over(index);
        })
    };
    let ondragleave = {
        let tray = tray.clone();
        Callback::from(move |_: DragEvent| tray.icon_drag_leave(index))
    };
    let ondrop = Callback::from(move |e: DragEvent| {
        e.prevent_default();
        let payload = e
            .data_transfer()
            .and_then(|data| data.get_data(DRAG_PAYLOAD_TYPE).ok());
        if let Err(err) = runtime.icon_dropped(index, payload) {
            log::warn!("Drop on icon {} failed: {}", index, err);
        }
    });

    html! {
        <div
            {style}
            title={props.site.title()}
            {onmouseover}
            {onmouseout}
            {ondragover}
            {ondragleave}
            {ondrop}
        />
    }
}
