/// Site management modal

use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::site::SiteRecord;
use crate::ui::components::{Button, ButtonVariant, Checkbox};

use super::RuntimeRef;

const DIALOG_STYLE: &str = "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); \
    background-color: white; padding: 20px; border-radius: 10px; box-shadow: 0 0 10px rgba(0,0,0,0.1); \
    z-index: 10000; max-width: 80%; max-height: 80%; overflow-y: auto; color: #222; font-size: 14px;";

#[derive(Properties, PartialEq)]
pub struct ManageDialogProps {
    pub runtime: RuntimeRef,
    pub sites: Vec<SiteRecord>,
    pub show_debug: bool,
}

#[function_component(ManageDialog)]
pub fn manage_dialog(props: &ManageDialogProps) -> Html {
    let runtime = props.runtime.0.clone();
    let url_input = use_state(String::new);
    let fuzzy_input = use_state(|| false);

    let on_close = {
        let runtime = runtime.clone();
        Callback::from(move |_| runtime.close_manage())
    };

    let on_url_input = {
        let url_input = url_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                url_input.set(input.value());
            }
        })
    };

    let on_fuzzy_input = {
        let fuzzy_input = fuzzy_input.clone();
        Callback::from(move |checked: bool| fuzzy_input.set(checked))
    };

    // Errors are already in the debug log
    let on_add = {
        let runtime = runtime.clone();
        let url_input = url_input.clone();
        let fuzzy_input = fuzzy_input.clone();
        Callback::from(move |_| {
            if runtime.add_site(&url_input, *fuzzy_input).is_ok() {
                url_input.set(String::new());
                fuzzy_input.set(false);
            }
        })
    };

    let on_debug_toggle = {
        let runtime = runtime.clone();
        Callback::from(move |checked: bool| runtime.set_show_debug(checked))
    };

    html! {
        <div style={DIALOG_STYLE}>
            <Button
                onclick={on_close}
                variant={ButtonVariant::Secondary}
                style="position: absolute; top: 10px; right: 10px;"
            >
                {"Close"}
            </Button>

            <div style="margin-top: 24px;">
                <input
                    type="text"
                    placeholder="Site URL"
                    style="width: 200px;"
                    value={(*url_input).clone()}
                    oninput={on_url_input}
                />
                <Checkbox label="Fuzzy match" checked={*fuzzy_input} onchange={on_fuzzy_input} />
                <Button onclick={on_add}>{"Add site"}</Button>
            </div>

            <div style="margin-top: 10px;">
                <Checkbox label="Show debug output" checked={props.show_debug} onchange={on_debug_toggle} />
            </div>

            <ul style="list-style-type: none; padding: 0; margin-top: 20px;">
                {for props.sites.iter().enumerate().map(|(index, site)| {
                    // Errors are already in the debug log
                    let on_fuzzy = {
                        let runtime = runtime.clone();
                        Callback::from(move |checked: bool| {
                            runtime.set_fuzzy_match(index, checked).ok();
                        })
                    };
                    let on_remove = {
                        let runtime = runtime.clone();
                        Callback::from(move |_| {
                            runtime.remove_site(index).ok();
                        })
                    };

                    html! {
                        <li key={index} style="margin-bottom: 10px;">
                            <img
                                src={runtime.config().favicon_url(&site.url)}
                                style="width: 16px; height: 16px; vertical-align: middle; margin-right: 6px;"
                            />
                            {&site.url}
                            <Checkbox label="Fuzzy match" checked={site.fuzzy_match} onchange={on_fuzzy} />
                            <Button onclick={on_remove} variant={ButtonVariant::Danger}>{"Remove"}</Button>
                        </li>
                    }
                })}
            </ul>
        </div>
    }
}
