/// Reusable UI components
///
/// Styles are inline: the host page carries none of ours.

use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ButtonProps {
    pub onclick: Callback<MouseEvent>,
    pub children: Children,
    #[prop_or_default]
    pub variant: ButtonVariant,
    #[prop_or_default]
    pub style: Option<AttrValue>,
}

#[derive(PartialEq, Clone, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
}

#[function_component(Button)]
pub fn button(props: &ButtonProps) -> Html {
    let base_style = "padding: 4px 10px; border: none; border-radius: 4px; font-size: 13px; cursor: pointer; margin-left: 6px;";

    let variant_style = match props.variant {
        ButtonVariant::Primary => "background-color: #5B4FE8; color: white;",
        ButtonVariant::Secondary => "background-color: #e0e0e0; color: #333;",
        ButtonVariant::Danger => "background-color: #f44336; color: white;",
    };

    let extra = props.style.as_deref().unwrap_or("");
    let style = format!("{} {} {}", base_style, variant_style, extra);

    html! {
        <button type="button" onclick={props.onclick.clone()} style={style}>
            {props.children.clone()}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct CheckboxProps {
    pub label: AttrValue,
    pub checked: bool,
    pub onchange: Callback<bool>,
}

/// Labelled checkbox reporting its new state
#[function_component(Checkbox)]
pub fn checkbox(props: &CheckboxProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| {
        e.target_unchecked_into::<HtmlInputElement>().checked()
    });

    html! {
        <label style="margin-left: 6px; font-size: 13px;">
            <input type="checkbox" checked={props.checked} {onchange} />
            {" "}{props.label.clone()}
        </label>
    }
}
