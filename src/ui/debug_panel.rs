/// On-page debug output

use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct DebugPanelProps {
    pub visible: bool,
    pub text: AttrValue,
}

#[function_component(DebugPanel)]
pub fn debug_panel(props: &DebugPanelProps) -> Html {
    let node = use_node_ref();

    // Keep the newest line in view
    {
        let node = node.clone();
        use_effect_with(props.text.clone(), move |_| {
            if let Some(area) = node.cast::<HtmlTextAreaElement>() {
                area.set_scroll_top(area.scroll_height());
            }
            || ()
        });
    }

    let style = format!(
        "position: fixed; top: 10px; right: 10px; width: 300px; height: 200px; z-index: 10000; \
         background-color: rgba(255, 255, 255, 0.9); border: 1px solid #ccc; padding: 5px; \
         font-size: 12px; resize: both; display: {};",
        if props.visible { "block" } else { "none" }
    );

    html! {
        <textarea ref={node} readonly=true {style} value={props.text.clone()} />
    }
}
