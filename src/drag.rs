/// Drag-and-drop helpers shared by the page listeners and the tray icons

/// MIME type read from the drop's `DataTransfer`
pub const DRAG_PAYLOAD_TYPE: &str = "text/plain";

/// Attribute set on hyperlinks once they have been made draggable
pub const DRAGGABLE_ATTR: &str = "draggable";

/// Trimmed drop payload, or `None` when there is nothing to redirect
pub fn drop_payload(raw: Option<String>) -> Option<String> {
    raw.map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Hyperlinks are marked lazily: only on the first pointer-down over them
pub fn should_mark_draggable(tag_name: &str, already_marked: bool) -> bool {
    tag_name.eq_ignore_ascii_case("a") && !already_marked
}
