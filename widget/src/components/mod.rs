pub mod chat_widget;
pub mod footer;
pub mod message_list;
pub mod prompt_buttons;

use smoothie_core::{derive_styles, resolve_layout, DeviceInfo, StyledElement};

/// Inline CSS for one element on the current device
pub fn css(device: DeviceInfo, element: StyledElement) -> String {
    derive_styles(element, resolve_layout(&device), &device).to_css()
}
