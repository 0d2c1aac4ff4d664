//! Inline style derivation from a layout table

use std::fmt::Write;

use super::{LayoutSection as S, LayoutTable};
use crate::device::DeviceInfo;

/// Ordered CSS property bag. Setting an existing property replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    properties: Vec<(&'static str, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.properties.iter_mut().find(|(p, _)| *p == property) {
            Some((_, existing)) => *existing = value,
            None => self.properties.push((property, value)),
        }
        self
    }

    fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let idx = self.properties.iter().position(|(p, _)| *p == property)?;
        Some(self.properties.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.properties.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Render as the value of an inline `style` attribute
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (i, (property, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                css.push(' ');
            }
            let _ = write!(css, "{property}: {value};");
        }
        css
    }
}

/// UI elements that receive derived inline styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyledElement {
    Container,
    AppLogo,
    ChatLogo,
    Header,
    Title,
    Subtitle,
    ChatContainer,
    ChatMessages,
    ChatInputArea,
    InputField,
    SendButton { enabled: bool },
    Footer,
    PromptButtons,
    PromptButton,
}

/// Derive the inline style for one element.
///
/// Values missing from `layout` fall back to fixed defaults, so the mobile
/// tables can omit whole sections.
pub fn derive_styles(element: StyledElement, layout: &LayoutTable, device: &DeviceInfo) -> Style {
    match element {
        StyledElement::Container => container(layout, device),
        StyledElement::AppLogo => Style::new()
            .with("position", "absolute")
            .with("height", layout.get_or(S::AppLogo, "HEIGHT", "35px"))
            .with("width", "auto")
            .with("opacity", "0.6")
            .with("top", layout.get_or(S::AppLogo, "TOP_OFFSET", "0.75rem"))
            .with("left", layout.get_or(S::AppLogo, "LEFT_MARGIN", "0.75rem"))
            .with("z-index", layout.get_or(S::AppLogo, "Z_INDEX", "20")),
        StyledElement::ChatLogo => Style::new()
            .with("height", layout.get_or(S::ChatLogo, "HEIGHT", "2.1rem"))
            .with("width", layout.get_or(S::ChatLogo, "WIDTH", "auto"))
            .with("display", layout.get_or(S::ChatLogo, "DISPLAY", "inline-block")),
        StyledElement::Header => header(layout),
        StyledElement::Title => Style::new()
            .with("font-size", layout.get_or(S::Title, "FONT_SIZE", "1rem"))
            .with("line-height", layout.get_or(S::Title, "LINE_HEIGHT", "1.2")),
        StyledElement::Subtitle => Style::new()
            .with("font-size", layout.get_or(S::Subtitle, "FONT_SIZE", "0.85rem"))
            .with("margin-top", layout.get_or(S::Subtitle, "TOP_MARGIN", "0.5rem")),
        StyledElement::ChatContainer => chat_container(layout),
        StyledElement::ChatMessages => chat_messages(layout, device),
        StyledElement::ChatInputArea => chat_input_area(layout),
        StyledElement::InputField => input_field(layout),
        StyledElement::SendButton { enabled } => send_button(layout, enabled),
        StyledElement::Footer => footer(layout),
        StyledElement::PromptButtons => prompt_buttons(layout),
        StyledElement::PromptButton => prompt_button(layout),
    }
}

fn container(layout: &LayoutTable, device: &DeviceInfo) -> Style {
    let padding = layout.get_or(S::Container, "PADDING", "1rem");
    let style = Style::new()
        .with("box-sizing", "border-box")
        .with("width", "100%")
        .with("max-width", layout.get_or(S::Container, "MAX_WIDTH", "100%"))
        .with("position", "relative")
        .with("z-index", "5")
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("align-items", "center")
        .with("justify-content", "flex-start")
        .with("background-color", "transparent")
        .with("font-size", layout.get_or(S::Container, "FONT_SIZE", "1rem"))
        .with("padding", padding)
        .with(
            "padding-top",
            format!("calc(env(safe-area-inset-top, 0) + {padding})"),
        )
        .with(
            "padding-bottom",
            format!("calc(env(safe-area-inset-bottom, 0) + {padding})"),
        )
        .with("margin", "0 auto");

    // Mobile locks the page height; the keyboard compensator owns scrolling
    if device.is_mobile {
        style.with("height", "100vh").with("overflow", "hidden")
    } else {
        style.with("min-height", "100vh").with("overflow", "visible")
    }
}

fn header(layout: &LayoutTable) -> Style {
    let mut style = Style::new()
        .with("position", "absolute")
        .with("top", layout.get_or(S::Header, "TOP", "0"))
        .with("left", layout.get_or(S::Header, "LEFT", "0"))
        .with("right", layout.get_or(S::Header, "RIGHT", "0"))
        .with("padding", layout.get_or(S::Header, "PADDING", "0.5rem"))
        .with("z-index", layout.get_or(S::Header, "Z_INDEX", "10"))
        .with("width", "100%")
        .with("text-align", "center");

    if let Some(margin) = layout.get(S::Header, "TOP_MARGIN") {
        style.set("margin-top", margin);
    }
    if let Some(margin) = layout.get(S::Header, "BOTTOM_MARGIN") {
        style.set("margin-bottom", margin);
    }
    style
}

fn chat_container(layout: &LayoutTable) -> Style {
    let mut style = Style::new()
        .with("position", "absolute")
        .with("top", layout.get_or(S::ChatContainer, "TOP", "80px"))
        .with("left", layout.get_or(S::ChatContainer, "LEFT", "0"))
        .with("right", layout.get_or(S::ChatContainer, "RIGHT", "0"))
        .with("width", layout.get_or(S::ChatContainer, "WIDTH", "95%"))
        .with("max-width", layout.get_or(S::ChatContainer, "MAX_WIDTH", "95%"))
        .with(
            "border-radius",
            layout.get_or(S::ChatContainer, "BORDER_RADIUS", "1rem"),
        )
        .with("z-index", layout.get_or(S::ChatContainer, "Z_INDEX", "5"))
        .with("margin", "0 auto")
        .with("background-color", "black")
        .with(
            "box-shadow",
            "0 10px 25px -5px rgba(0, 0, 0, 0.3), 0 10px 10px -5px rgba(0, 0, 0, 0.15)",
        )
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("overflow", "hidden")
        .with("border", "15px solid black")
        .with("box-sizing", "border-box");

    if let Some(height) = layout.get(S::ChatContainer, "HEIGHT") {
        style.set("height", height);
    }
    style
}

fn chat_messages(layout: &LayoutTable, device: &DeviceInfo) -> Style {
    let mut style = Style::new()
        .with("padding", layout.get_or(S::ChatMessages, "PADDING", "0.5rem"))
        .with("overflow-y", "auto")
        .with("box-sizing", "border-box");

    if device.is_mobile {
        style
            .set("flex", "1")
            .set(
                "height",
                layout.get_or(S::ChatMessages, "HEIGHT", "calc(100vh - 13rem)"),
            )
            .set("max-height", layout.get_or(S::ChatMessages, "MAX_HEIGHT", "60vh"))
            .set("min-height", layout.get_or(S::ChatMessages, "MIN_HEIGHT", "50vh"))
            .set("-webkit-overflow-scrolling", "touch");
    } else {
        style
            .set("position", layout.get_or(S::ChatMessages, "POSITION", "absolute"))
            .set("top", layout.get_or(S::ChatMessages, "TOP", "0"))
            .set("left", layout.get_or(S::ChatMessages, "LEFT", "0"))
            .set("right", layout.get_or(S::ChatMessages, "RIGHT", "0"))
            .set("bottom", layout.get_or(S::ChatMessages, "BOTTOM", "6.5rem"))
            .set("overflow", layout.get_or(S::ChatMessages, "OVERFLOW", "auto"));
    }
    style
}

fn chat_input_area(layout: &LayoutTable) -> Style {
    Style::new()
        .with("height", layout.get_or(S::ChatInputArea, "HEIGHT", "auto"))
        .with("padding", layout.get_or(S::ChatInputArea, "PADDING", "0.75rem"))
        .with(
            "padding-bottom",
            layout.get_or(
                S::ChatInputArea,
                "PADDING_BOTTOM",
                "calc(env(safe-area-inset-bottom, 0.5rem) + 0.5rem)",
            ),
        )
        .with(
            "background-color",
            layout.get_or(S::ChatInputArea, "BACKGROUND_COLOR", "black"),
        )
        .with("position", layout.get_or(S::ChatInputArea, "POSITION", "relative"))
        .with("bottom", layout.get_or(S::ChatInputArea, "BOTTOM", "0"))
        .with("box-sizing", "border-box")
}

fn input_field(layout: &LayoutTable) -> Style {
    let border = layout.get_or(S::InputField, "BORDER_COLOR", "#e5e7eb");
    Style::new()
        .with("flex", "1")
        .with("padding", layout.get_or(S::InputField, "PADDING", "0.75rem 1rem"))
        // 16px keeps iOS Safari from zooming on focus
        .with("font-size", layout.get_or(S::InputField, "FONT_SIZE", "16px"))
        .with("width", layout.get_or(S::InputField, "WIDTH", "100%"))
        .with("position", "relative")
        .with("left", layout.get_or(S::InputField, "LEFT_OFFSET", "0"))
        .with(
            "border-radius",
            layout.get_or(S::InputField, "BORDER_RADIUS", "0.75rem"),
        )
        .with(
            "background-color",
            layout.get_or(S::InputField, "BACKGROUND_COLOR", "white"),
        )
        .with("color", layout.get_or(S::InputField, "TEXT_COLOR", "black"))
        .with("border", format!("1px solid {border}"))
        .with("margin-right", layout.get_or(S::InputField, "GAP", "0.5rem"))
        .with("outline", "none")
}

fn send_button(layout: &LayoutTable, enabled: bool) -> Style {
    let (background, text) = if enabled {
        (
            layout.get_or(S::SendButton, "ENABLED_BG_COLOR", "#3b82f6"),
            layout.get_or(S::SendButton, "ENABLED_TEXT_COLOR", "white"),
        )
    } else {
        (
            layout.get_or(S::SendButton, "DISABLED_BG_COLOR", "#e5e7eb"),
            layout.get_or(S::SendButton, "DISABLED_TEXT_COLOR", "#9ca3af"),
        )
    };

    Style::new()
        .with("padding", layout.get_or(S::SendButton, "PADDING", "0.75rem 1rem"))
        .with("font-size", layout.get_or(S::SendButton, "FONT_SIZE", "1rem"))
        .with("font-weight", layout.get_or(S::SendButton, "FONT_WEIGHT", "500"))
        .with(
            "border-radius",
            layout.get_or(S::SendButton, "BORDER_RADIUS", "0.75rem"),
        )
        .with("background-color", background)
        .with("color", text)
        .with("border", "none")
        .with("cursor", if enabled { "pointer" } else { "not-allowed" })
}

fn footer(layout: &LayoutTable) -> Style {
    Style::new()
        .with("position", "absolute")
        .with("bottom", layout.get_or(S::Footer, "BOTTOM", "60px"))
        .with("left", layout.get_or(S::Footer, "LEFT", "0"))
        .with("right", layout.get_or(S::Footer, "RIGHT", "0"))
        .with("padding", layout.get_or(S::Footer, "PADDING", "0.5rem"))
        .with("z-index", layout.get_or(S::Footer, "Z_INDEX", "10"))
        .with("width", "100%")
        .with("text-align", "center")
        .with("background-color", "transparent")
        .with("color", "black")
        .with("font-family", "Helvetica Neue, Helvetica, Arial, sans-serif")
        .with("font-weight", "bold")
        .with("font-size", layout.get_or(S::Footer, "FONT_SIZE", "1rem"))
}

fn prompt_buttons(layout: &LayoutTable) -> Style {
    Style::new()
        .with("display", layout.get_or(S::PromptButtons, "DISPLAY", "flex"))
        .with(
            "flex-direction",
            layout.get_or(S::PromptButtons, "FLEX_DIRECTION", "column"),
        )
        .with("flex-wrap", layout.get_or(S::PromptButtons, "FLEX_WRAP", "nowrap"))
        .with("gap", layout.get_or(S::PromptButtons, "GAP", "0.5rem"))
        .with(
            "justify-content",
            layout.get_or(S::PromptButtons, "JUSTIFY_CONTENT", "center"),
        )
        .with("width", layout.get_or(S::PromptButtons, "WIDTH", "100%"))
        .with("position", layout.get_or(S::PromptButtons, "POSITION", "relative"))
        .with("top", layout.get_or(S::PromptButtons, "TOP", "auto"))
        .with("left", layout.get_or(S::PromptButtons, "LEFT", "0"))
        .with("right", layout.get_or(S::PromptButtons, "RIGHT", "0"))
        .with("bottom", layout.get_or(S::PromptButtons, "BOTTOM", "0"))
        .with("padding", layout.get_or(S::PromptButtons, "PADDING", "0.5rem 0"))
        .with(
            "border-top",
            layout.get_or(S::PromptButtons, "BORDER_TOP", "1px solid #e5e7eb"),
        )
        .with(
            "background-color",
            layout.get_or(S::PromptButtons, "BACKGROUND_COLOR", "white"),
        )
        .with("box-sizing", "border-box")
}

fn prompt_button(layout: &LayoutTable) -> Style {
    Style::new()
        .with(
            "background-color",
            layout.get_or(S::PromptButton, "BACKGROUND_COLOR", "#f2f2f2"),
        )
        .with("color", layout.get_or(S::PromptButton, "TEXT_COLOR", "#666666"))
        .with("border", layout.get_or(S::PromptButton, "BORDER", "1px solid #e0e0e0"))
        .with(
            "border-radius",
            layout.get_or(S::PromptButton, "BORDER_RADIUS", "0.75rem"),
        )
        .with("padding", layout.get_or(S::PromptButton, "PADDING", "0.5rem 0.75rem"))
        .with("font-size", layout.get_or(S::PromptButton, "FONT_SIZE", "0.8rem"))
        .with("font-weight", layout.get_or(S::PromptButton, "FONT_WEIGHT", "400"))
        .with("white-space", layout.get_or(S::PromptButton, "WHITE_SPACE", "normal"))
        .with("line-height", layout.get_or(S::PromptButton, "LINE_HEIGHT", "1.2"))
        .with("max-width", layout.get_or(S::PromptButton, "MAX_WIDTH", "100%"))
        .with("cursor", "pointer")
        .with("text-align", "center")
}

/// The three decorative background layers
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundStyles {
    pub primary: Style,
    pub gradient: Style,
    pub bottom: Style,
}

pub fn background_styles() -> BackgroundStyles {
    BackgroundStyles {
        primary: Style::new()
            .with("position", "absolute")
            .with("top", "-50vh")
            .with("left", "-50vw")
            .with("right", "-50vw")
            .with("bottom", "-100vh")
            .with("width", "200vw")
            .with("height", "300vh")
            .with("background", "#c7e0ff")
            .with("z-index", "-10")
            .with("pointer-events", "none"),
        gradient: Style::new()
            .with("position", "fixed")
            .with("top", "0")
            .with("left", "0")
            .with("right", "0")
            .with("bottom", "0")
            .with("width", "100vw")
            .with("height", "100vh")
            .with("background", "linear-gradient(to bottom, #e8f3ff, #c7e0ff)")
            .with("z-index", "-5")
            .with("pointer-events", "none"),
        bottom: Style::new()
            .with("position", "fixed")
            .with("top", "95vh")
            .with("left", "0")
            .with("width", "100vw")
            .with("height", "50vh")
            .with("background", "#c7e0ff")
            .with("z-index", "-3")
            .with("pointer-events", "none"),
    }
}

/// `base` plus device modifiers, e.g. `"chat-widget mobile landscape"`
pub fn responsive_class_name(base: &str, device: &DeviceInfo) -> String {
    let mut class = base.to_string();
    if device.is_very_small_mobile {
        class.push_str(" very-small-mobile");
    } else if device.is_mobile {
        class.push_str(" mobile");
    }
    if device.is_landscape {
        class.push_str(" landscape");
    }
    class
}
