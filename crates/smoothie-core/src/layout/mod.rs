//! Responsive layout tables and their resolver
//!
//! Three immutable tables exist: desktop, mobile and very-small-mobile. The
//! very-small table is the mobile table with a handful of per-property
//! overrides merged on top. Values are kept as literal CSS strings.

mod styles;
mod tables;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::device::{DeviceClass, DeviceInfo};

pub use styles::{
    background_styles, derive_styles, responsive_class_name, BackgroundStyles, Style,
    StyledElement,
};

/// Element groups a layout table carries values for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutSection {
    Header,
    AppLogo,
    ChatLogo,
    Title,
    Subtitle,
    ChatContainer,
    ChatMessages,
    ChatInputArea,
    InputField,
    SendButton,
    Footer,
    Container,
    PromptButtons,
    PromptButton,
}

impl LayoutSection {
    pub const ALL: [LayoutSection; 14] = [
        LayoutSection::Header,
        LayoutSection::AppLogo,
        LayoutSection::ChatLogo,
        LayoutSection::Title,
        LayoutSection::Subtitle,
        LayoutSection::ChatContainer,
        LayoutSection::ChatMessages,
        LayoutSection::ChatInputArea,
        LayoutSection::InputField,
        LayoutSection::SendButton,
        LayoutSection::Footer,
        LayoutSection::Container,
        LayoutSection::PromptButtons,
        LayoutSection::PromptButton,
    ];

    /// Upper-case key as used in the layout configuration
    pub fn key(&self) -> &'static str {
        match self {
            LayoutSection::Header => "HEADER",
            LayoutSection::AppLogo => "APP_LOGO",
            LayoutSection::ChatLogo => "CHAT_LOGO",
            LayoutSection::Title => "TITLE",
            LayoutSection::Subtitle => "SUBTITLE",
            LayoutSection::ChatContainer => "CHAT_CONTAINER",
            LayoutSection::ChatMessages => "CHAT_MESSAGES",
            LayoutSection::ChatInputArea => "CHAT_INPUT_AREA",
            LayoutSection::InputField => "INPUT_FIELD",
            LayoutSection::SendButton => "SEND_BUTTON",
            LayoutSection::Footer => "FOOTER",
            LayoutSection::Container => "CONTAINER",
            LayoutSection::PromptButtons => "PROMPT_BUTTONS",
            LayoutSection::PromptButton => "PROMPT_BUTTON",
        }
    }
}

type Properties = BTreeMap<&'static str, &'static str>;

/// Property values per section for one device class
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTable {
    name: &'static str,
    sections: BTreeMap<LayoutSection, Properties>,
}

impl LayoutTable {
    pub(crate) fn from_entries(
        name: &'static str,
        entries: &[(LayoutSection, &[(&'static str, &'static str)])],
    ) -> Self {
        let sections = entries
            .iter()
            .map(|(section, props)| (*section, props.iter().copied().collect()))
            .collect();
        Self { name, sections }
    }

    /// Merge `overrides` over `self` property by property.
    ///
    /// Sections present only in `self` are kept whole, and within a shared
    /// section only the overridden properties change.
    pub(crate) fn merged(&self, name: &'static str, overrides: &LayoutTable) -> Self {
        let mut sections = self.sections.clone();
        for (section, props) in &overrides.sections {
            sections
                .entry(*section)
                .or_default()
                .extend(props.iter().map(|(k, v)| (*k, *v)));
        }
        Self { name, sections }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, section: LayoutSection, property: &str) -> Option<&'static str> {
        self.sections
            .get(&section)
            .and_then(|props| props.get(property))
            .copied()
    }

    /// Value of `property`, or `default` when the table does not carry it
    pub fn get_or(
        &self,
        section: LayoutSection,
        property: &str,
        default: &'static str,
    ) -> &'static str {
        self.get(section, property).unwrap_or(default)
    }

    pub fn has_section(&self, section: LayoutSection) -> bool {
        self.sections.contains_key(&section)
    }

    /// Properties of one section, in key order
    pub fn properties(
        &self,
        section: LayoutSection,
    ) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.sections
            .get(&section)
            .into_iter()
            .flat_map(|props| props.iter().map(|(k, v)| (*k, *v)))
    }
}

static DESKTOP: LazyLock<LayoutTable> = LazyLock::new(tables::desktop);
static MOBILE: LazyLock<LayoutTable> = LazyLock::new(tables::mobile);
static VERY_SMALL_MOBILE: LazyLock<LayoutTable> = LazyLock::new(|| {
    MOBILE.merged("very-small-mobile", &tables::very_small_overrides())
});

/// Select the table for a device. Very small wins over mobile.
pub fn resolve_layout(device: &DeviceInfo) -> &'static LayoutTable {
    match device.class() {
        DeviceClass::VerySmallMobile => &*VERY_SMALL_MOBILE,
        DeviceClass::Mobile => &*MOBILE,
        DeviceClass::Desktop => &*DESKTOP,
    }
}
