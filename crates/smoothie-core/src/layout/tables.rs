//! Constant layout values per device class

use super::{LayoutSection as S, LayoutTable};

pub(super) fn desktop() -> LayoutTable {
    LayoutTable::from_entries(
        "desktop",
        &[
            (
                S::Header,
                &[
                    ("TOP", "30px"),
                    ("LEFT", "-1.1rem"),
                    ("RIGHT", "0"),
                    ("PADDING", "1rem"),
                    ("Z_INDEX", "10"),
                ],
            ),
            (
                S::AppLogo,
                &[
                    ("HEIGHT", "100px"),
                    ("LEFT_MARGIN", "-5rem"),
                    ("TOP_OFFSET", "2rem"),
                    ("Z_INDEX", "20"),
                ],
            ),
            (
                S::ChatLogo,
                &[
                    ("HEIGHT", "2.75rem"),
                    ("WIDTH", "auto"),
                    ("DISPLAY", "inline-block"),
                ],
            ),
            (S::Title, &[("FONT_SIZE", "1.75rem"), ("LINE_HEIGHT", "1.2")]),
            (S::Subtitle, &[("FONT_SIZE", "0.9rem"), ("TOP_MARGIN", "0.75rem")]),
            (
                S::ChatContainer,
                &[
                    ("WIDTH", "100%"),
                    ("MAX_WIDTH", "1200px"),
                    ("TOP", "150px"),
                    ("HEIGHT", "750px"),
                    ("LEFT", "0"),
                    ("RIGHT", "0"),
                    ("BORDER_RADIUS", "1.5rem"),
                    ("Z_INDEX", "5"),
                ],
            ),
            (
                S::ChatMessages,
                &[
                    ("POSITION", "absolute"),
                    ("TOP", "0"),
                    ("LEFT", "0"),
                    ("RIGHT", "0"),
                    ("BOTTOM", "6.5rem"),
                    ("OVERFLOW", "auto"),
                    ("PADDING", "1rem 1.25rem"),
                ],
            ),
            (
                S::ChatInputArea,
                &[
                    ("HEIGHT", "4.5rem"),
                    ("PADDING", "1rem 1rem"),
                    (
                        "PADDING_BOTTOM",
                        "calc(env(safe-area-inset-bottom, 0.75rem) + 0.5rem)",
                    ),
                    ("BACKGROUND_COLOR", "black"),
                    ("POSITION", "relative"),
                    ("BOTTOM", "20px"),
                ],
            ),
            (
                S::InputField,
                &[
                    ("PADDING", "0.8rem 1rem"),
                    ("FONT_SIZE", "1rem"),
                    ("WIDTH", "114%"),
                    ("LEFT_OFFSET", "-5%"),
                    ("BORDER_RADIUS", "0.75rem"),
                    ("BACKGROUND_COLOR", "white"),
                    ("TEXT_COLOR", "black"),
                    ("BORDER_COLOR", "#e5e7eb"),
                    ("GAP", "0.75rem"),
                ],
            ),
            (
                S::SendButton,
                &[
                    ("PADDING", "0.8rem 1.5rem"),
                    ("FONT_SIZE", "1rem"),
                    ("FONT_WEIGHT", "500"),
                    ("BORDER_RADIUS", "0.75rem"),
                    ("ENABLED_BG_COLOR", "#3b82f6"),
                    ("ENABLED_TEXT_COLOR", "white"),
                    ("DISABLED_BG_COLOR", "#e5e7eb"),
                    ("DISABLED_TEXT_COLOR", "#9ca3af"),
                ],
            ),
            (
                S::Footer,
                &[
                    ("BOTTOM", "140px"),
                    ("LEFT", "-1.4rem"),
                    ("RIGHT", "0"),
                    ("PADDING", "1rem"),
                    ("FONT_SIZE", "1.2rem"),
                    ("Z_INDEX", "10"),
                ],
            ),
            (
                S::Container,
                &[
                    ("PADDING", "2rem"),
                    ("MAX_WIDTH", "600px"),
                    ("FONT_SIZE", "1rem"),
                ],
            ),
            (
                S::PromptButtons,
                &[
                    ("DISPLAY", "flex"),
                    ("FLEX_DIRECTION", "row"),
                    ("FLEX_WRAP", "wrap"),
                    ("GAP", "0.5rem"),
                    ("JUSTIFY_CONTENT", "space-around"),
                    ("WIDTH", "90%"),
                    ("POSITION", "absolute"),
                    ("TOP", "auto"),
                    ("LEFT", "20px"),
                    ("RIGHT", "10px"),
                    ("BOTTOM", "10px"),
                    ("PADDING", "0.25rem 0"),
                    ("BORDER_TOP", "1px solid #e5e7eb"),
                    ("BACKGROUND_COLOR", "white"),
                ],
            ),
            (
                S::PromptButton,
                &[
                    ("BACKGROUND_COLOR", "#f2f2f2"),
                    ("TEXT_COLOR", "#666666"),
                    ("BORDER", "1px solid #e0e0e0"),
                    ("BORDER_RADIUS", "0.75rem"),
                    ("PADDING", "0.5rem 0.25rem"),
                    ("FONT_SIZE", "0.85rem"),
                    ("FONT_WEIGHT", "400"),
                    ("WHITE_SPACE", "normal"),
                    ("LINE_HEIGHT", "1.2"),
                    ("MAX_WIDTH", "31%"),
                ],
            ),
        ],
    )
}

/// Mobile carries no input, send-button or prompt sections; the style
/// derivation falls back to its own defaults for those.
pub(super) fn mobile() -> LayoutTable {
    LayoutTable::from_entries(
        "mobile",
        &[
            (
                S::Header,
                &[
                    ("TOP", "-25px"),
                    ("LEFT", "-0.7rem"),
                    ("RIGHT", "0"),
                    ("PADDING", "0.5rem"),
                    ("Z_INDEX", "10"),
                ],
            ),
            (
                S::AppLogo,
                &[
                    ("HEIGHT", "35px"),
                    ("LEFT_MARGIN", "0.75rem"),
                    ("TOP_OFFSET", "0.75rem"),
                    ("Z_INDEX", "20"),
                ],
            ),
            (
                S::ChatLogo,
                &[
                    ("HEIGHT", "2.1rem"),
                    ("WIDTH", "auto"),
                    ("DISPLAY", "inline-block"),
                ],
            ),
            (S::Title, &[("FONT_SIZE", "0.85rem"), ("LINE_HEIGHT", "1.2")]),
            (S::Subtitle, &[("FONT_SIZE", "0.85rem"), ("TOP_MARGIN", "0.5rem")]),
            (
                S::ChatContainer,
                &[
                    ("WIDTH", "95%"),
                    ("MAX_WIDTH", "95%"),
                    ("TOP", "80px"),
                    ("LEFT", "0"),
                    ("RIGHT", "0"),
                    ("BORDER_RADIUS", "1rem"),
                    ("Z_INDEX", "5"),
                ],
            ),
            (
                S::ChatMessages,
                &[
                    ("HEIGHT", "calc(100vh - 13rem)"),
                    ("MAX_HEIGHT", "60vh"),
                    ("MIN_HEIGHT", "50vh"),
                    ("PADDING", "0.5rem"),
                ],
            ),
            (
                S::Footer,
                &[
                    ("BOTTOM", "60px"),
                    ("LEFT", "-0.8rem"),
                    ("RIGHT", "1.75 rem"),
                    ("PADDING", "0.5rem"),
                    ("FONT_SIZE", "1rem"),
                    ("Z_INDEX", "10"),
                ],
            ),
            (
                S::Container,
                &[
                    ("PADDING", "1rem"),
                    ("MAX_WIDTH", "100%"),
                    ("FONT_SIZE", "0.9rem"),
                ],
            ),
        ],
    )
}

/// Phones narrower than 375px
pub(super) fn very_small_overrides() -> LayoutTable {
    LayoutTable::from_entries(
        "very-small-overrides",
        &[
            (S::AppLogo, &[("HEIGHT", "14px")]),
            (S::ChatLogo, &[("HEIGHT", "1.8rem")]),
            (S::Title, &[("FONT_SIZE", "0.7rem")]),
            (S::Subtitle, &[("FONT_SIZE", "0.6rem")]),
            (S::Container, &[("PADDING", "0.5rem"), ("FONT_SIZE", "0.85rem")]),
            (S::Footer, &[("FONT_SIZE", "0.6rem")]),
            (
                S::Header,
                &[
                    ("TOP_MARGIN", "0.5rem"),
                    ("BOTTOM_MARGIN", "0.3rem"),
                    ("PADDING", "0.3rem"),
                ],
            ),
        ],
    )
}
