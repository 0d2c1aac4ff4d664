pub mod components;
pub mod dom_surface;
pub mod driver;

use components::chat_widget::ChatWidget;
use components::footer::Footer;
use driver::ViewSignals;
use leptos::prelude::*;
use smoothie_core::{background_styles, responsive_class_name, StyledElement};

const APP_LOGO: &str = "/assets/app-logo.png";

#[component]
pub fn App() -> impl IntoView {
    let view = ViewSignals::new();
    let background = background_styles();

    view! {
        <div
            class=move || responsive_class_name("app-container", &view.device.get())
            style=move || components::css(view.device.get(), StyledElement::Container)
        >
            <div style=background.primary.to_css()></div>
            <div style=background.gradient.to_css()></div>
            <div style=background.bottom.to_css()></div>
            <img
                src=APP_LOGO
                alt="Earth Bar"
                style=move || components::css(view.device.get(), StyledElement::AppLogo)
            />
            <ChatWidget view=view />
            <Footer view=view />
        </div>
    }
}
