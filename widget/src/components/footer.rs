use leptos::prelude::*;
use smoothie_core::StyledElement;

use super::css;
use crate::driver::ViewSignals;

#[component]
pub fn Footer(view: ViewSignals) -> impl IntoView {
    view! {
        <footer style=move || css(view.device.get(), StyledElement::Footer)>
            <p>"Fresh smoothies, picked for you. Prices and availability may vary by location."</p>
        </footer>
    }
}
