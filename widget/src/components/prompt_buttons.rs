use leptos::prelude::*;
use smoothie_core::StyledElement;

use super::css;
use crate::driver::ViewSignals;

/// Suggested prompts, shown until the first message is sent
#[component]
pub fn PromptButtons(
    view: ViewSignals,
    prompts: &'static [&'static str],
    on_pick: Callback<String>,
) -> impl IntoView {
    move || {
        view.prompts_visible.get().then(|| {
            view! {
                <div style=move || css(view.device.get(), StyledElement::PromptButtons)>
                    {prompts
                        .iter()
                        .map(|prompt| {
                            view! {
                                <button
                                    style=move || css(view.device.get(), StyledElement::PromptButton)
                                    on:click=move |_| on_pick.run(prompt.to_string())
                                >
                                    {*prompt}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            }
        })
    }
}
