use leptos::prelude::*;
use smoothie_core::{ChatMessage, Role};

const AVATAR: &str = "/assets/avatar.png";

fn role_class(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[component]
fn Avatar() -> impl IntoView {
    view! {
        <div class="avatar">
            <img src=AVATAR alt="Assistant" class="avatar-image" />
        </div>
    }
}

/// One bubble with avatar, optional image, optional price and time
#[component]
pub fn MessageBubble(message: ChatMessage, is_last: bool, on_image_load: Callback<()>) -> impl IntoView {
    let role = role_class(message.role);
    let image = message
        .show_image
        .then(|| message.image_path.clone())
        .flatten()
        .map(|src| {
            view! {
                <img
                    src=src
                    alt="Smoothie"
                    class="smoothie-image"
                    on:load=move |_| on_image_load.run(())
                    on:error=move |ev| {
                        let img: web_sys::HtmlElement = event_target(&ev);
                        let _ = img.style().set_property("display", "none");
                    }
                />
            }
        });
    let price = message
        .price_label()
        .map(|label| view! { " " <span class="smoothie-price">{label}</span> });

    view! {
        <div class=format!("message-wrapper {}{}", role, if is_last { " last-message" } else { "" })>
            <div class=format!("message-container {}", role)>
                {message.is_assistant().then(|| view! { <Avatar /> })}
                <div class=format!("message-wrapper-inner {}", role)>
                    <div class=format!("message {}", role)>
                        {image}
                        <p>{message.content.clone()} {price}</p>
                    </div>
                    <span class=format!("timestamp {}", role)>{message.formatted_time()}</span>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="message-wrapper assistant">
            <div class="message-container assistant">
                <Avatar />
                <div class="message-wrapper-inner assistant">
                    <div class="message assistant">
                        <div class="typing-indicator">
                            <div class="typing-dot"></div>
                            <div class="typing-dot"></div>
                            <div class="typing-dot"></div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
