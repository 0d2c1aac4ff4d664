use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use smoothie_app::{Anchor, BlurTarget, Message};
use smoothie_core::chat::SUGGESTED_PROMPTS;
use smoothie_core::StyledElement;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, FocusEvent};

use super::css;
use super::message_list::{MessageBubble, TypingIndicator};
use super::prompt_buttons::PromptButtons;
use crate::dom_surface::{detect_ios, sample_viewport, window_metrics, DomSurface};
use crate::driver::{self, build_settings, SharedDriver, ViewSignals, WidgetDriver};

const CHAT_LOGO: &str = "/assets/earth-bar-logo.png";

#[component]
pub fn ChatWidget(view: ViewSignals) -> impl IntoView {
    let main_ref = NodeRef::<html::Div>::new();
    let header_ref = NodeRef::<html::Div>::new();
    let container_ref = NodeRef::<html::Div>::new();
    let messages_ref = NodeRef::<html::Div>::new();
    let input_ref = NodeRef::<html::Input>::new();
    let send_ref = NodeRef::<html::Button>::new();

    let driver = StoredValue::new_local(None::<SharedDriver>);
    let send = move |msg: Message| {
        if let Some(shared) = driver.with_value(|d| d.clone()) {
            driver::dispatch(&shared, msg);
        }
    };

    // Mount once every anchor is in the document
    Effect::new(move || {
        if driver.with_value(|d| d.is_some()) {
            return;
        }
        let (Some(main), Some(header), Some(container), Some(messages), Some(input)) = (
            main_ref.get(),
            header_ref.get(),
            container_ref.get(),
            messages_ref.get(),
            input_ref.get(),
        ) else {
            return;
        };

        let window = window();
        let mut surface = DomSurface::new(window.clone());
        surface.attach(Anchor::MainContent, main.into());
        surface.attach(Anchor::Header, header.into());
        surface.attach(Anchor::ChatContainer, container.into());
        surface.attach(Anchor::ChatMessages, messages.into());
        surface.attach(Anchor::ChatInput, input.into());

        let shared = WidgetDriver::new(build_settings(), window.clone(), surface, view);
        driver.set_value(Some(shared.clone()));
        install_listeners(&shared, &window);

        driver::dispatch(
            &shared,
            Message::Mount {
                metrics: window_metrics(&window),
                is_ios: detect_ios(&window),
            },
        );
    });

    let on_image_load = Callback::new(move |_: ()| send(Message::ImageLoaded));
    let on_pick = Callback::new(move |prompt: String| send(Message::SendPrompt(prompt)));

    let on_blur = move |ev: FocusEvent| {
        let related = match (ev.related_target(), send_ref.get_untracked()) {
            (None, _) => BlurTarget::Nothing,
            (Some(target), Some(button)) if &target == AsRef::<EventTarget>::as_ref(&button) => {
                BlurTarget::SendButton
            }
            (Some(_), _) => BlurTarget::Other,
        };
        send(Message::InputBlurred { related });
    };

    let title_style = move || css(view.device.get(), StyledElement::Title);

    view! {
        <div class="main-content" node_ref=main_ref>
            <div node_ref=header_ref style=move || css(view.device.get(), StyledElement::Header)>
                <div class="title-with-logo">
                    <div class="title-text" style=title_style>"Your personal"</div>
                    <div class="logo-container">
                        <img
                            src=CHAT_LOGO
                            alt="Earth Bar"
                            style=move || css(view.device.get(), StyledElement::ChatLogo)
                        />
                    </div>
                    <div class="title-text" style=title_style>"assistant"</div>
                </div>
                <p class="subtitle" style=move || css(view.device.get(), StyledElement::Subtitle)>
                    "Tell us what you're craving, we'll pick out a smoothie that works as hard as you do"
                </p>
            </div>
            <div node_ref=container_ref style=move || css(view.device.get(), StyledElement::ChatContainer)>
                <div
                    class="chat-messages"
                    node_ref=messages_ref
                    style=move || css(view.device.get(), StyledElement::ChatMessages)
                >
                    {move || {
                        let messages = view.messages.get();
                        let last = messages.len().saturating_sub(1);
                        messages
                            .into_iter()
                            .enumerate()
                            .map(|(i, message)| {
                                view! { <MessageBubble message=message is_last=i == last on_image_load=on_image_load /> }
                            })
                            .collect_view()
                    }}
                    {move || view.typing.get().then(|| view! { <TypingIndicator /> })}
                    <PromptButtons view=view prompts=SUGGESTED_PROMPTS on_pick=on_pick />
                </div>
                <div style=move || css(view.device.get(), StyledElement::ChatInputArea)>
                    <div class="input-container">
                        <input
                            class="chat-input"
                            node_ref=input_ref
                            placeholder="What smoothie are you craving?"
                            style=move || css(view.device.get(), StyledElement::InputField)
                            prop:value=move || view.draft.get()
                            on:input=move |ev| send(Message::DraftChanged(event_target_value(&ev)))
                            on:keydown=move |ev: ev::KeyboardEvent| {
                                if ev.key() == "Enter" {
                                    send(Message::Send);
                                }
                            }
                            on:focus=move |_| send(Message::InputFocused)
                            on:blur=on_blur
                        />
                        <button
                            class="send-button"
                            node_ref=send_ref
                            style=move || {
                                let enabled = !view.draft.get().trim().is_empty();
                                css(view.device.get(), StyledElement::SendButton { enabled })
                            }
                            disabled=move || view.draft.get().trim().is_empty()
                            on:click=move |_| send(Message::Send)
                        >
                            "Send"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Window resize and orientation change, visual viewport resize and
/// scroll, page hide
fn install_listeners(shared: &SharedDriver, window: &web_sys::Window) {
    let has_visual_viewport = window.visual_viewport().is_some();

    {
        let shared = shared.clone();
        let win = window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            driver::dispatch(&shared, Message::Resized(window_metrics(&win)));
            if !has_visual_viewport {
                driver::dispatch(&shared, Message::ViewportChanged(sample_viewport(&win)));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        on_resize.forget();
    }

    {
        // the rotated size may not be final yet; later resizes correct it
        let shared = shared.clone();
        let win = window.clone();
        let on_rotate = Closure::<dyn FnMut()>::new(move || {
            driver::dispatch(&shared, Message::Resized(window_metrics(&win)));
            driver::dispatch(&shared, Message::ViewportChanged(sample_viewport(&win)));
        });
        let _ = window
            .add_event_listener_with_callback("orientationchange", on_rotate.as_ref().unchecked_ref());
        on_rotate.forget();
    }

    if let Some(visual) = window.visual_viewport() {
        let shared = shared.clone();
        let window = window.clone();
        let on_viewport = Closure::<dyn FnMut()>::new(move || {
            driver::dispatch(&shared, Message::ViewportChanged(sample_viewport(&window)));
        });
        for event in ["resize", "scroll"] {
            let _ = visual.add_event_listener_with_callback(event, on_viewport.as_ref().unchecked_ref());
        }
        on_viewport.forget();
    }

    let shared = shared.clone();
    let on_hide = Closure::<dyn FnMut()>::new(move || driver::unmount(&shared));
    let _ = window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref());
    on_hide.forget();
}
