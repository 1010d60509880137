//! Chat input component

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlTextAreaElement;

const MAX_HEIGHT_PX: i32 = 200;

/// Enter submits, Shift+Enter falls through to insert a newline.
pub fn submits_on_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

/// Chat composer with auto-resize textarea
#[component]
pub fn ChatInput(
    /// Current input value
    value: RwSignal<String>,
    /// Called when user submits
    on_submit: impl Fn() + 'static + Clone,
    /// Whether sending is currently blocked
    #[prop(into)]
    disabled: Signal<bool>,
    /// Placeholder text
    #[prop(default = "Ask a question about this document...")]
    placeholder: &'static str,
) -> impl IntoView {
    let textarea_ref = NodeRef::<leptos::html::Textarea>::new();

    let resize_textarea = move || {
        if let Some(textarea) = textarea_ref.get() {
            let el: &HtmlTextAreaElement = textarea.as_ref();
            let new_height = el.scroll_height().min(MAX_HEIGHT_PX);
            let _ = el.set_attribute(
                "style",
                &format!("height: {}px; max-height: {}px;", new_height, MAX_HEIGHT_PX),
            );
        }
    };

    let on_input = move |ev: web_sys::Event| {
        let Some(textarea) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
        else {
            return;
        };
        value.set(textarea.value());
        resize_textarea();
    };

    let on_keydown = {
        let on_submit = on_submit.clone();
        move |ev: web_sys::KeyboardEvent| {
            if submits_on_key(&ev.key(), ev.shift_key()) {
                ev.prevent_default();
                if !disabled.get_untracked() && !value.get_untracked().trim().is_empty() {
                    on_submit();
                }
            }
        }
    };

    let on_button_click = move |_| {
        if !disabled.get_untracked() && !value.get_untracked().trim().is_empty() {
            on_submit();
        }
    };

    let is_empty = Signal::derive(move || value.get().trim().is_empty());

    view! {
        <div class="flex items-end gap-3 p-4 bg-slate-800/50 backdrop-blur-sm border-t border-slate-700">
            <div class="flex-1 relative">
                <textarea
                    node_ref=textarea_ref
                    prop:value=move || value.get()
                    on:input=on_input
                    on:keydown=on_keydown
                    placeholder=placeholder
                    rows="1"
                    class="w-full px-4 py-3 bg-slate-900 border border-slate-700 rounded-xl resize-none
                           text-slate-100 placeholder-slate-500
                           focus:outline-none focus:ring-2 focus:ring-amber-500 focus:border-transparent"
                    style="max-height: 200px;"
                ></textarea>
            </div>

            <button
                on:click=on_button_click
                disabled=move || disabled.get() || is_empty.get()
                class="p-3 bg-amber-600 hover:bg-amber-700 disabled:bg-slate-700
                       disabled:cursor-not-allowed rounded-xl transition-colors"
                title="Send"
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    class="w-5 h-5 text-white"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    <line x1="22" y1="2" x2="11" y2="13"></line>
                    <polygon points="22 2 15 22 11 13 2 9 22 2"></polygon>
                </svg>
            </button>
        </div>
    }
}
